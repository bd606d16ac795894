use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Collection, Product},
    validation::{self, MAX_NAME_LEN, MAX_TEXT_LEN, Validate, ValidationErrors},
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateCollectionRequest {
    pub shop_id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateCollectionRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AddCollectionProductRequest {
    pub product_id: String,
    pub position: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CollectionList {
    #[schema(value_type = Vec<Collection>)]
    pub items: Vec<Collection>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionProduct {
    pub position: i32,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CollectionProductList {
    #[schema(value_type = Vec<CollectionProduct>)]
    pub items: Vec<CollectionProduct>,
}

impl Validate for CreateCollectionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "shop_id", &self.shop_id);
        validation::required_text(&mut errors, "title", &self.title, MAX_NAME_LEN);
        validation::slug(&mut errors, "slug", &self.slug);
        validation::optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            MAX_TEXT_LEN,
        );
        errors.into_result()
    }
}

impl Validate for UpdateCollectionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.title.is_some(),
                self.slug.is_some(),
                self.description.is_some(),
            ],
        );
        if let Some(title) = &self.title {
            validation::required_text(&mut errors, "title", title, MAX_NAME_LEN);
        }
        if let Some(slug) = &self.slug {
            validation::slug(&mut errors, "slug", slug);
        }
        validation::optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            MAX_TEXT_LEN,
        );
        errors.into_result()
    }
}

impl Validate for AddCollectionProductRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "product_id", &self.product_id);
        if let Some(position) = self.position {
            validation::non_negative(&mut errors, "position", i64::from(position));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_position_must_not_be_negative() {
        let req = AddCollectionProductRequest {
            product_id: "p1".into(),
            position: Some(-3),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field("position").is_some());

        let req = AddCollectionProductRequest {
            position: Some(0),
            ..req
        };
        assert!(req.validate().is_ok());
    }
}
