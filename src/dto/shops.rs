use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Shop,
    validation::{self, MAX_NAME_LEN, MAX_TEXT_LEN, Validate, ValidationErrors},
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateShopRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// ISO 4217 code, defaults to `USD`.
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// An empty string clears the description.
    pub description: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ShopList {
    #[schema(value_type = Vec<Shop>)]
    pub items: Vec<Shop>,
}

impl Validate for CreateShopRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::required_text(&mut errors, "name", &self.name, MAX_NAME_LEN);
        validation::slug(&mut errors, "slug", &self.slug);
        validation::optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            MAX_TEXT_LEN,
        );
        if let Some(currency) = &self.currency {
            validation::currency(&mut errors, "currency", currency);
        }
        errors.into_result()
    }
}

impl Validate for UpdateShopRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.name.is_some(),
                self.slug.is_some(),
                self.description.is_some(),
                self.currency.is_some(),
            ],
        );
        if let Some(name) = &self.name {
            validation::required_text(&mut errors, "name", name, MAX_NAME_LEN);
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
        if let Some(currency) = &self.currency {
            validation::currency(&mut errors, "currency", currency);
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_shop() {
        let req = CreateShopRequest {
            name: "Ferris Goods".into(),
            slug: "ferris-goods".into(),
            description: None,
            currency: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn reports_each_bad_field() {
        let req = CreateShopRequest {
            name: "".into(),
            slug: "Ferris Goods".into(),
            description: None,
            currency: Some("usd".into()),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field("name").is_some());
        assert!(errors.field("slug").is_some());
        assert!(errors.field("currency").is_some());
    }

    #[test]
    fn empty_update_is_rejected() {
        let errors = UpdateShopRequest::default().validate().unwrap_err();
        assert_eq!(errors.field("body"), Some(&["No fields to update".to_string()][..]));
    }
}
