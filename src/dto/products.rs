use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Image, Product},
    validation::{self, MAX_NAME_LEN, MAX_TEXT_LEN, Validate, ValidationErrors},
};

const MAX_SKU_LEN: usize = 64;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateProductRequest {
    pub shop_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Minor currency units.
    pub price: i64,
    pub compare_at_price: Option<i64>,
    pub sku: Option<String>,
    pub inventory: Option<i32>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    /// `null` clears the compare-at price.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<i64>, nullable)]
    pub compare_at_price: Option<Option<i64>>,
    pub sku: Option<String>,
    pub inventory: Option<i32>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttachImageRequest {
    pub image_id: String,
    pub position: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductImage {
    pub position: i32,
    pub image: Image,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductImageList {
    #[schema(value_type = Vec<ProductImage>)]
    pub items: Vec<ProductImage>,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "shop_id", &self.shop_id);
        validation::required_text(&mut errors, "name", &self.name, MAX_NAME_LEN);
        validation::slug(&mut errors, "slug", &self.slug);
        validation::optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            MAX_TEXT_LEN,
        );
        validation::non_negative(&mut errors, "price", self.price);
        if let Some(compare_at) = self.compare_at_price {
            validation::non_negative(&mut errors, "compare_at_price", compare_at);
        }
        validation::optional_text(&mut errors, "sku", self.sku.as_deref(), MAX_SKU_LEN);
        if let Some(inventory) = self.inventory {
            validation::non_negative(&mut errors, "inventory", i64::from(inventory));
        }
        errors.into_result()
    }
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.name.is_some(),
                self.slug.is_some(),
                self.description.is_some(),
                self.price.is_some(),
                self.compare_at_price.is_some(),
                self.sku.is_some(),
                self.inventory.is_some(),
                self.published.is_some(),
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
        if let Some(price) = self.price {
            validation::non_negative(&mut errors, "price", price);
        }
        if let Some(Some(compare_at)) = self.compare_at_price {
            validation::non_negative(&mut errors, "compare_at_price", compare_at);
        }
        validation::optional_text(&mut errors, "sku", self.sku.as_deref(), MAX_SKU_LEN);
        if let Some(inventory) = self.inventory {
            validation::non_negative(&mut errors, "inventory", i64::from(inventory));
        }
        errors.into_result()
    }
}

impl Validate for AttachImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "image_id", &self.image_id);
        if let Some(position) = self.position {
            validation::non_negative(&mut errors, "position", i64::from(position));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoodie() -> CreateProductRequest {
        CreateProductRequest {
            shop_id: "shop1".into(),
            name: "Axum Hoodie".into(),
            slug: "axum-hoodie".into(),
            description: Some("Warm hoodie for Rustaceans".into()),
            price: 5500,
            compare_at_price: None,
            sku: Some("HOOD-01".into()),
            inventory: Some(50),
            published: Some(true),
        }
    }

    #[test]
    fn accepts_valid_product() {
        assert!(hoodie().validate().is_ok());
    }

    #[test]
    fn rejects_negative_money_and_stock() {
        let req = CreateProductRequest {
            price: -1,
            compare_at_price: Some(-5),
            inventory: Some(-2),
            ..hoodie()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field("price").is_some());
        assert!(errors.field("compare_at_price").is_some());
        assert!(errors.field("inventory").is_some());
    }

    #[test]
    fn attach_rejects_negative_position() {
        let req = AttachImageRequest {
            image_id: "img1".into(),
            position: Some(-1),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field("position").is_some());
    }

    #[test]
    fn null_compare_at_price_means_clear() {
        let cleared: UpdateProductRequest =
            serde_json::from_str(r#"{"compare_at_price": null}"#).unwrap();
        assert_eq!(cleared.compare_at_price, Some(None));
        assert!(cleared.validate().is_ok());

        let untouched: UpdateProductRequest = serde_json::from_str(r#"{"price": 10}"#).unwrap();
        assert_eq!(untouched.compare_at_price, None);
    }

    #[test]
    fn update_with_single_field_is_valid() {
        let req = UpdateProductRequest {
            price: Some(4900),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }
}
