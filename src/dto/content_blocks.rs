use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{ContentBlock, ContentBlockKind},
    validation::{self, Validate, ValidationErrors},
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateContentBlockRequest {
    pub page_id: String,
    pub kind: ContentBlockKind,
    pub product_id: Option<String>,
    pub collection_id: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateContentBlockRequest {
    /// Switching kind drops the reference of the previous kind.
    pub kind: Option<ContentBlockKind>,
    pub product_id: Option<String>,
    pub collection_id: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ContentBlockList {
    #[schema(value_type = Vec<ContentBlock>)]
    pub items: Vec<ContentBlock>,
}

/// A block references exactly the kind of row its `kind` names.
pub fn check_target(
    errors: &mut ValidationErrors,
    kind: ContentBlockKind,
    product_id: Option<&str>,
    collection_id: Option<&str>,
) {
    match kind {
        ContentBlockKind::Product => {
            match product_id {
                Some(id) => validation::id(errors, "product_id", id),
                None => errors.add("product_id", "is required for product blocks"),
            }
            if collection_id.is_some() {
                errors.add("collection_id", "must be empty for product blocks");
            }
        }
        ContentBlockKind::Collection => {
            match collection_id {
                Some(id) => validation::id(errors, "collection_id", id),
                None => errors.add("collection_id", "is required for collection blocks"),
            }
            if product_id.is_some() {
                errors.add("product_id", "must be empty for collection blocks");
            }
        }
    }
}

impl Validate for CreateContentBlockRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "page_id", &self.page_id);
        check_target(
            &mut errors,
            self.kind,
            self.product_id.as_deref(),
            self.collection_id.as_deref(),
        );
        if let Some(position) = self.position {
            validation::non_negative(&mut errors, "position", i64::from(position));
        }
        errors.into_result()
    }
}

impl Validate for UpdateContentBlockRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.kind.is_some(),
                self.product_id.is_some(),
                self.collection_id.is_some(),
                self.position.is_some(),
            ],
        );
        if let Some(id) = &self.product_id {
            validation::id(&mut errors, "product_id", id);
        }
        if let Some(id) = &self.collection_id {
            validation::id(&mut errors, "collection_id", id);
        }
        if let Some(position) = self.position {
            validation::non_negative(&mut errors, "position", i64::from(position));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: ContentBlockKind, product: Option<&str>, collection: Option<&str>) -> CreateContentBlockRequest {
        CreateContentBlockRequest {
            page_id: "page1".into(),
            kind,
            product_id: product.map(Into::into),
            collection_id: collection.map(Into::into),
            position: None,
        }
    }

    #[test]
    fn product_block_needs_product_only() {
        assert!(block(ContentBlockKind::Product, Some("p1"), None).validate().is_ok());

        let errors = block(ContentBlockKind::Product, None, Some("c1"))
            .validate()
            .unwrap_err();
        assert!(errors.field("product_id").is_some());
        assert!(errors.field("collection_id").is_some());
    }

    #[test]
    fn collection_block_needs_collection_only() {
        assert!(
            block(ContentBlockKind::Collection, None, Some("c1"))
                .validate()
                .is_ok()
        );
        let errors = block(ContentBlockKind::Collection, None, None)
            .validate()
            .unwrap_err();
        assert!(errors.field("collection_id").is_some());
    }

    #[test]
    fn kind_deserializes_lowercase() {
        let req: CreateContentBlockRequest = serde_json::from_value(serde_json::json!({
            "page_id": "page1",
            "kind": "collection",
            "collection_id": "c1"
        }))
        .unwrap();
        assert_eq!(req.kind, ContentBlockKind::Collection);
    }
}
