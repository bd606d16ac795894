use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::products::UpdateProductRequest, entity::products, models::clearable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub shop_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub compare_at_price: Option<i64>,
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory: i32,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn apply_changes(&mut self, changes: &UpdateProductRequest) {
        if let Some(name) = &changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(description) = &changes.description {
            self.description = clearable(description);
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(compare_at) = changes.compare_at_price {
            self.compare_at_price = compare_at;
        }
        if let Some(sku) = &changes.sku {
            self.sku = clearable(sku);
        }
        if let Some(inventory) = changes.inventory {
            self.inventory = inventory;
        }
        if let Some(published) = changes.published {
            self.published = published;
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            shop_id: model.shop_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            price: model.price,
            compare_at_price: model.compare_at_price,
            sku: model.sku,
            inventory: model.inventory,
            published: model.published,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_change_keeps_everything_else() {
        let original = Product {
            id: "p1".into(),
            user_id: "u1".into(),
            shop_id: "s1".into(),
            name: "Ferris Mug".into(),
            slug: "ferris-mug".into(),
            description: None,
            price: 1200,
            compare_at_price: Some(1500),
            sku: Some("MUG-1".into()),
            inventory: 100,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut updated = original.clone();
        updated.apply_changes(&UpdateProductRequest {
            price: Some(990),
            ..Default::default()
        });

        assert_eq!(updated.price, 990);
        assert_eq!(
            Product {
                price: original.price,
                ..updated
            },
            original
        );
    }

    #[test]
    fn null_compare_at_price_clears_it() {
        let mut product = Product {
            id: "p1".into(),
            user_id: "u1".into(),
            shop_id: "s1".into(),
            name: "Ferris Mug".into(),
            slug: "ferris-mug".into(),
            description: None,
            price: 1200,
            compare_at_price: Some(1500),
            sku: None,
            inventory: 100,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        product.apply_changes(&UpdateProductRequest {
            compare_at_price: Some(None),
            ..Default::default()
        });
        assert_eq!(product.compare_at_price, None);
        assert_eq!(product.price, 1200);
    }
}
