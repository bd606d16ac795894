use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::shops::UpdateShopRequest, entity::shops, models::clearable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Shop {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    pub fn apply_changes(&mut self, changes: &UpdateShopRequest) {
        if let Some(name) = &changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(description) = &changes.description {
            self.description = clearable(description);
        }
        if let Some(currency) = &changes.currency {
            self.currency = currency.clone();
        }
    }
}

impl From<shops::Model> for Shop {
    fn from(model: shops::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            currency: model.currency,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> Shop {
        Shop {
            id: "s1".into(),
            user_id: "u1".into(),
            name: "Ferris Goods".into(),
            slug: "ferris-goods".into(),
            description: Some("Crab merch".into()),
            currency: "USD".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn update_preserves_unspecified_fields() {
        let mut updated = shop();
        updated.apply_changes(&UpdateShopRequest {
            name: Some("Ferris & Co".into()),
            ..Default::default()
        });

        let original = shop();
        assert_eq!(updated.name, "Ferris & Co");
        assert_eq!(updated.slug, original.slug);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.currency, original.currency);
    }

    #[test]
    fn empty_description_clears_it() {
        let mut updated = shop();
        updated.apply_changes(&UpdateShopRequest {
            description: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(updated.description, None);
    }
}
