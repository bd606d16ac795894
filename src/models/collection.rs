use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::collections::UpdateCollectionRequest, entity::collections, models::clearable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub shop_id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn apply_changes(&mut self, changes: &UpdateCollectionRequest) {
        if let Some(title) = &changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(description) = &changes.description {
            self.description = clearable(description);
        }
    }
}

impl From<collections::Model> for Collection {
    fn from(model: collections::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            shop_id: model.shop_id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
