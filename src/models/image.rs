use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::images::UpdateImageRequest, entity::images, models::clearable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub shop_id: String,
    pub url: String,
    pub alt: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Image {
    pub fn apply_changes(&mut self, changes: &UpdateImageRequest) {
        if let Some(url) = &changes.url {
            self.url = url.clone();
        }
        if let Some(alt) = &changes.alt {
            self.alt = clearable(alt);
        }
        if let Some(width) = changes.width {
            self.width = width;
        }
        if let Some(height) = changes.height {
            self.height = height;
        }
    }
}

impl From<images::Model> for Image {
    fn from(model: images::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            shop_id: model.shop_id,
            url: model.url,
            alt: model.alt,
            width: model.width,
            height: model.height,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
