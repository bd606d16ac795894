use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::heroes::UpdateHeroRequest, entity::heroes, models::clearable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hero {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub page_id: String,
    pub heading: String,
    pub subheading: Option<String>,
    pub image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Hero {
    pub fn apply_changes(&mut self, changes: &UpdateHeroRequest) {
        if let Some(heading) = &changes.heading {
            self.heading = heading.trim().to_string();
        }
        if let Some(subheading) = &changes.subheading {
            self.subheading = clearable(subheading);
        }
        if let Some(image_url) = &changes.image_url {
            self.image_url = clearable(image_url);
        }
        if let Some(cta_label) = &changes.cta_label {
            self.cta_label = clearable(cta_label);
        }
        if let Some(cta_url) = &changes.cta_url {
            self.cta_url = clearable(cta_url);
        }
    }
}

impl From<heroes::Model> for Hero {
    fn from(model: heroes::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            page_id: model.page_id,
            heading: model.heading,
            subheading: model.subheading,
            image_url: model.image_url,
            cta_label: model.cta_label,
            cta_url: model.cta_url,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
