use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::pages::UpdatePageRequest, entity::pages, models::clearable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub shop_id: String,
    pub title: String,
    pub slug: String,
    pub body: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn apply_changes(&mut self, changes: &UpdatePageRequest) {
        if let Some(title) = &changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(body) = &changes.body {
            // body is markup; keep surrounding whitespace
            self.body = if body.trim().is_empty() { None } else { Some(body.clone()) };
        }
        if let Some(published) = changes.published {
            self.published = published;
        }
    }
}

impl From<pages::Model> for Page {
    fn from(model: pages::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            shop_id: model.shop_id,
            title: model.title,
            slug: model.slug,
            body: model.body,
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
    fn publishing_keeps_body() {
        let mut page = Page {
            id: "pg1".into(),
            user_id: "u1".into(),
            shop_id: "s1".into(),
            title: "About".into(),
            slug: "about".into(),
            body: Some("  <p>Hello</p>\n".into()),
            published: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        page.apply_changes(&UpdatePageRequest {
            published: Some(true),
            ..Default::default()
        });
        assert!(page.published);
        assert_eq!(page.body.as_deref(), Some("  <p>Hello</p>\n"));
    }
}
