use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::content_blocks::UpdateContentBlockRequest, entity::content_blocks, error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlockKind {
    Product,
    Collection,
}

impl ContentBlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentBlockKind::Product => "product",
            ContentBlockKind::Collection => "collection",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "product" => Some(ContentBlockKind::Product),
            "collection" => Some(ContentBlockKind::Collection),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentBlock {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub page_id: String,
    pub kind: ContentBlockKind,
    pub product_id: Option<String>,
    pub collection_id: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl ContentBlock {
    pub fn apply_changes(&mut self, changes: &UpdateContentBlockRequest) {
        if let Some(kind) = changes.kind {
            if kind != self.kind {
                self.product_id = None;
                self.collection_id = None;
            }
            self.kind = kind;
        }
        if let Some(product_id) = &changes.product_id {
            self.product_id = Some(product_id.clone());
        }
        if let Some(collection_id) = &changes.collection_id {
            self.collection_id = Some(collection_id.clone());
        }
        if let Some(position) = changes.position {
            self.position = position;
        }
    }
}

impl TryFrom<content_blocks::Model> for ContentBlock {
    type Error = AppError;

    fn try_from(model: content_blocks::Model) -> Result<Self, Self::Error> {
        let kind = ContentBlockKind::parse(&model.kind).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("unknown content block kind {}", model.kind))
        })?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            page_id: model.page_id,
            kind,
            product_id: model.product_id,
            collection_id: model.collection_id,
            position: model.position,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_block() -> ContentBlock {
        ContentBlock {
            id: "b1".into(),
            user_id: "u1".into(),
            page_id: "pg1".into(),
            kind: ContentBlockKind::Product,
            product_id: Some("p1".into()),
            collection_id: None,
            position: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn switching_kind_drops_old_reference() {
        let mut block = product_block();
        block.apply_changes(&UpdateContentBlockRequest {
            kind: Some(ContentBlockKind::Collection),
            collection_id: Some("c1".into()),
            ..Default::default()
        });
        assert_eq!(block.kind, ContentBlockKind::Collection);
        assert_eq!(block.product_id, None);
        assert_eq!(block.collection_id.as_deref(), Some("c1"));
        assert_eq!(block.position, 3);
    }

    #[test]
    fn same_kind_keeps_reference() {
        let mut block = product_block();
        block.apply_changes(&UpdateContentBlockRequest {
            kind: Some(ContentBlockKind::Product),
            position: Some(0),
            ..Default::default()
        });
        assert_eq!(block.product_id.as_deref(), Some("p1"));
        assert_eq!(block.position, 0);
    }
}
