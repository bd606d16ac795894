use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pagination details attached to list responses.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
    pub total_pages: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
            total_pages: Some(total_pages),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
            total_pages: None,
        }
    }
}

/// Envelope shared by every JSON endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn item(message: impl Into<String>, data: T) -> Self {
        Self::success(message, data, Some(Meta::empty()))
    }

    /// Re-encodes the payload as JSON, for callers that dispatch dynamically.
    pub fn into_json(self) -> serde_json::Result<ApiResponse<serde_json::Value>> {
        let data = self.data.map(serde_json::to_value).transpose()?;
        Ok(ApiResponse {
            message: self.message,
            data,
            meta: self.meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_rounds_total_pages_up() {
        let meta = Meta::new(2, 20, 41);
        assert_eq!(meta.total_pages, Some(3));
        assert_eq!(Meta::new(1, 20, 0).total_pages, Some(0));
    }

    #[test]
    fn into_json_keeps_message_and_meta() {
        let resp = ApiResponse::success("Shops", vec![1, 2], Some(Meta::new(1, 20, 2)));
        let json = resp.into_json().expect("json");
        assert_eq!(json.message, "Shops");
        assert_eq!(json.data, Some(serde_json::json!([1, 2])));
        assert_eq!(json.meta, Some(Meta::new(1, 20, 2)));
    }
}
