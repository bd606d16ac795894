use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::customers::UpdateCustomerRequest, entity::customers, models::clearable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub shop_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Emails are compared case-insensitively, so they are stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Customer {
    pub fn apply_changes(&mut self, changes: &UpdateCustomerRequest) {
        if let Some(email) = &changes.email {
            self.email = normalize_email(email);
        }
        if let Some(first_name) = &changes.first_name {
            self.first_name = clearable(first_name);
        }
        if let Some(last_name) = &changes.last_name {
            self.last_name = clearable(last_name);
        }
        if let Some(phone) = &changes.phone {
            self.phone = clearable(phone);
        }
    }
}

impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            shop_id: model.shop_id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
