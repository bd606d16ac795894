use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::payments::UpdatePaymentRequest, entity::payments, error::AppError, models::clearable,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "succeeded" => Some(PaymentStatus::Succeeded),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub order_id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: PaymentStatus,
    pub provider: String,
    pub reference: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn apply_changes(&mut self, changes: &UpdatePaymentRequest) {
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(provider) = &changes.provider {
            self.provider = provider.trim().to_string();
        }
        if let Some(reference) = &changes.reference {
            self.reference = clearable(reference);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

impl TryFrom<payments::Model> for Payment {
    type Error = AppError;

    fn try_from(model: payments::Model) -> Result<Self, Self::Error> {
        let status = PaymentStatus::parse(&model.status).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("unknown payment status {}", model.status))
        })?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            order_id: model.order_id,
            amount: model.amount,
            currency: model.currency,
            status,
            provider: model.provider,
            reference: model.reference,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}
