use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Payment, PaymentStatus},
    validation::{self, Validate, ValidationErrors},
};

const MAX_PROVIDER_LEN: usize = 64;
const MAX_REFERENCE_LEN: usize = 256;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub order_id: String,
    /// Minor currency units; the currency is taken from the order.
    pub amount: i64,
    pub provider: String,
    pub reference: Option<String>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub amount: Option<i64>,
    pub provider: Option<String>,
    pub reference: Option<String>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentList {
    #[schema(value_type = Vec<Payment>)]
    pub items: Vec<Payment>,
}

impl Validate for CreatePaymentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "order_id", &self.order_id);
        validation::positive(&mut errors, "amount", self.amount);
        validation::required_text(&mut errors, "provider", &self.provider, MAX_PROVIDER_LEN);
        validation::optional_text(
            &mut errors,
            "reference",
            self.reference.as_deref(),
            MAX_REFERENCE_LEN,
        );
        errors.into_result()
    }
}

impl Validate for UpdatePaymentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.amount.is_some(),
                self.provider.is_some(),
                self.reference.is_some(),
                self.status.is_some(),
            ],
        );
        if let Some(amount) = self.amount {
            validation::positive(&mut errors, "amount", amount);
        }
        if let Some(provider) = &self.provider {
            validation::required_text(&mut errors, "provider", provider, MAX_PROVIDER_LEN);
        }
        validation::optional_text(
            &mut errors,
            "reference",
            self.reference.as_deref(),
            MAX_REFERENCE_LEN,
        );
        errors.into_result()
    }
}
