use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Customer,
    validation::{self, MAX_NAME_LEN, Validate, ValidationErrors},
};

const MAX_PHONE_LEN: usize = 32;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub shop_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerList {
    #[schema(value_type = Vec<Customer>)]
    pub items: Vec<Customer>,
}

fn names_and_phone(
    errors: &mut ValidationErrors,
    first_name: Option<&str>,
    last_name: Option<&str>,
    phone: Option<&str>,
) {
    validation::optional_text(errors, "first_name", first_name, MAX_NAME_LEN);
    validation::optional_text(errors, "last_name", last_name, MAX_NAME_LEN);
    validation::optional_text(errors, "phone", phone, MAX_PHONE_LEN);
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "shop_id", &self.shop_id);
        validation::email(&mut errors, "email", &self.email);
        names_and_phone(
            &mut errors,
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.phone.as_deref(),
        );
        errors.into_result()
    }
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.email.is_some(),
                self.first_name.is_some(),
                self.last_name.is_some(),
                self.phone.is_some(),
            ],
        );
        if let Some(email) = &self.email {
            validation::email(&mut errors, "email", email);
        }
        names_and_phone(
            &mut errors,
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.phone.as_deref(),
        );
        errors.into_result()
    }
}
