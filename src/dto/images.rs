use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Image,
    validation::{self, MAX_NAME_LEN, Validate, ValidationErrors},
};

const MAX_URL_LEN: usize = 2048;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateImageRequest {
    pub shop_id: String,
    /// Location returned by the object storage upload.
    pub url: String,
    pub alt: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateImageRequest {
    pub url: Option<String>,
    pub alt: Option<String>,
    /// `null` clears the width.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<i32>, nullable)]
    pub width: Option<Option<i32>>,
    /// `null` clears the height.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<i32>, nullable)]
    pub height: Option<Option<i32>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ImageList {
    #[schema(value_type = Vec<Image>)]
    pub items: Vec<Image>,
}

fn check_url(errors: &mut ValidationErrors, url: &str) {
    if url.len() > MAX_URL_LEN {
        errors.add("url", format!("must be at most {MAX_URL_LEN} characters"));
    } else {
        validation::http_url(errors, "url", url);
    }
}

fn check_dimensions(errors: &mut ValidationErrors, width: Option<i32>, height: Option<i32>) {
    if let Some(width) = width {
        validation::positive(errors, "width", i64::from(width));
    }
    if let Some(height) = height {
        validation::positive(errors, "height", i64::from(height));
    }
}

impl Validate for CreateImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "shop_id", &self.shop_id);
        check_url(&mut errors, &self.url);
        validation::optional_text(&mut errors, "alt", self.alt.as_deref(), MAX_NAME_LEN);
        check_dimensions(&mut errors, self.width, self.height);
        errors.into_result()
    }
}

impl Validate for UpdateImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.url.is_some(),
                self.alt.is_some(),
                self.width.is_some(),
                self.height.is_some(),
            ],
        );
        if let Some(url) = &self.url {
            check_url(&mut errors, url);
        }
        validation::optional_text(&mut errors, "alt", self.alt.as_deref(), MAX_NAME_LEN);
        check_dimensions(&mut errors, self.width.flatten(), self.height.flatten());
        errors.into_result()
    }
}
