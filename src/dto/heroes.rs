use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Hero,
    validation::{self, MAX_NAME_LEN, Validate, ValidationErrors},
};

const MAX_LABEL_LEN: usize = 64;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateHeroRequest {
    pub page_id: String,
    pub heading: String,
    pub subheading: Option<String>,
    pub image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateHeroRequest {
    pub heading: Option<String>,
    pub subheading: Option<String>,
    pub image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct HeroList {
    #[schema(value_type = Vec<Hero>)]
    pub items: Vec<Hero>,
}

// Empty strings clear optional URLs on update, so only non-empty values are checked.
fn optional_url(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        validation::http_url(errors, field, value);
    }
}

impl Validate for CreateHeroRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "page_id", &self.page_id);
        validation::required_text(&mut errors, "heading", &self.heading, MAX_NAME_LEN);
        validation::optional_text(
            &mut errors,
            "subheading",
            self.subheading.as_deref(),
            MAX_NAME_LEN,
        );
        optional_url(&mut errors, "image_url", self.image_url.as_deref());
        validation::optional_text(
            &mut errors,
            "cta_label",
            self.cta_label.as_deref(),
            MAX_LABEL_LEN,
        );
        optional_url(&mut errors, "cta_url", self.cta_url.as_deref());
        errors.into_result()
    }
}

impl Validate for UpdateHeroRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.heading.is_some(),
                self.subheading.is_some(),
                self.image_url.is_some(),
                self.cta_label.is_some(),
                self.cta_url.is_some(),
            ],
        );
        if let Some(heading) = &self.heading {
            validation::required_text(&mut errors, "heading", heading, MAX_NAME_LEN);
        }
        validation::optional_text(
            &mut errors,
            "subheading",
            self.subheading.as_deref(),
            MAX_NAME_LEN,
        );
        optional_url(&mut errors, "image_url", self.image_url.as_deref());
        validation::optional_text(
            &mut errors,
            "cta_label",
            self.cta_label.as_deref(),
            MAX_LABEL_LEN,
        );
        optional_url(&mut errors, "cta_url", self.cta_url.as_deref());
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checks_urls_only_when_present() {
        let req = CreateHeroRequest {
            page_id: "page1".into(),
            heading: "Summer sale".into(),
            subheading: None,
            image_url: Some("not a url".into()),
            cta_label: Some("Shop now".into()),
            cta_url: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field("image_url").is_some());
        assert!(errors.field("cta_url").is_none());
    }

    #[test]
    fn empty_url_on_update_means_clear() {
        let req = UpdateHeroRequest {
            cta_url: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }
}
