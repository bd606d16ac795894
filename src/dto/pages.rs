use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Page,
    validation::{self, MAX_NAME_LEN, Validate, ValidationErrors},
};

const MAX_BODY_LEN: usize = 100_000;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePageRequest {
    pub shop_id: String,
    pub title: String,
    pub slug: String,
    pub body: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PageList {
    #[schema(value_type = Vec<Page>)]
    pub items: Vec<Page>,
}

impl Validate for CreatePageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "shop_id", &self.shop_id);
        validation::required_text(&mut errors, "title", &self.title, MAX_NAME_LEN);
        validation::slug(&mut errors, "slug", &self.slug);
        validation::optional_text(&mut errors, "body", self.body.as_deref(), MAX_BODY_LEN);
        errors.into_result()
    }
}

impl Validate for UpdatePageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.title.is_some(),
                self.slug.is_some(),
                self.body.is_some(),
                self.published.is_some(),
            ],
        );
        if let Some(title) = &self.title {
            validation::required_text(&mut errors, "title", title, MAX_NAME_LEN);
        }
        if let Some(slug) = &self.slug {
            validation::slug(&mut errors, "slug", slug);
        }
        validation::optional_text(&mut errors, "body", self.body.as_deref(), MAX_BODY_LEN);
        errors.into_result()
    }
}
