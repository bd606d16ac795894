//! Form-post endpoints for server-rendered dashboards.
//!
//! Each entity gets `POST /<entity>` (create), `POST /<entity>/{id}` (update) and
//! `POST /<entity>/{id}/delete`, taking `application/x-www-form-urlencoded`
//! bodies. Success is an empty 204; failure is a bare `{error}` object. Orders
//! are not offered here since their line items do not fit a flat form.

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::de::DeserializeOwned;

use crate::{
    dto::{
        collections::{CreateCollectionRequest, UpdateCollectionRequest},
        content_blocks::{CreateContentBlockRequest, UpdateContentBlockRequest},
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        heroes::{CreateHeroRequest, UpdateHeroRequest},
        images::{CreateImageRequest, UpdateImageRequest},
        pages::{CreatePageRequest, UpdatePageRequest},
        payments::{CreatePaymentRequest, UpdatePaymentRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        shops::{CreateShopRequest, UpdateShopRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{
        collection_service, content_block_service, customer_service, hero_service,
        image_service, page_service, payment_service, product_service, shop_service,
    },
    state::AppState,
};

#[derive(Debug)]
pub struct ActionError(pub AppError);

impl From<AppError> for ActionError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        self.0.log();
        (self.0.status(), Json(self.0.error_data())).into_response()
    }
}

#[derive(Debug)]
pub struct ActionForm<T>(pub T);

impl<S, T> FromRequest<S> for ActionForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ActionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

macro_rules! form_actions {
    ($(
        $path:literal => $service:ident {
            create: $create:ident($create_req:ty),
            update: $update:ident($update_req:ty),
            delete: $delete:ident,
        }
    )*) => {
        pub fn router() -> Router<AppState> {
            Router::new()
            $(
                .route(
                    concat!("/", $path),
                    post(
                        |State(state): State<AppState>,
                         user: AuthUser,
                         ActionForm(payload): ActionForm<$create_req>| async move {
                            $service::$create(&state, &user, payload).await?;
                            Ok::<_, ActionError>(StatusCode::NO_CONTENT)
                        },
                    ),
                )
                .route(
                    concat!("/", $path, "/{id}"),
                    post(
                        |State(state): State<AppState>,
                         user: AuthUser,
                         Path(id): Path<String>,
                         ActionForm(payload): ActionForm<$update_req>| async move {
                            $service::$update(&state, &user, &id, payload).await?;
                            Ok::<_, ActionError>(StatusCode::NO_CONTENT)
                        },
                    ),
                )
                .route(
                    concat!("/", $path, "/{id}/delete"),
                    post(
                        |State(state): State<AppState>, user: AuthUser, Path(id): Path<String>| async move {
                            $service::$delete(&state, &user, &id).await?;
                            Ok::<_, ActionError>(StatusCode::NO_CONTENT)
                        },
                    ),
                )
            )*
        }
    };
}

form_actions! {
    "shops" => shop_service {
        create: create_shop(CreateShopRequest),
        update: update_shop(UpdateShopRequest),
        delete: delete_shop,
    }
    "products" => product_service {
        create: create_product(CreateProductRequest),
        update: update_product(UpdateProductRequest),
        delete: delete_product,
    }
    "collections" => collection_service {
        create: create_collection(CreateCollectionRequest),
        update: update_collection(UpdateCollectionRequest),
        delete: delete_collection,
    }
    "pages" => page_service {
        create: create_page(CreatePageRequest),
        update: update_page(UpdatePageRequest),
        delete: delete_page,
    }
    "heroes" => hero_service {
        create: create_hero(CreateHeroRequest),
        update: update_hero(UpdateHeroRequest),
        delete: delete_hero,
    }
    "content-blocks" => content_block_service {
        create: create_content_block(CreateContentBlockRequest),
        update: update_content_block(UpdateContentBlockRequest),
        delete: delete_content_block,
    }
    "customers" => customer_service {
        create: create_customer(CreateCustomerRequest),
        update: update_customer(UpdateCustomerRequest),
        delete: delete_customer,
    }
    "payments" => payment_service {
        create: create_payment(CreatePaymentRequest),
        update: update_payment(UpdatePaymentRequest),
        delete: delete_payment,
    }
    "images" => image_service {
        create: create_image(CreateImageRequest),
        update: update_image(UpdateImageRequest),
        delete: delete_image,
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;
    use crate::validation::ValidationErrors;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn failure_is_a_bare_error_object() {
        let response = ActionError(AppError::BadRequest("Shop not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Bad Request: Shop not found" }));
    }

    #[tokio::test]
    async fn validation_failure_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("slug", "is required");
        let response = ActionError(AppError::Validation(errors)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["fields"]["slug"][0], "is required");
    }

    #[tokio::test]
    async fn persistence_failure_is_500() {
        let response =
            ActionError(AppError::Internal(anyhow::anyhow!("connection reset"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal Server Error");
    }
}
