use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::images::{CreateImageRequest, ImageList, UpdateImageRequest},
    error::AppResult,
    extract::{JsonBody, QueryParams},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Image},
    response::ApiResponse,
    routes::params::ShopScopedQuery,
    services::image_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_images).post(create_image))
        .route(
            "/{id}",
            get(get_image).put(update_image).delete(delete_image),
        )
}

#[utoipa::path(
    get,
    path = "/api/images",
    params(ShopScopedQuery),
    responses(
        (status = 200, description = "Images owned by the caller", body = ApiResponse<ImageList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn list_images(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<ShopScopedQuery>,
) -> AppResult<Json<ApiResponse<ImageList>>> {
    let resp = image_service::list_images(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image", body = ApiResponse<Image>),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn get_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Image>>> {
    let resp = image_service::get_image(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/images",
    request_body = CreateImageRequest,
    responses(
        (status = 201, description = "Image created", body = ApiResponse<Image>),
        (status = 400, description = "Invalid payload or unknown shop"),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn create_image(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateImageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Image>>)> {
    let resp = image_service::create_image(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/images/{id}",
    params(("id" = String, Path, description = "Image ID")),
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Image updated", body = ApiResponse<Image>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn update_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateImageRequest>,
) -> AppResult<Json<ApiResponse<Image>>> {
    let resp = image_service::update_image(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Delete outcome", body = ApiResponse<DeleteOutcome>),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteOutcome>>> {
    let resp = image_service::delete_image(&state, &user, &id).await?;
    Ok(Json(resp))
}
