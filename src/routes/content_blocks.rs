use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::content_blocks::{CreateContentBlockRequest, ContentBlockList, UpdateContentBlockRequest},
    error::AppResult,
    extract::{JsonBody, QueryParams},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, ContentBlock},
    response::ApiResponse,
    routes::params::PageScopedQuery,
    services::content_block_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_content_blocks).post(create_content_block))
        .route(
            "/{id}",
            get(get_content_block).put(update_content_block).delete(delete_content_block),
        )
}

#[utoipa::path(
    get,
    path = "/api/content-blocks",
    params(PageScopedQuery),
    responses(
        (status = 200, description = "Content blocks owned by the caller", body = ApiResponse<ContentBlockList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Content blocks"
)]
pub async fn list_content_blocks(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<PageScopedQuery>,
) -> AppResult<Json<ApiResponse<ContentBlockList>>> {
    let resp = content_block_service::list_content_blocks(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/content-blocks/{id}",
    params(("id" = String, Path, description = "Content block ID")),
    responses(
        (status = 200, description = "Content block", body = ApiResponse<ContentBlock>),
        (status = 404, description = "Content block not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Content blocks"
)]
pub async fn get_content_block(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ContentBlock>>> {
    let resp = content_block_service::get_content_block(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/content-blocks",
    request_body = CreateContentBlockRequest,
    responses(
        (status = 201, description = "Content block created", body = ApiResponse<ContentBlock>),
        (status = 400, description = "Invalid payload, unknown page or target"),
    ),
    security(("bearer_auth" = [])),
    tag = "Content blocks"
)]
pub async fn create_content_block(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateContentBlockRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ContentBlock>>)> {
    let resp = content_block_service::create_content_block(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/content-blocks/{id}",
    params(("id" = String, Path, description = "Content block ID")),
    request_body = UpdateContentBlockRequest,
    responses(
        (status = 200, description = "Content block updated", body = ApiResponse<ContentBlock>),
        (status = 400, description = "Invalid payload or target"),
        (status = 404, description = "Content block not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Content blocks"
)]
pub async fn update_content_block(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateContentBlockRequest>,
) -> AppResult<Json<ApiResponse<ContentBlock>>> {
    let resp = content_block_service::update_content_block(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/content-blocks/{id}",
    params(("id" = String, Path, description = "Content block ID")),
    responses(
        (status = 200, description = "Delete outcome", body = ApiResponse<DeleteOutcome>),
    ),
    security(("bearer_auth" = [])),
    tag = "Content blocks"
)]
pub async fn delete_content_block(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteOutcome>>> {
    let resp = content_block_service::delete_content_block(&state, &user, &id).await?;
    Ok(Json(resp))
}
