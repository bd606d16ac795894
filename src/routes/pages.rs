use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::pages::{CreatePageRequest, PageList, UpdatePageRequest},
    error::AppResult,
    extract::{JsonBody, QueryParams},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Page},
    response::ApiResponse,
    routes::params::ShopScopedQuery,
    services::page_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages).post(create_page))
        .route(
            "/{id}",
            get(get_page).put(update_page).delete(delete_page),
        )
}

#[utoipa::path(
    get,
    path = "/api/pages",
    params(ShopScopedQuery),
    responses(
        (status = 200, description = "Pages owned by the caller", body = ApiResponse<PageList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Pages"
)]
pub async fn list_pages(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<ShopScopedQuery>,
) -> AppResult<Json<ApiResponse<PageList>>> {
    let resp = page_service::list_pages(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pages/{id}",
    params(("id" = String, Path, description = "Page ID")),
    responses(
        (status = 200, description = "Page", body = ApiResponse<Page>),
        (status = 404, description = "Page not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pages"
)]
pub async fn get_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let resp = page_service::get_page(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/pages",
    request_body = CreatePageRequest,
    responses(
        (status = 201, description = "Page created", body = ApiResponse<Page>),
        (status = 400, description = "Invalid payload, unknown shop or slug taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pages"
)]
pub async fn create_page(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreatePageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Page>>)> {
    let resp = page_service::create_page(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/pages/{id}",
    params(("id" = String, Path, description = "Page ID")),
    request_body = UpdatePageRequest,
    responses(
        (status = 200, description = "Page updated", body = ApiResponse<Page>),
        (status = 400, description = "Invalid payload or slug taken"),
        (status = 404, description = "Page not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Pages"
)]
pub async fn update_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdatePageRequest>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let resp = page_service::update_page(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/pages/{id}",
    params(("id" = String, Path, description = "Page ID")),
    responses(
        (status = 200, description = "Delete outcome", body = ApiResponse<DeleteOutcome>),
    ),
    security(("bearer_auth" = [])),
    tag = "Pages"
)]
pub async fn delete_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteOutcome>>> {
    let resp = page_service::delete_page(&state, &user, &id).await?;
    Ok(Json(resp))
}
