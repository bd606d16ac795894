use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::shops::{CreateShopRequest, ShopList, UpdateShopRequest},
    error::AppResult,
    extract::{JsonBody, QueryParams},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Shop},
    response::ApiResponse,
    routes::params::ShopListQuery,
    services::shop_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shops).post(create_shop))
        .route("/{id}", get(get_shop).put(update_shop).delete(delete_shop))
}

#[utoipa::path(
    get,
    path = "/api/shops",
    params(ShopListQuery),
    responses(
        (status = 200, description = "Shops owned by the caller", body = ApiResponse<ShopList>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn list_shops(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<ShopListQuery>,
) -> AppResult<Json<ApiResponse<ShopList>>> {
    let resp = shop_service::list_shops(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shops/{id}",
    params(("id" = String, Path, description = "Shop ID")),
    responses(
        (status = 200, description = "Shop", body = ApiResponse<Shop>),
        (status = 404, description = "Shop not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn get_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = shop_service::get_shop(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shops",
    request_body = CreateShopRequest,
    responses(
        (status = 201, description = "Shop created", body = ApiResponse<Shop>),
        (status = 400, description = "Invalid payload or slug taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn create_shop(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateShopRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Shop>>)> {
    let resp = shop_service::create_shop(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/shops/{id}",
    params(("id" = String, Path, description = "Shop ID")),
    request_body = UpdateShopRequest,
    responses(
        (status = 200, description = "Shop updated", body = ApiResponse<Shop>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Shop not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn update_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateShopRequest>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = shop_service::update_shop(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/shops/{id}",
    params(("id" = String, Path, description = "Shop ID")),
    responses(
        (status = 200, description = "Delete outcome; `deleted` is false when nothing matched", body = ApiResponse<DeleteOutcome>),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn delete_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteOutcome>>> {
    let resp = shop_service::delete_shop(&state, &user, &id).await?;
    Ok(Json(resp))
}
