use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};

use crate::{
    dto::collections::{
        AddCollectionProductRequest, CollectionList, CollectionProduct, CollectionProductList,
        CreateCollectionRequest, UpdateCollectionRequest,
    },
    error::AppResult,
    extract::{JsonBody, QueryParams},
    middleware::auth::AuthUser,
    models::{Collection, DeleteOutcome},
    response::ApiResponse,
    routes::params::ShopScopedQuery,
    services::collection_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_collections).post(create_collection))
        .route(
            "/{id}",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
        .route(
            "/{id}/products",
            get(list_collection_products).post(add_collection_product),
        )
        .route(
            "/{id}/products/{product_id}",
            delete(remove_collection_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/collections",
    params(ShopScopedQuery),
    responses(
        (status = 200, description = "Collections owned by the caller", body = ApiResponse<CollectionList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn list_collections(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<ShopScopedQuery>,
) -> AppResult<Json<ApiResponse<CollectionList>>> {
    let resp = collection_service::list_collections(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/collections/{id}",
    params(("id" = String, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Collection", body = ApiResponse<Collection>),
        (status = 404, description = "Collection not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn get_collection(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Collection>>> {
    let resp = collection_service::get_collection(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/collections",
    request_body = CreateCollectionRequest,
    responses(
        (status = 201, description = "Collection created", body = ApiResponse<Collection>),
        (status = 400, description = "Invalid payload, unknown shop or slug taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn create_collection(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateCollectionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Collection>>)> {
    let resp = collection_service::create_collection(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/collections/{id}",
    params(("id" = String, Path, description = "Collection ID")),
    request_body = UpdateCollectionRequest,
    responses(
        (status = 200, description = "Collection updated", body = ApiResponse<Collection>),
        (status = 404, description = "Collection not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn update_collection(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateCollectionRequest>,
) -> AppResult<Json<ApiResponse<Collection>>> {
    let resp = collection_service::update_collection(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/collections/{id}",
    params(("id" = String, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Delete outcome", body = ApiResponse<DeleteOutcome>),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn delete_collection(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteOutcome>>> {
    let resp = collection_service::delete_collection(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/collections/{id}/products",
    params(("id" = String, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Members in display order", body = ApiResponse<CollectionProductList>),
        (status = 404, description = "Collection not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn list_collection_products(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CollectionProductList>>> {
    let resp = collection_service::list_collection_products(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/collections/{id}/products",
    params(("id" = String, Path, description = "Collection ID")),
    request_body = AddCollectionProductRequest,
    responses(
        (status = 201, description = "Product added", body = ApiResponse<CollectionProduct>),
        (status = 400, description = "Unknown product or product of another shop"),
        (status = 404, description = "Collection not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn add_collection_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<AddCollectionProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CollectionProduct>>)> {
    let resp = collection_service::add_collection_product(&state, &user, &id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/collections/{id}/products/{product_id}",
    params(
        ("id" = String, Path, description = "Collection ID"),
        ("product_id" = String, Path, description = "Product ID"),
    ),
    responses(
        (status = 200, description = "Removal outcome", body = ApiResponse<DeleteOutcome>),
    ),
    security(("bearer_auth" = [])),
    tag = "Collections"
)]
pub async fn remove_collection_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, product_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<DeleteOutcome>>> {
    let resp =
        collection_service::remove_collection_product(&state, &user, &id, &product_id).await?;
    Ok(Json(resp))
}
