use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod actions;
pub mod collections;
pub mod content_blocks;
pub mod customers;
pub mod doc;
pub mod health;
pub mod heroes;
pub mod images;
pub mod orders;
pub mod pages;
pub mod params;
pub mod payments;
pub mod products;
pub mod rpc;
pub mod shops;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/shops", shops::router())
        .nest("/products", products::router())
        .nest("/collections", collections::router())
        .nest("/pages", pages::router())
        .nest("/heroes", heroes::router())
        .nest("/content-blocks", content_blocks::router())
        .nest("/customers", customers::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::router())
        .nest("/images", images::router())
        .nest("/actions", actions::router())
        .nest("/rpc", rpc::router())
}

/// Public health check, docs and the authenticated API, bound to `state`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "error": "Not Found", "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
