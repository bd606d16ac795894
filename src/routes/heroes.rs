use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::heroes::{CreateHeroRequest, HeroList, UpdateHeroRequest},
    error::AppResult,
    extract::{JsonBody, QueryParams},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Hero},
    response::ApiResponse,
    routes::params::PageScopedQuery,
    services::hero_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_heroes).post(create_hero))
        .route(
            "/{id}",
            get(get_hero).put(update_hero).delete(delete_hero),
        )
}

#[utoipa::path(
    get,
    path = "/api/heroes",
    params(PageScopedQuery),
    responses(
        (status = 200, description = "Heroes owned by the caller", body = ApiResponse<HeroList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Heroes"
)]
pub async fn list_heroes(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<PageScopedQuery>,
) -> AppResult<Json<ApiResponse<HeroList>>> {
    let resp = hero_service::list_heroes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/heroes/{id}",
    params(("id" = String, Path, description = "Hero ID")),
    responses(
        (status = 200, description = "Hero", body = ApiResponse<Hero>),
        (status = 404, description = "Hero not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Heroes"
)]
pub async fn get_hero(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Hero>>> {
    let resp = hero_service::get_hero(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/heroes",
    request_body = CreateHeroRequest,
    responses(
        (status = 201, description = "Hero created", body = ApiResponse<Hero>),
        (status = 400, description = "Invalid payload or unknown page"),
    ),
    security(("bearer_auth" = [])),
    tag = "Heroes"
)]
pub async fn create_hero(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateHeroRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Hero>>)> {
    let resp = hero_service::create_hero(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/heroes/{id}",
    params(("id" = String, Path, description = "Hero ID")),
    request_body = UpdateHeroRequest,
    responses(
        (status = 200, description = "Hero updated", body = ApiResponse<Hero>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Hero not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Heroes"
)]
pub async fn update_hero(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateHeroRequest>,
) -> AppResult<Json<ApiResponse<Hero>>> {
    let resp = hero_service::update_hero(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/heroes/{id}",
    params(("id" = String, Path, description = "Hero ID")),
    responses(
        (status = 200, description = "Delete outcome", body = ApiResponse<DeleteOutcome>),
    ),
    security(("bearer_auth" = [])),
    tag = "Heroes"
)]
pub async fn delete_hero(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteOutcome>>> {
    let resp = hero_service::delete_hero(&state, &user, &id).await?;
    Ok(Json(resp))
}
