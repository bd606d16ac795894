use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::{
    audit,
    db::new_id,
    dto::shops::{CreateShopRequest, ShopList, UpdateShopRequest},
    entity::shops::{ActiveModel, Column, Entity as Shops, Model as ShopModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Shop, clearable},
    response::ApiResponse,
    routes::params::{ShopListQuery, SortOrder, search_term},
    services::scope::{delete_response, fetch_page},
    state::AppState,
    validation::{Validate, validate_id},
};

pub const DEFAULT_CURRENCY: &str = "USD";

pub async fn list_shops(
    state: &AppState,
    user: &AuthUser,
    query: ShopListQuery,
) -> AppResult<ApiResponse<ShopList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(pattern) = search_term(&query.q) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Slug).ilike(pattern)),
        );
    }

    let mut finder = Shops::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows.into_iter().map(Shop::from).collect();
    Ok(ApiResponse::success("Shops", ShopList { items }, Some(meta)))
}

pub async fn get_shop(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ApiResponse<Shop>> {
    let shop = find_owned(state, user, id).await?;
    Ok(ApiResponse::success("Shop", Shop::from(shop), None))
}

pub async fn create_shop(
    state: &AppState,
    user: &AuthUser,
    payload: CreateShopRequest,
) -> AppResult<ApiResponse<Shop>> {
    payload.validate()?;
    ensure_slug_available(&state.orm, &payload.slug, None).await?;

    let shop = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(payload.slug),
        description: Set(payload.description.as_deref().and_then(clearable)),
        currency: Set(payload
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(shop_id = %shop.id, "shop created");
    audit::record(&state.pool, user, "shop_create", "shops", &shop.id).await;

    Ok(ApiResponse::item("Shop created", Shop::from(shop)))
}

pub async fn update_shop(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateShopRequest,
) -> AppResult<ApiResponse<Shop>> {
    payload.validate()?;
    let existing = find_owned(state, user, id).await?;

    let mut shop = Shop::from(existing.clone());
    shop.apply_changes(&payload);
    if shop.slug != existing.slug {
        ensure_slug_available(&state.orm, &shop.slug, Some(&shop.id)).await?;
    }

    let mut active: ActiveModel = existing.into();
    active.name = Set(shop.name);
    active.slug = Set(shop.slug);
    active.description = Set(shop.description);
    active.currency = Set(shop.currency);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(shop_id = %updated.id, "shop updated");
    audit::record(&state.pool, user, "shop_update", "shops", &updated.id).await;

    Ok(ApiResponse::item("Updated", Shop::from(updated)))
}

pub async fn delete_shop(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Shops::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(shop_id = %id, "shop deleted");
        audit::record(&state.pool, user, "shop_delete", "shops", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ShopModel> {
    validate_id("id", id)?;
    Shops::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_slug_available<C: ConnectionTrait>(
    db: &C,
    slug: &str,
    except_id: Option<&str>,
) -> AppResult<()> {
    let mut finder = Shops::find().filter(Column::Slug.eq(slug));
    if let Some(id) = except_id {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(db).await? > 0 {
        return Err(AppError::BadRequest("Slug is already taken".into()));
    }
    Ok(())
}
