use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    audit,
    db::new_id,
    dto::heroes::{CreateHeroRequest, HeroList, UpdateHeroRequest},
    entity::heroes::{ActiveModel, Column, Entity as Heroes, Model as HeroModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Hero, clearable},
    response::ApiResponse,
    routes::params::{PageScopedQuery, SortOrder},
    services::scope::{delete_response, fetch_page, owned_page},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_heroes(
    state: &AppState,
    user: &AuthUser,
    query: PageScopedQuery,
) -> AppResult<ApiResponse<HeroList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(page_id) = &query.page_id {
        condition = condition.add(Column::PageId.eq(page_id.as_str()));
    }

    let mut finder = Heroes::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows.into_iter().map(Hero::from).collect();
    Ok(ApiResponse::success("Heroes", HeroList { items }, Some(meta)))
}

pub async fn get_hero(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ApiResponse<Hero>> {
    let hero = find_owned(state, user, id).await?;
    Ok(ApiResponse::success("Hero", Hero::from(hero), None))
}

pub async fn create_hero(
    state: &AppState,
    user: &AuthUser,
    payload: CreateHeroRequest,
) -> AppResult<ApiResponse<Hero>> {
    payload.validate()?;
    let page = owned_page(&state.orm, user, &payload.page_id).await?;

    let hero = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        page_id: Set(page.id),
        heading: Set(payload.heading.trim().to_string()),
        subheading: Set(payload.subheading.as_deref().and_then(clearable)),
        image_url: Set(payload.image_url.as_deref().and_then(clearable)),
        cta_label: Set(payload.cta_label.as_deref().and_then(clearable)),
        cta_url: Set(payload.cta_url.as_deref().and_then(clearable)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(hero_id = %hero.id, page_id = %hero.page_id, "hero created");
    audit::record(&state.pool, user, "hero_create", "heroes", &hero.id).await;

    Ok(ApiResponse::item("Hero created", Hero::from(hero)))
}

pub async fn update_hero(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateHeroRequest,
) -> AppResult<ApiResponse<Hero>> {
    payload.validate()?;
    let existing = find_owned(state, user, id).await?;

    let mut hero = Hero::from(existing.clone());
    hero.apply_changes(&payload);

    let mut active: ActiveModel = existing.into();
    active.heading = Set(hero.heading);
    active.subheading = Set(hero.subheading);
    active.image_url = Set(hero.image_url);
    active.cta_label = Set(hero.cta_label);
    active.cta_url = Set(hero.cta_url);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(hero_id = %updated.id, "hero updated");
    audit::record(&state.pool, user, "hero_update", "heroes", &updated.id).await;

    Ok(ApiResponse::item("Updated", Hero::from(updated)))
}

pub async fn delete_hero(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Heroes::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(hero_id = %id, "hero deleted");
        audit::record(&state.pool, user, "hero_delete", "heroes", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned(state: &AppState, user: &AuthUser, id: &str) -> AppResult<HeroModel> {
    validate_id("id", id)?;
    Heroes::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}
