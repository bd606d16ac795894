use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    audit,
    db::new_id,
    dto::images::{CreateImageRequest, ImageList, UpdateImageRequest},
    entity::images::{ActiveModel, Column, Entity as Images, Model as ImageModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Image, clearable},
    response::ApiResponse,
    routes::params::{ShopScopedQuery, SortOrder, search_term},
    services::scope::{delete_response, fetch_page, owned_shop},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_images(
    state: &AppState,
    user: &AuthUser,
    query: ShopScopedQuery,
) -> AppResult<ApiResponse<ImageList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(shop_id) = &query.shop_id {
        condition = condition.add(Column::ShopId.eq(shop_id.as_str()));
    }
    if let Some(pattern) = search_term(&query.q) {
        condition = condition.add(Expr::col(Column::Alt).ilike(pattern));
    }

    let mut finder = Images::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows.into_iter().map(Image::from).collect();
    Ok(ApiResponse::success("Images", ImageList { items }, Some(meta)))
}

pub async fn get_image(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Image>> {
    let image = find_owned(state, user, id).await?;
    Ok(ApiResponse::success("Image", Image::from(image), None))
}

/// Register an uploaded image. The bytes live in object storage; only the URL is kept.
pub async fn create_image(
    state: &AppState,
    user: &AuthUser,
    payload: CreateImageRequest,
) -> AppResult<ApiResponse<Image>> {
    payload.validate()?;
    let shop = owned_shop(&state.orm, user, &payload.shop_id).await?;

    let image = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        shop_id: Set(shop.id),
        url: Set(payload.url.trim().to_string()),
        alt: Set(payload.alt.as_deref().and_then(clearable)),
        width: Set(payload.width),
        height: Set(payload.height),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(image_id = %image.id, shop_id = %image.shop_id, "image created");
    audit::record(&state.pool, user, "image_create", "images", &image.id).await;

    Ok(ApiResponse::item("Image created", Image::from(image)))
}

pub async fn update_image(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateImageRequest,
) -> AppResult<ApiResponse<Image>> {
    payload.validate()?;
    let existing = find_owned(state, user, id).await?;

    let mut image = Image::from(existing.clone());
    image.apply_changes(&payload);

    let mut active: ActiveModel = existing.into();
    active.url = Set(image.url);
    active.alt = Set(image.alt);
    active.width = Set(image.width);
    active.height = Set(image.height);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(image_id = %updated.id, "image updated");
    audit::record(&state.pool, user, "image_update", "images", &updated.id).await;

    Ok(ApiResponse::item("Updated", Image::from(updated)))
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Images::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(image_id = %id, "image deleted");
        audit::record(&state.pool, user, "image_delete", "images", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ImageModel> {
    validate_id("id", id)?;
    Images::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}
