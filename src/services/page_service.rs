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
    dto::pages::{CreatePageRequest, PageList, UpdatePageRequest},
    entity::pages::{ActiveModel, Column, Entity as Pages, Model as PageModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Page},
    response::ApiResponse,
    routes::params::{ShopScopedQuery, SortOrder, search_term},
    services::scope::{delete_response, fetch_page, owned_shop},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_pages(
    state: &AppState,
    user: &AuthUser,
    query: ShopScopedQuery,
) -> AppResult<ApiResponse<PageList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(shop_id) = &query.shop_id {
        condition = condition.add(Column::ShopId.eq(shop_id.as_str()));
    }
    if let Some(pattern) = search_term(&query.q) {
        condition = condition.add(Expr::col(Column::Title).ilike(pattern));
    }

    let mut finder = Pages::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows.into_iter().map(Page::from).collect();
    Ok(ApiResponse::success("Pages", PageList { items }, Some(meta)))
}

pub async fn get_page(state: &AppState, user: &AuthUser, id: &str) -> AppResult<ApiResponse<Page>> {
    let page = find_owned(state, user, id).await?;
    Ok(ApiResponse::success("Page", Page::from(page), None))
}

pub async fn create_page(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePageRequest,
) -> AppResult<ApiResponse<Page>> {
    payload.validate()?;
    let shop = owned_shop(&state.orm, user, &payload.shop_id).await?;
    ensure_slug_available(&state.orm, &shop.id, &payload.slug, None).await?;

    let page = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        shop_id: Set(shop.id),
        title: Set(payload.title.trim().to_string()),
        slug: Set(payload.slug),
        body: Set(payload.body.filter(|body| !body.trim().is_empty())),
        published: Set(payload.published.unwrap_or(false)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(page_id = %page.id, shop_id = %page.shop_id, "page created");
    audit::record(&state.pool, user, "page_create", "pages", &page.id).await;

    Ok(ApiResponse::item("Page created", Page::from(page)))
}

pub async fn update_page(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdatePageRequest,
) -> AppResult<ApiResponse<Page>> {
    payload.validate()?;
    let existing = find_owned(state, user, id).await?;

    let mut page = Page::from(existing.clone());
    page.apply_changes(&payload);
    if page.slug != existing.slug {
        ensure_slug_available(&state.orm, &page.shop_id, &page.slug, Some(&page.id)).await?;
    }

    let mut active: ActiveModel = existing.into();
    active.title = Set(page.title);
    active.slug = Set(page.slug);
    active.body = Set(page.body);
    active.published = Set(page.published);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(page_id = %updated.id, "page updated");
    audit::record(&state.pool, user, "page_update", "pages", &updated.id).await;

    Ok(ApiResponse::item("Updated", Page::from(updated)))
}

/// Heroes and content blocks on the page go with it.
pub async fn delete_page(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Pages::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(page_id = %id, "page deleted");
        audit::record(&state.pool, user, "page_delete", "pages", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned(state: &AppState, user: &AuthUser, id: &str) -> AppResult<PageModel> {
    validate_id("id", id)?;
    Pages::find()
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
    shop_id: &str,
    slug: &str,
    except_id: Option<&str>,
) -> AppResult<()> {
    let mut finder = Pages::find()
        .filter(Column::ShopId.eq(shop_id))
        .filter(Column::Slug.eq(slug));
    if let Some(id) = except_id {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(db).await? > 0 {
        return Err(AppError::BadRequest(
            "Slug is already used in this shop".into(),
        ));
    }
    Ok(())
}
