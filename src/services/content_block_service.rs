use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::{
    audit,
    db::new_id,
    dto::content_blocks::{
        ContentBlockList, CreateContentBlockRequest, UpdateContentBlockRequest, check_target,
    },
    entity::{
        content_blocks::{ActiveModel, Column, Entity as ContentBlocks, Model as BlockModel},
        pages,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ContentBlock, ContentBlockKind, DeleteOutcome},
    response::ApiResponse,
    routes::params::{PageScopedQuery, SortOrder},
    services::scope::{delete_response, fetch_page, owned_collection, owned_page, owned_product},
    state::AppState,
    validation::{Validate, ValidationErrors, validate_id},
};

/// Blocks come back in display order; `sort_order` only breaks ties.
pub async fn list_content_blocks(
    state: &AppState,
    user: &AuthUser,
    query: PageScopedQuery,
) -> AppResult<ApiResponse<ContentBlockList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(page_id) = &query.page_id {
        condition = condition.add(Column::PageId.eq(page_id.as_str()));
    }

    let mut finder = ContentBlocks::find()
        .filter(condition)
        .order_by_asc(Column::Position);
    finder = match query.sort_order.unwrap_or(SortOrder::Asc) {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows
        .into_iter()
        .map(ContentBlock::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ApiResponse::success(
        "Content blocks",
        ContentBlockList { items },
        Some(meta),
    ))
}

pub async fn get_content_block(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<ContentBlock>> {
    let block = find_owned(state, user, id).await?;
    Ok(ApiResponse::success(
        "Content block",
        ContentBlock::try_from(block)?,
        None,
    ))
}

pub async fn create_content_block(
    state: &AppState,
    user: &AuthUser,
    payload: CreateContentBlockRequest,
) -> AppResult<ApiResponse<ContentBlock>> {
    payload.validate()?;
    let page = owned_page(&state.orm, user, &payload.page_id).await?;
    ensure_target(
        &state.orm,
        user,
        &page,
        payload.product_id.as_deref(),
        payload.collection_id.as_deref(),
    )
    .await?;

    let position = match payload.position {
        Some(position) => position,
        None => next_position(&state.orm, &page.id).await?,
    };

    let block = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        page_id: Set(page.id),
        kind: Set(payload.kind.as_str().to_string()),
        product_id: Set(payload.product_id),
        collection_id: Set(payload.collection_id),
        position: Set(position),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(block_id = %block.id, page_id = %block.page_id, kind = %block.kind, "content block created");
    audit::record(
        &state.pool,
        user,
        "content_block_create",
        "content_blocks",
        &block.id,
    )
    .await;

    Ok(ApiResponse::item(
        "Content block created",
        ContentBlock::try_from(block)?,
    ))
}

pub async fn update_content_block(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateContentBlockRequest,
) -> AppResult<ApiResponse<ContentBlock>> {
    payload.validate()?;
    let existing = find_owned(state, user, id).await?;

    let current = ContentBlock::try_from(existing.clone())?;
    let mut block = current.clone();
    block.apply_changes(&payload);

    // the merged row must still point at exactly one target of its kind
    let mut errors = ValidationErrors::new();
    check_target(
        &mut errors,
        block.kind,
        block.product_id.as_deref(),
        block.collection_id.as_deref(),
    );
    errors.into_result()?;

    if block.product_id != current.product_id || block.collection_id != current.collection_id {
        let page = owned_page(&state.orm, user, &block.page_id).await?;
        ensure_target(
            &state.orm,
            user,
            &page,
            block.product_id.as_deref(),
            block.collection_id.as_deref(),
        )
        .await?;
    }

    let mut active: ActiveModel = existing.into();
    active.kind = Set(block.kind.as_str().to_string());
    active.product_id = Set(block.product_id);
    active.collection_id = Set(block.collection_id);
    active.position = Set(block.position);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(block_id = %updated.id, "content block updated");
    audit::record(
        &state.pool,
        user,
        "content_block_update",
        "content_blocks",
        &updated.id,
    )
    .await;

    Ok(ApiResponse::item("Updated", ContentBlock::try_from(updated)?))
}

pub async fn delete_content_block(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = ContentBlocks::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(block_id = %id, "content block deleted");
        audit::record(
            &state.pool,
            user,
            "content_block_delete",
            "content_blocks",
            id,
        )
        .await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned(state: &AppState, user: &AuthUser, id: &str) -> AppResult<BlockModel> {
    validate_id("id", id)?;
    ContentBlocks::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// The referenced product or collection must be the caller's and live in the page's shop.
async fn ensure_target<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    page: &pages::Model,
    product_id: Option<&str>,
    collection_id: Option<&str>,
) -> AppResult<ContentBlockKind> {
    if let Some(product_id) = product_id {
        let product = owned_product(db, user, product_id).await?;
        if product.shop_id != page.shop_id {
            return Err(AppError::BadRequest(
                "Product belongs to another shop".into(),
            ));
        }
        return Ok(ContentBlockKind::Product);
    }
    if let Some(collection_id) = collection_id {
        let collection = owned_collection(db, user, collection_id).await?;
        if collection.shop_id != page.shop_id {
            return Err(AppError::BadRequest(
                "Collection belongs to another shop".into(),
            ));
        }
        return Ok(ContentBlockKind::Collection);
    }
    Err(AppError::BadRequest("Block has no target".into()))
}

async fn next_position<C: ConnectionTrait>(db: &C, page_id: &str) -> AppResult<i32> {
    let blocks = ContentBlocks::find()
        .filter(Column::PageId.eq(page_id))
        .count(db)
        .await?;
    Ok(i32::try_from(blocks).unwrap_or(i32::MAX))
}
