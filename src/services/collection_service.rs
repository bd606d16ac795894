use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    audit,
    db::new_id,
    dto::collections::{
        AddCollectionProductRequest, CollectionList, CollectionProduct, CollectionProductList,
        CreateCollectionRequest, UpdateCollectionRequest,
    },
    entity::{
        CollectionProducts, Products, collection_products,
        collections::{ActiveModel, Column, Entity as Collections, Model as CollectionModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Collection, DeleteOutcome, Product, clearable},
    response::ApiResponse,
    routes::params::{ShopScopedQuery, SortOrder, search_term},
    services::scope::{delete_response, fetch_page, owned_product, owned_shop},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_collections(
    state: &AppState,
    user: &AuthUser,
    query: ShopScopedQuery,
) -> AppResult<ApiResponse<CollectionList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(shop_id) = &query.shop_id {
        condition = condition.add(Column::ShopId.eq(shop_id.as_str()));
    }
    if let Some(pattern) = search_term(&query.q) {
        condition = condition.add(Expr::col(Column::Title).ilike(pattern));
    }

    let mut finder = Collections::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows.into_iter().map(Collection::from).collect();
    Ok(ApiResponse::success(
        "Collections",
        CollectionList { items },
        Some(meta),
    ))
}

pub async fn get_collection(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Collection>> {
    let collection = find_owned(&state.orm, user, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Collection",
        Collection::from(collection),
        None,
    ))
}

pub async fn create_collection(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCollectionRequest,
) -> AppResult<ApiResponse<Collection>> {
    payload.validate()?;
    let shop = owned_shop(&state.orm, user, &payload.shop_id).await?;
    ensure_slug_available(&state.orm, &shop.id, &payload.slug, None).await?;

    let collection = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        shop_id: Set(shop.id),
        title: Set(payload.title.trim().to_string()),
        slug: Set(payload.slug),
        description: Set(payload.description.as_deref().and_then(clearable)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(collection_id = %collection.id, "collection created");
    audit::record(
        &state.pool,
        user,
        "collection_create",
        "collections",
        &collection.id,
    )
    .await;

    Ok(ApiResponse::item(
        "Collection created",
        Collection::from(collection),
    ))
}

pub async fn update_collection(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateCollectionRequest,
) -> AppResult<ApiResponse<Collection>> {
    payload.validate()?;
    let existing = find_owned(&state.orm, user, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut collection = Collection::from(existing.clone());
    collection.apply_changes(&payload);
    if collection.slug != existing.slug {
        ensure_slug_available(
            &state.orm,
            &collection.shop_id,
            &collection.slug,
            Some(&collection.id),
        )
        .await?;
    }

    let mut active: ActiveModel = existing.into();
    active.title = Set(collection.title);
    active.slug = Set(collection.slug);
    active.description = Set(collection.description);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(collection_id = %updated.id, "collection updated");
    audit::record(
        &state.pool,
        user,
        "collection_update",
        "collections",
        &updated.id,
    )
    .await;

    Ok(ApiResponse::item("Updated", Collection::from(updated)))
}

pub async fn delete_collection(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Collections::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(collection_id = %id, "collection deleted");
        audit::record(&state.pool, user, "collection_delete", "collections", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

pub async fn list_collection_products(
    state: &AppState,
    user: &AuthUser,
    collection_id: &str,
) -> AppResult<ApiResponse<CollectionProductList>> {
    let collection = find_owned(&state.orm, user, collection_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let rows = CollectionProducts::find()
        .filter(collection_products::Column::CollectionId.eq(collection.id.as_str()))
        .find_also_related(Products)
        .order_by_asc(collection_products::Column::Position)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(link, product)| {
            product.map(|product| CollectionProduct {
                position: link.position,
                product: Product::from(product),
            })
        })
        .collect();

    Ok(ApiResponse::success(
        "Collection products",
        CollectionProductList { items },
        None,
    ))
}

/// Add a product to a collection, or move it when already a member.
pub async fn add_collection_product(
    state: &AppState,
    user: &AuthUser,
    collection_id: &str,
    payload: AddCollectionProductRequest,
) -> AppResult<ApiResponse<CollectionProduct>> {
    payload.validate()?;
    let collection = find_owned(&state.orm, user, collection_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let product = owned_product(&state.orm, user, &payload.product_id).await?;
    if product.shop_id != collection.shop_id {
        return Err(AppError::BadRequest(
            "Product belongs to another shop".into(),
        ));
    }

    let txn = state.orm.begin().await?;
    let existing =
        CollectionProducts::find_by_id((collection.id.clone(), product.id.clone()))
            .one(&txn)
            .await?;

    let link = match existing {
        Some(link) => match payload.position {
            Some(position) => {
                let mut active: collection_products::ActiveModel = link.into();
                active.position = Set(position);
                active.update(&txn).await?
            }
            None => link,
        },
        None => {
            let position = match payload.position {
                Some(position) => position,
                None => next_position(&txn, &collection.id).await?,
            };
            collection_products::ActiveModel {
                collection_id: Set(collection.id.clone()),
                product_id: Set(product.id.clone()),
                position: Set(position),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?
        }
    };
    txn.commit().await?;

    tracing::info!(collection_id = %collection.id, product_id = %product.id, "product added to collection");
    audit::record(
        &state.pool,
        user,
        "collection_product_add",
        "collections",
        &collection.id,
    )
    .await;

    Ok(ApiResponse::item(
        "Product added",
        CollectionProduct {
            position: link.position,
            product: Product::from(product),
        },
    ))
}

pub async fn remove_collection_product(
    state: &AppState,
    user: &AuthUser,
    collection_id: &str,
    product_id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("product_id", product_id)?;
    let Some(collection) = find_owned(&state.orm, user, collection_id).await? else {
        return Ok(delete_response(product_id.to_string(), 0));
    };

    let result = CollectionProducts::delete_many()
        .filter(
            Condition::all()
                .add(collection_products::Column::CollectionId.eq(collection.id.as_str()))
                .add(collection_products::Column::ProductId.eq(product_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(collection_id = %collection.id, product_id = %product_id, "product removed from collection");
        audit::record(
            &state.pool,
            user,
            "collection_product_remove",
            "collections",
            &collection.id,
        )
        .await;
    }

    Ok(delete_response(product_id.to_string(), result.rows_affected))
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    id: &str,
) -> AppResult<Option<CollectionModel>> {
    validate_id("id", id)?;
    Ok(Collections::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .one(db)
        .await?)
}

async fn ensure_slug_available<C: ConnectionTrait>(
    db: &C,
    shop_id: &str,
    slug: &str,
    except_id: Option<&str>,
) -> AppResult<()> {
    let mut finder = Collections::find()
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

async fn next_position<C: ConnectionTrait>(db: &C, collection_id: &str) -> AppResult<i32> {
    let members = CollectionProducts::find()
        .filter(collection_products::Column::CollectionId.eq(collection_id))
        .count(db)
        .await?;
    Ok(i32::try_from(members).unwrap_or(i32::MAX))
}
