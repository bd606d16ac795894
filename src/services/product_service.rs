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
    dto::products::{
        AttachImageRequest, CreateProductRequest, ProductImage, ProductImageList, ProductList,
        UpdateProductRequest,
    },
    entity::{
        Images, OrderItems, ProductImages, order_items, product_images,
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Image, Product, clearable},
    response::ApiResponse,
    routes::params::{ShopScopedQuery, SortOrder, search_term},
    services::scope::{delete_response, fetch_page, owned_image, owned_shop},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    query: ShopScopedQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(shop_id) = &query.shop_id {
        condition = condition.add(Column::ShopId.eq(shop_id.as_str()));
    }
    if let Some(pattern) = search_term(&query.q) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Sku).ilike(pattern)),
        );
    }

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows.into_iter().map(Product::from).collect();
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Product>> {
    let product = find_owned(&state.orm, user, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", Product::from(product), None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;
    let shop = owned_shop(&state.orm, user, &payload.shop_id).await?;
    ensure_slug_available(&state.orm, &shop.id, &payload.slug, None).await?;

    let product = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        shop_id: Set(shop.id),
        name: Set(payload.name.trim().to_string()),
        slug: Set(payload.slug),
        description: Set(payload.description.as_deref().and_then(clearable)),
        price: Set(payload.price),
        compare_at_price: Set(payload.compare_at_price),
        sku: Set(payload.sku.as_deref().and_then(clearable)),
        inventory: Set(payload.inventory.unwrap_or(0)),
        published: Set(payload.published.unwrap_or(false)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = %product.id, shop_id = %product.shop_id, "product created");
    audit::record(&state.pool, user, "product_create", "products", &product.id).await;

    Ok(ApiResponse::item("Product created", Product::from(product)))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;
    let existing = find_owned(&state.orm, user, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut product = Product::from(existing.clone());
    product.apply_changes(&payload);
    if product.slug != existing.slug {
        ensure_slug_available(&state.orm, &product.shop_id, &product.slug, Some(&product.id))
            .await?;
    }

    let mut active: ActiveModel = existing.into();
    active.name = Set(product.name);
    active.slug = Set(product.slug);
    active.description = Set(product.description);
    active.price = Set(product.price);
    active.compare_at_price = Set(product.compare_at_price);
    active.sku = Set(product.sku);
    active.inventory = Set(product.inventory);
    active.published = Set(product.published);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(product_id = %updated.id, "product updated");
    audit::record(&state.pool, user, "product_update", "products", &updated.id).await;

    Ok(ApiResponse::item("Updated", Product::from(updated)))
}

/// Products that appear on an order are kept; the order lines still point at them.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let Some(product) = find_owned(&state.orm, user, id).await? else {
        return Ok(delete_response(id.to_string(), 0));
    };

    let ordered = OrderItems::find()
        .filter(order_items::Column::ProductId.eq(product.id.as_str()))
        .count(&state.orm)
        .await?;
    if ordered > 0 {
        return Err(AppError::BadRequest(
            "Product has orders and cannot be deleted".into(),
        ));
    }

    let result = Products::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(product.id.as_str()))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(product_id = %id, "product deleted");
        audit::record(&state.pool, user, "product_delete", "products", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

pub async fn list_product_images(
    state: &AppState,
    user: &AuthUser,
    product_id: &str,
) -> AppResult<ApiResponse<ProductImageList>> {
    let product = find_owned(&state.orm, user, product_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let rows = ProductImages::find()
        .filter(product_images::Column::ProductId.eq(product.id.as_str()))
        .find_also_related(Images)
        .order_by_asc(product_images::Column::Position)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(link, image)| {
            image.map(|image| ProductImage {
                position: link.position,
                image: Image::from(image),
            })
        })
        .collect();

    Ok(ApiResponse::success(
        "Product images",
        ProductImageList { items },
        None,
    ))
}

/// Attach an image to a product, or move it when already attached.
pub async fn attach_image(
    state: &AppState,
    user: &AuthUser,
    product_id: &str,
    payload: AttachImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    payload.validate()?;
    let product = find_owned(&state.orm, user, product_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let image = owned_image(&state.orm, user, &payload.image_id).await?;
    if image.shop_id != product.shop_id {
        return Err(AppError::BadRequest("Image belongs to another shop".into()));
    }

    let txn = state.orm.begin().await?;
    let existing = ProductImages::find_by_id((product.id.clone(), image.id.clone()))
        .one(&txn)
        .await?;

    let link = match existing {
        Some(link) => {
            let mut active: product_images::ActiveModel = link.clone().into();
            if let Some(position) = payload.position {
                active.position = Set(position);
                active.update(&txn).await?
            } else {
                link
            }
        }
        None => {
            let position = match payload.position {
                Some(position) => position,
                None => next_position(&txn, &product.id).await?,
            };
            product_images::ActiveModel {
                product_id: Set(product.id.clone()),
                image_id: Set(image.id.clone()),
                position: Set(position),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?
        }
    };
    txn.commit().await?;

    tracing::info!(product_id = %product.id, image_id = %image.id, "image attached");
    audit::record(&state.pool, user, "product_image_attach", "products", &product.id).await;

    Ok(ApiResponse::item(
        "Image attached",
        ProductImage {
            position: link.position,
            image: Image::from(image),
        },
    ))
}

pub async fn detach_image(
    state: &AppState,
    user: &AuthUser,
    product_id: &str,
    image_id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("image_id", image_id)?;
    let Some(product) = find_owned(&state.orm, user, product_id).await? else {
        return Ok(delete_response(image_id.to_string(), 0));
    };

    let result = ProductImages::delete_many()
        .filter(
            Condition::all()
                .add(product_images::Column::ProductId.eq(product.id.as_str()))
                .add(product_images::Column::ImageId.eq(image_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(product_id = %product.id, image_id = %image_id, "image detached");
        audit::record(&state.pool, user, "product_image_detach", "products", &product.id).await;
    }

    Ok(delete_response(image_id.to_string(), result.rows_affected))
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    id: &str,
) -> AppResult<Option<ProductModel>> {
    validate_id("id", id)?;
    Ok(Products::find()
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
    let mut finder = Products::find()
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

async fn next_position<C: ConnectionTrait>(db: &C, product_id: &str) -> AppResult<i32> {
    let attached = ProductImages::find()
        .filter(product_images::Column::ProductId.eq(product_id))
        .count(db)
        .await?;
    Ok(i32::try_from(attached).unwrap_or(i32::MAX))
}
