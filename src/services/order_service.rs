use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit,
    db::new_id,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems, UpdateOrderRequest},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, Order, OrderItem, OrderStatus, clearable},
    response::ApiResponse,
    routes::params::{OrderListQuery, SortOrder},
    services::scope::{delete_response, fetch_page, owned_customer, owned_shop},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id.as_str()));
    if let Some(shop_id) = &query.shop_id {
        condition = condition.add(OrderCol::ShopId.eq(shop_id.as_str()));
    }
    if let Some(customer_id) = &query.customer_id {
        condition = condition.add(OrderCol::CustomerId.eq(customer_id.as_str()));
    }
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows
        .into_iter()
        .map(Order::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = find_owned(&state.orm, user, id, false)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = load_items(&state.orm, &order.id).await?;

    Ok(ApiResponse::success(
        "Order",
        OrderWithItems {
            order: Order::try_from(order)?,
            items,
        },
        None,
    ))
}

/// Create an order priced from the shop's current product prices. Every line
/// must reference a product of the same shop.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    payload.validate()?;
    let txn = state.orm.begin().await?;

    let shop = owned_shop(&txn, user, &payload.shop_id).await?;
    let customer_id = match payload.customer_id.as_deref() {
        Some(customer_id) => {
            let customer = owned_customer(&txn, user, customer_id).await?;
            if customer.shop_id != shop.id {
                return Err(AppError::BadRequest(
                    "Customer belongs to another shop".into(),
                ));
            }
            Some(customer.id)
        }
        None => None,
    };

    let product_ids: Vec<&str> = payload
        .items
        .iter()
        .map(|item| item.product_id.as_str())
        .collect();
    let prices: HashMap<String, i64> = Products::find()
        .filter(
            Condition::all()
                .add(ProdCol::Id.is_in(product_ids))
                .add(ProdCol::ShopId.eq(shop.id.as_str()))
                .add(ProdCol::UserId.eq(user.user_id.as_str())),
        )
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product.price))
        .collect();

    let mut lines = Vec::with_capacity(payload.items.len());
    let mut total_amount: i64 = 0;
    for item in &payload.items {
        let Some(&unit_price) = prices.get(&item.product_id) else {
            return Err(AppError::BadRequest(format!(
                "Product {} not found",
                item.product_id
            )));
        };
        total_amount = unit_price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line| total_amount.checked_add(line))
            .ok_or_else(|| AppError::BadRequest("Order total is too large".into()))?;
        lines.push((item.product_id.clone(), item.quantity, unit_price));
    }

    let order = OrderActive {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        shop_id: Set(shop.id),
        customer_id: Set(customer_id),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        total_amount: Set(total_amount),
        currency: Set(shop.currency),
        note: Set(payload.note.as_deref().and_then(clearable)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (product_id, quantity, unit_price) in lines {
        let item = OrderItemActive {
            id: Set(new_id()),
            order_id: Set(order.id.clone()),
            product_id: Set(product_id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(item));
    }

    txn.commit().await?;

    tracing::info!(order_id = %order.id, shop_id = %order.shop_id, total_amount, "order created");
    audit::record(&state.pool, user, "order_create", "orders", &order.id).await;

    Ok(ApiResponse::item(
        "Order created",
        OrderWithItems {
            order: Order::try_from(order)?,
            items,
        },
    ))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;
    let txn = state.orm.begin().await?;
    let existing = find_owned(&txn, user, id, true)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = Order::try_from(existing.clone())?;
    let mut order = current.clone();
    order.apply_changes(&payload);

    if !current.status.can_transition_to(order.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {} to {}",
            current.status.as_str(),
            order.status.as_str()
        )));
    }
    if let Some(customer_id) = order
        .customer_id
        .as_deref()
        .filter(|id| Some(*id) != current.customer_id.as_deref())
    {
        let customer = owned_customer(&txn, user, customer_id).await?;
        if customer.shop_id != order.shop_id {
            return Err(AppError::BadRequest(
                "Customer belongs to another shop".into(),
            ));
        }
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(order.status.as_str().to_string());
    active.customer_id = Set(order.customer_id);
    active.note = Set(order.note);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(order_id = %updated.id, status = %updated.status, "order updated");
    audit::record(&state.pool, user, "order_update", "orders", &updated.id).await;

    Ok(ApiResponse::item("Updated", Order::try_from(updated)?))
}

/// Line items and payments go with the order.
pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Orders::delete_many()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(id))
                .add(OrderCol::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(order_id = %id, "order deleted");
        audit::record(&state.pool, user, "order_delete", "orders", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    id: &str,
    for_update: bool,
) -> AppResult<Option<OrderModel>> {
    validate_id("id", id)?;
    let mut finder = Orders::find().filter(
        Condition::all()
            .add(OrderCol::Id.eq(id))
            .add(OrderCol::UserId.eq(user.user_id.as_str())),
    );
    if for_update {
        finder = finder.lock(LockType::Update);
    }
    Ok(finder.one(db).await?)
}

async fn load_items<C: ConnectionTrait>(db: &C, order_id: &str) -> AppResult<Vec<OrderItem>> {
    Ok(OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect())
}
