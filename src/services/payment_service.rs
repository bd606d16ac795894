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
    dto::payments::{CreatePaymentRequest, PaymentList, UpdatePaymentRequest},
    entity::{
        orders::{self, Entity as Orders},
        payments::{ActiveModel, Column, Entity as Payments, Model as PaymentModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeleteOutcome, OrderStatus, Payment, PaymentStatus, clearable},
    response::ApiResponse,
    routes::params::{PaymentListQuery, SortOrder},
    services::scope::{delete_response, fetch_page},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    query: PaymentListQuery,
) -> AppResult<ApiResponse<PaymentList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(order_id) = &query.order_id {
        condition = condition.add(Column::OrderId.eq(order_id.as_str()));
    }
    if let Some(status) = query.status {
        condition = condition.add(Column::Status.eq(status.as_str()));
    }

    let mut finder = Payments::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows
        .into_iter()
        .map(Payment::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ApiResponse::success("Payments", PaymentList { items }, Some(meta)))
}

pub async fn get_payment(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Payment>> {
    let payment = find_owned(&state.orm, user, id, false)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Payment",
        Payment::try_from(payment)?,
        None,
    ))
}

/// Record a payment against an order, in the order's currency.
pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    payload.validate()?;
    let txn = state.orm.begin().await?;

    let order = lock_order(&txn, user, &payload.order_id).await?;
    let status = payload.status.unwrap_or_default();

    let payment = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        order_id: Set(order.id.clone()),
        amount: Set(payload.amount),
        currency: Set(order.currency.clone()),
        status: Set(status.as_str().to_string()),
        provider: Set(payload.provider.trim().to_string()),
        reference: Set(payload.reference.as_deref().and_then(clearable)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    if status == PaymentStatus::Succeeded {
        mark_order_paid(&txn, order).await?;
    }
    txn.commit().await?;

    tracing::info!(payment_id = %payment.id, order_id = %payment.order_id, status = %payment.status, "payment recorded");
    audit::record(&state.pool, user, "payment_create", "payments", &payment.id).await;

    Ok(ApiResponse::item(
        "Payment recorded",
        Payment::try_from(payment)?,
    ))
}

pub async fn update_payment(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    payload.validate()?;
    let txn = state.orm.begin().await?;
    let existing = find_owned(&txn, user, id, true)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = Payment::try_from(existing.clone())?;
    let mut payment = current.clone();
    payment.apply_changes(&payload);

    let mut active: ActiveModel = existing.into();
    active.amount = Set(payment.amount);
    active.provider = Set(payment.provider);
    active.reference = Set(payment.reference);
    active.status = Set(payment.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    if payment.status == PaymentStatus::Succeeded && current.status != PaymentStatus::Succeeded {
        let order = lock_order(&txn, user, &updated.order_id).await?;
        mark_order_paid(&txn, order).await?;
    }
    txn.commit().await?;

    tracing::info!(payment_id = %updated.id, status = %updated.status, "payment updated");
    audit::record(&state.pool, user, "payment_update", "payments", &updated.id).await;

    Ok(ApiResponse::item("Updated", Payment::try_from(updated)?))
}

pub async fn delete_payment(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Payments::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(payment_id = %id, "payment deleted");
        audit::record(&state.pool, user, "payment_delete", "payments", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    id: &str,
    for_update: bool,
) -> AppResult<Option<PaymentModel>> {
    validate_id("id", id)?;
    let mut finder = Payments::find().filter(
        Condition::all()
            .add(Column::Id.eq(id))
            .add(Column::UserId.eq(user.user_id.as_str())),
    );
    if for_update {
        finder = finder.lock(LockType::Update);
    }
    Ok(finder.one(db).await?)
}

async fn lock_order<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    order_id: &str,
) -> AppResult<orders::Model> {
    Orders::find()
        .filter(
            Condition::all()
                .add(orders::Column::Id.eq(order_id))
                .add(orders::Column::UserId.eq(user.user_id.as_str())),
        )
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Order not found".into()))
}

/// Only pending orders move; paid, fulfilled and cancelled orders keep their status.
async fn mark_order_paid<C: ConnectionTrait>(db: &C, order: orders::Model) -> AppResult<()> {
    if OrderStatus::parse(&order.status) != Some(OrderStatus::Pending) {
        return Ok(());
    }
    let order_id = order.id.clone();
    let mut active: orders::ActiveModel = order.into();
    active.status = Set(OrderStatus::Paid.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    active.update(db).await?;
    tracing::info!(order_id = %order_id, "order paid");
    Ok(())
}
