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
    dto::customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
    entity::customers::{ActiveModel, Column, Entity as Customers, Model as CustomerModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Customer, DeleteOutcome, clearable, normalize_email},
    response::ApiResponse,
    routes::params::{ShopScopedQuery, SortOrder, search_term},
    services::scope::{delete_response, fetch_page, owned_shop},
    state::AppState,
    validation::{Validate, validate_id},
};

pub async fn list_customers(
    state: &AppState,
    user: &AuthUser,
    query: ShopScopedQuery,
) -> AppResult<ApiResponse<CustomerList>> {
    let mut condition = Condition::all().add(Column::UserId.eq(user.user_id.as_str()));
    if let Some(shop_id) = &query.shop_id {
        condition = condition.add(Column::ShopId.eq(shop_id.as_str()));
    }
    if let Some(pattern) = search_term(&query.q) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Email).ilike(pattern.clone()))
                .add(Expr::col(Column::FirstName).ilike(pattern.clone()))
                .add(Expr::col(Column::LastName).ilike(pattern)),
        );
    }

    let mut finder = Customers::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (rows, meta) = fetch_page(&state.orm, finder, query.pagination()).await?;
    let items = rows.into_iter().map(Customer::from).collect();
    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(meta),
    ))
}

pub async fn get_customer(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Customer>> {
    let customer = find_owned(state, user, id).await?;
    Ok(ApiResponse::success("Customer", Customer::from(customer), None))
}

pub async fn create_customer(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let shop = owned_shop(&state.orm, user, &payload.shop_id).await?;
    let email = normalize_email(&payload.email);
    ensure_email_available(&state.orm, &shop.id, &email, None).await?;

    let customer = ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.user_id.clone()),
        shop_id: Set(shop.id),
        email: Set(email),
        first_name: Set(payload.first_name.as_deref().and_then(clearable)),
        last_name: Set(payload.last_name.as_deref().and_then(clearable)),
        phone: Set(payload.phone.as_deref().and_then(clearable)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(customer_id = %customer.id, shop_id = %customer.shop_id, "customer created");
    audit::record(&state.pool, user, "customer_create", "customers", &customer.id).await;

    Ok(ApiResponse::item("Customer created", Customer::from(customer)))
}

pub async fn update_customer(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let existing = find_owned(state, user, id).await?;

    let mut customer = Customer::from(existing.clone());
    customer.apply_changes(&payload);
    if customer.email != existing.email {
        ensure_email_available(
            &state.orm,
            &customer.shop_id,
            &customer.email,
            Some(&customer.id),
        )
        .await?;
    }

    let mut active: ActiveModel = existing.into();
    active.email = Set(customer.email);
    active.first_name = Set(customer.first_name);
    active.last_name = Set(customer.last_name);
    active.phone = Set(customer.phone);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(customer_id = %updated.id, "customer updated");
    audit::record(&state.pool, user, "customer_update", "customers", &updated.id).await;

    Ok(ApiResponse::item("Updated", Customer::from(updated)))
}

/// Orders placed by the customer stay, detached from it.
pub async fn delete_customer(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeleteOutcome>> {
    validate_id("id", id)?;
    let result = Customers::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(customer_id = %id, "customer deleted");
        audit::record(&state.pool, user, "customer_delete", "customers", id).await;
    }

    Ok(delete_response(id.to_string(), result.rows_affected))
}

async fn find_owned(state: &AppState, user: &AuthUser, id: &str) -> AppResult<CustomerModel> {
    validate_id("id", id)?;
    Customers::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::UserId.eq(user.user_id.as_str())),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_email_available<C: ConnectionTrait>(
    db: &C,
    shop_id: &str,
    email: &str,
    except_id: Option<&str>,
) -> AppResult<()> {
    let mut finder = Customers::find()
        .filter(Column::ShopId.eq(shop_id))
        .filter(Column::Email.eq(email));
    if let Some(id) = except_id {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(db).await? > 0 {
        return Err(AppError::BadRequest(
            "A customer with this email already exists in this shop".into(),
        ));
    }
    Ok(())
}
