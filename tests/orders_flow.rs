use shop_admin_api::{
    db::{create_pool, new_id, run_migrations},
    dto::{
        customers::CreateCustomerRequest,
        orders::{CreateOrderRequest, OrderItemInput, UpdateOrderRequest},
        payments::CreatePaymentRequest,
        products::CreateProductRequest,
        shops::{CreateShopRequest, UpdateShopRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{OrderStatus, PaymentStatus},
    routes::params::OrderListQuery,
    services::{customer_service, order_service, payment_service, product_service, shop_service},
    state::AppState,
};

// Integration flow: owner builds a shop, takes an order, records a payment; a
// stranger can neither see nor delete any of it.
#[tokio::test]
async fn shop_order_payment_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = AuthUser {
        user_id: format!("owner-{}", new_id()),
    };
    let stranger = AuthUser {
        user_id: format!("stranger-{}", new_id()),
    };
    let slug = format!("flow-{}", new_id());

    let shop = shop_service::create_shop(
        &state,
        &owner,
        CreateShopRequest {
            name: "Flow Shop".into(),
            slug: slug.clone(),
            description: Some("Integration".into()),
            currency: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(shop.currency, "USD");

    // Partial update keeps untouched fields.
    let renamed = shop_service::update_shop(
        &state,
        &owner,
        &shop.id,
        UpdateShopRequest {
            name: Some("Renamed Shop".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(renamed.name, "Renamed Shop");
    assert_eq!(renamed.slug, slug);
    assert_eq!(renamed.description.as_deref(), Some("Integration"));

    // A second shop may not reuse the slug.
    let taken = shop_service::create_shop(
        &state,
        &stranger,
        CreateShopRequest {
            name: "Copycat".into(),
            slug: slug.clone(),
            description: None,
            currency: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(taken, AppError::BadRequest(_)));

    // Strangers see nothing and delete nothing.
    let hidden = shop_service::get_shop(&state, &stranger, &shop.id).await.unwrap_err();
    assert!(matches!(hidden, AppError::NotFound));
    let noop = shop_service::delete_shop(&state, &stranger, &shop.id)
        .await?
        .data
        .unwrap();
    assert!(!noop.deleted);

    let foreign_product = product_service::create_product(
        &state,
        &stranger,
        CreateProductRequest {
            shop_id: shop.id.clone(),
            name: "Sneaky".into(),
            slug: "sneaky".into(),
            description: None,
            price: 100,
            compare_at_price: None,
            sku: None,
            inventory: None,
            published: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(foreign_product, AppError::BadRequest(msg) if msg == "Shop not found"));

    let mug = product_service::create_product(
        &state,
        &owner,
        CreateProductRequest {
            shop_id: shop.id.clone(),
            name: "Mug".into(),
            slug: "mug".into(),
            description: None,
            price: 1200,
            compare_at_price: None,
            sku: None,
            inventory: Some(10),
            published: Some(true),
        },
    )
    .await?
    .data
    .unwrap();
    let hoodie = product_service::create_product(
        &state,
        &owner,
        CreateProductRequest {
            shop_id: shop.id.clone(),
            name: "Hoodie".into(),
            slug: "hoodie".into(),
            description: None,
            price: 5500,
            compare_at_price: None,
            sku: None,
            inventory: Some(5),
            published: Some(true),
        },
    )
    .await?
    .data
    .unwrap();

    let customer = customer_service::create_customer(
        &state,
        &owner,
        CreateCustomerRequest {
            shop_id: shop.id.clone(),
            email: "  Ferris@Example.COM ".into(),
            first_name: Some("Ferris".into()),
            last_name: None,
            phone: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(customer.email, "ferris@example.com");

    let created = order_service::create_order(
        &state,
        &owner,
        CreateOrderRequest {
            shop_id: shop.id.clone(),
            customer_id: Some(customer.id.clone()),
            items: vec![
                OrderItemInput {
                    product_id: mug.id.clone(),
                    quantity: 2,
                },
                OrderItemInput {
                    product_id: hoodie.id.clone(),
                    quantity: 1,
                },
            ],
            note: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.order.total_amount, 2 * 1200 + 5500);
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.items.len(), 2);

    // Ordered products stay put.
    let blocked = product_service::delete_product(&state, &owner, &mug.id)
        .await
        .unwrap_err();
    assert!(matches!(blocked, AppError::BadRequest(_)));

    payment_service::create_payment(
        &state,
        &owner,
        CreatePaymentRequest {
            order_id: created.order.id.clone(),
            amount: created.order.total_amount,
            provider: "manual".into(),
            reference: Some("inv-1".into()),
            status: Some(PaymentStatus::Succeeded),
        },
    )
    .await?;

    let paid = order_service::get_order(&state, &owner, &created.order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(paid.order.status, OrderStatus::Paid);

    // Paid orders cannot go back to pending.
    let backwards = order_service::update_order(
        &state,
        &owner,
        &created.order.id,
        UpdateOrderRequest {
            status: Some(OrderStatus::Pending),
            customer_id: None,
            note: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(backwards, AppError::BadRequest(_)));

    let listed = order_service::list_orders(
        &state,
        &owner,
        OrderListQuery {
            shop_id: Some(shop.id.clone()),
            status: Some(OrderStatus::Paid),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(listed.items.len(), 1);

    let deleted = shop_service::delete_shop(&state, &owner, &shop.id)
        .await?
        .data
        .unwrap();
    assert!(deleted.deleted);
    let gone = order_service::get_order(&state, &owner, &created.order.id)
        .await
        .unwrap_err();
    assert!(matches!(gone, AppError::NotFound));

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;
    Ok(Some(AppState::new(pool, "test-secret")))
}
