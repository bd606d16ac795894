use std::env;

use chrono::Duration;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use shop_admin_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        collections::{AddCollectionProductRequest, CreateCollectionRequest},
        content_blocks::CreateContentBlockRequest,
        customers::CreateCustomerRequest,
        heroes::CreateHeroRequest,
        orders::{CreateOrderRequest, OrderItemInput},
        pages::CreatePageRequest,
        payments::CreatePaymentRequest,
        products::CreateProductRequest,
        shops::CreateShopRequest,
    },
    entity::{Shops, shops},
    middleware::auth::AuthUser,
    models::{ContentBlockKind, PaymentStatus},
    services::{
        collection_service, content_block_service, customer_service, hero_service,
        order_service, page_service, payment_service, product_service, shop_service,
    },
    state::AppState,
};

const DEMO_SHOP_SLUG: &str = "ferris-goods";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    run_migrations(&pool).await?;
    let state = AppState::new(pool, &config.jwt_secret);

    let user = AuthUser {
        user_id: env::var("SEED_USER_ID").unwrap_or_else(|_| "demo-user".to_string()),
    };

    let existing = Shops::find()
        .filter(shops::Column::Slug.eq(DEMO_SHOP_SLUG))
        .one(&state.orm)
        .await?;
    match existing {
        Some(shop) => println!("Demo shop already present ({})", shop.id),
        None => seed_shop(&state, &user).await?,
    }

    let token = state.jwt.issue(&user.user_id, Duration::days(30))?;
    println!("Seed completed for user {}", user.user_id);
    println!("Development token (30 days): {token}");
    Ok(())
}

async fn seed_shop(state: &AppState, user: &AuthUser) -> anyhow::Result<()> {
    let shop = shop_service::create_shop(
        state,
        user,
        CreateShopRequest {
            name: "Ferris Goods".into(),
            slug: DEMO_SHOP_SLUG.into(),
            description: Some("Merchandise for Rustaceans".into()),
            currency: Some("USD".into()),
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("shop create returned no data"))?;

    let catalog = [
        ("Axum Hoodie", "axum-hoodie", "Warm hoodie for Rustaceans", 5500, 50),
        ("Ferris Mug", "ferris-mug", "Coffee tastes better with Ferris", 1200, 100),
        ("Rust Sticker Pack", "rust-sticker-pack", "Decorate your laptop", 500, 200),
        ("E-book: Async Rust", "ebook-async-rust", "Learn async Rust patterns", 2500, 75),
    ];

    let mut product_ids = Vec::with_capacity(catalog.len());
    for (name, slug, description, price, inventory) in catalog {
        let product = product_service::create_product(
            state,
            user,
            CreateProductRequest {
                shop_id: shop.id.clone(),
                name: name.into(),
                slug: slug.into(),
                description: Some(description.into()),
                price,
                compare_at_price: None,
                sku: None,
                inventory: Some(inventory),
                published: Some(true),
            },
        )
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("product create returned no data"))?;
        product_ids.push(product.id);
    }
    println!("Seeded {} products", product_ids.len());

    let collection = collection_service::create_collection(
        state,
        user,
        CreateCollectionRequest {
            shop_id: shop.id.clone(),
            title: "Apparel & Drinkware".into(),
            slug: "apparel-drinkware".into(),
            description: None,
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("collection create returned no data"))?;
    for product_id in product_ids.iter().take(2) {
        collection_service::add_collection_product(
            state,
            user,
            &collection.id,
            AddCollectionProductRequest {
                product_id: product_id.clone(),
                position: None,
            },
        )
        .await?;
    }

    let page = page_service::create_page(
        state,
        user,
        CreatePageRequest {
            shop_id: shop.id.clone(),
            title: "Home".into(),
            slug: "home".into(),
            body: None,
            published: Some(true),
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("page create returned no data"))?;

    hero_service::create_hero(
        state,
        user,
        CreateHeroRequest {
            page_id: page.id.clone(),
            heading: "Gear for Rustaceans".into(),
            subheading: Some("Fearless shopping".into()),
            image_url: None,
            cta_label: Some("Shop now".into()),
            cta_url: Some("https://example.com/collections/apparel-drinkware".into()),
        },
    )
    .await?;

    content_block_service::create_content_block(
        state,
        user,
        CreateContentBlockRequest {
            page_id: page.id.clone(),
            kind: ContentBlockKind::Collection,
            product_id: None,
            collection_id: Some(collection.id.clone()),
            position: None,
        },
    )
    .await?;
    println!("Seeded home page");

    let customer = customer_service::create_customer(
        state,
        user,
        CreateCustomerRequest {
            shop_id: shop.id.clone(),
            email: "ferris@example.com".into(),
            first_name: Some("Ferris".into()),
            last_name: None,
            phone: None,
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("customer create returned no data"))?;

    let order = order_service::create_order(
        state,
        user,
        CreateOrderRequest {
            shop_id: shop.id.clone(),
            customer_id: Some(customer.id),
            items: vec![OrderItemInput {
                product_id: product_ids[1].clone(),
                quantity: 2,
            }],
            note: None,
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("order create returned no data"))?;

    payment_service::create_payment(
        state,
        user,
        CreatePaymentRequest {
            order_id: order.order.id.clone(),
            amount: order.order.total_amount,
            provider: "manual".into(),
            reference: None,
            status: Some(PaymentStatus::Succeeded),
        },
    )
    .await?;
    println!("Seeded a paid order ({})", order.order.id);

    Ok(())
}
