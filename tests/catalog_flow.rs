use shop_admin_api::{
    db::{create_pool, new_id, run_migrations},
    dto::{
        collections::{AddCollectionProductRequest, CreateCollectionRequest, UpdateCollectionRequest},
        content_blocks::CreateContentBlockRequest,
        heroes::{CreateHeroRequest, UpdateHeroRequest},
        images::{CreateImageRequest, UpdateImageRequest},
        pages::{CreatePageRequest, UpdatePageRequest},
        products::{AttachImageRequest, CreateProductRequest},
        shops::CreateShopRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{ContentBlockKind, Product, Shop},
    routes::params::PageScopedQuery,
    services::{
        collection_service, content_block_service, hero_service, image_service, page_service,
        product_service, shop_service,
    },
    state::AppState,
};

// Integration flow: collections, product images and a page with its hero and
// content blocks, all confined to one shop.
#[tokio::test]
async fn collections_images_and_pages_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = AuthUser {
        user_id: format!("owner-{}", new_id()),
    };
    let shop = create_shop(&state, &owner).await?;
    let other_shop = create_shop(&state, &owner).await?;

    let mug = create_product(&state, &owner, &shop, "mug").await?;
    let hoodie = create_product(&state, &owner, &shop, "hoodie").await?;
    let foreign_tee = create_product(&state, &owner, &other_shop, "tee").await?;

    // Collection CRUD keeps untouched fields.
    let collection = collection_service::create_collection(
        &state,
        &owner,
        CreateCollectionRequest {
            shop_id: shop.id.clone(),
            title: "Drinkware".into(),
            slug: "drinkware".into(),
            description: Some("Cups and mugs".into()),
        },
    )
    .await?
    .data
    .unwrap();
    let renamed = collection_service::update_collection(
        &state,
        &owner,
        &collection.id,
        UpdateCollectionRequest {
            title: Some("Mugs & More".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(renamed.title, "Mugs & More");
    assert_eq!(renamed.slug, "drinkware");
    assert_eq!(renamed.description.as_deref(), Some("Cups and mugs"));

    // Membership: default positions append, a repeat add moves.
    let first = add_member(&state, &owner, &collection.id, &mug.id, None).await?;
    assert_eq!(first.position, 0);
    let second = add_member(&state, &owner, &collection.id, &hoodie.id, None).await?;
    assert_eq!(second.position, 1);
    let moved = add_member(&state, &owner, &collection.id, &mug.id, Some(5)).await?;
    assert_eq!(moved.position, 5);

    let members = collection_service::list_collection_products(&state, &owner, &collection.id)
        .await?
        .data
        .unwrap()
        .items;
    let order: Vec<_> = members.iter().map(|m| m.product.id.as_str()).collect();
    assert_eq!(order, vec![hoodie.id.as_str(), mug.id.as_str()]);

    let cross_shop = add_member(&state, &owner, &collection.id, &foreign_tee.id, None)
        .await
        .unwrap_err();
    assert!(matches!(cross_shop, AppError::BadRequest(_)));

    let removed =
        collection_service::remove_collection_product(&state, &owner, &collection.id, &hoodie.id)
            .await?
            .data
            .unwrap();
    assert!(removed.deleted);
    let again =
        collection_service::remove_collection_product(&state, &owner, &collection.id, &hoodie.id)
            .await?
            .data
            .unwrap();
    assert!(!again.deleted);

    // Images: partial update keeps dimensions, null clears them.
    let image = create_image(&state, &owner, &shop).await?;
    let foreign_image = create_image(&state, &owner, &other_shop).await?;
    let retitled = image_service::update_image(
        &state,
        &owner,
        &image.id,
        UpdateImageRequest {
            alt: Some("Mug on a desk".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(retitled.width, Some(800));
    assert_eq!(retitled.url, image.url);
    let cleared = image_service::update_image(
        &state,
        &owner,
        &image.id,
        UpdateImageRequest {
            width: Some(None),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cleared.width, None);
    assert_eq!(cleared.height, Some(600));

    let attached = product_service::attach_image(
        &state,
        &owner,
        &mug.id,
        AttachImageRequest {
            image_id: image.id.clone(),
            position: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(attached.position, 0);
    let wrong_shop = product_service::attach_image(
        &state,
        &owner,
        &mug.id,
        AttachImageRequest {
            image_id: foreign_image.id.clone(),
            position: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(wrong_shop, AppError::BadRequest(_)));

    let gallery = product_service::list_product_images(&state, &owner, &mug.id)
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].image.id, image.id);

    let detached = product_service::detach_image(&state, &owner, &mug.id, &image.id)
        .await?
        .data
        .unwrap();
    assert!(detached.deleted);
    let gallery = product_service::list_product_images(&state, &owner, &mug.id)
        .await?
        .data
        .unwrap()
        .items;
    assert!(gallery.is_empty());

    // Pages, heroes and content blocks.
    let page = page_service::create_page(
        &state,
        &owner,
        CreatePageRequest {
            shop_id: shop.id.clone(),
            title: "Home".into(),
            slug: "home".into(),
            body: Some("Welcome".into()),
            published: Some(false),
        },
    )
    .await?
    .data
    .unwrap();
    let published = page_service::update_page(
        &state,
        &owner,
        &page.id,
        UpdatePageRequest {
            published: Some(true),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert!(published.published);
    assert_eq!(published.title, "Home");
    assert_eq!(published.body.as_deref(), Some("Welcome"));

    let hero = hero_service::create_hero(
        &state,
        &owner,
        CreateHeroRequest {
            page_id: page.id.clone(),
            heading: "Fearless shopping".into(),
            subheading: Some("Gear for Rustaceans".into()),
            image_url: None,
            cta_label: Some("Shop now".into()),
            cta_url: Some("https://example.com/shop".into()),
        },
    )
    .await?
    .data
    .unwrap();
    let reworded = hero_service::update_hero(
        &state,
        &owner,
        &hero.id,
        UpdateHeroRequest {
            heading: Some("Memory-safe merch".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(reworded.heading, "Memory-safe merch");
    assert_eq!(reworded.subheading.as_deref(), Some("Gear for Rustaceans"));
    assert_eq!(reworded.cta_url.as_deref(), Some("https://example.com/shop"));

    let product_block = content_block_service::create_content_block(
        &state,
        &owner,
        CreateContentBlockRequest {
            page_id: page.id.clone(),
            kind: ContentBlockKind::Product,
            product_id: Some(mug.id.clone()),
            collection_id: None,
            position: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(product_block.position, 0);

    let foreign_block = content_block_service::create_content_block(
        &state,
        &owner,
        CreateContentBlockRequest {
            page_id: page.id.clone(),
            kind: ContentBlockKind::Product,
            product_id: Some(foreign_tee.id.clone()),
            collection_id: None,
            position: None,
        },
    )
    .await
    .unwrap_err();
    assert!(
        matches!(foreign_block, AppError::BadRequest(msg) if msg == "Product belongs to another shop")
    );

    let collection_block = content_block_service::create_content_block(
        &state,
        &owner,
        CreateContentBlockRequest {
            page_id: page.id.clone(),
            kind: ContentBlockKind::Collection,
            product_id: None,
            collection_id: Some(collection.id.clone()),
            position: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(collection_block.position, 1);

    let blocks = content_block_service::list_content_blocks(
        &state,
        &owner,
        PageScopedQuery {
            page_id: Some(page.id.clone()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    let ids: Vec<_> = blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![product_block.id.as_str(), collection_block.id.as_str()]);

    // Deleting the page takes its hero and blocks with it.
    let deleted = page_service::delete_page(&state, &owner, &page.id)
        .await?
        .data
        .unwrap();
    assert!(deleted.deleted);
    let hero_gone = hero_service::get_hero(&state, &owner, &hero.id).await.unwrap_err();
    assert!(matches!(hero_gone, AppError::NotFound));
    let block_gone = content_block_service::get_content_block(&state, &owner, &product_block.id)
        .await
        .unwrap_err();
    assert!(matches!(block_gone, AppError::NotFound));

    // Deleting a product drops its memberships.
    product_service::delete_product(&state, &owner, &mug.id).await?;
    let members = collection_service::list_collection_products(&state, &owner, &collection.id)
        .await?
        .data
        .unwrap()
        .items;
    assert!(members.is_empty());

    shop_service::delete_shop(&state, &owner, &shop.id).await?;
    shop_service::delete_shop(&state, &owner, &other_shop.id).await?;
    Ok(())
}

async fn create_shop(state: &AppState, user: &AuthUser) -> anyhow::Result<Shop> {
    let slug = format!("catalog-{}", new_id());
    let shop = shop_service::create_shop(
        state,
        user,
        CreateShopRequest {
            name: "Catalog Shop".into(),
            slug,
            description: None,
            currency: None,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(shop)
}

async fn create_product(
    state: &AppState,
    user: &AuthUser,
    shop: &Shop,
    slug: &str,
) -> anyhow::Result<Product> {
    let product = product_service::create_product(
        state,
        user,
        CreateProductRequest {
            shop_id: shop.id.clone(),
            name: slug.to_uppercase(),
            slug: slug.into(),
            description: None,
            price: 1000,
            compare_at_price: None,
            sku: None,
            inventory: Some(1),
            published: Some(true),
        },
    )
    .await?
    .data
    .unwrap();
    Ok(product)
}

async fn create_image(
    state: &AppState,
    user: &AuthUser,
    shop: &Shop,
) -> anyhow::Result<shop_admin_api::models::Image> {
    let image = image_service::create_image(
        state,
        user,
        CreateImageRequest {
            shop_id: shop.id.clone(),
            url: format!("https://cdn.example.com/{}.png", new_id()),
            alt: None,
            width: Some(800),
            height: Some(600),
        },
    )
    .await?
    .data
    .unwrap();
    Ok(image)
}

async fn add_member(
    state: &AppState,
    user: &AuthUser,
    collection_id: &str,
    product_id: &str,
    position: Option<i32>,
) -> Result<shop_admin_api::dto::collections::CollectionProduct, AppError> {
    let member = collection_service::add_collection_product(
        state,
        user,
        collection_id,
        AddCollectionProductRequest {
            product_id: product_id.into(),
            position,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(member)
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
