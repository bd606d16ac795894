pub mod collection_service;
pub mod content_block_service;
pub mod customer_service;
pub mod hero_service;
pub mod image_service;
pub mod order_service;
pub mod page_service;
pub mod payment_service;
pub mod product_service;
pub mod scope;
pub mod shop_service;
