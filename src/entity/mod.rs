pub mod audit_logs;
pub mod collection_products;
pub mod collections;
pub mod content_blocks;
pub mod customers;
pub mod heroes;
pub mod images;
pub mod order_items;
pub mod orders;
pub mod pages;
pub mod payments;
pub mod product_images;
pub mod products;
pub mod shops;

pub use audit_logs::Entity as AuditLogs;
pub use collection_products::Entity as CollectionProducts;
pub use collections::Entity as Collections;
pub use content_blocks::Entity as ContentBlocks;
pub use customers::Entity as Customers;
pub use heroes::Entity as Heroes;
pub use images::Entity as Images;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use pages::Entity as Pages;
pub use payments::Entity as Payments;
pub use product_images::Entity as ProductImages;
pub use products::Entity as Products;
pub use shops::Entity as Shops;
