pub mod collections;
pub mod content_blocks;
pub mod customers;
pub mod heroes;
pub mod images;
pub mod orders;
pub mod pages;
pub mod payments;
pub mod products;
pub mod rpc;
pub mod shops;
