use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        collections::{
            AddCollectionProductRequest, CollectionList, CollectionProduct, CollectionProductList,
            CreateCollectionRequest, UpdateCollectionRequest,
        },
        content_blocks::{ContentBlockList, CreateContentBlockRequest, UpdateContentBlockRequest},
        customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
        heroes::{CreateHeroRequest, HeroList, UpdateHeroRequest},
        images::{CreateImageRequest, ImageList, UpdateImageRequest},
        orders::{CreateOrderRequest, OrderItemInput, OrderList, OrderWithItems, UpdateOrderRequest},
        pages::{CreatePageRequest, PageList, UpdatePageRequest},
        payments::{CreatePaymentRequest, PaymentList, UpdatePaymentRequest},
        products::{
            AttachImageRequest, CreateProductRequest, ProductImage, ProductImageList, ProductList,
            UpdateProductRequest,
        },
        rpc::{IdInput, RpcRequest},
        shops::{CreateShopRequest, ShopList, UpdateShopRequest},
    },
    error::ErrorData,
    models::{
        Collection, ContentBlock, ContentBlockKind, Customer, DeleteOutcome, Hero, Image, Order,
        OrderItem, OrderStatus, Page, Payment, PaymentStatus, Product, Shop,
    },
    response::{ApiResponse, Meta},
    routes::{
        collections, content_blocks, customers, health, heroes, images, orders, pages, params,
        payments, products, rpc, shops,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        shops::list_shops,
        shops::get_shop,
        shops::create_shop,
        shops::update_shop,
        shops::delete_shop,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::list_product_images,
        products::attach_image,
        products::detach_image,
        collections::list_collections,
        collections::get_collection,
        collections::create_collection,
        collections::update_collection,
        collections::delete_collection,
        collections::list_collection_products,
        collections::add_collection_product,
        collections::remove_collection_product,
        pages::list_pages,
        pages::get_page,
        pages::create_page,
        pages::update_page,
        pages::delete_page,
        heroes::list_heroes,
        heroes::get_hero,
        heroes::create_hero,
        heroes::update_hero,
        heroes::delete_hero,
        content_blocks::list_content_blocks,
        content_blocks::get_content_block,
        content_blocks::create_content_block,
        content_blocks::update_content_block,
        content_blocks::delete_content_block,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        payments::list_payments,
        payments::get_payment,
        payments::create_payment,
        payments::update_payment,
        payments::delete_payment,
        images::list_images,
        images::get_image,
        images::create_image,
        images::update_image,
        images::delete_image,
        rpc::call
    ),
    components(
        schemas(
            Shop,
            Product,
            Collection,
            Page,
            Hero,
            ContentBlock,
            ContentBlockKind,
            Customer,
            Order,
            OrderItem,
            OrderStatus,
            Payment,
            PaymentStatus,
            Image,
            DeleteOutcome,
            ErrorData,
            CreateShopRequest,
            UpdateShopRequest,
            CreateProductRequest,
            UpdateProductRequest,
            AttachImageRequest,
            CreateCollectionRequest,
            UpdateCollectionRequest,
            AddCollectionProductRequest,
            CreatePageRequest,
            UpdatePageRequest,
            CreateHeroRequest,
            UpdateHeroRequest,
            CreateContentBlockRequest,
            UpdateContentBlockRequest,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            OrderItemInput,
            CreateOrderRequest,
            UpdateOrderRequest,
            CreatePaymentRequest,
            UpdatePaymentRequest,
            CreateImageRequest,
            UpdateImageRequest,
            RpcRequest,
            IdInput,
            ShopList,
            ProductList,
            ProductImage,
            ProductImageList,
            CollectionList,
            CollectionProduct,
            CollectionProductList,
            PageList,
            HeroList,
            ContentBlockList,
            CustomerList,
            OrderList,
            OrderWithItems,
            PaymentList,
            ImageList,
            params::Pagination,
            params::SortOrder,
            Meta,
            ApiResponse<Shop>,
            ApiResponse<ShopList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<DeleteOutcome>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Shops", description = "Shop endpoints"),
        (name = "Products", description = "Product and product image endpoints"),
        (name = "Collections", description = "Collection and membership endpoints"),
        (name = "Pages", description = "Content page endpoints"),
        (name = "Heroes", description = "Page hero endpoints"),
        (name = "Content blocks", description = "Page content block endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payment endpoints"),
        (name = "Images", description = "Image endpoints"),
        (name = "RPC", description = "Procedure calls over the shop operations"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/shops",
            "/api/shops/{id}",
            "/api/products/{id}/images/{image_id}",
            "/api/collections/{id}/products",
            "/api/content-blocks",
            "/api/orders/{id}",
            "/api/rpc",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
