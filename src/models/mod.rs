//! Rows as the API returns them, and the rules for applying partial updates.
//!
//! `apply_changes` is shared by the update services and the optimistic reducer so
//! both agree on which fields an update touches.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod collection;
mod content_block;
mod customer;
mod hero;
mod image;
mod order;
mod page;
mod payment;
mod product;
mod shop;

pub use collection::Collection;
pub use content_block::{ContentBlock, ContentBlockKind};
pub use customer::{Customer, normalize_email};
pub use hero::Hero;
pub use image::Image;
pub use order::{Order, OrderItem, OrderStatus};
pub use page::Page;
pub use payment::{Payment, PaymentStatus};
pub use product::Product;
pub use shop::Shop;

/// Result of a delete. Deleting a row that is missing or owned by someone else
/// changes nothing and reports `deleted: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteOutcome {
    pub id: String,
    pub deleted: bool,
}

/// Trimmed text, or `None` when blank.
pub(crate) fn clearable(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

macro_rules! optimistic_record {
    ($($model:ty => $changes:ty),* $(,)?) => {
        $(
            impl crate::optimistic::OptimisticRecord for $model {
                type Changes = $changes;

                fn record_id(&self) -> &str {
                    &self.id
                }

                fn set_record_id(&mut self, id: String) {
                    self.id = id;
                }

                fn merge(&mut self, changes: &$changes) {
                    self.apply_changes(changes);
                }
            }
        )*
    };
}

optimistic_record! {
    Shop => crate::dto::shops::UpdateShopRequest,
    Product => crate::dto::products::UpdateProductRequest,
    Collection => crate::dto::collections::UpdateCollectionRequest,
    Page => crate::dto::pages::UpdatePageRequest,
    Hero => crate::dto::heroes::UpdateHeroRequest,
    ContentBlock => crate::dto::content_blocks::UpdateContentBlockRequest,
    Customer => crate::dto::customers::UpdateCustomerRequest,
    Order => crate::dto::orders::UpdateOrderRequest,
    Payment => crate::dto::payments::UpdatePaymentRequest,
    Image => crate::dto::images::UpdateImageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_clears() {
        assert_eq!(clearable("  "), None);
        assert_eq!(clearable(" Gift wrap "), Some("Gift wrap".to_string()));
    }
}
