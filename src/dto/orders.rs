use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Order, OrderItem, OrderStatus},
    validation::{self, MAX_TEXT_LEN, Validate, ValidationErrors},
};

const MAX_LINE_ITEMS: usize = 250;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateOrderRequest {
    pub shop_id: String,
    pub customer_id: Option<String>,
    pub items: Vec<OrderItemInput>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    /// An empty string detaches the customer.
    pub customer_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::id(&mut errors, "shop_id", &self.shop_id);
        if let Some(customer_id) = &self.customer_id {
            validation::id(&mut errors, "customer_id", customer_id);
        }
        if self.items.is_empty() {
            errors.add("items", "must contain at least one item");
        } else if self.items.len() > MAX_LINE_ITEMS {
            errors.add("items", format!("must contain at most {MAX_LINE_ITEMS} items"));
        }
        for (idx, item) in self.items.iter().enumerate() {
            validation::id(&mut errors, &format!("items[{idx}].product_id"), &item.product_id);
            validation::positive(
                &mut errors,
                &format!("items[{idx}].quantity"),
                i64::from(item.quantity),
            );
        }
        validation::optional_text(&mut errors, "note", self.note.as_deref(), MAX_TEXT_LEN);
        errors.into_result()
    }
}

impl Validate for UpdateOrderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::any_field_set(
            &mut errors,
            &[
                self.status.is_some(),
                self.customer_id.is_some(),
                self.note.is_some(),
            ],
        );
        if let Some(customer_id) = self
            .customer_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            validation::id(&mut errors, "customer_id", customer_id);
        }
        validation::optional_text(&mut errors, "note", self.note.as_deref(), MAX_TEXT_LEN);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_items_are_checked_individually() {
        let req = CreateOrderRequest {
            shop_id: "shop1".into(),
            customer_id: None,
            items: vec![
                OrderItemInput {
                    product_id: "p1".into(),
                    quantity: 2,
                },
                OrderItemInput {
                    product_id: "p2".into(),
                    quantity: 0,
                },
            ],
            note: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field("items[0].quantity").is_none());
        assert!(errors.field("items[1].quantity").is_some());
    }

    #[test]
    fn order_needs_items() {
        let req = CreateOrderRequest {
            shop_id: "shop1".into(),
            customer_id: None,
            items: Vec::new(),
            note: None,
        };
        assert!(req.validate().unwrap_err().field("items").is_some());
    }

    #[test]
    fn blank_customer_id_detaches_instead_of_failing() {
        for blank in ["", "   "] {
            let req = UpdateOrderRequest {
                customer_id: Some(blank.into()),
                ..Default::default()
            };
            assert!(req.validate().is_ok(), "{blank:?}");
        }

        let req = UpdateOrderRequest {
            customer_id: Some(" cust1 ".into()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        let req = UpdateOrderRequest {
            customer_id: Some("bad id!".into()),
            ..Default::default()
        };
        assert!(req.validate().unwrap_err().field("customer_id").is_some());
    }
}
