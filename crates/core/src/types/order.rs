//! Orders submitted to and listed from the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{CartItem, subtotal};
use super::email::Email;
use super::id::{OrderId, ProductId};
use super::price::{Price, PriceError};
use super::status::OrderStatus;

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_email: Email,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Build a pending order from the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the order total does not fit.
    pub fn from_cart(
        user_email: Email,
        items: &[CartItem],
        created_at: DateTime<Utc>,
    ) -> Result<Self, PriceError> {
        Ok(Self {
            user_email,
            status: OrderStatus::Pending,
            items: items.iter().map(OrderLine::from).collect(),
            total: subtotal(items)?,
            created_at,
        })
    }
}

/// An order record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user_email: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn item(id: i64, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::Number(id),
            name: format!("Item {id}"),
            image: String::new(),
            description: None,
            price: Price::from_cents(cents).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_from_cart() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let email = Email::parse("shopper@example.com").unwrap();
        let order = NewOrder::from_cart(email, &[item(1, 999, 2), item(2, 500, 1)], now).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_id, ProductId::Number(1));
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.total, Price::from_cents(2498).unwrap());
    }

    #[test]
    fn test_wire_shape() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let email = Email::parse("shopper@example.com").unwrap();
        let order = NewOrder::from_cart(email, &[item(1, 250, 2)], now).unwrap();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["userEmail"], "shopper@example.com");
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["items"][0]["productId"], 1);
        assert_eq!(json["total"], 5.0);
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_parse_backend_order() {
        let json = r#"{
            "id": "ord-1",
            "userEmail": "shopper@example.com",
            "status": "Shipped",
            "items": [{"productId": 4, "name": "Lamp", "quantity": 1, "price": 24.5}],
            "total": 24.5,
            "createdAt": "2024-05-01T12:00:00.000Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId::from("ord-1"));
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total, Price::from_cents(2450).unwrap());
    }
}
