//! Sales order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::OrderStatus;

/// One line of an order, snapshotting the product name and sale price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    /// Product name at the time of sale
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at the time of sale
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A sales order
///
/// `total_amount` is derived from the items and stored redundantly.
/// Delivered orders are the primary revenue source for profit reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    /// Customer name at the time of the order
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Recompute the order total from its items
    pub fn derive_total(items: &[OrderItem]) -> Decimal {
        items.iter().map(OrderItem::line_total).sum()
    }
}
