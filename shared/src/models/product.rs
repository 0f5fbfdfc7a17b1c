//! Product catalog models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in the catalog
///
/// `price` is the current selling price; `import_price` is the
/// weighted-average acquisition cost, recomputed on every import movement.
/// `stock` is the current on-hand quantity (expected non-negative, not
/// enforced at the type level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub model: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub origin: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub catalog_url: Option<String>,
    /// Current selling price
    pub price: Decimal,
    /// Weighted-average import cost
    pub import_price: Decimal,
    pub stock: i64,
    pub batch_no: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Value of on-hand stock at acquisition cost
    pub fn import_value(&self) -> Decimal {
        Decimal::from(self.stock) * self.import_price
    }

    /// Value of on-hand stock at the current selling price
    pub fn selling_value(&self) -> Decimal {
        Decimal::from(self.stock) * self.price
    }
}
