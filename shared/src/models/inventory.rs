//! Stock movement models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{MovementType, SoftRef};

/// An immutable record of one stock movement
///
/// Appended on every import or export; never updated or deleted. The
/// `old_stock`/`new_stock` pair reflects the stock immediately before and
/// after this single movement, so replaying a product's logs in
/// chronological order from any known snapshot reproduces every
/// intermediate stock level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLog {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Product name at the time of the movement
    pub product_name: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub old_stock: i64,
    pub new_stock: i64,
    /// Transaction unit price: acquisition cost for imports, sale price for
    /// manual exports
    pub price: Decimal,
    /// Supplier/customer display name, matched as a soft reference
    pub partner: Option<SoftRef>,
    /// Free-text document reference, matched against order ids in reports
    pub reference_doc: Option<SoftRef>,
    pub note: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
