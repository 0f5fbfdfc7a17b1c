//! Stock ledger engine
//!
//! Pure planning of a batch of stock movements: given the current products
//! and a list of cart-style line items, produce the post-movement product
//! values and the log entries to append, plus the explicit compensating
//! snapshot used for rollback. No I/O happens here; the two-phase apply
//! lives in the inventory service.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use shared::{InventoryLog, MovementType, Product, SoftRef};

use crate::error::{AppError, AppResult, StockShortfall};

/// One line of a movement batch
#[derive(Debug, Clone)]
pub struct MovementItem {
    pub product_id: Uuid,
    pub quantity: i64,
    /// Transaction unit price: acquisition cost for imports, sale price for
    /// exports
    pub unit_price: Decimal,
    /// New selling price to set alongside an import; ignored for exports
    pub new_selling_price: Option<Decimal>,
}

/// Batch-level fields shared by every line
#[derive(Debug, Clone, Default)]
pub struct MovementContext {
    pub partner: Option<SoftRef>,
    pub reference_doc: Option<SoftRef>,
    pub note: Option<String>,
    /// Defaults to now when not supplied
    pub transaction_date: Option<DateTime<Utc>>,
}

/// One planned movement: the log to append and the product value as of the
/// moment this item has been applied. Persisting steps in order keeps the
/// stored product consistent with each log's old/new stock pair.
#[derive(Debug, Clone)]
pub struct MovementStep {
    pub product_after: Product,
    pub log: InventoryLog,
}

/// The computed outcome of a movement batch
#[derive(Debug, Clone)]
pub struct MovementPlan {
    /// Post-movement product values, one entry per touched product
    pub updated_products: Vec<Product>,
    /// One step per item, in item order
    pub steps: Vec<MovementStep>,
    /// Exact compensating snapshot for rollback
    pub rollback: RollbackPlan,
}

impl MovementPlan {
    /// The new logs in item order
    pub fn logs(&self) -> Vec<InventoryLog> {
        self.steps.iter().map(|s| s.log.clone()).collect()
    }
}

/// Pre-movement state kept as explicit values so rollback never has to be
/// re-derived by diffing
#[derive(Debug, Clone)]
pub struct RollbackPlan {
    /// Pre-movement copies of every touched product
    pub previous_products: Vec<Product>,
    /// Ids of the logs the plan introduces
    pub log_ids: Vec<Uuid>,
}

/// Weighted-average import cost after receiving `quantity` units at
/// `unit_price` on top of `old_stock` units carried at `old_cost`.
///
/// Rounded half away from zero to whole currency units (prices are VND).
pub fn weighted_average_cost(
    old_stock: i64,
    old_cost: Decimal,
    quantity: i64,
    unit_price: Decimal,
) -> Decimal {
    let new_stock = old_stock + quantity;
    if new_stock <= 0 {
        return unit_price;
    }
    let blended = (Decimal::from(old_stock) * old_cost + Decimal::from(quantity) * unit_price)
        / Decimal::from(new_stock);
    blended.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Plan a batch of movements against the given products
///
/// Items are applied in list order against running state, so a product that
/// appears twice in one batch accumulates and every log's old/new stock pair
/// stays replayable. Validation covers the whole batch before anything is
/// computed: an export exceeding available stock rejects the batch with
/// every offending product enumerated, and no partial plan is produced.
pub fn plan_movement(
    products: &[Product],
    items: &[MovementItem],
    movement_type: MovementType,
    ctx: &MovementContext,
) -> AppResult<MovementPlan> {
    if items.is_empty() {
        return Err(AppError::Validation {
            field: "items".to_string(),
            message: "Movement must contain at least one item".to_string(),
            message_vi: "Phiếu kho phải có ít nhất một dòng".to_string(),
        });
    }

    // Field validation and batch-wide stock check before any mutation
    let mut working: Vec<Product> = Vec::new();
    let mut shortfalls: Vec<StockShortfall> = Vec::new();
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be positive".to_string(),
                message_vi: "Số lượng phải lớn hơn 0".to_string(),
            });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "unit_price".to_string(),
                message: "Unit price cannot be negative".to_string(),
                message_vi: "Đơn giá không được âm".to_string(),
            });
        }

        let current = working
            .iter()
            .find(|p| p.id == item.product_id)
            .or_else(|| products.iter().find(|p| p.id == item.product_id))
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if movement_type == MovementType::Export && item.quantity > current.stock {
            shortfalls.push(StockShortfall {
                product_name: current.name.clone(),
                requested: item.quantity,
                available: current.stock,
            });
            continue;
        }

        // Track running stock so later items in the batch see earlier ones
        let mut next = current.clone();
        next.stock = match movement_type {
            MovementType::Import => next.stock + item.quantity,
            MovementType::Export => (next.stock - item.quantity).max(0),
        };
        working.retain(|p| p.id != item.product_id);
        working.push(next);
    }

    if !shortfalls.is_empty() {
        return Err(AppError::InsufficientStock { shortfalls });
    }

    // Apply for real: fold items over cloned product state
    let now = Utc::now();
    let transaction_date = ctx.transaction_date.unwrap_or(now);

    let mut updated: Vec<Product> = Vec::new();
    let mut previous: Vec<Product> = Vec::new();
    let mut steps: Vec<MovementStep> = Vec::new();

    for item in items {
        let current = updated
            .iter()
            .find(|p| p.id == item.product_id)
            .or_else(|| products.iter().find(|p| p.id == item.product_id))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if !previous.iter().any(|p| p.id == current.id) {
            // First touch of this product in the batch: snapshot it
            let original = products
                .iter()
                .find(|p| p.id == item.product_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
            previous.push(original);
        }

        let old_stock = current.stock;
        let mut next = current;
        match movement_type {
            MovementType::Import => {
                next.stock = old_stock + item.quantity;
                if item.unit_price > Decimal::ZERO {
                    next.import_price = weighted_average_cost(
                        old_stock,
                        next.import_price,
                        item.quantity,
                        item.unit_price,
                    );
                }
                if let Some(selling) = item.new_selling_price {
                    next.price = selling;
                }
            }
            MovementType::Export => {
                next.stock = (old_stock - item.quantity).max(0);
            }
        }
        next.updated_at = now;

        let log = InventoryLog {
            id: Uuid::new_v4(),
            product_id: next.id,
            product_name: next.name.clone(),
            movement_type,
            quantity: item.quantity,
            old_stock,
            new_stock: next.stock,
            price: item.unit_price,
            partner: ctx.partner.clone(),
            reference_doc: ctx.reference_doc.clone(),
            note: ctx.note.clone(),
            transaction_date,
            created_at: now,
        };

        updated.retain(|p| p.id != next.id);
        updated.push(next.clone());
        steps.push(MovementStep {
            product_after: next,
            log,
        });
    }

    let log_ids = steps.iter().map(|s| s.log.id).collect();
    Ok(MovementPlan {
        updated_products: updated,
        steps,
        rollback: RollbackPlan {
            previous_products: previous,
            log_ids,
        },
    })
}
