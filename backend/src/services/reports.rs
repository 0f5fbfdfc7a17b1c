//! Reporting service
//!
//! Three read-only views derived from products, inventory logs, and orders:
//! inventory valuation, period movement (opening/import/export/closing), and
//! realized sales profit. All aggregation is pure and recomputed in full on
//! every request; expected data volumes are small.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use shared::{InventoryLog, MovementType, Order, OrderStatus, Product, SortDirection};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Name rendered for order lines and logs whose product no longer exists
const DELETED_PRODUCT_NAME: &str = "Sản phẩm đã xóa";

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    state: AppState,
}

/// Report filter parameters
///
/// Dates default to a wide-open window; `search` is a case-insensitive
/// substring match on product name and code; `sort_by` names a numeric
/// column of the view.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    /// Response format: "csv" for an export, JSON otherwise
    pub format: Option<String>,
}

/// Valuation summary row
#[derive(Debug, Clone, Serialize)]
pub struct ValuationRow {
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub stock: i64,
    pub import_price: Decimal,
    pub price: Decimal,
    pub import_value: Decimal,
    pub selling_value: Decimal,
    pub potential_profit: Decimal,
}

/// Valuation summary footer totals
#[derive(Debug, Clone, Serialize)]
pub struct ValuationTotals {
    pub import_value: Decimal,
    pub selling_value: Decimal,
    pub potential_profit: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ValuationReport {
    pub rows: Vec<ValuationRow>,
    pub totals: ValuationTotals,
}

/// Period movement (opening/import/export/closing) row for one product
#[derive(Debug, Clone, Serialize)]
pub struct PeriodMovementRow {
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub unit: Option<String>,
    pub opening_stock: i64,
    pub import_quantity: i64,
    pub import_value: Decimal,
    pub export_quantity: i64,
    pub export_value: Decimal,
    pub closing_stock: i64,
}

/// Period movement footer totals
#[derive(Debug, Clone, Serialize)]
pub struct PeriodMovementTotals {
    pub opening_stock: i64,
    pub import_quantity: i64,
    pub import_value: Decimal,
    pub export_quantity: i64,
    pub export_value: Decimal,
    pub closing_stock: i64,
}

#[derive(Debug, Serialize)]
pub struct PeriodMovementReport {
    pub rows: Vec<PeriodMovementRow>,
    pub totals: PeriodMovementTotals,
}

/// Realized sales profit row for one product
#[derive(Debug, Clone, Serialize)]
pub struct SalesProfitRow {
    pub product_id: Uuid,
    pub code: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub revenue: Decimal,
    pub cogs: Decimal,
    pub profit: Decimal,
    /// profit / revenue, 0 when revenue is 0
    pub margin: Decimal,
}

/// Sales profit footer totals
#[derive(Debug, Clone, Serialize)]
pub struct SalesProfitTotals {
    pub quantity: i64,
    pub revenue: Decimal,
    pub cogs: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SalesProfitReport {
    pub rows: Vec<SalesProfitRow>,
    pub totals: SalesProfitTotals,
}

// ============================================================================
// Pure aggregators
// ============================================================================

/// Inclusive UTC bounds for a date window: start at 00:00:00, end at 23:59:59
pub fn range_bounds(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_dt = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap());
    let end_dt = Utc.from_utc_datetime(&end.and_hms_opt(23, 59, 59).unwrap());
    (start_dt, end_dt)
}

fn matches_search(search: Option<&str>, name: &str, code: &str) -> bool {
    match search {
        Some(s) if !s.is_empty() => {
            let needle = s.to_lowercase();
            name.to_lowercase().contains(&needle) || code.to_lowercase().contains(&needle)
        }
        _ => true,
    }
}

fn apply_direction(ordering: std::cmp::Ordering, dir: SortDirection) -> std::cmp::Ordering {
    match dir {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Valuation summary over the current product set
pub fn valuation_summary(products: &[Product], query: &ReportQuery) -> ValuationReport {
    let mut rows: Vec<ValuationRow> = products
        .iter()
        .filter(|p| matches_search(query.search.as_deref(), &p.name, &p.code))
        .map(|p| {
            let import_value = p.import_value();
            let selling_value = p.selling_value();
            ValuationRow {
                product_id: p.id,
                code: p.code.clone(),
                name: p.name.clone(),
                stock: p.stock,
                import_price: p.import_price,
                price: p.price,
                import_value,
                selling_value,
                potential_profit: selling_value - import_value,
            }
        })
        .collect();

    if let Some(key) = query.sort_by.as_deref() {
        let dir = query.sort_dir.unwrap_or_default();
        // Stable sort: ties keep their prior relative order
        rows.sort_by(|a, b| {
            let ordering = match key {
                "stock" => a.stock.cmp(&b.stock),
                "import_price" => a.import_price.cmp(&b.import_price),
                "price" => a.price.cmp(&b.price),
                "selling_value" => a.selling_value.cmp(&b.selling_value),
                "potential_profit" => a.potential_profit.cmp(&b.potential_profit),
                _ => a.import_value.cmp(&b.import_value),
            };
            apply_direction(ordering, dir)
        });
    }

    let totals = ValuationTotals {
        import_value: rows.iter().map(|r| r.import_value).sum(),
        selling_value: rows.iter().map(|r| r.selling_value).sum(),
        potential_profit: rows.iter().map(|r| r.potential_profit).sum(),
    };

    ValuationReport { rows, totals }
}

/// Period movement for one product
///
/// Closing stock is derived by reverse-replaying every log dated strictly
/// after the range end from the current stock: undo post-range imports by
/// subtracting their quantity, undo post-range exports by adding theirs
/// back. Opening stock then follows from closing − import + export within
/// the range. Import value uses the actual logged transaction prices;
/// export value uses the product's current import cost.
pub fn period_movement_for_product(
    product: &Product,
    logs: &[InventoryLog],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> PeriodMovementRow {
    let mut import_quantity = 0i64;
    let mut export_quantity = 0i64;
    let mut import_value = Decimal::ZERO;
    let mut post_net = 0i64;

    for log in logs.iter().filter(|l| l.product_id == product.id) {
        if log.transaction_date > end {
            match log.movement_type {
                MovementType::Import => post_net += log.quantity,
                MovementType::Export => post_net -= log.quantity,
            }
        } else if log.transaction_date >= start {
            match log.movement_type {
                MovementType::Import => {
                    import_quantity += log.quantity;
                    import_value += Decimal::from(log.quantity) * log.price;
                }
                MovementType::Export => {
                    export_quantity += log.quantity;
                }
            }
        }
    }

    let closing_stock = product.stock - post_net;
    let opening_stock = closing_stock - import_quantity + export_quantity;
    let export_value = Decimal::from(export_quantity) * product.import_price;

    PeriodMovementRow {
        product_id: product.id,
        code: product.code.clone(),
        name: product.name.clone(),
        unit: product.unit.clone(),
        opening_stock,
        import_quantity,
        import_value,
        export_quantity,
        export_value,
        closing_stock,
    }
}

/// Period movement report over the filtered product set
pub fn period_movement(
    products: &[Product],
    logs: &[InventoryLog],
    query: &ReportQuery,
) -> PeriodMovementReport {
    let start = query
        .start_date
        .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    let end = query
        .end_date
        .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());
    let (start_dt, end_dt) = range_bounds(start, end);

    let mut rows: Vec<PeriodMovementRow> = products
        .iter()
        .filter(|p| matches_search(query.search.as_deref(), &p.name, &p.code))
        .map(|p| period_movement_for_product(p, logs, start_dt, end_dt))
        .collect();

    if let Some(key) = query.sort_by.as_deref() {
        let dir = query.sort_dir.unwrap_or_default();
        rows.sort_by(|a, b| {
            let ordering = match key {
                "opening_stock" => a.opening_stock.cmp(&b.opening_stock),
                "import_quantity" => a.import_quantity.cmp(&b.import_quantity),
                "import_value" => a.import_value.cmp(&b.import_value),
                "export_quantity" => a.export_quantity.cmp(&b.export_quantity),
                "export_value" => a.export_value.cmp(&b.export_value),
                _ => a.closing_stock.cmp(&b.closing_stock),
            };
            apply_direction(ordering, dir)
        });
    }

    let totals = PeriodMovementTotals {
        opening_stock: rows.iter().map(|r| r.opening_stock).sum(),
        import_quantity: rows.iter().map(|r| r.import_quantity).sum(),
        import_value: rows.iter().map(|r| r.import_value).sum(),
        export_quantity: rows.iter().map(|r| r.export_quantity).sum(),
        export_value: rows.iter().map(|r| r.export_value).sum(),
        closing_stock: rows.iter().map(|r| r.closing_stock).sum(),
    };

    PeriodMovementReport { rows, totals }
}

/// Realized sales profit over a date window
///
/// Revenue comes from two disjoint sources: delivered orders dated in range,
/// exploded into their line items, and export logs dated in range whose
/// reference document does not match the id of an order already counted.
/// Cost of goods sold uses the product's current import cost in both cases.
pub fn sales_profit(
    products: &[Product],
    logs: &[InventoryLog],
    orders: &[Order],
    query: &ReportQuery,
) -> SalesProfitReport {
    let start = query
        .start_date
        .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    let end = query
        .end_date
        .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());
    let (start_dt, end_dt) = range_bounds(start, end);

    let mut rows: Vec<SalesProfitRow> = Vec::new();
    let mut counted_orders: HashSet<String> = HashSet::new();

    let accumulate =
        |rows: &mut Vec<SalesProfitRow>, product_id: Uuid, fallback_name: &str, quantity: i64, revenue: Decimal| {
            let product = products.iter().find(|p| p.id == product_id);
            let cogs = product
                .map(|p| p.import_price * Decimal::from(quantity))
                .unwrap_or(Decimal::ZERO);
            let name = product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| {
                    if fallback_name.is_empty() {
                        DELETED_PRODUCT_NAME.to_string()
                    } else {
                        fallback_name.to_string()
                    }
                });

            if let Some(row) = rows.iter_mut().find(|r| r.product_id == product_id) {
                row.quantity += quantity;
                row.revenue += revenue;
                row.cogs += cogs;
            } else {
                rows.push(SalesProfitRow {
                    product_id,
                    code: product.map(|p| p.code.clone()),
                    name,
                    quantity,
                    revenue,
                    cogs,
                    profit: Decimal::ZERO,
                    margin: Decimal::ZERO,
                });
            }
        };

    // Source (a): delivered orders in range
    for order in orders.iter().filter(|o| {
        o.status == OrderStatus::Delivered && o.date >= start_dt && o.date <= end_dt
    }) {
        counted_orders.insert(order.id.to_string());
        for item in &order.items {
            let revenue = item.price * Decimal::from(item.quantity);
            accumulate(
                &mut rows,
                item.product_id,
                &item.product_name,
                item.quantity,
                revenue,
            );
        }
    }

    // Source (b): export logs in range not referencing a counted order
    for log in logs.iter().filter(|l| {
        l.movement_type == MovementType::Export
            && l.transaction_date >= start_dt
            && l.transaction_date <= end_dt
    }) {
        let already_counted = log
            .reference_doc
            .as_ref()
            .map(|r| counted_orders.contains(r.as_str()))
            .unwrap_or(false);
        if already_counted {
            continue;
        }
        let revenue = log.price * Decimal::from(log.quantity);
        accumulate(&mut rows, log.product_id, &log.product_name, log.quantity, revenue);
    }

    for row in &mut rows {
        row.profit = row.revenue - row.cogs;
        row.margin = if row.revenue.is_zero() {
            Decimal::ZERO
        } else {
            row.profit / row.revenue
        };
    }

    rows.retain(|r| {
        matches_search(
            query.search.as_deref(),
            &r.name,
            r.code.as_deref().unwrap_or(""),
        )
    });

    if let Some(key) = query.sort_by.as_deref() {
        let dir = query.sort_dir.unwrap_or_default();
        rows.sort_by(|a, b| {
            let ordering = match key {
                "quantity" => a.quantity.cmp(&b.quantity),
                "cogs" => a.cogs.cmp(&b.cogs),
                "profit" => a.profit.cmp(&b.profit),
                "margin" => a.margin.cmp(&b.margin),
                _ => a.revenue.cmp(&b.revenue),
            };
            apply_direction(ordering, dir)
        });
    }

    let totals = SalesProfitTotals {
        quantity: rows.iter().map(|r| r.quantity).sum(),
        revenue: rows.iter().map(|r| r.revenue).sum(),
        cogs: rows.iter().map(|r| r.cogs).sum(),
        profit: rows.iter().map(|r| r.profit).sum(),
    };

    SalesProfitReport { rows, totals }
}

// ============================================================================
// Service
// ============================================================================

impl ReportService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Inventory valuation summary
    pub async fn valuation(&self, query: &ReportQuery) -> ValuationReport {
        let data = self.state.data.read().await;
        valuation_summary(&data.products, query)
    }

    /// Opening/import/export/closing movement report for a date window
    pub async fn period_movement(&self, query: &ReportQuery) -> PeriodMovementReport {
        let data = self.state.data.read().await;
        period_movement(&data.products, &data.inventory_logs, query)
    }

    /// Realized sales profit for a date window
    pub async fn sales_profit(&self, query: &ReportQuery) -> SalesProfitReport {
        let data = self.state.data.read().await;
        sales_profit(&data.products, &data.inventory_logs, &data.orders, query)
    }

    /// Export report rows as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
