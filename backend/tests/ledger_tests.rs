//! Stock ledger engine tests
//!
//! Covers the weighted-average cost recomputation, the export stock check,
//! and the old/new stock bookkeeping of planned movement batches.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{MovementType, Product};
use sim_backend::error::AppError;
use sim_backend::services::ledger::{
    plan_movement, weighted_average_cost, MovementContext, MovementItem,
};

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn product(name: &str, stock: i64, import_price: i64, price: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        code: format!("SP-{}", name.chars().take(3).collect::<String>()),
        name: name.to_string(),
        model: None,
        unit: None,
        category: None,
        origin: None,
        description: None,
        image_url: None,
        catalog_url: None,
        price: dec(price),
        import_price: dec(import_price),
        stock,
        batch_no: None,
        expiry_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn item(product: &Product, quantity: i64, unit_price: i64) -> MovementItem {
    MovementItem {
        product_id: product.id,
        quantity,
        unit_price: dec(unit_price),
        new_selling_price: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

/// stock=10 @1000, import 5 @2200 => stock=15, cost=round(21000/15)=1400
#[test]
fn weighted_average_cost_blends_existing_and_incoming() {
    let p = product("Gạo", 10, 1_000, 2_000);
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 5, 2_200)],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();

    let updated = &plan.updated_products[0];
    assert_eq!(updated.stock, 15);
    assert_eq!(updated.import_price, dec(1_400));

    let log = &plan.steps[0].log;
    assert_eq!(log.old_stock, 10);
    assert_eq!(log.new_stock, 15);
    assert_eq!(log.price, dec(2_200));
}

#[test]
fn weighted_average_rounds_half_away_from_zero() {
    // (1*100 + 2*200) / 3 = 166.66... => 167
    assert_eq!(weighted_average_cost(1, dec(100), 2, dec(200)), dec(167));
    // (1*100 + 1*101) / 2 = 100.5 => 101
    assert_eq!(weighted_average_cost(1, dec(100), 1, dec(101)), dec(101));
}

#[test]
fn import_with_zero_price_keeps_cost_basis() {
    let p = product("Dầu ăn", 10, 500, 900);
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 5, 0)],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();

    let updated = &plan.updated_products[0];
    assert_eq!(updated.stock, 15);
    assert_eq!(updated.import_price, dec(500));
}

#[test]
fn import_into_negative_stock_takes_transaction_price() {
    // Stock is expected non-negative but not enforced; when the blended
    // quantity is not positive the cost falls back to the transaction price
    let p = product("Sữa", -5, 300, 600);
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 5, 450)],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();

    assert_eq!(plan.updated_products[0].import_price, dec(450));
}

#[test]
fn import_updates_selling_price_only_when_provided() {
    let p = product("Gạo", 10, 1_000, 2_000);
    let mut with_new_price = item(&p, 5, 1_000);
    with_new_price.new_selling_price = Some(dec(2_500));

    let plan = plan_movement(
        &[p.clone()],
        &[with_new_price],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();
    assert_eq!(plan.updated_products[0].price, dec(2_500));

    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 5, 1_000)],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();
    assert_eq!(plan.updated_products[0].price, dec(2_000));
}

/// Exports change stock but never the cost basis or selling price
#[test]
fn export_never_changes_cost_basis() {
    let p = product("Gạo", 10, 1_000, 2_000);
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 4, 2_000)],
        MovementType::Export,
        &MovementContext::default(),
    )
    .unwrap();

    let updated = &plan.updated_products[0];
    assert_eq!(updated.stock, 6);
    assert_eq!(updated.import_price, dec(1_000));
    assert_eq!(updated.price, dec(2_000));
}

/// Over-stock export rejects the whole batch and enumerates every offender
#[test]
fn export_over_stock_rejects_whole_batch() {
    let a = product("Gạo ST25", 5, 1_000, 2_000);
    let b = product("Dầu ăn", 3, 500, 900);
    let c = product("Sữa tươi", 50, 300, 600);

    let result = plan_movement(
        &[a.clone(), b.clone(), c.clone()],
        &[item(&a, 6, 2_000), item(&c, 10, 600), item(&b, 4, 900)],
        MovementType::Export,
        &MovementContext::default(),
    );

    match result {
        Err(AppError::InsufficientStock { shortfalls }) => {
            assert_eq!(shortfalls.len(), 2);
            assert_eq!(shortfalls[0].product_name, "Gạo ST25");
            assert_eq!(shortfalls[0].requested, 6);
            assert_eq!(shortfalls[0].available, 5);
            assert_eq!(shortfalls[1].product_name, "Dầu ăn");
            assert_eq!(shortfalls[1].requested, 4);
            assert_eq!(shortfalls[1].available, 3);
        }
        other => panic!("expected InsufficientStock, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn export_equal_to_stock_drains_to_zero() {
    let p = product("Gạo", 5, 1_000, 2_000);
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 5, 2_000)],
        MovementType::Export,
        &MovementContext::default(),
    )
    .unwrap();

    assert_eq!(plan.updated_products[0].stock, 0);
}

#[test]
fn zero_quantity_is_a_validation_error() {
    let p = product("Gạo", 5, 1_000, 2_000);
    let result = plan_movement(
        &[p.clone()],
        &[item(&p, 0, 2_000)],
        MovementType::Import,
        &MovementContext::default(),
    );
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn empty_batch_is_a_validation_error() {
    let p = product("Gạo", 5, 1_000, 2_000);
    let result = plan_movement(
        &[p],
        &[],
        MovementType::Import,
        &MovementContext::default(),
    );
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

/// A product repeated within one batch sees the running stock
#[test]
fn repeated_product_accumulates_within_batch() {
    let p = product("Gạo", 10, 1_000, 2_000);
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 3, 0), item(&p, 4, 0)],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();

    assert_eq!(plan.updated_products.len(), 1);
    assert_eq!(plan.updated_products[0].stock, 17);
    assert_eq!(plan.steps[0].log.old_stock, 10);
    assert_eq!(plan.steps[0].log.new_stock, 13);
    assert_eq!(plan.steps[1].log.old_stock, 13);
    assert_eq!(plan.steps[1].log.new_stock, 17);
}

/// The rollback snapshot carries pre-movement values, not diffs
#[test]
fn rollback_snapshot_holds_pre_movement_state() {
    let p = product("Gạo", 10, 1_000, 2_000);
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 5, 2_200)],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();

    assert_eq!(plan.rollback.previous_products.len(), 1);
    let snapshot = &plan.rollback.previous_products[0];
    assert_eq!(snapshot.stock, 10);
    assert_eq!(snapshot.import_price, dec(1_000));
    assert_eq!(plan.rollback.log_ids, vec![plan.steps[0].log.id]);
}

/// End-to-end: import then export, per the console's main flow
#[test]
fn import_then_export_scenario() {
    let p = product("Gạo", 100, 0, 5_000);

    // Import 100 units at 3000: cost = round((100*0 + 100*3000)/200) = 1500
    let plan = plan_movement(
        &[p.clone()],
        &[item(&p, 100, 3_000)],
        MovementType::Import,
        &MovementContext::default(),
    )
    .unwrap();
    let after_import = plan.updated_products[0].clone();
    assert_eq!(after_import.stock, 200);
    assert_eq!(after_import.import_price, dec(1_500));

    // Export 50 units at 5000: stock drops, cost basis untouched
    let plan = plan_movement(
        &[after_import.clone()],
        &[item(&after_import, 50, 5_000)],
        MovementType::Export,
        &MovementContext::default(),
    )
    .unwrap();
    let after_export = &plan.updated_products[0];
    assert_eq!(after_export.stock, 150);
    assert_eq!(after_export.import_price, dec(1_500));

    let log = &plan.steps[0].log;
    assert_eq!(log.old_stock, 200);
    assert_eq!(log.new_stock, 150);
    assert_eq!(log.price, dec(5_000));
    assert_eq!(log.movement_type, MovementType::Export);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Export leaves the cost basis bit-identical and floors stock at zero
    #[test]
    fn prop_export_preserves_cost_basis(
        stock in 0i64..=10_000,
        cost in 0i64..=1_000_000,
        price in 0i64..=1_000_000,
        quantity in 1i64..=10_000,
    ) {
        let p = product("Hàng", stock, cost, price);
        let result = plan_movement(
            &[p.clone()],
            &[item(&p, quantity, price)],
            MovementType::Export,
            &MovementContext::default(),
        );

        if quantity > stock {
            prop_assert!(matches!(result, Err(AppError::InsufficientStock { .. })), "expected InsufficientStock error");
        } else {
            let plan = result.unwrap();
            let updated = &plan.updated_products[0];
            prop_assert_eq!(updated.import_price, dec(cost));
            prop_assert_eq!(updated.price, dec(price));
            prop_assert_eq!(updated.stock, stock - quantity);
            prop_assert!(updated.stock >= 0);
        }
    }

    /// The blended cost lands between the old cost and the incoming price
    #[test]
    fn prop_weighted_average_is_bounded(
        stock in 1i64..=10_000,
        cost in 1i64..=1_000_000,
        quantity in 1i64..=10_000,
        price in 1i64..=1_000_000,
    ) {
        let avg = weighted_average_cost(stock, dec(cost), quantity, dec(price));
        let lo = dec(cost.min(price));
        let hi = dec(cost.max(price));
        prop_assert!(avg >= lo && avg <= hi);
    }

    /// Every log's old/new pair chains: replaying the batch in order from the
    /// starting stock reproduces each intermediate level exactly
    #[test]
    fn prop_logs_replay_exactly(
        start in 0i64..=1_000,
        quantities in prop::collection::vec(1i64..=50, 1..8),
    ) {
        let p = product("Hàng", start, 100, 200);
        let items: Vec<MovementItem> =
            quantities.iter().map(|q| item(&p, *q, 100)).collect();
        let plan = plan_movement(
            &[p],
            &items,
            MovementType::Import,
            &MovementContext::default(),
        ).unwrap();

        let mut replayed = start;
        for step in &plan.steps {
            prop_assert_eq!(step.log.old_stock, replayed);
            replayed += step.log.quantity;
            prop_assert_eq!(step.log.new_stock, replayed);
            prop_assert_eq!(step.product_after.stock, replayed);
        }
        prop_assert_eq!(plan.updated_products[0].stock, replayed);
    }

    /// Import always raises stock by exactly the batch quantity
    #[test]
    fn prop_import_adds_quantity(
        stock in 0i64..=10_000,
        quantity in 1i64..=10_000,
        price in 0i64..=1_000_000,
    ) {
        let p = product("Hàng", stock, 500, 900);
        let plan = plan_movement(
            &[p.clone()],
            &[item(&p, quantity, price)],
            MovementType::Import,
            &MovementContext::default(),
        ).unwrap();
        prop_assert_eq!(plan.updated_products[0].stock, stock + quantity);
    }
}
