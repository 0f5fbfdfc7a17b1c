//! Supplier debt and soft-reference matching tests

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{Customer, InventoryLog, MovementType, SoftRef, Supplier};
use sim_backend::config::{AssistantConfig, Config, DatabaseConfig, JwtConfig, ServerConfig};
use sim_backend::error::AppError;
use sim_backend::gateway::Gateway;
use sim_backend::services::customers::CustomerService;
use sim_backend::services::suppliers::{AdjustDebtInput, PayDebtInput, SupplierService};
use sim_backend::state::{AppData, AppState};

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        },
        assistant: AssistantConfig {
            api_endpoint: None,
            api_key: None,
            model: "test".to_string(),
        },
    }
}

fn supplier(name: &str, debt: i64) -> Supplier {
    let now = Utc::now();
    Supplier {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: None,
        email: None,
        address: None,
        note: None,
        debt: dec(debt),
        total_purchases: Decimal::ZERO,
        created_at: now,
        updated_at: now,
    }
}

fn movement_with_partner(partner: &str) -> InventoryLog {
    let now = Utc::now();
    InventoryLog {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        product_name: "Gạo ST25".to_string(),
        movement_type: MovementType::Import,
        quantity: 10,
        old_stock: 0,
        new_stock: 10,
        price: dec(1_000),
        partner: Some(SoftRef::new(partner.to_string())),
        reference_doc: None,
        note: None,
        transaction_date: now,
        created_at: now,
    }
}

fn test_state(data: AppData) -> AppState {
    AppState::new(data, Gateway::demo(), test_config())
}

// ============================================================================
// Debt Payments
// ============================================================================

#[tokio::test]
async fn payment_reduces_debt() {
    let s = supplier("Công ty Thành Đạt", 5_000_000);
    let state = test_state(AppData {
        suppliers: vec![s.clone()],
        ..Default::default()
    });
    let service = SupplierService::new(state);

    let updated = service
        .pay_debt(s.id, PayDebtInput {
            amount: dec(2_000_000),
        })
        .await
        .unwrap();
    assert_eq!(updated.debt, dec(3_000_000));
}

#[tokio::test]
async fn payment_must_be_positive() {
    let s = supplier("Công ty Thành Đạt", 5_000_000);
    let state = test_state(AppData {
        suppliers: vec![s.clone()],
        ..Default::default()
    });
    let service = SupplierService::new(state.clone());

    for amount in [dec(0), dec(-100)] {
        let result = service.pay_debt(s.id, PayDebtInput { amount }).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    // Debt untouched after rejected payments
    let data = state.data.read().await;
    assert_eq!(data.suppliers[0].debt, dec(5_000_000));
}

#[tokio::test]
async fn payment_cannot_exceed_debt() {
    let s = supplier("Công ty Thành Đạt", 1_000_000);
    let state = test_state(AppData {
        suppliers: vec![s.clone()],
        ..Default::default()
    });
    let service = SupplierService::new(state);

    let result = service
        .pay_debt(s.id, PayDebtInput {
            amount: dec(1_000_001),
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn manual_adjustment_sets_debt_and_purchases() {
    let s = supplier("Đại lý Hòa Bình", 0);
    let state = test_state(AppData {
        suppliers: vec![s.clone()],
        ..Default::default()
    });
    let service = SupplierService::new(state);

    let updated = service
        .adjust_debt(s.id, AdjustDebtInput {
            debt: Some(dec(750_000)),
            total_purchases: Some(dec(12_000_000)),
        })
        .await
        .unwrap();
    assert_eq!(updated.debt, dec(750_000));
    assert_eq!(updated.total_purchases, dec(12_000_000));
}

// ============================================================================
// Soft-Reference Movement History
// ============================================================================

/// Partner labels match display names exactly, case-sensitively
#[tokio::test]
async fn movement_history_matches_partner_label_exactly() {
    let s = supplier("Công ty Thành Đạt", 0);
    let state = test_state(AppData {
        suppliers: vec![s.clone()],
        inventory_logs: vec![
            movement_with_partner("Công ty Thành Đạt"),
            movement_with_partner("công ty thành đạt"),
            movement_with_partner("Công ty Thành Đạt "),
            movement_with_partner("Đại lý Hòa Bình"),
        ],
        ..Default::default()
    });
    let service = SupplierService::new(state);

    let movements = service.movements(s.id).await.unwrap();
    // Only the byte-identical label matches; case and whitespace variants
    // are different labels
    assert_eq!(movements.len(), 1);
    assert_eq!(
        movements[0].partner.as_ref().unwrap().as_str(),
        "Công ty Thành Đạt"
    );
}

#[tokio::test]
async fn customer_history_uses_the_same_label_matching() {
    let now = Utc::now();
    let kh = Customer {
        id: Uuid::new_v4(),
        name: "Chị Lan".to_string(),
        phone: None,
        email: None,
        address: None,
        note: None,
        created_at: now,
        updated_at: now,
    };
    let state = test_state(AppData {
        customers: vec![kh.clone()],
        inventory_logs: vec![
            movement_with_partner("Chị Lan"),
            movement_with_partner("Chị Lan Anh"),
        ],
        ..Default::default()
    });
    let service = CustomerService::new(state);

    let movements = service.movements(kh.id).await.unwrap();
    assert_eq!(movements.len(), 1);
}

#[test]
fn soft_ref_matches_ids_by_string_equality() {
    let id = Uuid::new_v4();
    let matching = SoftRef::new(id.to_string());
    let other = SoftRef::new(Uuid::new_v4().to_string());
    let free_text = SoftRef::new("PX-2024-031");

    assert!(matching.matches_id(&id));
    assert!(!other.matches_id(&id));
    assert!(!free_text.matches_id(&id));
    assert!(free_text.matches_label("PX-2024-031"));
    assert!(!free_text.matches_label("px-2024-031"));
}
