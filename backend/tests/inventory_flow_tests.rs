//! Inventory service flow tests
//!
//! Exercises the two-phase apply through the service: optimistic state
//! mutation, log ordering, and the no-partial-effects guarantee on
//! validation failure.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{MovementType, Product};
use sim_backend::config::{AssistantConfig, Config, DatabaseConfig, JwtConfig, ServerConfig};
use sim_backend::error::AppError;
use sim_backend::gateway::Gateway;
use sim_backend::services::inventory::{
    InventoryService, MovementItemInput, RecordMovementInput,
};
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

fn product(code: &str, name: &str, stock: i64, import_price: i64, price: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        code: code.to_string(),
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

fn test_state(data: AppData) -> AppState {
    AppState::new(data, Gateway::demo(), test_config())
}

fn import_input(items: Vec<MovementItemInput>, partner: &str) -> RecordMovementInput {
    RecordMovementInput {
        movement_type: MovementType::Import,
        items,
        partner: Some(partner.to_string()),
        reference_doc: None,
        note: None,
        transaction_date: None,
    }
}

#[tokio::test]
async fn movement_updates_state_and_prepends_logs() {
    let a = product("SP-001", "Gạo ST25", 10, 1_000, 1_500);
    let b = product("SP-002", "Dầu ăn", 20, 500, 800);
    let state = test_state(AppData {
        products: vec![a.clone(), b.clone()],
        ..Default::default()
    });
    let service = InventoryService::new(state.clone());

    let response = service
        .record_movement(import_input(
            vec![
                MovementItemInput {
                    product_id: a.id,
                    quantity: 5,
                    unit_price: dec(2_200),
                    new_selling_price: None,
                },
                MovementItemInput {
                    product_id: b.id,
                    quantity: 10,
                    unit_price: dec(600),
                    new_selling_price: Some(dec(900)),
                },
            ],
            "Công ty Thành Đạt",
        ))
        .await
        .unwrap();

    assert_eq!(response.updated_products.len(), 2);
    assert_eq!(response.logs.len(), 2);

    let data = state.data.read().await;
    let a_now = data.product(a.id).unwrap();
    assert_eq!(a_now.stock, 15);
    assert_eq!(a_now.import_price, dec(1_400));

    let b_now = data.product(b.id).unwrap();
    assert_eq!(b_now.stock, 30);
    assert_eq!(b_now.price, dec(900));

    // Most-recent-first: this batch's logs sit at the front, in item order
    assert_eq!(data.inventory_logs.len(), 2);
    assert_eq!(data.inventory_logs[0].product_id, a.id);
    assert_eq!(data.inventory_logs[1].product_id, b.id);
    assert_eq!(
        data.inventory_logs[0].partner.as_ref().unwrap().as_str(),
        "Công ty Thành Đạt"
    );
}

#[tokio::test]
async fn rejected_export_leaves_no_trace() {
    let a = product("SP-001", "Gạo ST25", 5, 1_000, 1_500);
    let b = product("SP-002", "Dầu ăn", 20, 500, 800);
    let state = test_state(AppData {
        products: vec![a.clone(), b.clone()],
        ..Default::default()
    });
    let service = InventoryService::new(state.clone());

    let result = service
        .record_movement(RecordMovementInput {
            movement_type: MovementType::Export,
            items: vec![
                MovementItemInput {
                    product_id: b.id,
                    quantity: 3,
                    unit_price: dec(800),
                    new_selling_price: None,
                },
                MovementItemInput {
                    product_id: a.id,
                    quantity: 6,
                    unit_price: dec(1_500),
                    new_selling_price: None,
                },
            ],
            partner: None,
            reference_doc: None,
            note: None,
            transaction_date: None,
        })
        .await;

    match result {
        Err(AppError::InsufficientStock { shortfalls }) => {
            assert_eq!(shortfalls.len(), 1);
            assert_eq!(shortfalls[0].product_name, "Gạo ST25");
            assert_eq!(shortfalls[0].requested, 6);
            assert_eq!(shortfalls[0].available, 5);
        }
        other => panic!("expected InsufficientStock, got {:?}", other.map(|_| ())),
    }

    // The whole batch was rejected before mutation: the valid item did not
    // go through either
    let data = state.data.read().await;
    assert_eq!(data.product(a.id).unwrap().stock, 5);
    assert_eq!(data.product(b.id).unwrap().stock, 20);
    assert!(data.inventory_logs.is_empty());
}

#[tokio::test]
async fn consecutive_batches_chain_old_and_new_stock() {
    let a = product("SP-001", "Gạo ST25", 100, 0, 5_000);
    let state = test_state(AppData {
        products: vec![a.clone()],
        ..Default::default()
    });
    let service = InventoryService::new(state.clone());

    service
        .record_movement(import_input(
            vec![MovementItemInput {
                product_id: a.id,
                quantity: 100,
                unit_price: dec(3_000),
                new_selling_price: None,
            }],
            "Công ty Thành Đạt",
        ))
        .await
        .unwrap();

    service
        .record_movement(RecordMovementInput {
            movement_type: MovementType::Export,
            items: vec![MovementItemInput {
                product_id: a.id,
                quantity: 50,
                unit_price: dec(5_000),
                new_selling_price: None,
            }],
            partner: Some("Chị Lan".to_string()),
            reference_doc: None,
            note: None,
            transaction_date: None,
        })
        .await
        .unwrap();

    let data = state.data.read().await;
    let a_now = data.product(a.id).unwrap();
    assert_eq!(a_now.stock, 150);
    assert_eq!(a_now.import_price, dec(1_500));

    // Newest first: export log then import log
    assert_eq!(data.inventory_logs.len(), 2);
    let export_log = &data.inventory_logs[0];
    assert_eq!(export_log.movement_type, MovementType::Export);
    assert_eq!(export_log.old_stock, 200);
    assert_eq!(export_log.new_stock, 150);
    assert_eq!(export_log.price, dec(5_000));

    let import_log = &data.inventory_logs[1];
    assert_eq!(import_log.old_stock, 100);
    assert_eq!(import_log.new_stock, 200);
}

#[tokio::test]
async fn product_movements_requires_existing_product() {
    let state = test_state(AppData::default());
    let service = InventoryService::new(state);

    let result = service.product_movements(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
