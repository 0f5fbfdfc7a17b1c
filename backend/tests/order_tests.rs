//! Order lifecycle tests
//!
//! Covers status transition rules, total derivation, and the order service
//! flows against in-memory state.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{Customer, OrderItem, OrderStatus, Product};
use sim_backend::config::{AssistantConfig, Config, DatabaseConfig, JwtConfig, ServerConfig};
use sim_backend::error::AppError;
use sim_backend::gateway::Gateway;
use sim_backend::services::orders::{
    CreateOrderInput, OrderItemInput, OrderService, UpdateOrderInput, UpdateStatusInput,
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

fn product(name: &str, stock: i64, price: i64) -> Product {
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
        import_price: dec(price / 2),
        stock,
        batch_no: None,
        expiry_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn customer(name: &str) -> Customer {
    let now = Utc::now();
    Customer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: None,
        email: None,
        address: None,
        note: None,
        created_at: now,
        updated_at: now,
    }
}

fn test_state(data: AppData) -> AppState {
    AppState::new(data, Gateway::demo(), test_config())
}

// ============================================================================
// Status Transition Rules
// ============================================================================

#[test]
fn status_advances_one_step_at_a_time() {
    let forward = [
        (OrderStatus::Pending, OrderStatus::Confirmed),
        (OrderStatus::Confirmed, OrderStatus::Shipping),
        (OrderStatus::Shipping, OrderStatus::Delivered),
    ];
    for (from, to) in forward {
        assert!(from.can_transition_to(to), "{:?} -> {:?}", from, to);
    }
}

#[test]
fn status_cannot_skip_or_go_backward() {
    let invalid = [
        (OrderStatus::Pending, OrderStatus::Shipping),
        (OrderStatus::Pending, OrderStatus::Delivered),
        (OrderStatus::Confirmed, OrderStatus::Delivered),
        (OrderStatus::Shipping, OrderStatus::Confirmed),
        (OrderStatus::Delivered, OrderStatus::Pending),
    ];
    for (from, to) in invalid {
        assert!(!from.can_transition_to(to), "{:?} -> {:?}", from, to);
    }
}

#[test]
fn cancellation_allowed_only_before_terminal_states() {
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
    assert!(OrderStatus::Shipping.can_transition_to(OrderStatus::Cancelled));
    assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
}

#[test]
fn derive_total_sums_line_totals() {
    let items = vec![
        OrderItem {
            product_id: Uuid::new_v4(),
            product_name: "A".to_string(),
            quantity: 2,
            price: dec(1_500),
        },
        OrderItem {
            product_id: Uuid::new_v4(),
            product_name: "B".to_string(),
            quantity: 3,
            price: dec(400),
        },
    ];
    assert_eq!(shared::Order::derive_total(&items), dec(4_200));
}

// ============================================================================
// Order Service Flows
// ============================================================================

#[tokio::test]
async fn create_order_snapshots_names_and_derives_total() {
    let p = product("Gạo", 50, 1_500);
    let kh = customer("Chị Lan");
    let state = test_state(AppData {
        products: vec![p.clone()],
        customers: vec![kh.clone()],
        ..Default::default()
    });
    let service = OrderService::new(state.clone());

    let order = service
        .create(CreateOrderInput {
            customer_id: Some(kh.id),
            customer_name: None,
            items: vec![OrderItemInput {
                product_id: p.id,
                quantity: 4,
                price: None,
            }],
            date: None,
        })
        .await
        .unwrap();

    assert_eq!(order.customer_name, "Chị Lan");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items[0].product_name, p.name);
    assert_eq!(order.items[0].price, dec(1_500));
    assert_eq!(order.total_amount, dec(6_000));

    // Optimistically visible in state
    let data = state.data.read().await;
    assert_eq!(data.orders.len(), 1);
}

#[tokio::test]
async fn create_order_rejects_unknown_product() {
    let state = test_state(AppData::default());
    let service = OrderService::new(state);

    let result = service
        .create(CreateOrderInput {
            customer_id: None,
            customer_name: Some("Khách lẻ".to_string()),
            items: vec![OrderItemInput {
                product_id: Uuid::new_v4(),
                quantity: 1,
                price: None,
            }],
            date: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn create_order_requires_items_and_customer_name() {
    let state = test_state(AppData::default());
    let service = OrderService::new(state);

    let no_name = service
        .create(CreateOrderInput {
            customer_id: None,
            customer_name: None,
            items: vec![],
            date: None,
        })
        .await;
    assert!(matches!(no_name, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn status_endpoint_walks_the_lifecycle() {
    let p = product("Gạo", 50, 1_500);
    let state = test_state(AppData {
        products: vec![p.clone()],
        ..Default::default()
    });
    let service = OrderService::new(state);

    let order = service
        .create(CreateOrderInput {
            customer_id: None,
            customer_name: Some("Khách lẻ".to_string()),
            items: vec![OrderItemInput {
                product_id: p.id,
                quantity: 1,
                price: None,
            }],
            date: None,
        })
        .await
        .unwrap();

    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Shipping,
        OrderStatus::Delivered,
    ] {
        let updated = service
            .update_status(order.id, UpdateStatusInput { status })
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    // Terminal: no further moves
    let result = service
        .update_status(order.id, UpdateStatusInput {
            status: OrderStatus::Cancelled,
        })
        .await;
    assert!(matches!(result, Err(AppError::InvalidStateTransition(_))));
}

#[tokio::test]
async fn editing_is_limited_to_pending_orders() {
    let p = product("Gạo", 50, 1_500);
    let state = test_state(AppData {
        products: vec![p.clone()],
        ..Default::default()
    });
    let service = OrderService::new(state);

    let order = service
        .create(CreateOrderInput {
            customer_id: None,
            customer_name: Some("Khách lẻ".to_string()),
            items: vec![OrderItemInput {
                product_id: p.id,
                quantity: 1,
                price: None,
            }],
            date: None,
        })
        .await
        .unwrap();

    // Pending: edit re-derives the total
    let updated = service
        .update(
            order.id,
            UpdateOrderInput {
                customer_id: None,
                customer_name: None,
                items: Some(vec![OrderItemInput {
                    product_id: p.id,
                    quantity: 3,
                    price: Some(dec(1_000)),
                }]),
                date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total_amount, dec(3_000));

    // Confirmed: edits are rejected
    service
        .update_status(order.id, UpdateStatusInput {
            status: OrderStatus::Confirmed,
        })
        .await
        .unwrap();
    let result = service
        .update(
            order.id,
            UpdateOrderInput {
                customer_id: None,
                customer_name: None,
                items: None,
                date: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidStateTransition(_))));
}
