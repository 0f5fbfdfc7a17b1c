//! Application state
//!
//! All domain collections live in one place, owned by `AppState` and passed
//! explicitly into the pure ledger and reporting functions. Mutating flows
//! apply optimistic local changes first and then call the persistence
//! gateway; the per-flow reconciliation policy lives in the services.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::{
    Customer, InventoryLog, MovementType, Order, OrderItem, OrderStatus, Product, Role, SoftRef,
    Supplier, User,
};

use crate::config::Config;
use crate::gateway::Gateway;

/// In-memory domain collections
///
/// Inventory logs are kept most-recent-first for display; the chronological
/// `transaction_date` field is what reports order by.
#[derive(Debug, Default)]
pub struct AppData {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub inventory_logs: Vec<InventoryLog>,
    pub users: Vec<User>,
}

impl AppData {
    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    pub fn order(&self, id: Uuid) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn supplier(&self, id: Uuid) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    /// Movements whose partner label exactly matches the given display name
    pub fn movements_for_partner(&self, name: &str) -> Vec<InventoryLog> {
        self.inventory_logs
            .iter()
            .filter(|l| {
                l.partner
                    .as_ref()
                    .map(|p| p.matches_label(name))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<RwLock<AppData>>,
    pub gateway: Arc<Gateway>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(data: AppData, gateway: Gateway, config: Config) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        }
    }
}

/// Built-in sample data used when no database is configured
///
/// Mirrors a small Vietnamese retail shop: a few products, one delivered
/// order and the movements behind it, so every report renders non-empty out
/// of the box.
pub fn sample_data() -> AppData {
    let now = Utc::now();
    let dec = |n: i64| Decimal::from(n);

    let p_rice = product_seed("SP-001", "Gạo ST25 túi 5kg", "bag", dec(160_000), dec(130_000), 42);
    let p_oil = product_seed("SP-002", "Dầu ăn Simply 1L", "bottle", dec(65_000), dec(52_000), 80);
    let p_milk = product_seed("SP-003", "Sữa tươi Vinamilk lốc 4", "pack", dec(34_000), dec(28_000), 120);

    let kh_lan = customer_seed("Chị Lan", "0903 123 456");
    let kh_minh = customer_seed("Anh Minh", "0912 987 654");

    let ncc_thanh = supplier_seed("Công ty Thành Đạt", dec(4_500_000), dec(52_000_000));
    let ncc_hoa = supplier_seed("Đại lý Hòa Bình", dec(0), dec(18_000_000));

    let order = {
        let items = vec![
            OrderItem {
                product_id: p_rice.id,
                product_name: p_rice.name.clone(),
                quantity: 2,
                price: p_rice.price,
            },
            OrderItem {
                product_id: p_milk.id,
                product_name: p_milk.name.clone(),
                quantity: 3,
                price: p_milk.price,
            },
        ];
        let total_amount = Order::derive_total(&items);
        Order {
            id: Uuid::new_v4(),
            customer_id: Some(kh_lan.id),
            customer_name: kh_lan.name.clone(),
            items,
            total_amount,
            status: OrderStatus::Delivered,
            date: now - Duration::days(2),
            created_at: now - Duration::days(2),
            updated_at: now - Duration::days(1),
        }
    };

    let logs = vec![
        InventoryLog {
            id: Uuid::new_v4(),
            product_id: p_rice.id,
            product_name: p_rice.name.clone(),
            movement_type: MovementType::Export,
            quantity: 2,
            old_stock: 44,
            new_stock: 42,
            price: p_rice.price,
            partner: Some(SoftRef::new(kh_lan.name.clone())),
            reference_doc: Some(SoftRef::new(order.id.to_string())),
            note: Some("Giao đơn hàng".to_string()),
            transaction_date: now - Duration::days(1),
            created_at: now - Duration::days(1),
        },
        InventoryLog {
            id: Uuid::new_v4(),
            product_id: p_rice.id,
            product_name: p_rice.name.clone(),
            movement_type: MovementType::Import,
            quantity: 20,
            old_stock: 24,
            new_stock: 44,
            price: dec(130_000),
            partner: Some(SoftRef::new(ncc_thanh.name.clone())),
            reference_doc: None,
            note: None,
            transaction_date: now - Duration::days(7),
            created_at: now - Duration::days(7),
        },
    ];

    let users = sample_users();

    AppData {
        products: vec![p_rice, p_oil, p_milk],
        orders: vec![order],
        customers: vec![kh_lan, kh_minh],
        suppliers: vec![ncc_thanh, ncc_hoa],
        inventory_logs: logs,
        users,
    }
}

/// Demo accounts, also used when a configured store has no users yet
pub fn sample_users() -> Vec<User> {
    vec![
        user_seed("Chủ cửa hàng", "admin@demo.vn", Role::Admin, vec![], "admin123"),
        user_seed(
            "Nhân viên bán hàng",
            "staff@demo.vn",
            Role::Staff,
            vec![
                "products:read".to_string(),
                "orders:read".to_string(),
                "orders:write".to_string(),
                "inventory:read".to_string(),
            ],
            "staff123",
        ),
    ]
}

fn product_seed(
    code: &str,
    name: &str,
    unit: &str,
    price: Decimal,
    import_price: Decimal,
    stock: i64,
) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        model: None,
        unit: Some(unit.to_string()),
        category: Some("Hàng tiêu dùng".to_string()),
        origin: Some("Việt Nam".to_string()),
        description: None,
        image_url: None,
        catalog_url: None,
        price,
        import_price,
        stock,
        batch_no: None,
        expiry_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn customer_seed(name: &str, phone: &str) -> Customer {
    let now = Utc::now();
    Customer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: Some(phone.to_string()),
        email: None,
        address: None,
        note: None,
        created_at: now,
        updated_at: now,
    }
}

fn supplier_seed(name: &str, debt: Decimal, total_purchases: Decimal) -> Supplier {
    let now = Utc::now();
    Supplier {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: None,
        email: None,
        address: None,
        note: None,
        debt,
        total_purchases,
        created_at: now,
        updated_at: now,
    }
}

fn user_seed(name: &str, email: &str, role: Role, permissions: Vec<String>, password: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        permissions,
        password_hash: bcrypt::hash(password, bcrypt::DEFAULT_COST).ok(),
        created_at: Utc::now(),
    }
}
