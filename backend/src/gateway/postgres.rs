//! PostgreSQL row mapping
//!
//! Raw SQL with runtime-checked `query_as`, mirroring the hosted store's
//! per-entity tables. Writes that fail with undefined-column errors are
//! retried once with the reduced core column set.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{
    Customer, InventoryLog, MovementType, Order, OrderItem, OrderStatus, Product, Role, SoftRef,
    Supplier, User,
};

use crate::error::{AppError, AppResult};
use crate::state::AppData;

/// Whether an error is the schema-mismatch class the gateway tolerates
/// (PostgreSQL 42703: undefined column)
fn is_undefined_column(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("42703"),
        _ => false,
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    code: String,
    name: String,
    model: Option<String>,
    unit: Option<String>,
    category: Option<String>,
    origin: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    catalog_url: Option<String>,
    price: Decimal,
    import_price: Decimal,
    stock: i64,
    batch_no: Option<String>,
    expiry_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            code: r.code,
            name: r.name,
            model: r.model,
            unit: r.unit,
            category: r.category,
            origin: r.origin,
            description: r.description,
            image_url: r.image_url,
            catalog_url: r.catalog_url,
            price: r.price,
            import_price: r.import_price,
            stock: r.stock,
            batch_no: r.batch_no,
            expiry_date: r.expiry_date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Customer {
            id: r.id,
            name: r.name,
            phone: r.phone,
            email: r.email,
            address: r.address,
            note: r.note,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    note: Option<String>,
    debt: Decimal,
    total_purchases: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(r: SupplierRow) -> Self {
        Supplier {
            id: r.id,
            name: r.name,
            phone: r.phone,
            email: r.email,
            address: r.address,
            note: r.note,
            debt: r.debt,
            total_purchases: r.total_purchases,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Option<Uuid>,
    customer_name: String,
    items: serde_json::Value,
    total_amount: Decimal,
    status: String,
    date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(r: OrderRow) -> Result<Self, AppError> {
        let items: Vec<OrderItem> = serde_json::from_value(r.items)
            .map_err(|e| AppError::Internal(format!("Malformed order items: {}", e)))?;
        Ok(Order {
            id: r.id,
            customer_id: r.customer_id,
            customer_name: r.customer_name,
            items,
            total_amount: r.total_amount,
            status: parse_status(&r.status)?,
            date: r.date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct InventoryLogRow {
    id: Uuid,
    product_id: Uuid,
    product_name: String,
    movement_type: String,
    quantity: i64,
    old_stock: i64,
    new_stock: i64,
    price: Decimal,
    partner: Option<String>,
    reference_doc: Option<String>,
    note: Option<String>,
    transaction_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InventoryLogRow> for InventoryLog {
    type Error = AppError;

    fn try_from(r: InventoryLogRow) -> Result<Self, AppError> {
        let movement_type = match r.movement_type.as_str() {
            "import" => MovementType::Import,
            "export" => MovementType::Export,
            other => {
                return Err(AppError::Internal(format!(
                    "Unknown movement type: {}",
                    other
                )))
            }
        };
        Ok(InventoryLog {
            id: r.id,
            product_id: r.product_id,
            product_name: r.product_name,
            movement_type,
            quantity: r.quantity,
            old_stock: r.old_stock,
            new_stock: r.new_stock,
            price: r.price,
            partner: r.partner.map(SoftRef::new),
            reference_doc: r.reference_doc.map(SoftRef::new),
            note: r.note,
            transaction_date: r.transaction_date,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    permissions: serde_json::Value,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(r: UserRow) -> Result<Self, AppError> {
        let role = match r.role.as_str() {
            "admin" => Role::Admin,
            "staff" => Role::Staff,
            other => return Err(AppError::Internal(format!("Unknown role: {}", other))),
        };
        let permissions: Vec<String> = serde_json::from_value(r.permissions)
            .map_err(|e| AppError::Internal(format!("Malformed permissions: {}", e)))?;
        Ok(User {
            id: r.id,
            name: r.name,
            email: r.email,
            role,
            permissions,
            password_hash: r.password_hash,
            created_at: r.created_at,
        })
    }
}

fn parse_status(s: &str) -> AppResult<OrderStatus> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "confirmed" => Ok(OrderStatus::Confirmed),
        "shipping" => Ok(OrderStatus::Shipping),
        "delivered" => Ok(OrderStatus::Delivered),
        "cancelled" => Ok(OrderStatus::Cancelled),
        other => Err(AppError::Internal(format!("Unknown order status: {}", other))),
    }
}

// ============================================================================
// Hydration
// ============================================================================

pub async fn get_products(pool: &PgPool) -> AppResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, code, name, model, unit, category, origin, description,
               image_url, catalog_url, price, import_price, stock, batch_no,
               expiry_date, created_at, updated_at
        FROM products
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn get_customers(pool: &PgPool) -> AppResult<Vec<Customer>> {
    let rows = sqlx::query_as::<_, CustomerRow>(
        "SELECT id, name, phone, email, address, note, created_at, updated_at \
         FROM customers ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Customer::from).collect())
}

pub async fn get_suppliers(pool: &PgPool) -> AppResult<Vec<Supplier>> {
    let rows = sqlx::query_as::<_, SupplierRow>(
        "SELECT id, name, phone, email, address, note, debt, total_purchases, \
         created_at, updated_at FROM suppliers ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Supplier::from).collect())
}

pub async fn get_orders(pool: &PgPool) -> AppResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT id, customer_id, customer_name, items, total_amount, status, \
         date, created_at, updated_at FROM orders ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn get_inventory_logs(pool: &PgPool) -> AppResult<Vec<InventoryLog>> {
    let rows = sqlx::query_as::<_, InventoryLogRow>(
        r#"
        SELECT id, product_id, product_name, movement_type, quantity,
               old_stock, new_stock, price, partner, reference_doc, note,
               transaction_date, created_at
        FROM inventory_logs
        ORDER BY transaction_date DESC, created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(InventoryLog::try_from).collect()
}

pub async fn get_users(pool: &PgPool) -> AppResult<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, role, permissions, password_hash, created_at \
         FROM users ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(User::try_from).collect()
}

/// Load every collection from the store
pub async fn load_all(pool: &PgPool) -> AppResult<AppData> {
    Ok(AppData {
        products: get_products(pool).await?,
        orders: get_orders(pool).await?,
        customers: get_customers(pool).await?,
        suppliers: get_suppliers(pool).await?,
        inventory_logs: get_inventory_logs(pool).await?,
        users: get_users(pool).await?,
    })
}

// ============================================================================
// Writes
// ============================================================================

pub async fn insert_product(pool: &PgPool, p: &Product) -> AppResult<()> {
    let full = sqlx::query(
        r#"
        INSERT INTO products (
            id, code, name, model, unit, category, origin, description,
            image_url, catalog_url, price, import_price, stock, batch_no,
            expiry_date, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(p.id)
    .bind(&p.code)
    .bind(&p.name)
    .bind(&p.model)
    .bind(&p.unit)
    .bind(&p.category)
    .bind(&p.origin)
    .bind(&p.description)
    .bind(&p.image_url)
    .bind(&p.catalog_url)
    .bind(p.price)
    .bind(p.import_price)
    .bind(p.stock)
    .bind(&p.batch_no)
    .bind(p.expiry_date)
    .bind(p.created_at)
    .bind(p.updated_at)
    .execute(pool)
    .await;

    match full {
        Ok(_) => Ok(()),
        Err(e) if is_undefined_column(&e) => {
            tracing::warn!("products insert hit schema mismatch, retrying with core columns");
            sqlx::query(
                r#"
                INSERT INTO products (
                    id, code, name, price, import_price, stock, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(p.id)
            .bind(&p.code)
            .bind(&p.name)
            .bind(p.price)
            .bind(p.import_price)
            .bind(p.stock)
            .bind(p.created_at)
            .bind(p.updated_at)
            .execute(pool)
            .await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_product(pool: &PgPool, p: &Product) -> AppResult<()> {
    let full = sqlx::query(
        r#"
        UPDATE products
        SET code = $2, name = $3, model = $4, unit = $5, category = $6,
            origin = $7, description = $8, image_url = $9, catalog_url = $10,
            price = $11, import_price = $12, stock = $13, batch_no = $14,
            expiry_date = $15, updated_at = $16
        WHERE id = $1
        "#,
    )
    .bind(p.id)
    .bind(&p.code)
    .bind(&p.name)
    .bind(&p.model)
    .bind(&p.unit)
    .bind(&p.category)
    .bind(&p.origin)
    .bind(&p.description)
    .bind(&p.image_url)
    .bind(&p.catalog_url)
    .bind(p.price)
    .bind(p.import_price)
    .bind(p.stock)
    .bind(&p.batch_no)
    .bind(p.expiry_date)
    .bind(p.updated_at)
    .execute(pool)
    .await;

    let result = match full {
        Ok(r) => r,
        Err(e) if is_undefined_column(&e) => {
            tracing::warn!("products update hit schema mismatch, retrying with core columns");
            sqlx::query(
                r#"
                UPDATE products
                SET code = $2, name = $3, price = $4, import_price = $5,
                    stock = $6, updated_at = $7
                WHERE id = $1
                "#,
            )
            .bind(p.id)
            .bind(&p.code)
            .bind(&p.name)
            .bind(p.price)
            .bind(p.import_price)
            .bind(p.stock)
            .bind(p.updated_at)
            .execute(pool)
            .await?
        }
        Err(e) => return Err(e.into()),
    };

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Product".to_string()));
    }
    Ok(())
}

pub async fn insert_customer(pool: &PgPool, c: &Customer) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO customers (id, name, phone, email, address, note, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(c.id)
    .bind(&c.name)
    .bind(&c.phone)
    .bind(&c.email)
    .bind(&c.address)
    .bind(&c.note)
    .bind(c.created_at)
    .bind(c.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_customer(pool: &PgPool, c: &Customer) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE customers
        SET name = $2, phone = $3, email = $4, address = $5, note = $6, updated_at = $7
        WHERE id = $1
        "#,
    )
    .bind(c.id)
    .bind(&c.name)
    .bind(&c.phone)
    .bind(&c.email)
    .bind(&c.address)
    .bind(&c.note)
    .bind(c.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Customer".to_string()));
    }
    Ok(())
}

pub async fn insert_supplier(pool: &PgPool, s: &Supplier) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO suppliers (
            id, name, phone, email, address, note, debt, total_purchases,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(s.id)
    .bind(&s.name)
    .bind(&s.phone)
    .bind(&s.email)
    .bind(&s.address)
    .bind(&s.note)
    .bind(s.debt)
    .bind(s.total_purchases)
    .bind(s.created_at)
    .bind(s.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_supplier(pool: &PgPool, s: &Supplier) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE suppliers
        SET name = $2, phone = $3, email = $4, address = $5, note = $6,
            debt = $7, total_purchases = $8, updated_at = $9
        WHERE id = $1
        "#,
    )
    .bind(s.id)
    .bind(&s.name)
    .bind(&s.phone)
    .bind(&s.email)
    .bind(&s.address)
    .bind(&s.note)
    .bind(s.debt)
    .bind(s.total_purchases)
    .bind(s.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Supplier".to_string()));
    }
    Ok(())
}

pub async fn insert_order(pool: &PgPool, o: &Order) -> AppResult<()> {
    let items = serde_json::to_value(&o.items)
        .map_err(|e| AppError::Internal(format!("Order items serialization: {}", e)))?;
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, customer_id, customer_name, items, total_amount, status,
            date, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(o.id)
    .bind(o.customer_id)
    .bind(&o.customer_name)
    .bind(items)
    .bind(o.total_amount)
    .bind(o.status.as_str())
    .bind(o.date)
    .bind(o.created_at)
    .bind(o.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_order(pool: &PgPool, o: &Order) -> AppResult<()> {
    let items = serde_json::to_value(&o.items)
        .map_err(|e| AppError::Internal(format!("Order items serialization: {}", e)))?;
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET customer_id = $2, customer_name = $3, items = $4, total_amount = $5,
            status = $6, date = $7, updated_at = $8
        WHERE id = $1
        "#,
    )
    .bind(o.id)
    .bind(o.customer_id)
    .bind(&o.customer_name)
    .bind(items)
    .bind(o.total_amount)
    .bind(o.status.as_str())
    .bind(o.date)
    .bind(o.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Order".to_string()));
    }
    Ok(())
}

pub async fn insert_inventory_log(pool: &PgPool, l: &InventoryLog) -> AppResult<()> {
    let full = sqlx::query(
        r#"
        INSERT INTO inventory_logs (
            id, product_id, product_name, movement_type, quantity, old_stock,
            new_stock, price, partner, reference_doc, note, transaction_date,
            created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(l.id)
    .bind(l.product_id)
    .bind(&l.product_name)
    .bind(l.movement_type.as_str())
    .bind(l.quantity)
    .bind(l.old_stock)
    .bind(l.new_stock)
    .bind(l.price)
    .bind(l.partner.as_ref().map(SoftRef::as_str))
    .bind(l.reference_doc.as_ref().map(SoftRef::as_str))
    .bind(&l.note)
    .bind(l.transaction_date)
    .bind(l.created_at)
    .execute(pool)
    .await;

    match full {
        Ok(_) => Ok(()),
        Err(e) if is_undefined_column(&e) => {
            tracing::warn!("inventory_logs insert hit schema mismatch, retrying with core columns");
            sqlx::query(
                r#"
                INSERT INTO inventory_logs (
                    id, product_id, product_name, movement_type, quantity,
                    old_stock, new_stock, price, transaction_date, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(l.id)
            .bind(l.product_id)
            .bind(&l.product_name)
            .bind(l.movement_type.as_str())
            .bind(l.quantity)
            .bind(l.old_stock)
            .bind(l.new_stock)
            .bind(l.price)
            .bind(l.transaction_date)
            .bind(l.created_at)
            .execute(pool)
            .await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one row by id from a fixed table name
pub async fn delete_row(pool: &PgPool, table: &'static str, id: Uuid) -> AppResult<()> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(table.to_string()));
    }
    Ok(())
}
