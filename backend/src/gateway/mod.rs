//! Persistence gateway
//!
//! Maps domain entities to rows of the hosted PostgreSQL store. When no
//! database is configured the gateway runs in demo mode: reads hydrate
//! nothing and writes are accepted as no-ops, leaving the in-memory sample
//! data as the store. Schema-mismatch failures on writes are retried once
//! with a reduced core column set before giving up.

mod postgres;

use sqlx::PgPool;
use uuid::Uuid;

use shared::{Customer, InventoryLog, Order, Product, Supplier};

use crate::error::AppResult;
use crate::state::AppData;

/// Gateway to the relational store
#[derive(Clone)]
pub struct Gateway {
    pool: Option<PgPool>,
}

impl Gateway {
    /// Gateway over a live PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Demo-mode gateway: nothing is persisted
    pub fn demo() -> Self {
        Self { pool: None }
    }

    pub fn is_demo(&self) -> bool {
        self.pool.is_none()
    }

    /// Hydrate all collections from the store. Returns `None` in demo mode.
    pub async fn load_all(&self) -> AppResult<Option<AppData>> {
        match &self.pool {
            Some(pool) => Ok(Some(postgres::load_all(pool).await?)),
            None => Ok(None),
        }
    }

    pub async fn create_product(&self, product: &Product) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::insert_product(pool, product).await,
            None => Ok(()),
        }
    }

    pub async fn update_product(&self, product: &Product) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::update_product(pool, product).await,
            None => Ok(()),
        }
    }

    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::delete_row(pool, "products", id).await,
            None => Ok(()),
        }
    }

    pub async fn create_customer(&self, customer: &Customer) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::insert_customer(pool, customer).await,
            None => Ok(()),
        }
    }

    pub async fn update_customer(&self, customer: &Customer) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::update_customer(pool, customer).await,
            None => Ok(()),
        }
    }

    pub async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::delete_row(pool, "customers", id).await,
            None => Ok(()),
        }
    }

    pub async fn create_supplier(&self, supplier: &Supplier) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::insert_supplier(pool, supplier).await,
            None => Ok(()),
        }
    }

    pub async fn update_supplier(&self, supplier: &Supplier) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::update_supplier(pool, supplier).await,
            None => Ok(()),
        }
    }

    pub async fn delete_supplier(&self, id: Uuid) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::delete_row(pool, "suppliers", id).await,
            None => Ok(()),
        }
    }

    pub async fn create_order(&self, order: &Order) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::insert_order(pool, order).await,
            None => Ok(()),
        }
    }

    pub async fn update_order(&self, order: &Order) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::update_order(pool, order).await,
            None => Ok(()),
        }
    }

    pub async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        match &self.pool {
            Some(pool) => postgres::delete_row(pool, "orders", id).await,
            None => Ok(()),
        }
    }

    /// Persist one movement: the product's post-movement values plus the
    /// appended log row. Called once per batch item, in list order.
    pub async fn update_product_stock(
        &self,
        product: &Product,
        log: &InventoryLog,
    ) -> AppResult<()> {
        match &self.pool {
            Some(pool) => {
                postgres::update_product(pool, product).await?;
                postgres::insert_inventory_log(pool, log).await
            }
            None => Ok(()),
        }
    }
}
