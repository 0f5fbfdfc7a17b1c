//! Route definitions for the Sales & Inventory Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, state::AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes
        .nest("/auth", auth_routes())
        // Protected routes - user management
        .nest("/users", user_routes())
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - customers
        .nest("/customers", customer_routes())
        // Protected routes - suppliers
        .nest("/suppliers", supplier_routes())
        // Protected routes - orders
        .nest("/orders", order_routes())
        // Protected routes - inventory movements
        .nest("/inventory", inventory_routes())
        // Protected routes - reports
        .nest("/reports", report_routes())
        // Protected routes - chat assistant
        .nest("/assistant", assistant_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// User management routes (protected, admin only)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route("/:customer_id/movements", get(handlers::get_customer_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route("/:supplier_id/payments", post(handlers::pay_supplier_debt))
        .route("/:supplier_id/debt", put(handlers::adjust_supplier_debt))
        .route("/:supplier_id/movements", get(handlers::get_supplier_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/:order_id/status", put(handlers::update_order_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory movement routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/movements",
            get(handlers::list_movements).post(handlers::record_movement),
        )
        .route(
            "/products/:product_id/movements",
            get(handlers::get_product_movements),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/valuation", get(handlers::get_valuation_report))
        .route("/period-movement", get(handlers::get_period_movement_report))
        .route("/sales-profit", get(handlers::get_sales_profit_report))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Chat assistant routes (protected)
fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route_layer(middleware::from_fn(auth_middleware))
}
