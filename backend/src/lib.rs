//! Sales & Inventory Management Platform - Backend
//!
//! A sales and inventory console for small retail businesses: products,
//! orders, customers, suppliers, stock movements with a moving-average cost
//! ledger, reporting, and a chat-style AI helper, backed by a hosted
//! relational store (or built-in sample data when unconfigured).

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use state::AppState;

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Sales & Inventory Management Platform API v1.0"
}
