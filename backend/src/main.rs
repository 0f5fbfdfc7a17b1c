//! Sales & Inventory Management Platform - Backend Server

use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sim_backend::{
    config::Config,
    create_app,
    gateway::Gateway,
    state::{sample_data, sample_users, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sim_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Sales & Inventory Management Server");
    tracing::info!("Environment: {}", config.environment);

    // Connect to the store, or fall back to built-in sample data
    let (gateway, data) = if config.has_database() {
        let url = config.database.url.as_deref().unwrap_or_default();
        tracing::info!("Connecting to database...");
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await?;
        tracing::info!("Database connection established");

        // Run migrations in development
        if config.environment == "development" {
            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&db_pool).await?;
            tracing::info!("Migrations completed");
        }

        let gateway = Gateway::postgres(db_pool);
        let mut data = gateway.load_all().await?.unwrap_or_default();
        if data.users.is_empty() {
            tracing::warn!("No users in store; seeding demo accounts");
            data.users = sample_users();
        }
        tracing::info!(
            "Hydrated state: {} products, {} orders, {} movements",
            data.products.len(),
            data.orders.len(),
            data.inventory_logs.len()
        );
        (gateway, data)
    } else {
        tracing::warn!("No database configured; running in demo mode on sample data");
        (Gateway::demo(), sample_data())
    };

    let state = AppState::new(data, gateway, config.clone());

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
