//! Storefront admin backend - entry point
//!
//! All operations are exposed via GraphQL at /graphql.

use std::net::SocketAddr;

use storefront_admin::config::Config;
use storefront_admin::db::{Database, seed};
use storefront_admin::services::{Services, logging};
use storefront_admin::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    tracing::info!("Starting storefront admin backend");

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.migrate().await?;
    tracing::info!("Database connected");

    let seeded = seed::run_seeds(&db, config.seed_admin.as_ref(), config.bcrypt_cost).await?;
    tracing::info!(
        role_created = seeded.role_created,
        admin_created = seeded.admin_created,
        "Seeds applied"
    );

    let services = Services::from_config(&config, db)?;
    tracing::info!(
        image_storage = %config.image_storage_path.display(),
        "Services initialized"
    );

    let app = build_app(AppState::new(services));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
