//! Application state and HTTP router construction.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::Database;
use crate::graphql::{AdminSchema, build_schema};
use crate::services::Services;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub schema: AdminSchema,
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            db: services.db.clone(),
            schema: build_schema(services.clone()),
            services,
        }
    }
}

/// Build the full Axum router: health, /graphql, /graphql/ws and layers.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        // Health endpoints (no auth required)
        .merge(api::health::router())
        .route(
            "/graphql",
            get(api::graphql::graphiql).post(api::graphql::graphql_handler),
        )
        .route("/graphql/ws", get(api::graphql::graphql_ws_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
