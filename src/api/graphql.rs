//! GraphQL HTTP and WebSocket handlers
//!
//! A valid bearer token becomes an [`AuthSession`] in the request data. An
//! invalid or revoked token is ignored here; guarded resolvers then reject
//! the request as unauthenticated.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};

use crate::app::AppState;
use crate::services::{AuthSession, Services};

/// Extract bearer token from Authorization header
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

async fn resolve_session(services: &Services, token: Option<&str>) -> Option<AuthSession> {
    match services.auth.authenticate(token?).await {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid bearer token");
            None
        }
    }
}

/// GraphQL query/mutation handler with auth context
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    if let Some(session) = resolve_session(&state.services, extract_token(&headers)).await {
        request = request.data(session);
    }

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
pub async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/graphql/ws")
                .finish(),
        )
        .into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

/// GraphQL WebSocket handler for subscriptions with auth
pub async fn graphql_ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let header_session = resolve_session(&state.services, extract_token(&headers)).await;

    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            let services = state.services.clone();

            GraphQLWebSocket::new(socket, state.schema.clone(), protocol)
                // Token in connection params wins over the upgrade headers
                .on_connection_init(move |params| async move {
                    let mut data = async_graphql::Data::default();
                    let param_token = params
                        .get("Authorization")
                        .or_else(|| params.get("authorization"))
                        .and_then(|v| v.as_str());
                    let param_session = resolve_session(&services, param_token).await;

                    if let Some(session) = param_session.or(header_session) {
                        data.insert(session);
                    }
                    Ok(data)
                })
                .serve()
        })
}
