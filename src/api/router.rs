//! HTTP router wiring the handlers to their routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    ApiDoc, create_account_handler, deposit_handler, health_check_handler,
    list_transactions_handler, liveness_handler, lookup_account_handler, readiness_handler,
    transfer_handler, withdraw_handler,
};
use crate::app::AppState;

/// Middleware limits applied to every route
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub request_timeout: Duration,
    pub max_concurrent_requests: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_concurrent_requests: 256,
        }
    }
}

/// Create the router with default middleware limits
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_router_with_config(app_state, RouterConfig::default())
}

pub fn create_router_with_config(app_state: Arc<AppState>, config: RouterConfig) -> Router {
    let api_v1 = Router::new()
        .route(
            "/accounts",
            post(lookup_account_handler).put(create_account_handler),
        )
        .route("/accounts/{id}/transactions", get(list_transactions_handler))
        .route("/transactions", post(transfer_handler))
        .route("/withdraw", post(withdraw_handler))
        .route("/deposit", post(deposit_handler));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_v1)
        .route("/health", get(health_check_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
