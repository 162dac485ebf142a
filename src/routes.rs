//! HTTP router.

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, services::account_service::AccountService};

/// Build the application router over an account service.
pub fn router(service: AccountService) -> Router {
    let api = Router::new()
        .route(
            "/api/v1/balance/{account}",
            get(handlers::accounts::get_balance),
        )
        .route(
            "/api/v1/transactions/{account}",
            get(handlers::transactions::list_transactions),
        )
        .route(
            "/api/v1/deposit/{account}",
            post(handlers::transactions::create_deposit),
        )
        .route(
            "/api/v1/withdraw/{account}",
            post(handlers::transactions::create_withdrawal),
        )
        .route("/api/v1/goal/{account}", post(handlers::accounts::set_goal))
        .route("/api/v1/summary", get(handlers::accounts::get_summary))
        .route(
            "/api/v1/stats/{account}",
            get(handlers::accounts::get_stats),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// CORS policy for the presentation layer.
///
/// With no configured origin any origin is allowed.
pub fn cors_layer(allowed_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let Some(origin) = allowed_origin else {
        return Ok(CorsLayer::permissive());
    };

    let origin: HeaderValue = origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any))
}
