//! HTTP router.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{SharedService, handlers};

/// Build the application router around a shared accounts service.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Account management routes
        .route(
            "/v1/accounts",
            post(handlers::accounts::create_account).get(handlers::accounts::list_accounts),
        )
        .route(
            "/v1/accounts/{id}",
            get(handlers::accounts::get_account),
        )
        // Transfer route
        .route(
            "/v1/accounts/transfer",
            post(handlers::accounts::transfer),
        )
        // Request/response tracing for observability
        .layer(TraceLayer::new_for_http())
        // Share the accounts service with all handlers via State extraction
        .with_state(service)
}
