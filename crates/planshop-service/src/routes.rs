//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, catalog, checkout, health, orders, webhooks};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes (all under `/api`)
///
/// ## Public
/// - `GET /api` - Liveness/version
///
/// ## Catalog
/// - `GET /api/subscriptions` - List active plans
/// - `GET /api/subscriptions/{id}` - Get one plan
///
/// ## Accounts
/// - `POST /api/users` - Register
/// - `POST /api/auth/login` - Stub login
///
/// ## Orders
/// - `POST /api/orders` - Create a pending order
/// - `GET /api/orders/{id}` - Get order details
/// - `GET /api/orders?user_email=` - List orders
///
/// ## Checkout
/// - `POST /api/checkout/session` - Open a checkout session
/// - `GET /api/checkout/status/{session_id}` - Poll and reconcile
///
/// ## Webhooks (signature verification, no concurrency limit)
/// - `POST /api/webhook/stripe` - Stripe webhooks
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Catalog
        .route("/subscriptions", get(catalog::list_plans))
        .route("/subscriptions/:plan_id", get(catalog::get_plan))
        // Accounts
        .route("/users", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        // Orders
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/:order_id", get(orders::get_order))
        // Checkout
        .route("/checkout/session", post(checkout::create_session))
        .route("/checkout/status/:session_id", get(checkout::get_status))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Liveness (public, no concurrency limit)
        .route("/api", get(health::root))
        .nest("/api", api_routes)
        // Webhooks (no concurrency limit - delivery rate is controlled by Stripe)
        .route("/api/webhook/stripe", post(webhooks::stripe_webhook))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
