//! Planshop HTTP API Service.
//!
//! This crate provides the HTTP API for the Planshop subscription store,
//! including:
//!
//! - The subscription plan catalog
//! - Account registration and stub login
//! - The order ledger
//! - Stripe checkout sessions, status polling, and webhooks
//!
//! The interesting piece is the payment-status reconciliation shared by
//! the status-poll and webhook handlers: for any checkout session, at
//! most one completed order is ever recorded, however often the status is
//! polled or the webhook redelivered.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for routing consistency

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
