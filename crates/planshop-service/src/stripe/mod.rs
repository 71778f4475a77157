//! Stripe integration: checkout sessions and webhook verification.

mod client;
mod types;

pub use client::{StripeClient, StripeError};
pub use types::{
    CheckoutSession, StripeErrorDetail, StripeErrorResponse, WebhookEvent, WebhookEventData,
};
