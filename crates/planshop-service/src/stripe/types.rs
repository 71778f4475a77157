//! Stripe API types.

use serde::Deserialize;

/// Stripe Checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session ID.
    pub id: String,
    /// Checkout URL to redirect the user to.
    #[serde(default)]
    pub url: Option<String>,
    /// Session status (`open`, `complete`, `expired`).
    #[serde(default)]
    pub status: Option<String>,
    /// Payment status (`unpaid`, `paid`, `no_payment_required`).
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Total amount in cents.
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Stripe webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event ID.
    pub id: String,
    /// Event type (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event data.
    pub data: WebhookEventData,
}

/// Webhook event data container.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    /// The event object (a checkout session for the events we handle).
    pub object: serde_json::Value,
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}
