//! Stripe webhook handler — the processor-pushed reconciliation entry
//! point.
//!
//! Unlike the status poll, this path guards order creation with an
//! existence check (the store's conditional insert), not a status diff:
//! processors may deliver the same event several times, and each delivery
//! must converge on the same single completed order.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use planshop_core::{CheckoutState, Order, PaymentState, Reconciliation};
use planshop_store::Store;

use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::WebhookEvent;

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was processed.
    pub received: bool,
}

/// Session fields extracted from a webhook event object.
#[derive(Debug, Deserialize)]
struct SessionEvent {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
}

/// Handle Stripe webhooks.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    verify_signature(&state, &headers, &body)?;

    let event: WebhookEvent =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        event_type = %event.event_type,
        event_id = %event.id,
        "Received Stripe webhook"
    );

    match event.event_type.as_str() {
        "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
            handle_session_settled(&state, &event.data.object)?;
        }
        "checkout.session.expired" => {
            handle_session_expired(&state, &event.data.object)?;
        }
        _ => {
            tracing::debug!(event_type = %event.event_type, "Unhandled Stripe event");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}

/// Verify the `Stripe-Signature` header when a webhook secret is
/// configured.
fn verify_signature(state: &AppState, headers: &HeaderMap, body: &str) -> Result<(), ApiError> {
    let Some(stripe) = &state.stripe else {
        tracing::warn!("Stripe not configured - skipping webhook signature verification");
        return Ok(());
    };

    if !stripe.has_webhook_secret() {
        // No webhook secret configured - skip verification (development mode)
        tracing::warn!("Stripe webhook secret not configured - skipping signature verification");
        return Ok(());
    }

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing Stripe signature".into()))?;

    stripe.verify_webhook_signature(body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Invalid Stripe webhook signature");
        ApiError::InvalidSignature
    })
}

/// Handle a settled checkout session.
fn handle_session_settled(state: &AppState, object: &serde_json::Value) -> Result<(), ApiError> {
    let session: SessionEvent = serde_json::from_value(object.clone())
        .map_err(|e| ApiError::BadRequest(format!("Malformed session object: {e}")))?;

    let payment_status = PaymentState::from_stripe(session.payment_status.as_deref().unwrap_or("unpaid"));

    if payment_status != PaymentState::Paid {
        tracing::info!(
            session_id = %session.id,
            payment_status = ?payment_status,
            "Checkout session not paid yet, skipping"
        );
        return Ok(());
    }

    let Some(mut transaction) = state.store.get_transaction_by_session(&session.id)? else {
        // Stale or foreign event; acknowledge so the processor stops
        // redelivering it.
        tracing::warn!(session_id = %session.id, "Webhook for unknown checkout session");
        return Ok(());
    };

    let status = CheckoutState::from_stripe(session.status.as_deref().unwrap_or("complete"));

    if let Reconciliation::Updated { .. } = transaction.reconcile(status, payment_status) {
        state.store.put_transaction(&transaction)?;
    }

    // Existence-check guard: attempt the insert regardless of whether the
    // status pair changed. The store rejects it if an order for this
    // session was already recorded (earlier delivery, or a status poll).
    let order = Order::completed_from(&transaction);
    let inserted = state.store.insert_order_for_session(&order)?;

    if inserted {
        tracing::info!(
            session_id = %session.id,
            order_id = %order.id,
            amount_cents = %order.amount_cents,
            "Webhook settled payment, order recorded"
        );
    } else {
        tracing::debug!(session_id = %session.id, "Order already recorded for session");
    }

    Ok(())
}

/// Handle an expired checkout session.
fn handle_session_expired(state: &AppState, object: &serde_json::Value) -> Result<(), ApiError> {
    let session: SessionEvent = serde_json::from_value(object.clone())
        .map_err(|e| ApiError::BadRequest(format!("Malformed session object: {e}")))?;

    let Some(mut transaction) = state.store.get_transaction_by_session(&session.id)? else {
        tracing::warn!(session_id = %session.id, "Expiry webhook for unknown checkout session");
        return Ok(());
    };

    let payment_status = PaymentState::from_stripe(session.payment_status.as_deref().unwrap_or("expired"));

    if let Reconciliation::Updated { .. } =
        transaction.reconcile(CheckoutState::Expired, payment_status)
    {
        state.store.put_transaction(&transaction)?;
        tracing::info!(session_id = %session.id, "Checkout session expired");
    }

    Ok(())
}
