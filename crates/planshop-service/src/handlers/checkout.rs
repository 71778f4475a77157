//! Checkout session handlers: open a session and poll its status.
//!
//! Status polling is one of the two reconciliation entry points (the
//! other is the webhook handler). The poll path guards order creation
//! with the status diff computed by `PaymentTransaction::reconcile`; the
//! store's conditional insert makes the write safe against a concurrent
//! webhook delivery for the same session.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use planshop_core::{CheckoutState, Order, PaymentState, PaymentTransaction, Reconciliation};
use planshop_store::Store;

use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::StripeClient;

/// Checkout session request.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// The plan to purchase.
    pub plan_id: String,
    /// Purchasing user's email, if known.
    pub user_email: Option<String>,
    /// Origin URL the success/cancel redirects are built from.
    pub origin_url: String,
}

/// Checkout session response.
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    /// Stripe-hosted checkout URL to redirect the user to.
    pub url: String,
    /// Session ID for status polling.
    pub session_id: String,
}

/// Open a checkout session with the payment processor.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let plan = state
        .catalog
        .find(&body.plan_id)
        .ok_or_else(|| ApiError::NotFound(format!("Subscription plan not found: {}", body.plan_id)))?;

    let stripe = require_stripe(&state)?;

    let origin = body.origin_url.trim_end_matches('/');
    let success_url = format!("{origin}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}");
    let cancel_url = format!("{origin}/checkout/cancel");

    let session = stripe
        .create_checkout_session(plan, body.user_email.as_deref(), &success_url, &cancel_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, plan_id = %plan.id, "Failed to create Stripe checkout session");
            ApiError::ExternalService(format!("Failed to create checkout session: {e}"))
        })?;

    let url = session
        .url
        .ok_or_else(|| ApiError::ExternalService("Stripe returned no checkout URL".into()))?;

    let transaction = PaymentTransaction::pending(session.id.as_str(), plan, body.user_email);
    state.store.put_transaction(&transaction)?;

    tracing::info!(
        session_id = %session.id,
        plan_id = %plan.id,
        amount_cents = %transaction.amount_cents,
        "Checkout session opened"
    );

    Ok(Json(CheckoutSessionResponse {
        url,
        session_id: session.id,
    }))
}

/// Checkout status response.
#[derive(Debug, Serialize)]
pub struct CheckoutStatusResponse {
    /// Session ID.
    pub session_id: String,
    /// Session-level status.
    pub status: CheckoutState,
    /// Payment-level status.
    pub payment_status: PaymentState,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Currency code.
    pub currency: String,
}

impl From<&PaymentTransaction> for CheckoutStatusResponse {
    fn from(tx: &PaymentTransaction) -> Self {
        Self {
            session_id: tx.session_id.clone(),
            status: tx.status,
            payment_status: tx.payment_status,
            amount_cents: tx.amount_cents,
            currency: tx.currency.clone(),
        }
    }
}

/// Poll a checkout session's status and reconcile the stored transaction.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CheckoutStatusResponse>, ApiError> {
    let mut transaction = state
        .store
        .get_transaction_by_session(&session_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Checkout session not found: {session_id}")))?;

    let stripe = require_stripe(&state)?;

    let session = stripe.get_checkout_session(&session_id).await.map_err(|e| {
        tracing::error!(error = %e, session_id = %session_id, "Failed to fetch Stripe checkout session");
        ApiError::ExternalService(format!("Failed to fetch checkout status: {e}"))
    })?;

    let status = CheckoutState::from_stripe(session.status.as_deref().unwrap_or("open"));
    let payment_status = PaymentState::from_stripe(session.payment_status.as_deref().unwrap_or("unpaid"));

    match transaction.reconcile(status, payment_status) {
        Reconciliation::Unchanged => {
            // Stored pair already matches; no write, no order.
            tracing::debug!(session_id = %session_id, "Checkout status unchanged");
        }
        Reconciliation::Updated { promote } => {
            state.store.put_transaction(&transaction)?;

            if promote {
                let order = Order::completed_from(&transaction);
                let inserted = state.store.insert_order_for_session(&order)?;
                if inserted {
                    tracing::info!(
                        session_id = %session_id,
                        order_id = %order.id,
                        amount_cents = %order.amount_cents,
                        "Payment settled, order recorded"
                    );
                } else {
                    // A webhook delivery got there first.
                    tracing::debug!(session_id = %session_id, "Order already recorded for session");
                }
            } else {
                tracing::info!(
                    session_id = %session_id,
                    status = ?transaction.status,
                    payment_status = ?transaction.payment_status,
                    "Checkout status updated"
                );
            }
        }
    }

    Ok(Json(CheckoutStatusResponse::from(&transaction)))
}

/// Get the Stripe client or fail with Unavailable.
fn require_stripe(state: &AppState) -> Result<&StripeClient, ApiError> {
    state
        .stripe
        .as_deref()
        .ok_or_else(|| ApiError::Unavailable("Payment processor not configured".into()))
}
