//! Payment transactions and the status-reconciliation rule.
//!
//! A `PaymentTransaction` is written when a checkout session is opened and
//! mutated only by reconciliation, driven either by a client status poll
//! or by a processor webhook. The reconciliation rule here is pure; the
//! at-most-once order guarantee is completed by the store's conditional
//! insert keyed on the session id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Plan, TransactionId};

/// Session-level status of a checkout.
///
/// State machine per session: `pending → {completed, failed, expired}`,
/// all of which are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    /// Session is open, customer has not finished.
    Pending,

    /// Session finished successfully.
    Completed,

    /// Session failed.
    Failed,

    /// Session expired before completion.
    Expired,
}

impl CheckoutState {
    /// Map a Stripe checkout-session `status` string.
    ///
    /// Unrecognized values are treated as `pending`, so a processor-side
    /// vocabulary addition never flips a session into a terminal state.
    #[must_use]
    pub fn from_stripe(status: &str) -> Self {
        match status {
            "complete" | "completed" => Self::Completed,
            "expired" => Self::Expired,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Payment-level status of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Not yet paid.
    Pending,

    /// Payment collected.
    Paid,

    /// Payment failed.
    Failed,

    /// Payment window expired.
    Expired,
}

impl PaymentState {
    /// Map a Stripe `payment_status` string.
    #[must_use]
    pub fn from_stripe(payment_status: &str) -> Self {
        match payment_status {
            "paid" | "no_payment_required" => Self::Paid,
            "failed" => Self::Failed,
            "expired" => Self::Expired,
            _ => Self::Pending,
        }
    }
}

/// Outcome of applying a fetched status pair to a stored transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Fetched pair equals the stored pair; nothing was written.
    Unchanged,

    /// The stored record was rewritten. `promote` is true when the
    /// payment has become paid and the stored status was not already
    /// completed, i.e. a completed order must now be recorded for this
    /// session.
    Updated {
        /// Whether a completed order should be recorded.
        promote: bool,
    },
}

/// A payment transaction tracking one checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// The transaction identifier.
    pub id: TransactionId,

    /// Processor-issued checkout session id (primary lookup key).
    pub session_id: String,

    /// Email of the purchasing user, if known.
    pub user_email: Option<String>,

    /// The plan being purchased.
    pub plan_id: String,

    /// Amount in integer cents, copied from the plan.
    pub amount_cents: i64,

    /// ISO currency code, copied from the plan.
    pub currency: String,

    /// Session-level status.
    pub status: CheckoutState,

    /// Payment-level status.
    pub payment_status: PaymentState,

    /// Free-form metadata recorded when the session was opened.
    pub metadata: HashMap<String, String>,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,

    /// When the transaction was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PaymentTransaction {
    /// Create the pending transaction for a freshly opened session.
    ///
    /// Amount and currency are taken from the stored plan, never from
    /// caller input.
    #[must_use]
    pub fn pending(session_id: impl Into<String>, plan: &Plan, user_email: Option<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("plan_id".to_string(), plan.id.clone());
        metadata.insert("source".to_string(), "web_checkout".to_string());
        if let Some(email) = &user_email {
            metadata.insert("user_email".to_string(), email.clone());
        }

        let now = Utc::now();
        Self {
            id: TransactionId::generate(),
            session_id: session_id.into(),
            user_email,
            plan_id: plan.id.clone(),
            amount_cents: plan.price_cents,
            currency: plan.currency.clone(),
            status: CheckoutState::Pending,
            payment_status: PaymentState::Pending,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a freshly fetched status pair to this record.
    ///
    /// If the fetched pair equals the stored pair this is a no-op and the
    /// record must not be rewritten — that is what makes repeated polling
    /// idempotent. Otherwise the pair is replaced, `updated_at` is
    /// refreshed, and `promote` reports whether a completed order must be
    /// recorded: the payment has become paid and the stored status was not
    /// already completed.
    pub fn reconcile(&mut self, status: CheckoutState, payment_status: PaymentState) -> Reconciliation {
        if self.status == status && self.payment_status == payment_status {
            return Reconciliation::Unchanged;
        }

        let promote = payment_status == PaymentState::Paid && self.status != CheckoutState::Completed;

        self.status = status;
        self.payment_status = payment_status;
        self.updated_at = Utc::now();

        Reconciliation::Updated { promote }
    }
}
