//! Order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payment::PaymentTransaction;
use crate::{OrderId, Plan};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, payment not yet settled.
    Pending,

    /// Payment settled.
    Completed,

    /// Cancelled before settlement.
    Cancelled,

    /// Payment failed.
    Failed,
}

/// A purchase order for a subscription plan.
///
/// Orders are created either directly (manual order, status `pending`) or
/// by the payment flow when a checkout session settles (status
/// `completed`, linked to the session). Amount and currency always come
/// from the stored plan, never from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// The order identifier.
    pub id: OrderId,

    /// Email of the purchasing user, if known.
    pub user_email: Option<String>,

    /// The purchased plan.
    pub plan_id: String,

    /// Amount in integer cents, copied from the plan.
    pub amount_cents: i64,

    /// ISO currency code, copied from the plan.
    pub currency: String,

    /// Current status.
    pub status: OrderStatus,

    /// Checkout session that produced this order, if any.
    pub payment_session_id: Option<String>,

    /// When the order was created.
    pub created_at: DateTime<Utc>,

    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a pending order for a plan (the manual-order path).
    #[must_use]
    pub fn pending(plan: &Plan, user_email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            user_email,
            plan_id: plan.id.clone(),
            amount_cents: plan.price_cents,
            currency: plan.currency.clone(),
            status: OrderStatus::Pending,
            payment_session_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the completed order for a settled checkout session.
    ///
    /// Plan, amount, currency, and email come from the transaction record,
    /// which itself copied them from the stored plan when the session was
    /// opened.
    #[must_use]
    pub fn completed_from(transaction: &PaymentTransaction) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            user_email: transaction.user_email.clone(),
            plan_id: transaction.plan_id.clone(),
            amount_cents: transaction.amount_cents,
            currency: transaction.currency.clone(),
            status: OrderStatus::Completed,
            payment_session_id: Some(transaction.session_id.clone()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount formatted as dollars, e.g. `$9.99`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn amount_formatted(&self) -> String {
        format!("${:.2}", self.amount_cents as f64 / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    #[test]
    fn pending_order_copies_plan_price() {
        let catalog = Catalog::builtin();
        let plan = catalog.find("capcut-pro-monthly").unwrap();

        let order = Order::pending(plan, Some("jane@example.com".into()));

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.amount_cents, 999);
        assert_eq!(order.currency, "USD");
        assert!(order.payment_session_id.is_none());
    }

    #[test]
    fn completed_order_links_session() {
        let catalog = Catalog::builtin();
        let plan = catalog.find("canva-pro-monthly").unwrap();
        let tx = PaymentTransaction::pending("cs_test_123", plan, Some("jane@example.com".into()));

        let order = Order::completed_from(&tx);

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.amount_cents, plan.price_cents);
        assert_eq!(order.payment_session_id.as_deref(), Some("cs_test_123"));
        assert_eq!(order.user_email.as_deref(), Some("jane@example.com"));
    }
}
