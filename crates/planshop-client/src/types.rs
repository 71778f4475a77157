//! Request and response types for the Planshop API.

use serde::{Deserialize, Serialize};

/// A subscription plan as returned by the catalog endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanInfo {
    /// Plan identifier slug.
    pub id: String,
    /// Subscribed service name.
    pub service_name: String,
    /// Plan tier name.
    pub plan_name: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Price formatted as dollars.
    pub price_formatted: String,
    /// Currency code.
    pub currency: String,
    /// Billing period label.
    pub duration: String,
    /// Feature list.
    pub features: Vec<String>,
    /// Storefront image URL.
    pub image_url: String,
    /// Whether the plan is purchasable.
    pub is_active: bool,
}

/// Registration input.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    /// Email address (unique).
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Password (not verified by the current login stub).
    pub password: String,
}

/// An account as returned by registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    /// Account ID.
    pub id: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Created timestamp (RFC 3339).
    pub created_at: String,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Login result.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInfo {
    /// Human-readable result.
    pub message: String,
    /// The matched account id.
    pub user_id: String,
}

/// Order creation input.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderInput {
    /// Purchasing user's email, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// The plan to purchase.
    pub plan_id: String,
}

/// An order as returned by the ledger endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    /// Order ID.
    pub id: String,
    /// Purchasing user's email, if known.
    pub user_email: Option<String>,
    /// Purchased plan id.
    pub plan_id: String,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Amount formatted as dollars.
    pub amount_formatted: String,
    /// Currency code.
    pub currency: String,
    /// Order status.
    pub status: String,
    /// Checkout session that produced this order, if any.
    pub payment_session_id: Option<String>,
    /// Created timestamp (RFC 3339).
    pub created_at: String,
    /// Updated timestamp (RFC 3339).
    pub updated_at: String,
}

/// Checkout session input.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutInput {
    /// The plan to purchase.
    pub plan_id: String,
    /// Purchasing user's email, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Origin URL the success/cancel redirects are built from.
    pub origin_url: String,
}

/// An opened checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionInfo {
    /// Hosted checkout URL to redirect the user to.
    pub url: String,
    /// Session ID for status polling.
    pub session_id: String,
}

/// Checkout status as returned by the poll endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutStatusInfo {
    /// Session ID.
    pub session_id: String,
    /// Session-level status.
    pub status: String,
    /// Payment-level status.
    pub payment_status: String,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Currency code.
    pub currency: String,
}
