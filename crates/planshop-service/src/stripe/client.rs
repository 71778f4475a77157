//! Stripe API client implementation.

use reqwest::Client;
use std::time::Duration;

use planshop_core::Plan;

use super::types::{CheckoutSession, StripeErrorResponse};
use crate::crypto::{constant_time_eq, hmac_sha256_hex};

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Invalid webhook signature.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_base: String,
    api_key: String,
    webhook_secret: Option<String>,
}

impl StripeClient {
    /// Stripe API base URL.
    const DEFAULT_API_BASE: &'static str = "https://api.stripe.com/v1";

    /// Create a new Stripe client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    /// * `webhook_secret` - Optional webhook signing secret (`whsec_...`)
    /// * `api_base` - Optional API base override (tests point this at a mock)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        webhook_secret: Option<String>,
        api_base: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_base: api_base.unwrap_or_else(|| Self::DEFAULT_API_BASE.to_string()),
            api_key: api_key.into(),
            webhook_secret,
        }
    }

    /// Whether a webhook signing secret is configured.
    #[must_use]
    pub fn has_webhook_secret(&self) -> bool {
        self.webhook_secret.is_some()
    }

    /// Create a Checkout session for purchasing a plan.
    ///
    /// The charged amount and currency come from the stored plan, never
    /// from caller input.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects it.
    pub async fn create_checkout_session(
        &self,
        plan: &Plan,
        user_email: Option<&str>,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let product_name = format!("{} {}", plan.service_name, plan.plan_name);

        let mut params = vec![
            ("mode", "payment".to_string()),
            ("success_url", success_url.to_string()),
            ("cancel_url", cancel_url.to_string()),
            (
                "line_items[0][price_data][currency]",
                plan.currency.to_lowercase(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                product_name,
            ),
            (
                "line_items[0][price_data][product_data][description]",
                format!("{} subscription", plan.duration),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                plan.price_cents.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[plan_id]", plan.id.clone()),
        ];

        if let Some(email) = user_email {
            params.push(("metadata[user_email]", email.to_string()));
            params.push(("customer_email", email.to_string()));
        }

        tracing::debug!(
            plan_id = %plan.id,
            amount_cents = %plan.price_cents,
            "Creating Stripe checkout session"
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_base))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Retrieve a Checkout session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects it.
    pub async fn get_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .client
            .get(format!("{}/checkout/sessions/{}", self.api_base, session_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Verify a webhook signature.
    ///
    /// The `Stripe-Signature` header carries `t=<timestamp>,v1=<sig>[,...]`;
    /// the signed payload is `<timestamp>.<body>` under HMAC-SHA256 with
    /// the webhook secret, compared in constant time.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Configuration` if no webhook secret is
    /// configured and `StripeError::InvalidSignature` if no candidate
    /// signature matches.
    pub fn verify_webhook_signature(
        &self,
        payload: &str,
        signature: &str,
    ) -> Result<(), StripeError> {
        let secret = self
            .webhook_secret
            .as_ref()
            .ok_or_else(|| StripeError::Configuration("Webhook secret not configured".into()))?;

        // Parse the signature header
        // Format: t=timestamp,v1=signature,v1=signature2,...
        let mut timestamp: Option<&str> = None;
        let mut signatures: Vec<&str> = Vec::new();

        for part in signature.split(',') {
            let mut kv = part.splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some("t"), Some(ts)) => timestamp = Some(ts),
                (Some("v1"), Some(sig)) => signatures.push(sig),
                _ => {}
            }
        }

        let Some(timestamp) = timestamp else {
            return Err(StripeError::InvalidSignature);
        };

        if signatures.is_empty() {
            return Err(StripeError::InvalidSignature);
        }

        let signed_payload = format!("{timestamp}.{payload}");
        let expected = hmac_sha256_hex(secret, &signed_payload);

        let valid = signatures.iter().any(|sig| constant_time_eq(&expected, sig));

        if valid {
            Ok(())
        } else {
            Err(StripeError::InvalidSignature)
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}
