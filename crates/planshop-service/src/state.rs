//! Application state.

use std::sync::Arc;

use planshop_core::Catalog;
use planshop_store::RocksStore;

use crate::config::ServiceConfig;
use crate::stripe::StripeClient;

/// Application state shared across handlers.
///
/// Everything a handler touches — the store, the plan catalog, the
/// optional Stripe client — is constructed here at startup and passed
/// down explicitly; there are no ambient globals.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// The fixed plan catalog.
    pub catalog: Arc<Catalog>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Stripe client for payments (optional).
    pub stripe: Option<Arc<StripeClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, catalog: Catalog, config: ServiceConfig) -> Self {
        // Create Stripe client if configured
        let stripe = config.stripe_api_key.as_ref().map(|key| {
            let client = StripeClient::new(
                key,
                config.stripe_webhook_secret.clone(),
                config.stripe_api_base.clone(),
            );
            tracing::info!("Stripe integration enabled");
            Arc::new(client)
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - checkout will not be available");
        }

        Self {
            store,
            catalog: Arc::new(catalog),
            config,
            stripe,
        }
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }
}
