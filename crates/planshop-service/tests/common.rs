//! Common test utilities for planshop integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use planshop_core::Catalog;
use planshop_service::{create_router, AppState, ServiceConfig};
use planshop_store::RocksStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct handle on the store, for asserting on persisted records.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and no Stripe.
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// Create a harness whose Stripe client points at a mock server.
    pub fn with_stripe(api_base: &str, webhook_secret: Option<&str>) -> Self {
        Self::build(Some(api_base.to_string()), webhook_secret.map(String::from))
    }

    fn build(stripe_api_base: Option<String>, stripe_webhook_secret: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            stripe_api_key: stripe_api_base.as_ref().map(|_| "sk_test_harness".into()),
            stripe_webhook_secret,
            stripe_api_base,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::clone(&store), Catalog::builtin(), config);
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a valid `Stripe-Signature` header for a webhook body.
pub fn stripe_signature(secret: &str, body: &str) -> String {
    let timestamp = 1_700_000_000_i64;
    let sig = planshop_service::crypto::hmac_sha256_hex(secret, &format!("{timestamp}.{body}"));
    format!("t={timestamp},v1={sig}")
}
