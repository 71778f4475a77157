//! Checkout flow integration tests against a mocked Stripe API.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planshop_store::Store;

/// Mount the session-creation mock.
async fn mount_create_session(stripe: &MockServer, session_id: &str) {
    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": session_id,
            "url": format!("https://checkout.stripe.test/c/pay/{session_id}"),
            "status": "open",
            "payment_status": "unpaid"
        })))
        .mount(stripe)
        .await;
}

/// Mount the session-retrieval mock with the given status pair.
async fn mount_get_session(
    stripe: &MockServer,
    session_id: &str,
    status: &str,
    payment_status: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!("/checkout/sessions/{session_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": session_id,
            "status": status,
            "payment_status": payment_status,
            "amount_total": 999,
            "currency": "usd"
        })))
        .mount(stripe)
        .await;
}

async fn open_capcut_session(harness: &TestHarness) -> serde_json::Value {
    let response = harness
        .server
        .post("/api/checkout/session")
        .json(&json!({
            "plan_id": "capcut-pro-monthly",
            "user_email": "jane@example.com",
            "origin_url": "https://shop.example.com"
        }))
        .await;

    response.assert_status_ok();
    response.json()
}

// ============================================================================
// Opening Sessions
// ============================================================================

#[tokio::test]
async fn open_session_persists_pending_transaction() {
    let stripe = MockServer::start().await;
    mount_create_session(&stripe, "cs_test_123").await;
    let harness = TestHarness::with_stripe(&stripe.uri(), None);

    let body = open_capcut_session(&harness).await;

    assert_eq!(body["session_id"], "cs_test_123");
    assert_eq!(
        body["url"],
        "https://checkout.stripe.test/c/pay/cs_test_123"
    );

    let tx = harness
        .store
        .get_transaction_by_session("cs_test_123")
        .unwrap()
        .expect("transaction persisted");
    assert_eq!(tx.amount_cents, 999);
    assert_eq!(tx.currency, "USD");
    assert_eq!(tx.status, planshop_core::CheckoutState::Pending);
    assert_eq!(tx.payment_status, planshop_core::PaymentState::Pending);
    assert_eq!(tx.metadata.get("plan_id").unwrap(), "capcut-pro-monthly");
    assert_eq!(tx.user_email.as_deref(), Some("jane@example.com"));
}

#[tokio::test]
async fn open_session_for_unknown_plan_is_not_found() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri(), None);

    let response = harness
        .server
        .post("/api/checkout/session")
        .json(&json!({
            "plan_id": "netflix-4k-monthly",
            "origin_url": "https://shop.example.com"
        }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn open_session_without_stripe_is_unavailable() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/checkout/session")
        .json(&json!({
            "plan_id": "capcut-pro-monthly",
            "origin_url": "https://shop.example.com"
        }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "unavailable");
}

#[tokio::test]
async fn stripe_rejection_surfaces_as_bad_gateway() {
    let stripe = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "type": "card_error",
                "message": "Your card was declined.",
                "code": "card_declined"
            }
        })))
        .mount(&stripe)
        .await;
    let harness = TestHarness::with_stripe(&stripe.uri(), None);

    let response = harness
        .server
        .post("/api/checkout/session")
        .json(&json!({
            "plan_id": "capcut-pro-monthly",
            "origin_url": "https://shop.example.com"
        }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "external_service_error");
}

// ============================================================================
// Status Polling & Reconciliation
// ============================================================================

#[tokio::test]
async fn paid_poll_records_exactly_one_completed_order() {
    let stripe = MockServer::start().await;
    mount_create_session(&stripe, "cs_test_123").await;
    let harness = TestHarness::with_stripe(&stripe.uri(), None);

    open_capcut_session(&harness).await;
    mount_get_session(&stripe, "cs_test_123", "complete", "paid").await;

    // First poll settles the payment and records the order.
    let response = harness.server.get("/api/checkout/status/cs_test_123").await;
    response.assert_status_ok();
    let status: serde_json::Value = response.json();
    assert_eq!(status["status"], "completed");
    assert_eq!(status["payment_status"], "paid");
    assert_eq!(status["amount_cents"], 999);

    let orders = harness
        .store
        .list_orders(Some("jane@example.com"), 1000)
        .unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.status, planshop_core::OrderStatus::Completed);
    assert_eq!(order.amount_cents, 999);
    assert_eq!(order.currency, "USD");
    assert_eq!(order.payment_session_id.as_deref(), Some("cs_test_123"));

    let settled = harness
        .store
        .get_transaction_by_session("cs_test_123")
        .unwrap()
        .unwrap();

    // A second identical poll changes nothing: same response, no new
    // order, and no store write (updated_at untouched).
    let response = harness.server.get("/api/checkout/status/cs_test_123").await;
    response.assert_status_ok();
    let status: serde_json::Value = response.json();
    assert_eq!(status["payment_status"], "paid");

    let orders = harness
        .store
        .list_orders(Some("jane@example.com"), 1000)
        .unwrap();
    assert_eq!(orders.len(), 1);

    let after = harness
        .store
        .get_transaction_by_session("cs_test_123")
        .unwrap()
        .unwrap();
    assert_eq!(after.updated_at, settled.updated_at);
}

#[tokio::test]
async fn unpaid_poll_is_a_noop() {
    let stripe = MockServer::start().await;
    mount_create_session(&stripe, "cs_test_456").await;
    let harness = TestHarness::with_stripe(&stripe.uri(), None);

    harness
        .server
        .post("/api/checkout/session")
        .json(&json!({
            "plan_id": "capcut-pro-monthly",
            "user_email": "jane@example.com",
            "origin_url": "https://shop.example.com"
        }))
        .await
        .assert_status_ok();

    let opened = harness
        .store
        .get_transaction_by_session("cs_test_456")
        .unwrap()
        .unwrap();

    mount_get_session(&stripe, "cs_test_456", "open", "unpaid").await;

    let response = harness.server.get("/api/checkout/status/cs_test_456").await;
    response.assert_status_ok();
    let status: serde_json::Value = response.json();
    assert_eq!(status["status"], "pending");
    assert_eq!(status["payment_status"], "pending");

    let after = harness
        .store
        .get_transaction_by_session("cs_test_456")
        .unwrap()
        .unwrap();
    assert_eq!(after.updated_at, opened.updated_at);
    assert!(harness.store.list_orders(None, 1000).unwrap().is_empty());
}

#[tokio::test]
async fn expired_poll_updates_without_recording_an_order() {
    let stripe = MockServer::start().await;
    mount_create_session(&stripe, "cs_test_789").await;
    let harness = TestHarness::with_stripe(&stripe.uri(), None);

    open_capcut_session(&harness).await;
    mount_get_session(&stripe, "cs_test_789", "expired", "unpaid").await;

    let response = harness.server.get("/api/checkout/status/cs_test_789").await;
    response.assert_status_ok();
    let status: serde_json::Value = response.json();
    assert_eq!(status["status"], "expired");

    assert!(harness.store.list_orders(None, 1000).unwrap().is_empty());
}

#[tokio::test]
async fn poll_unknown_session_is_not_found() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/checkout/status/cs_missing").await;

    response.assert_status_not_found();
}
