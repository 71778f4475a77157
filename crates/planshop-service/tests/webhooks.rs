//! Stripe webhook integration tests.

mod common;

use axum::http::StatusCode;
use common::{stripe_signature, TestHarness};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planshop_core::{Catalog, PaymentTransaction};
use planshop_store::Store;

const WEBHOOK_SECRET: &str = "whsec_test";

/// Seed a pending transaction as if a checkout session had been opened.
fn seed_transaction(harness: &TestHarness, session_id: &str) {
    let catalog = Catalog::builtin();
    let plan = catalog.find("capcut-pro-monthly").unwrap();
    let tx = PaymentTransaction::pending(session_id, plan, Some("jane@example.com".into()));
    harness.store.put_transaction(&tx).unwrap();
}

/// A `checkout.session.completed` event body for a paid session.
fn paid_event(session_id: &str) -> String {
    json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": session_id,
                "status": "complete",
                "payment_status": "paid"
            }
        }
    })
    .to_string()
}

async fn post_signed(harness: &TestHarness, body: &str) -> axum_test::TestResponse {
    harness
        .server
        .post("/api/webhook/stripe")
        .add_header("stripe-signature", stripe_signature(WEBHOOK_SECRET, body))
        .content_type("application/json")
        .text(body.to_string())
        .await
}

fn signed_harness() -> TestHarness {
    // The Stripe API itself is never called by the webhook path; any base
    // URL works.
    TestHarness::with_stripe("http://stripe.invalid", Some(WEBHOOK_SECRET))
}

// ============================================================================
// Signature Verification
// ============================================================================

#[tokio::test]
async fn valid_signature_settles_payment_and_records_order() {
    let harness = signed_harness();
    seed_transaction(&harness, "cs_wh_1");

    let response = post_signed(&harness, &paid_event("cs_wh_1")).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);

    let tx = harness
        .store
        .get_transaction_by_session("cs_wh_1")
        .unwrap()
        .unwrap();
    assert_eq!(tx.status, planshop_core::CheckoutState::Completed);
    assert_eq!(tx.payment_status, planshop_core::PaymentState::Paid);

    let order = harness
        .store
        .find_order_by_session("cs_wh_1")
        .unwrap()
        .expect("order recorded");
    assert_eq!(order.status, planshop_core::OrderStatus::Completed);
    assert_eq!(order.amount_cents, 999);
    assert_eq!(order.user_email.as_deref(), Some("jane@example.com"));
}

#[tokio::test]
async fn tampered_body_is_rejected() {
    let harness = signed_harness();
    seed_transaction(&harness, "cs_wh_2");

    let body = paid_event("cs_wh_2");
    let response = harness
        .server
        .post("/api/webhook/stripe")
        .add_header(
            "stripe-signature",
            stripe_signature("whsec_wrong", &body),
        )
        .content_type("application/json")
        .text(body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: serde_json::Value = response.json();
    assert_eq!(error["error"]["code"], "invalid_signature");
    assert!(harness.store.find_order_by_session("cs_wh_2").unwrap().is_none());
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let harness = signed_harness();

    let response = harness
        .server
        .post("/api/webhook/stripe")
        .content_type("application/json")
        .text(paid_event("cs_wh_3"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verification_is_skipped_when_no_secret_is_configured() {
    // Development mode: no Stripe configuration at all.
    let harness = TestHarness::new();
    seed_transaction(&harness, "cs_wh_4");

    let response = harness
        .server
        .post("/api/webhook/stripe")
        .content_type("application/json")
        .text(paid_event("cs_wh_4"))
        .await;

    response.assert_status_ok();
    assert!(harness.store.find_order_by_session("cs_wh_4").unwrap().is_some());
}

// ============================================================================
// Idempotency & Convergence
// ============================================================================

#[tokio::test]
async fn redelivered_event_records_only_one_order() {
    let harness = signed_harness();
    seed_transaction(&harness, "cs_wh_5");

    post_signed(&harness, &paid_event("cs_wh_5")).await.assert_status_ok();
    post_signed(&harness, &paid_event("cs_wh_5")).await.assert_status_ok();
    post_signed(&harness, &paid_event("cs_wh_5")).await.assert_status_ok();

    let orders = harness
        .store
        .list_orders(Some("jane@example.com"), 1000)
        .unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn webhook_then_poll_converge_on_one_order() {
    let stripe = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_wh_6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_wh_6",
            "status": "complete",
            "payment_status": "paid"
        })))
        .mount(&stripe)
        .await;
    let harness = TestHarness::with_stripe(&stripe.uri(), Some(WEBHOOK_SECRET));
    seed_transaction(&harness, "cs_wh_6");

    // Webhook settles first; the later poll sees an unchanged pair.
    post_signed(&harness, &paid_event("cs_wh_6")).await.assert_status_ok();
    harness
        .server
        .get("/api/checkout/status/cs_wh_6")
        .await
        .assert_status_ok();

    let orders = harness
        .store
        .list_orders(Some("jane@example.com"), 1000)
        .unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn poll_then_webhook_converge_on_one_order() {
    let stripe = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_wh_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_wh_7",
            "status": "complete",
            "payment_status": "paid"
        })))
        .mount(&stripe)
        .await;
    let harness = TestHarness::with_stripe(&stripe.uri(), Some(WEBHOOK_SECRET));
    seed_transaction(&harness, "cs_wh_7");

    // Poll settles first; the webhook's existence check then declines.
    harness
        .server
        .get("/api/checkout/status/cs_wh_7")
        .await
        .assert_status_ok();
    post_signed(&harness, &paid_event("cs_wh_7")).await.assert_status_ok();

    let orders = harness
        .store
        .list_orders(Some("jane@example.com"), 1000)
        .unwrap();
    assert_eq!(orders.len(), 1);
}

// ============================================================================
// Event Handling Edge Cases
// ============================================================================

#[tokio::test]
async fn unpaid_session_event_records_no_order() {
    let harness = signed_harness();
    seed_transaction(&harness, "cs_wh_8");

    let body = json!({
        "id": "evt_2",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_wh_8",
                "status": "complete",
                "payment_status": "unpaid"
            }
        }
    })
    .to_string();

    post_signed(&harness, &body).await.assert_status_ok();

    assert!(harness.store.find_order_by_session("cs_wh_8").unwrap().is_none());
}

#[tokio::test]
async fn event_for_unknown_session_is_acknowledged() {
    let harness = signed_harness();

    let response = post_signed(&harness, &paid_event("cs_wh_never_opened")).await;

    response.assert_status_ok();
    assert!(harness.store.list_orders(None, 1000).unwrap().is_empty());
}

#[tokio::test]
async fn expiry_event_marks_transaction_expired() {
    let harness = signed_harness();
    seed_transaction(&harness, "cs_wh_9");

    let body = json!({
        "id": "evt_3",
        "type": "checkout.session.expired",
        "data": {
            "object": {
                "id": "cs_wh_9",
                "status": "expired",
                "payment_status": "unpaid"
            }
        }
    })
    .to_string();

    post_signed(&harness, &body).await.assert_status_ok();

    let tx = harness
        .store
        .get_transaction_by_session("cs_wh_9")
        .unwrap()
        .unwrap();
    assert_eq!(tx.status, planshop_core::CheckoutState::Expired);
    assert!(harness.store.find_order_by_session("cs_wh_9").unwrap().is_none());
}

#[tokio::test]
async fn unhandled_event_types_are_acknowledged() {
    let harness = signed_harness();

    let body = json!({
        "id": "evt_4",
        "type": "invoice.payment_failed",
        "data": { "object": {} }
    })
    .to_string();

    let response = post_signed(&harness, &body).await;

    response.assert_status_ok();
    let received: serde_json::Value = response.json();
    assert_eq!(received["received"], true);
}
