//! The Planshop API client.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::ClientError;
use crate::types::{
    AccountInfo, CheckoutInput, CheckoutSessionInfo, CheckoutStatusInfo, CreateOrderInput,
    LoginInfo, OrderInfo, PlanInfo, RegisterInput,
};

/// Error body shape returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: String,
    message: String,
}

/// Client for the Planshop subscription store API.
#[derive(Debug, Clone)]
pub struct PlanshopClient {
    client: Client,
    base_url: String,
}

impl PlanshopClient {
    /// Create a new client for the given base URL (without the `/api`
    /// prefix, e.g. `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(ClientError::InvalidBaseUrl("empty base URL".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// List all active subscription plans.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn list_plans(&self) -> Result<Vec<PlanInfo>, ClientError> {
        let response = self.client.get(self.url("/subscriptions")).send().await?;
        Self::handle(response).await
    }

    /// Get a specific subscription plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the plan is unknown.
    pub async fn get_plan(&self, plan_id: &str) -> Result<PlanInfo, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/subscriptions/{plan_id}")))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the email is taken.
    pub async fn register(&self, input: RegisterInput) -> Result<AccountInfo, ClientError> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(&input)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Log in with an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no account matches.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginInfo, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Create a pending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the plan is unknown.
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<OrderInfo, ClientError> {
        let response = self
            .client
            .post(self.url("/orders"))
            .json(&input)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Get order details.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order is unknown.
    pub async fn get_order(&self, order_id: &str) -> Result<OrderInfo, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/orders/{order_id}")))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// List orders, optionally filtered by user email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_orders(
        &self,
        user_email: Option<&str>,
    ) -> Result<Vec<OrderInfo>, ClientError> {
        let mut request = self.client.get(self.url("/orders"));
        if let Some(email) = user_email {
            request = request.query(&[("user_email", email)]);
        }
        let response = request.send().await?;
        Self::handle(response).await
    }

    /// Open a checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the plan is unknown, or the
    /// payment processor is unavailable.
    pub async fn create_checkout_session(
        &self,
        input: CheckoutInput,
    ) -> Result<CheckoutSessionInfo, ClientError> {
        let response = self
            .client
            .post(self.url("/checkout/session"))
            .json(&input)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Poll a checkout session's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the session is unknown.
    pub async fn checkout_status(
        &self,
        session_id: &str,
    ) -> Result<CheckoutStatusInfo, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/checkout/status/{session_id}")))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Handle an API response, converting error bodies.
    async fn handle<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: Result<ApiErrorBody, _> = response.json().await;
        match body {
            Ok(parsed) => Err(ClientError::Api {
                status: status.as_u16(),
                code: parsed.error.code,
                message: parsed.error.message,
            }),
            Err(_) => Err(ClientError::Api {
                status: status.as_u16(),
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn plan_json() -> serde_json::Value {
        json!({
            "id": "capcut-pro-monthly",
            "service_name": "CapCut",
            "plan_name": "Pro Monthly",
            "price_cents": 999,
            "price_formatted": "$9.99",
            "currency": "USD",
            "duration": "monthly",
            "features": ["HD video exports"],
            "image_url": "https://images.example.com/capcut.jpg",
            "is_active": true
        })
    }

    #[tokio::test]
    async fn list_plans_deserializes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([plan_json()])))
            .mount(&server)
            .await;

        let client = PlanshopClient::new(server.uri()).unwrap();
        let plans = client.list_plans().await.unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].price_cents, 999);
    }

    #[tokio::test]
    async fn api_errors_are_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/subscriptions/unknown"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": "not_found", "message": "Subscription plan not found: unknown" }
            })))
            .mount(&server)
            .await;

        let client = PlanshopClient::new(server.uri()).unwrap();
        let err = client.get_plan("unknown").await.unwrap_err();

        match err {
            ClientError::Api { status, code, .. } => {
                assert_eq!(status, 404);
                assert_eq!(code, "not_found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_orders_passes_email_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .and(query_param("user_email", "jane@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = PlanshopClient::new(server.uri()).unwrap();
        let orders = client.list_orders(Some("jane@example.com")).await.unwrap();

        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn checkout_roundtrip_types() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/checkout/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": "https://checkout.stripe.test/c/pay/cs_1",
                "session_id": "cs_1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/checkout/status/cs_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": "cs_1",
                "status": "pending",
                "payment_status": "pending",
                "amount_cents": 999,
                "currency": "USD"
            })))
            .mount(&server)
            .await;

        let client = PlanshopClient::new(server.uri()).unwrap();
        let session = client
            .create_checkout_session(CheckoutInput {
                plan_id: "capcut-pro-monthly".to_string(),
                user_email: None,
                origin_url: "https://shop.example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.session_id, "cs_1");

        let status = client.checkout_status("cs_1").await.unwrap();
        assert_eq!(status.payment_status, "pending");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(matches!(
            PlanshopClient::new(""),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }
}
