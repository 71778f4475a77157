//! Liveness/version handler.

use axum::Json;
use serde::Serialize;

/// Root response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Service description.
    pub message: String,
    /// Service version.
    pub version: String,
}

/// Report service liveness and version.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Planshop Subscription Store API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
