//! Account registration and login handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use planshop_core::Account;
use planshop_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Account response.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
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

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            created_at: account.created_at.to_rfc3339(),
            is_active: account.is_active,
        }
    }
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address (unique).
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Password. Accepted but not persisted — see `login`.
    #[allow(dead_code)]
    pub password: String,
}

/// Register a new account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    if state.store.find_account_by_email(&body.email)?.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    // The password is dropped here; nothing downstream can verify it.
    let account = Account::new(body.email, body.first_name, body.last_name);
    state.store.put_account(&account)?;

    tracing::info!(email = %account.email, account_id = %account.id, "Account created");

    Ok(Json(AccountResponse::from(&account)))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password. Not checked — see the handler.
    #[allow(dead_code)]
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Human-readable result.
    pub message: String,
    /// The matched account id.
    pub user_id: String,
}

/// Stub login: matches on email only.
///
/// TODO: hash passwords at registration (argon2) and verify them here
/// before this endpoint is treated as authentication.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state
        .store
        .find_account_by_email(&body.email)?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: account.id.to_string(),
    }))
}
