//! User account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user account, created once per email address.
///
/// Accounts are never updated or deleted; email is the unique lookup key.
/// No credential material is stored — registration discards the submitted
/// password (see the login handler for the matching stub).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The account identifier.
    pub id: UserId,

    /// Email address (unique).
    pub email: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// Whether the account is active.
    pub is_active: bool,
}

impl Account {
    /// Create a new active account.
    #[must_use]
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at: Utc::now(),
            is_active: true,
        }
    }
}
