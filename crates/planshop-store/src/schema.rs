//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Account records, keyed by email.
    pub const ACCOUNTS: &str = "accounts";

    /// Order records, keyed by `order_id` (ULID).
    pub const ORDERS: &str = "orders";

    /// Index: orders by user email, keyed by `email || 0x00 || order_id`.
    /// Value is empty (index only).
    pub const ORDERS_BY_EMAIL: &str = "orders_by_email";

    /// Index: completed order per checkout session, keyed by session id.
    /// Value is the `order_id`. Presence of the key is the uniqueness
    /// constraint for the payment flow.
    pub const ORDERS_BY_SESSION: &str = "orders_by_session";

    /// Payment transactions, keyed by checkout session id.
    pub const TRANSACTIONS: &str = "transactions";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::ORDERS,
        cf::ORDERS_BY_EMAIL,
        cf::ORDERS_BY_SESSION,
        cf::TRANSACTIONS,
    ]
}
