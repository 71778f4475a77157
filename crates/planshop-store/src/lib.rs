//! `RocksDB` storage layer for Planshop.
//!
//! This crate provides persistent storage for accounts, orders, and
//! payment transactions using `RocksDB` with column families for efficient
//! indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Account records, keyed by email
//! - `orders`: Order records, keyed by `order_id` (ULID, time-ordered)
//! - `orders_by_email`: Index for listing orders by user email
//! - `orders_by_session`: Index mapping a checkout session to its
//!   completed order — this index is the uniqueness constraint behind the
//!   at-most-once order guarantee
//! - `transactions`: Payment transactions, keyed by checkout session id
//!
//! # Example
//!
//! ```no_run
//! use planshop_store::{RocksStore, Store};
//! use planshop_core::Account;
//!
//! let store = RocksStore::open("/tmp/planshop-db").unwrap();
//!
//! let account = Account::new("jane@example.com", "Jane", "Doe");
//! store.put_account(&account).unwrap();
//!
//! let found = store.find_account_by_email("jane@example.com").unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use planshop_core::{Account, Order, OrderId, PaymentTransaction};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations behind the HTTP handlers.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert or update an account record, keyed by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_account(&self, account: &Account) -> Result<()>;

    /// Get an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    // =========================================================================
    // Order Operations
    // =========================================================================

    /// Insert or update an order record.
    ///
    /// This also maintains the email index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_order(&self, order: &Order) -> Result<()>;

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_order(&self, order_id: &OrderId) -> Result<Option<Order>>;

    /// List orders, optionally filtered by user email, oldest first.
    ///
    /// At most `limit` records are scanned and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_orders(&self, user_email: Option<&str>, limit: usize) -> Result<Vec<Order>>;

    /// Find the order recorded for a checkout session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_order_by_session(&self, session_id: &str) -> Result<Option<Order>>;

    /// Record the completed order for a checkout session only if no order
    /// for that session exists yet.
    ///
    /// The existence check and the write happen under a store-internal
    /// lock, so concurrent callers (a status poll racing a webhook
    /// delivery) record exactly one order per session. Returns `true` if
    /// the order was inserted, `false` if one already existed (no write).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidRecord` if the order carries no session
    /// id, or an error if the database operation fails.
    fn insert_order_for_session(&self, order: &Order) -> Result<bool>;

    // =========================================================================
    // Payment Transaction Operations
    // =========================================================================

    /// Insert or update a payment transaction, keyed by session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_transaction(&self, transaction: &PaymentTransaction) -> Result<()>;

    /// Get the payment transaction for a checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction_by_session(&self, session_id: &str) -> Result<Option<PaymentTransaction>>;
}
