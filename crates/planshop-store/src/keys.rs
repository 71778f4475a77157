//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families.

use planshop_core::OrderId;

/// Separator between the variable-length email and the order id in the
/// email index. Emails never contain NUL, so prefix scans cannot bleed
/// from `a@x` into `a@xy`.
const EMAIL_SEP: u8 = 0x00;

/// Create an account key from an email address.
#[must_use]
pub fn account_key(email: &str) -> Vec<u8> {
    email.as_bytes().to_vec()
}

/// Create an order key from an order ID.
#[must_use]
pub fn order_key(order_id: &OrderId) -> Vec<u8> {
    order_id.to_bytes().to_vec()
}

/// Create an email-order index key.
///
/// Format: `email || 0x00 || order_id (16 bytes)`
///
/// Since ULIDs are time-ordered, orders for a user will be sorted by time.
#[must_use]
pub fn email_order_key(email: &str, order_id: &OrderId) -> Vec<u8> {
    let mut key = Vec::with_capacity(email.len() + 1 + 16);
    key.extend_from_slice(email.as_bytes());
    key.push(EMAIL_SEP);
    key.extend_from_slice(&order_id.to_bytes());
    key
}

/// Create a prefix for iterating all orders for an email.
#[must_use]
pub fn email_orders_prefix(email: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(email.len() + 1);
    prefix.extend_from_slice(email.as_bytes());
    prefix.push(EMAIL_SEP);
    prefix
}

/// Extract the order ID from an email-order index key.
///
/// # Panics
///
/// Panics if the key does not end with 16 order-id bytes.
#[must_use]
pub fn extract_order_id_from_email_key(key: &[u8]) -> OrderId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[key.len() - 16..]);
    OrderId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a session key (used by both the session index and the
/// transactions column family).
#[must_use]
pub fn session_key(session_id: &str) -> Vec<u8> {
    session_id.as_bytes().to_vec()
}
