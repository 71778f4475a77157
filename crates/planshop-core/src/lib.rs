//! Core types for the Planshop subscription store.
//!
//! This crate provides the foundational types used throughout Planshop:
//!
//! - **Identifiers**: `UserId`, `OrderId`, `TransactionId`
//! - **Catalog**: `Plan`, `Catalog` (the fixed set of purchasable plans)
//! - **Accounts**: `Account`
//! - **Orders**: `Order`, `OrderStatus`
//! - **Payments**: `PaymentTransaction`, `CheckoutState`, `PaymentState`,
//!   and the status-reconciliation rule
//!
//! # Money
//!
//! All amounts are stored as **integer cents** (`i64`) — a $9.99 plan is
//! `999`. This matches Stripe's `unit_amount` and avoids floating point
//! precision issues.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod catalog;
pub mod ids;
pub mod order;
pub mod payment;

pub use account::Account;
pub use catalog::{Catalog, Plan};
pub use ids::{IdError, OrderId, TransactionId, UserId};
pub use order::{Order, OrderStatus};
pub use payment::{CheckoutState, PaymentState, PaymentTransaction, Reconciliation};
