//! Planshop Client SDK.
//!
//! This crate provides a client library for interacting with the Planshop
//! subscription store API.
//!
//! # Example
//!
//! ```no_run
//! use planshop_client::{CheckoutInput, PlanshopClient};
//!
//! # async fn example() -> Result<(), planshop_client::ClientError> {
//! let client = PlanshopClient::new("http://planshop.svc:8080")?;
//!
//! // Browse the catalog and open a checkout session
//! let plans = client.list_plans().await?;
//! let session = client
//!     .create_checkout_session(CheckoutInput {
//!         plan_id: plans[0].id.clone(),
//!         user_email: Some("jane@example.com".to_string()),
//!         origin_url: "https://shop.example.com".to_string(),
//!     })
//!     .await?;
//!
//! println!("Redirect the user to {}", session.url);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::PlanshopClient;
pub use error::ClientError;
pub use types::*;
