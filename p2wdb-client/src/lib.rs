//! # P2WDB Client
//!
//! Clients for the pay-to-write database:
//!
//! - [`ReadClient`]: Paginated and keyed reads, no payment needed
//! - [`WriteClient`]: Pays for a write (PSF burn or BCH payment) and submits it
//! - [`PinClient`]: Pin requests written through the P2WDB
//! - [`PinServiceClient`]: Direct calls to the pinning service
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use p2wdb_client::{P2wdbConfig, ReadClient, WriteClient};
//!
//! let config = P2wdbConfig::default();
//!
//! let reader = ReadClient::with_config(config.clone())?;
//! let latest = reader.get_page(0).await?;
//!
//! let writer = WriteClient::builder()
//!     .config(config)
//!     .wallet(Arc::new(my_wallet))
//!     .build()?;
//! let result = writer.post_entry(serde_json::json!({ "hello": "world" }), "my-app").await?;
//! println!("zcid: {:?}", result.zcid());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
mod http;
pub mod pin;
pub mod read;
pub mod write;

#[cfg(test)]
mod testing;

pub use config::P2wdbConfig;
pub use pin::{PinClient, PinClientBuilder, PinServiceClient};
pub use read::ReadClient;
pub use write::{WriteClient, WriteClientBuilder};

pub use p2wdb_core::{
    Entry, FundsCheck, P2wdbError, PaymentOutput, Result, RetryPolicy, TokenBalance, Wallet,
    WriteResult,
};
