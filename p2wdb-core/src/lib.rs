//! # P2WDB Core
//!
//! Core types, errors, and traits shared by the P2WDB client crates.
//!
//! - **Types**: Entries, write requests, cost quotes and the funds check result
//! - **Errors**: A single error enum covering input, payment and network failures
//! - **Constants**: Server defaults, the PSF token id and payment thresholds
//! - **Traits**: The [`Wallet`] capability the write path pays with
//! - **Retry**: A fixed-delay bounded retry policy
//!
//! ## Example
//!
//! ```rust
//! use p2wdb_core::Entry;
//!
//! let entry = Entry::new("my-app", serde_json::json!({ "hello": "world" }));
//! let json = serde_json::to_string(&entry).unwrap();
//! assert!(json.contains("\"appId\":\"my-app\""));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod retry;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{P2wdbError, Result};
pub use retry::RetryPolicy;
pub use traits::*;
pub use types::*;
