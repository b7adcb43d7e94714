//! Domain types for P2WDB.
//!
//! - [`Entry`]: The record written to the database
//! - [`TokenWriteRequest`] / [`CoinWriteRequest`]: Bodies of the two write endpoints
//! - [`WriteResult`]: Server answer to a write
//! - [`FundsCheck`]: Which payment path a wallet can afford

mod entry;
mod payment;

pub use entry::*;
pub use payment::*;
