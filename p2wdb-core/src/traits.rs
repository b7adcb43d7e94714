//! Common traits for P2WDB clients.
//!
//! The write path never touches keys or UTXOs itself; everything that moves
//! money or produces a signature goes through [`Wallet`].

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PaymentOutput, TokenBalance};

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to a BCH/SLP wallet able to pay for writes.
///
/// Implementations own their balance cache and UTXO set. Failures should be
/// reported as [`P2wdbError::WalletError`](crate::error::P2wdbError::WalletError)
/// so the retry policy treats them as transient.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Brings the wallet's view of its UTXOs and balance up to date.
    async fn sync(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the BCH balance in satoshis.
    async fn get_balance(&self) -> Result<u64>;

    /// Lists the SLP tokens held by the wallet.
    async fn list_tokens(&self) -> Result<Vec<TokenBalance>>;

    /// Burns `qty` of the token `token_id`.
    ///
    /// Returns the burn transaction id.
    async fn burn_tokens(&self, qty: f64, token_id: &str) -> Result<String>;

    /// Sends BCH to the given outputs.
    ///
    /// Returns the payment transaction id.
    async fn send(&self, outputs: &[PaymentOutput]) -> Result<String>;

    /// Signs a message with the wallet's private key (Bitcoin signed message,
    /// base64 encoded).
    fn sign_message(&self, message: &str) -> Result<String>;
}
