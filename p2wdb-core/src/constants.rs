//! Protocol constants and defaults for P2WDB clients.
//!
//! Every value here can be overridden through the client configuration.

// ═══════════════════════════════════════════════════════════════════════════════
// SERVERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default P2WDB server.
pub const DEFAULT_SERVER_URL: &str = "https://p2wdb.fullstack.cash";

/// Default P2WDB pinning service.
pub const DEFAULT_PIN_SERVER_URL: &str = "https://p2wdb-pin.fullstack.cash";

// ═══════════════════════════════════════════════════════════════════════════════
// PAYMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Token id of the PSF token burned to pay for writes.
pub const PSF_TOKEN_ID: &str = "38e97c5d7d3585a2cbf3f9580c82ca33985f9cb0845d4dcce220cb709f9538b0";

/// Minimum wallet balance, in satoshis, needed to pay the fees of a write.
pub const SAT_THRESHOLD: u64 = 5000;

/// PSF write cost used until the server has been asked for the current price.
pub const DEFAULT_WRITE_COST_PSF: f64 = 0.133;

/// Satoshis per BCH.
pub const SATS_PER_BCH: f64 = 100_000_000.0;

/// Delay after a BCH payment before the write is submitted, so the server
/// can see the payment transaction.
pub const PAYMENT_SETTLE_MS: u64 = 3000;

// ═══════════════════════════════════════════════════════════════════════════════
// RETRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Attempts made by the retry policy, including the first one.
pub const RETRY_ATTEMPTS: u32 = 3;

/// Fixed delay between retry attempts.
pub const RETRY_DELAY_MS: u64 = 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// APP IDS
// ═══════════════════════════════════════════════════════════════════════════════

/// App id the pinning service watches for CID pin requests.
pub const PIN_APP_ID: &str = "p2wdb-pin-001";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psf_token_id_is_hex_hash() {
        assert_eq!(PSF_TOKEN_ID.len(), 64);
        assert!(PSF_TOKEN_ID.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_retry_defaults() {
        assert_eq!(RETRY_ATTEMPTS, 3);
        assert!(RETRY_DELAY_MS > 0);
    }
}
