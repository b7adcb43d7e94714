//! Error types for P2WDB clients.
//!
//! This module provides the error hierarchy using `thiserror`.
//! Errors raised by a [`Wallet`](crate::traits::Wallet) implementation are
//! expected to be reported as [`P2wdbError::WalletError`].

use thiserror::Error;

/// Result type alias using `P2wdbError`.
pub type Result<T> = std::result::Result<T, P2wdbError>;

/// Main error type for all P2WDB operations.
#[derive(Debug, Error)]
pub enum P2wdbError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A wallet or signing key was required but not supplied.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Required input data was absent.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Content identifier is malformed.
    #[error("Invalid CID: {0}")]
    InvalidCid(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // PAYMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The wallet cannot pay for a write with either payment method.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The server does not accept the requested payment method.
    #[error("Unsupported payment mode: {0}")]
    UnsupportedPaymentMode(String),

    /// Wallet operation (sync, balance, burn, send, sign) failed.
    #[error("Wallet error: {0}")]
    WalletError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
        /// Response body, possibly empty
        body: String,
    },

    /// Requested entry does not exist.
    #[error("Entry not found: {0}")]
    NotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Server response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl P2wdbError {
    /// Returns true if this error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        match self {
            P2wdbError::HttpError(_) | P2wdbError::WalletError(_) => true,
            P2wdbError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this is a payment error.
    pub fn is_payment_error(&self) -> bool {
        matches!(
            self,
            P2wdbError::InsufficientFunds(_)
                | P2wdbError::UnsupportedPaymentMode(_)
                | P2wdbError::WalletError(_)
        )
    }

    /// Returns true if this is an input validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            P2wdbError::MissingCredential(_)
                | P2wdbError::MissingInput(_)
                | P2wdbError::InvalidCid(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = P2wdbError::HttpStatus {
            status: 503,
            url: "http://localhost/entry/write".into(),
            body: "busy".into(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("/entry/write"));
    }

    #[test_case(P2wdbError::HttpError("reset".into()), true ; "transport failure")]
    #[test_case(P2wdbError::WalletError("utxo fetch".into()), true ; "wallet rpc")]
    #[test_case(P2wdbError::HttpStatus { status: 502, url: String::new(), body: String::new() }, true ; "bad gateway")]
    #[test_case(P2wdbError::HttpStatus { status: 429, url: String::new(), body: String::new() }, true ; "rate limited")]
    #[test_case(P2wdbError::HttpStatus { status: 422, url: String::new(), body: String::new() }, false ; "rejected write")]
    #[test_case(P2wdbError::InsufficientFunds("100 sats".into()), false ; "insufficient funds")]
    #[test_case(P2wdbError::MissingInput("data".into()), false ; "missing input")]
    #[test_case(P2wdbError::NotFound("hash".into()), false ; "not found")]
    fn test_error_recoverable(err: P2wdbError, expected: bool) {
        assert_eq!(err.is_recoverable(), expected);
    }

    #[test]
    fn test_error_classification() {
        assert!(P2wdbError::InsufficientFunds("test".into()).is_payment_error());
        assert!(P2wdbError::UnsupportedPaymentMode("test".into()).is_payment_error());
        assert!(!P2wdbError::HttpError("test".into()).is_payment_error());

        assert!(P2wdbError::MissingCredential("test".into()).is_validation_error());
        assert!(P2wdbError::InvalidCid("test".into()).is_validation_error());
        assert!(!P2wdbError::ConfigError("test".into()).is_validation_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let p2wdb_result: Result<serde_json::Value> = json_result.map_err(P2wdbError::from);
        assert!(matches!(p2wdb_result, Err(P2wdbError::JsonError(_))));
    }
}
