//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use p2wdb_core::constants::{
    DEFAULT_PIN_SERVER_URL, DEFAULT_SERVER_URL, PAYMENT_SETTLE_MS, PSF_TOKEN_ID, RETRY_ATTEMPTS,
    RETRY_DELAY_MS, SAT_THRESHOLD,
};
use p2wdb_core::error::{P2wdbError, Result};
use p2wdb_core::RetryPolicy;

/// Configuration shared by all P2WDB clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct P2wdbConfig {
    /// P2WDB server base URL
    pub server_url: String,
    /// Pinning service base URL
    pub pin_server_url: String,
    /// Token burned on the token payment path
    pub token_id: String,
    /// Minimum wallet balance, in satoshis, before any write is attempted
    pub sat_threshold: u64,
    /// Attempts made by retried operations
    pub retry_attempts: u32,
    /// Delay between retry attempts, in milliseconds
    pub retry_delay_ms: u64,
    /// Wait after a BCH payment before submitting the write, in milliseconds
    pub payment_settle_ms: u64,
    /// Request timeout in seconds; the HTTP client default when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for P2wdbConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            pin_server_url: DEFAULT_PIN_SERVER_URL.into(),
            token_id: PSF_TOKEN_ID.into(),
            sat_threshold: SAT_THRESHOLD,
            retry_attempts: RETRY_ATTEMPTS,
            retry_delay_ms: RETRY_DELAY_MS,
            payment_settle_ms: PAYMENT_SETTLE_MS,
            timeout_seconds: None,
        }
    }
}

impl P2wdbConfig {
    /// Creates a config pointing at the given P2WDB server.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    /// Sets the P2WDB server.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Sets the pinning service.
    pub fn with_pin_server_url(mut self, url: impl Into<String>) -> Self {
        self.pin_server_url = url.into();
        self
    }

    /// Sets the token burned to pay for writes.
    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = token_id.into();
        self
    }

    /// Sets the minimum satoshi balance.
    pub fn with_sat_threshold(mut self, sats: u64) -> Self {
        self.sat_threshold = sats;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the wait after a BCH payment.
    pub fn with_payment_settle(mut self, delay: Duration) -> Self {
        self.payment_settle_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Retry policy derived from this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    /// Wait after a BCH payment.
    pub fn payment_settle(&self) -> Duration {
        Duration::from_millis(self.payment_settle_ms)
    }

    /// Checks the URLs parse and the retry policy makes at least one attempt.
    pub fn validate(&self) -> Result<()> {
        parse_base_url("server_url", &self.server_url)?;
        parse_base_url("pin_server_url", &self.pin_server_url)?;

        if self.retry_attempts == 0 {
            return Err(P2wdbError::ConfigError(
                "retry_attempts must be at least 1".into(),
            ));
        }

        if self.token_id.is_empty() {
            return Err(P2wdbError::ConfigError("token_id cannot be empty".into()));
        }

        Ok(())
    }

    /// Builds the HTTP client used by every P2WDB client.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| P2wdbError::ConfigError(format!("Failed to create HTTP client: {}", e)))
    }
}

fn parse_base_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| P2wdbError::ConfigError(format!("{} '{}': {}", field, value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(P2wdbError::ConfigError(format!(
            "{} must be http or https, got '{}'",
            field, other
        ))),
    }
}

/// Appends path segments to a base URL, percent-encoding each one so a
/// segment can never add path levels, a query or a fragment.
pub(crate) fn segments_url(base: &str, segments: &[&str]) -> Result<String> {
    let mut url = Url::parse(base)
        .map_err(|e| P2wdbError::ConfigError(format!("server_url '{}': {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| P2wdbError::ConfigError(format!("'{}' cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url.into())
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
