//! Pinning content to IPFS through the P2WDB.
//!
//! Some P2WDB instances run a pinning service next to the database. It pins
//! content in two ways:
//!
//! - A CID written to the P2WDB under the [`PIN_APP_ID`] app id is pinned by
//!   the service when it sees the entry ([`PinClient::cid`]).
//! - JSON already written to the P2WDB can be extracted from its entry and
//!   pinned on its own ([`PinServiceClient::json`]).

use std::sync::Arc;

use cid::Cid;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use p2wdb_core::constants::PIN_APP_ID;
use p2wdb_core::error::{P2wdbError, Result};
use p2wdb_core::traits::Wallet;
use p2wdb_core::types::WriteResult;

use crate::config::{endpoint, P2wdbConfig};
use crate::http::post_json;
use crate::write::{WriteClient, WriteClientBuilder};

#[derive(Debug, Serialize)]
struct PinJsonRequest<'a> {
    zcid: &'a str,
}

#[derive(Debug, Deserialize)]
struct PinJsonResponse {
    cid: String,
}

/// Client for the pinning service. Needs no wallet.
#[derive(Clone, Debug)]
pub struct PinServiceClient {
    pin_server_url: String,
    http_client: reqwest::Client,
}

impl PinServiceClient {
    /// Creates a client for the default pinning service.
    pub fn new() -> Result<Self> {
        Self::with_config(P2wdbConfig::default())
    }

    /// Creates a client for the pinning service named in `config`.
    pub fn with_config(config: P2wdbConfig) -> Result<Self> {
        let http_client = config.http_client()?;
        Ok(Self {
            pin_server_url: config.pin_server_url,
            http_client,
        })
    }

    /// Pinning service this client talks to.
    pub fn pin_server_url(&self) -> &str {
        &self.pin_server_url
    }

    /// Asks the pinning service to pin the JSON stored in the P2WDB entry
    /// `zcid`.
    ///
    /// Returns the IPFS CID of the pinned content.
    #[instrument(skip(self))]
    pub async fn json(&self, zcid: &str) -> Result<String> {
        if zcid.is_empty() {
            return Err(P2wdbError::MissingInput("zcid of the entry to pin".into()));
        }

        let url = endpoint(&self.pin_server_url, "pin-json");
        let response: PinJsonResponse =
            post_json(&self.http_client, &url, &PinJsonRequest { zcid }).await?;

        debug!(zcid, cid = %response.cid, "Pinned entry JSON");
        Ok(response.cid)
    }
}

/// Client for pin requests paid through a P2WDB write.
pub struct PinClient {
    write: WriteClient,
    service: PinServiceClient,
}

/// Builder for [`PinClient`].
#[derive(Default)]
pub struct PinClientBuilder {
    inner: WriteClientBuilder,
}

impl PinClientBuilder {
    /// Sets the configuration.
    pub fn config(mut self, config: P2wdbConfig) -> Self {
        self.inner = self.inner.config(config);
        self
    }

    /// Sets the wallet that pays for pin requests. Required.
    pub fn wallet(mut self, wallet: Arc<dyn Wallet>) -> Self {
        self.inner = self.inner.wallet(wallet);
        self
    }

    /// Builds the client.
    ///
    /// Fails with [`P2wdbError::MissingCredential`] when no wallet was set.
    pub fn build(self) -> Result<PinClient> {
        Ok(PinClient::from_write(self.inner.build()?))
    }
}

impl PinClient {
    /// Returns a builder.
    pub fn builder() -> PinClientBuilder {
        PinClientBuilder::default()
    }

    /// Wraps an existing write client; the pinning service is taken from its
    /// configuration.
    pub fn from_write(write: WriteClient) -> Self {
        let service = PinServiceClient {
            pin_server_url: write.config().pin_server_url.clone(),
            http_client: write.http_client().clone(),
        };
        Self { write, service }
    }

    /// Underlying write client.
    pub fn write(&self) -> &WriteClient {
        &self.write
    }

    /// Pinning service client.
    pub fn service(&self) -> &PinServiceClient {
        &self.service
    }

    /// Requests that `cid` be pinned, by writing it to the P2WDB under the
    /// pin app id.
    #[instrument(skip(self))]
    pub async fn cid(&self, cid: &str) -> Result<WriteResult> {
        validate_cid(cid)?;
        self.write.post_entry(json!({ "cid": cid }), PIN_APP_ID).await
    }

    /// See [`PinServiceClient::json`].
    pub async fn json(&self, zcid: &str) -> Result<String> {
        self.service.json(zcid).await
    }
}

/// Rejects CIDs that cannot be valid, so a malformed request never costs a
/// write.
///
/// Any multibase encoding is accepted; the CID must decode.
pub(crate) fn validate_cid(cid: &str) -> Result<()> {
    if cid.is_empty() {
        return Err(P2wdbError::InvalidCid("CID cannot be empty".into()));
    }

    if cid.starts_with("Qm") && cid.len() != 46 {
        return Err(P2wdbError::InvalidCid(format!(
            "invalid CIDv0 length: expected 46, got {}",
            cid.len()
        )));
    }

    Cid::try_from(cid)
        .map(|_| ())
        .map_err(|e| P2wdbError::InvalidCid(format!("{}: {}", cid, e)))
}
