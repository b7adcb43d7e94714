//! Read access to the P2WDB.
//!
//! Every method is a direct GET translation. There is no retry and no
//! caching; errors from the HTTP layer are returned as they are.

use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use p2wdb_core::error::{P2wdbError, Result};

use crate::config::{segments_url, P2wdbConfig};
use crate::http::get_json;

/// Envelope the server wraps read results in.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Client for reading entries.
#[derive(Clone, Debug)]
pub struct ReadClient {
    server_url: String,
    http_client: reqwest::Client,
}

impl ReadClient {
    /// Creates a reader for the default server.
    pub fn new() -> Result<Self> {
        Self::with_config(P2wdbConfig::default())
    }

    /// Creates a reader with the given configuration.
    pub fn with_config(config: P2wdbConfig) -> Result<Self> {
        let http_client = config.http_client()?;
        Ok(Self {
            server_url: config.server_url,
            http_client,
        })
    }

    /// Server this client reads from.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Returns one page of entries, newest first (about 20 per page).
    #[instrument(skip(self))]
    pub async fn get_page(&self, page: u32) -> Result<Vec<Value>> {
        self.get_data(&["entry", "all", page.to_string().as_str()]).await
    }

    /// Returns the entry with the given hash (zcid).
    #[instrument(skip(self))]
    pub async fn get_by_hash(&self, hash: &str) -> Result<Value> {
        self.get_data(&["entry", "hash", hash]).await
    }

    /// Returns the entry paid for by the given transaction.
    #[instrument(skip(self))]
    pub async fn get_by_txid(&self, txid: &str) -> Result<Value> {
        self.get_data(&["entry", "txid", txid]).await
    }

    /// Returns all entries written with the given app id.
    #[instrument(skip(self))]
    pub async fn get_by_app_id(&self, app_id: &str) -> Result<Vec<Value>> {
        self.get_data(&["entry", "appid", app_id]).await
    }

    async fn get_data<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = segments_url(&self.server_url, segments)?;
        let envelope: DataEnvelope<Value> = get_json(&self.http_client, &url).await?;

        serde_json::from_value(envelope.data).map_err(|e| {
            P2wdbError::UnexpectedResponse(format!("{}: {}", url, e))
        })
    }
}
