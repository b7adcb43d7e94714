//! Entry and write request types.
//!
//! An [`Entry`] is serialized to a JSON string and carried inside the body of
//! one of the two write endpoints.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A record written to the P2WDB.
///
/// Immutable once written; the server identifies it by a content hash (zcid).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Application tag used to query entries back
    pub app_id: String,
    /// Arbitrary JSON payload (the server caps it around 10 KB)
    pub data: Value,
    /// ISO-8601 UTC timestamp
    pub timestamp: String,
    /// Human readable local time of the writer
    pub local_time_stamp: String,
}

impl Entry {
    /// Creates an entry stamped with the current time.
    pub fn new(app_id: impl Into<String>, data: Value) -> Self {
        Self::at(app_id, data, Utc::now())
    }

    /// Creates an entry stamped with the given time.
    pub fn at(app_id: impl Into<String>, data: Value, now: DateTime<Utc>) -> Self {
        Self {
            app_id: app_id.into(),
            data,
            timestamp: iso_timestamp(now),
            local_time_stamp: now
                .with_timezone(&Local)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string(),
        }
    }

    /// Serializes the entry to the string form the write endpoints expect.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Formats a time as ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body of `POST /entry/write`, paid with a proof-of-burn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenWriteRequest {
    /// Proof-of-burn transaction id
    pub txid: String,
    /// Signed message (the ISO timestamp of the write)
    pub message: String,
    /// Signature of `message` by the burning wallet
    pub signature: String,
    /// JSON-serialized [`Entry`]
    pub data: String,
}

/// Body of `POST /entry/write/bch`, paid with a BCH transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinWriteRequest {
    /// Address the payment was sent to
    pub address: String,
    /// JSON-serialized [`Entry`]
    pub data: String,
    /// Application tag of the entry
    pub app_id: String,
}

/// Server answer to a write.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteResult {
    /// Whether the server accepted the entry
    #[serde(default)]
    pub success: bool,
    /// Entry hash, either a string or an object carrying a `hash` field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Value>,
    /// Payment transaction id, set on the BCH payment path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// Any other fields returned by the server
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WriteResult {
    /// Returns the zcid of the written entry, if the server reported one.
    pub fn zcid(&self) -> Option<&str> {
        match self.hash.as_ref()? {
            Value::String(hash) => Some(hash),
            Value::Object(obj) => obj.get("hash").and_then(Value::as_str),
            _ => None,
        }
    }
}
