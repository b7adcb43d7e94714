//! Paid writes to the P2WDB.
//!
//! A write is paid for in one of two ways:
//!
//! 1. **Proof-of-burn**: the wallet burns the current PSF write cost and the
//!    burn txid is submitted together with a signed timestamp to
//!    `POST /entry/write`.
//! 2. **BCH payment**: when the wallet lacks PSF but the server quotes a BCH
//!    price, the wallet pays the quoted address and the entry is submitted to
//!    `POST /entry/write/bch`.
//!
//! The token path is always preferred. The funds check, the burn and the POST
//! go through the configured [`RetryPolicy`]; the BCH payment itself does not,
//! so a flaky send can never pay twice.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use p2wdb_core::constants::DEFAULT_WRITE_COST_PSF;
use p2wdb_core::error::{P2wdbError, Result};
use p2wdb_core::traits::Wallet;
use p2wdb_core::types::{
    iso_timestamp, BchCost, CoinWriteRequest, Entry, FundsCheck, PaymentOutput, PsfCost,
    TokenWriteRequest, WriteResult,
};
use p2wdb_core::RetryPolicy;

use crate::config::{endpoint, P2wdbConfig};
use crate::http::{get_json, post_json};

/// Client for paid writes.
pub struct WriteClient {
    config: P2wdbConfig,
    wallet: Arc<dyn Wallet>,
    http_client: reqwest::Client,
    retry: RetryPolicy,
    /// Last PSF write cost reported by the server
    write_cost: RwLock<f64>,
}

/// Builder for [`WriteClient`].
#[derive(Default)]
pub struct WriteClientBuilder {
    config: Option<P2wdbConfig>,
    wallet: Option<Arc<dyn Wallet>>,
}

impl WriteClientBuilder {
    /// Sets the configuration (defaults to [`P2wdbConfig::default`]).
    pub fn config(mut self, config: P2wdbConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the wallet that pays for writes. Required.
    pub fn wallet(mut self, wallet: Arc<dyn Wallet>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Builds the client.
    ///
    /// Fails with [`P2wdbError::MissingCredential`] when no wallet was set.
    pub fn build(self) -> Result<WriteClient> {
        let wallet = self.wallet.ok_or_else(|| {
            P2wdbError::MissingCredential(
                "a wallet is required when instantiating the P2WDB write client".into(),
            )
        })?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        let http_client = config.http_client()?;

        Ok(WriteClient {
            retry: config.retry_policy(),
            config,
            wallet,
            http_client,
            write_cost: RwLock::new(DEFAULT_WRITE_COST_PSF),
        })
    }
}

impl WriteClient {
    /// Returns a builder.
    pub fn builder() -> WriteClientBuilder {
        WriteClientBuilder::default()
    }

    /// Configuration in use.
    pub fn config(&self) -> &P2wdbConfig {
        &self.config
    }

    /// Server this client writes to.
    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Last known PSF cost of a write.
    pub fn write_cost(&self) -> f64 {
        *self.write_cost.read()
    }

    /// Writes `data` under `app_id`, paying with PSF or BCH.
    ///
    /// Fails with [`P2wdbError::MissingInput`] when `data` is JSON null and
    /// with [`P2wdbError::InsufficientFunds`] when the wallet can afford
    /// neither payment method. In both cases nothing is written or paid.
    #[instrument(skip(self, data))]
    pub async fn post_entry(&self, data: Value, app_id: &str) -> Result<WriteResult> {
        if data.is_null() {
            return Err(P2wdbError::MissingInput(
                "data is required to write an entry".into(),
            ));
        }

        let funds = self
            .retry
            .run("check_for_sufficient_funds", || self.check_for_sufficient_funds())
            .await?;

        match funds {
            FundsCheck::Token { .. } => self.write_with_psf(data, app_id).await,
            FundsCheck::Coin {
                cost_sat,
                payment_address,
                ..
            } => {
                self.write_with_bch(data, app_id, cost_sat, &payment_address)
                    .await
            }
        }
    }

    async fn write_with_psf(&self, data: Value, app_id: &str) -> Result<WriteResult> {
        // The signed message doubles as the entry timestamp.
        let now = Utc::now();
        let message = iso_timestamp(now);
        let signature = self.generate_signature(&message)?;

        let txid = self.retry.run("burn_psf", || self.burn_psf()).await?;
        info!(txid = %txid, "Proof-of-burn");

        let entry = Entry::at(app_id, data, now);
        let body = TokenWriteRequest {
            txid,
            message,
            signature,
            data: entry.to_json_string()?,
        };

        let url = endpoint(&self.config.server_url, "entry/write");
        self.retry
            .run("post_entry", || post_json(&self.http_client, &url, &body))
            .await
    }

    async fn write_with_bch(
        &self,
        data: Value,
        app_id: &str,
        cost_sat: u64,
        payment_address: &str,
    ) -> Result<WriteResult> {
        let payment = PaymentOutput {
            address: payment_address.to_string(),
            amount_sat: cost_sat,
        };
        let txid = self.wallet.send(std::slice::from_ref(&payment)).await?;
        info!(txid = %txid, cost_sat, "Paid for write with BCH");

        let settle = self.config.payment_settle();
        if !settle.is_zero() {
            sleep(settle).await;
        }

        let entry = Entry::new(app_id, data);
        let body = CoinWriteRequest {
            address: payment_address.to_string(),
            data: entry.to_json_string()?,
            app_id: app_id.to_string(),
        };

        let url = endpoint(&self.config.server_url, "entry/write/bch");
        let mut result: WriteResult = self
            .retry
            .run("post_entry_bch", || post_json(&self.http_client, &url, &body))
            .await?;

        result.txid = Some(txid);
        Ok(result)
    }

    /// Decides how the next write will be paid for.
    ///
    /// Syncs the wallet, requires at least the configured satoshi threshold,
    /// then prefers PSF and falls back to a BCH quote. A server that does not
    /// offer BCH payments is treated the same as an unaffordable quote.
    #[instrument(skip(self))]
    pub async fn check_for_sufficient_funds(&self) -> Result<FundsCheck> {
        self.wallet.sync().await?;

        let balance = self.wallet.get_balance().await?;
        if balance < self.config.sat_threshold {
            return Err(P2wdbError::InsufficientFunds(format!(
                "wallet has {} sats, less than the {} sats needed to pay for a write",
                balance, self.config.sat_threshold
            )));
        }

        let cost = self.get_write_cost_psf().await?;

        let tokens = self.wallet.list_tokens().await?;
        let qty = tokens
            .iter()
            .find(|t| t.token_id == self.config.token_id)
            .map(|t| t.qty)
            .unwrap_or(0.0);

        let quote = if qty >= cost {
            None
        } else {
            match self.get_write_cost_bch().await {
                Ok(quote) => Some(quote),
                Err(e) => {
                    debug!(error = %e, "BCH payment not available");
                    None
                }
            }
        };

        select_payment(balance, qty, cost, quote)
    }

    /// Fetches the PSF cost of a write and remembers it for the next burn.
    #[instrument(skip(self))]
    pub async fn get_write_cost_psf(&self) -> Result<f64> {
        let url = endpoint(&self.config.server_url, "entry/cost/psf");
        let cost: PsfCost = get_json(&self.http_client, &url).await?;

        *self.write_cost.write() = cost.psf_cost;
        info!(cost = cost.psf_cost, "Write cost in PSF tokens");

        Ok(cost.psf_cost)
    }

    /// Fetches the BCH cost of a write and the address to pay.
    ///
    /// Servers that only accept proof-of-burn answer with
    /// [`P2wdbError::UnsupportedPaymentMode`].
    #[instrument(skip(self))]
    pub async fn get_write_cost_bch(&self) -> Result<BchCost> {
        let url = endpoint(&self.config.server_url, "entry/cost/bch");
        get_json(&self.http_client, &url)
            .await
            .map_err(|e| match e {
                P2wdbError::NotFound(_) => P2wdbError::UnsupportedPaymentMode(format!(
                    "{} does not accept BCH payments",
                    self.config.server_url
                )),
                other => other,
            })
    }

    /// Burns the last known PSF write cost.
    ///
    /// Returns the proof-of-burn txid.
    pub async fn burn_psf(&self) -> Result<String> {
        let qty = self.write_cost();
        self.wallet.burn_tokens(qty, &self.config.token_id).await
    }

    /// Signs `message` with the wallet key, proving the burner and the writer
    /// are the same.
    pub fn generate_signature(&self, message: &str) -> Result<String> {
        if message.is_empty() {
            return Err(P2wdbError::MissingInput("message to sign is empty".into()));
        }
        self.wallet.sign_message(message)
    }
}

/// Picks the payment path for a wallet that is above the satoshi threshold.
fn select_payment(
    balance_sat: u64,
    psf_qty: f64,
    psf_cost: f64,
    bch_quote: Option<BchCost>,
) -> Result<FundsCheck> {
    if psf_qty >= psf_cost {
        return Ok(FundsCheck::Token {
            qty: psf_qty,
            cost: psf_cost,
        });
    }

    if let Some(quote) = bch_quote {
        match quote.cost_sat() {
            Some(cost_sat) if balance_sat >= cost_sat => {
                return Ok(FundsCheck::Coin {
                    balance_sat,
                    cost_sat,
                    payment_address: quote.address,
                });
            }
            Some(_) => {}
            None => debug!(bch_cost = quote.bch_cost, "Ignoring unusable BCH quote"),
        }
    }

    Err(P2wdbError::InsufficientFunds(format!(
        "wallet has {} PSF tokens, which is not enough; {} PSF tokens are required to pay for a write",
        psf_qty, psf_cost
    )))
}
