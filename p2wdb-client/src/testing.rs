//! Wallet test double.

use async_trait::async_trait;
use parking_lot::Mutex;

use p2wdb_core::constants::PSF_TOKEN_ID;
use p2wdb_core::error::{P2wdbError, Result};
use p2wdb_core::traits::Wallet;
use p2wdb_core::types::{PaymentOutput, TokenBalance};

pub(crate) const TEST_WIF: &str = "L1tcvcqa5PztqqDH4ZEcUmHA9aSHhTau5E2Zwp1xEK5CrKBrjP3m";

/// In-memory wallet recording every payment it makes.
pub(crate) struct MockWallet {
    key: String,
    balance: u64,
    psf_qty: Option<f64>,
    burn_failures: Mutex<u32>,
    pub(crate) syncs: Mutex<u32>,
    pub(crate) burns: Mutex<Vec<(f64, String)>>,
    pub(crate) sends: Mutex<Vec<PaymentOutput>>,
}

impl MockWallet {
    pub(crate) fn new(balance: u64, psf_qty: Option<f64>) -> Self {
        Self {
            key: TEST_WIF.into(),
            balance,
            psf_qty,
            burn_failures: Mutex::new(0),
            syncs: Mutex::new(0),
            burns: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_key(mut self, key: &str) -> Self {
        self.key = key.into();
        self
    }

    /// Makes the next `n` burns fail with a wallet error.
    pub(crate) fn failing_burns(self, n: u32) -> Self {
        *self.burn_failures.lock() = n;
        self
    }
}

#[async_trait]
impl Wallet for MockWallet {
    async fn sync(&self) -> Result<()> {
        *self.syncs.lock() += 1;
        Ok(())
    }

    async fn get_balance(&self) -> Result<u64> {
        Ok(self.balance)
    }

    async fn list_tokens(&self) -> Result<Vec<TokenBalance>> {
        Ok(self
            .psf_qty
            .map(|qty| TokenBalance {
                token_id: PSF_TOKEN_ID.into(),
                ticker: "PSF".into(),
                name: "Permissionless Software Foundation".into(),
                decimals: 8,
                token_type: 1,
                url: "psfoundation.cash".into(),
                qty,
            })
            .into_iter()
            .collect())
    }

    async fn burn_tokens(&self, qty: f64, token_id: &str) -> Result<String> {
        {
            let mut failures = self.burn_failures.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(P2wdbError::WalletError("utxo lookup timed out".into()));
            }
        }
        let mut burns = self.burns.lock();
        burns.push((qty, token_id.to_string()));
        Ok(format!("burn-txid-{}", burns.len()))
    }

    async fn send(&self, outputs: &[PaymentOutput]) -> Result<String> {
        self.sends.lock().extend_from_slice(outputs);
        Ok("payment-txid".into())
    }

    fn sign_message(&self, message: &str) -> Result<String> {
        Ok(format!("sig[{}]({})", self.key, message))
    }
}
