//! Payment types: wallet token balances, write cost quotes and the funds check.

use serde::{Deserialize, Serialize};

use crate::constants::SATS_PER_BCH;

/// A token balance reported by the wallet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Token id (hex hash of the genesis transaction)
    pub token_id: String,
    /// Ticker symbol
    #[serde(default)]
    pub ticker: String,
    /// Token name
    #[serde(default)]
    pub name: String,
    /// Decimal places
    #[serde(default)]
    pub decimals: u8,
    /// Token type
    #[serde(default)]
    pub token_type: u8,
    /// Document url
    #[serde(default)]
    pub url: String,
    /// Quantity held, in display units
    pub qty: f64,
}

/// A single output of a BCH payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutput {
    /// Recipient address
    pub address: String,
    /// Amount in satoshis
    pub amount_sat: u64,
}

/// Answer of `GET /entry/cost/psf`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsfCost {
    /// PSF tokens to burn for one write
    pub psf_cost: f64,
}

/// Answer of `GET /entry/cost/bch`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BchCost {
    /// BCH to pay for one write
    pub bch_cost: f64,
    /// Address the payment must be sent to
    pub address: String,
}

impl BchCost {
    /// Cost in satoshis.
    ///
    /// `None` when the quote is not a positive amount, which no payment can
    /// honour.
    pub fn cost_sat(&self) -> Option<u64> {
        let sats = (self.bch_cost * SATS_PER_BCH).round();
        if sats.is_finite() && sats >= 1.0 {
            Some(sats as u64)
        } else {
            None
        }
    }
}

/// The payment path a wallet can afford.
///
/// The token path is preferred whenever the wallet holds enough tokens, so a
/// [`FundsCheck`] never describes both paths at once.
#[derive(Clone, Debug, PartialEq)]
pub enum FundsCheck {
    /// Pay by burning PSF tokens.
    Token {
        /// PSF tokens held by the wallet
        qty: f64,
        /// PSF tokens one write costs
        cost: f64,
    },
    /// Pay by sending BCH to the server.
    Coin {
        /// Wallet balance in satoshis
        balance_sat: u64,
        /// Satoshis one write costs
        cost_sat: u64,
        /// Address to pay
        payment_address: String,
    },
}

impl FundsCheck {
    /// PSF quantity held when the token path is viable.
    pub fn has_enough_tokens(&self) -> Option<f64> {
        match self {
            FundsCheck::Token { qty, .. } => Some(*qty),
            FundsCheck::Coin { .. } => None,
        }
    }

    /// Satoshi balance when the BCH path is viable.
    pub fn has_enough_coin(&self) -> Option<u64> {
        match self {
            FundsCheck::Coin { balance_sat, .. } => Some(*balance_sat),
            FundsCheck::Token { .. } => None,
        }
    }

    /// Address to pay on the BCH path.
    pub fn payment_address(&self) -> Option<&str> {
        match self {
            FundsCheck::Coin {
                payment_address, ..
            } => Some(payment_address),
            FundsCheck::Token { .. } => None,
        }
    }
}
