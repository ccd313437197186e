//! Collateralized debt position SDK.
//!
//! # Overview
//!
//! Client-side wrappers for a stablecoin system's on-chain contracts:
//! positions, governance, liquidation, savings and token swap.
//!
//! Construct a [`Network`] (or start from [`Network::mainnet`]), pick a
//! node via [`node::HttpNode`], then drive the contract clients in
//! [`contracts`]. Read methods validate every returned table row against
//! the exact field set the contract serves before decoding; write methods
//! assemble action lists and hand them to a caller-provided
//! [`node::Transactor`], which owns keys and signing.
//!
//! See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * Business rules (collateralization thresholds, margin-call
//!   eligibility, auction pricing) are enforced on-chain and not
//!   re-checked here; a violating transaction is submitted and rejected
//!   by the node.
//! * No retries anywhere: network failures and node rejections propagate
//!   to the caller as-is.
//!
//! # Testing
//!
//! [`testing`] module provides an in-memory node double that serves
//! seeded table rows and records submitted transactions.

#![allow(async_fn_in_trait)]

pub mod action;
pub mod asset;
pub mod contracts;
pub mod error;
pub mod node;
pub mod num;
pub mod table;
pub mod testing;
pub mod validate;

use asset::SymbolTable;

/// Deployment the SDK is operating against: contract and token account
/// names plus the symbol precision table.
#[derive(Clone, Debug)]
pub struct Network {
    positions: String,
    pbtc_positions: String,
    liquidator: String,
    governance: String,
    savings: String,
    swap: String,
    oracle: String,
    stable_token: String,
    nut_token: String,
    eos_token: String,
    pbtc_token: String,
    symbols: SymbolTable,
}

impl Network {
    pub fn mainnet() -> Self {
        Self {
            positions: "eosdtcntract".to_string(),
            pbtc_positions: "eosdtpbtcpos".to_string(),
            liquidator: "eosdtliqdatr".to_string(),
            governance: "eosdtgovernc".to_string(),
            savings: "eosdtsavings".to_string(),
            swap: "eosdtnutswap".to_string(),
            oracle: "eosdtorclize".to_string(),
            stable_token: "eosdtsttoken".to_string(),
            nut_token: "eosdtnutoken".to_string(),
            eos_token: "eosio.token".to_string(),
            pbtc_token: "btc.ptokens".to_string(),
            symbols: SymbolTable::default(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn custom(
        positions: String,
        pbtc_positions: String,
        liquidator: String,
        governance: String,
        savings: String,
        swap: String,
        oracle: String,
        stable_token: String,
        nut_token: String,
        eos_token: String,
        pbtc_token: String,
        symbols: SymbolTable,
    ) -> Self {
        Self {
            positions,
            pbtc_positions,
            liquidator,
            governance,
            savings,
            swap,
            oracle,
            stable_token,
            nut_token,
            eos_token,
            pbtc_token,
            symbols,
        }
    }

    pub fn positions(&self) -> &str {
        &self.positions
    }

    pub fn pbtc_positions(&self) -> &str {
        &self.pbtc_positions
    }

    pub fn liquidator(&self) -> &str {
        &self.liquidator
    }

    pub fn governance(&self) -> &str {
        &self.governance
    }

    pub fn savings(&self) -> &str {
        &self.savings
    }

    pub fn swap(&self) -> &str {
        &self.swap
    }

    pub fn oracle(&self) -> &str {
        &self.oracle
    }

    pub fn stable_token(&self) -> &str {
        &self.stable_token
    }

    pub fn nut_token(&self) -> &str {
        &self.nut_token
    }

    pub fn eos_token(&self) -> &str {
        &self.eos_token
    }

    pub fn pbtc_token(&self) -> &str {
        &self.pbtc_token
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}
