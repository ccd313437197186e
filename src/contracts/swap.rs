//! Token-swap contract client.
//!
//! Swaps governance tokens to their representation on another chain. The
//! sender transfers tokens with the destination address in the memo; the
//! contract records the entry and the bridge pays out off-chain.

use fastnum::D128;
use serde::Deserialize;

use crate::{
    Network,
    action::{Action, TxOptions, TxOverrides},
    asset::SymbolTable,
    error::{Error, Result},
    node::{Receipt, TableQuery, TableReader, Transactor},
    table::{self, TableRow},
};

#[derive(Clone, Debug)]
pub struct SwapConfig {
    pub contract: String,
    pub nut_token: String,
    pub nut_symbol: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SwapParametersRow {
    pub parameter_id: u64,
    pub total_swapped: String,
    pub prev_date: String,
}

impl TableRow for SwapParametersRow {
    const ENTITY: &'static str = "swap parameters";
    const FIELDS: &'static [&'static str] = &["parameter_id", "total_swapped", "prev_date"];
}

#[derive(Clone, Debug, Deserialize)]
pub struct SwapSettingsRow {
    pub setting_id: u64,
    pub swap_lock: u8,
    pub min_swap: String,
}

impl TableRow for SwapSettingsRow {
    const ENTITY: &'static str = "swap settings";
    const FIELDS: &'static [&'static str] = &["setting_id", "swap_lock", "min_swap"];
}

/// One recorded swap request.
#[derive(Clone, Debug, Deserialize)]
pub struct SwapEntryRow {
    pub txid: u64,
    pub sender: String,
    pub quantity: String,
    pub destination: String,
    pub created_at: String,
}

impl TableRow for SwapEntryRow {
    const ENTITY: &'static str = "swap entry";
    const FIELDS: &'static [&'static str] =
        &["txid", "sender", "quantity", "destination", "created_at"];
}

pub struct SwapClient<N> {
    node: N,
    config: SwapConfig,
    symbols: SymbolTable,
}

impl<N> SwapClient<N> {
    pub fn new(node: N, network: &Network) -> Self {
        Self::custom(
            node,
            SwapConfig {
                contract: network.swap().to_string(),
                nut_token: network.nut_token().to_string(),
                nut_symbol: "NUT".to_string(),
            },
            network.symbols().clone(),
        )
    }

    pub fn custom(node: N, config: SwapConfig, symbols: SymbolTable) -> Self {
        Self {
            node,
            config,
            symbols,
        }
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }
}

impl<N: Transactor> SwapClient<N> {
    /// Swaps tokens to `destination` on the target chain.
    pub async fn swap(
        &self,
        sender: &str,
        amount: D128,
        destination: &str,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let quantity = self
            .symbols
            .amount_to_asset_string(amount, &self.config.nut_symbol, None)?;
        let action = Action::transfer(
            &self.config.nut_token,
            sender,
            &self.config.contract,
            &quantity,
            destination,
            &options.permission,
        );
        self.node.transact(vec![action], &options).await
    }
}

impl<N: TableReader> SwapClient<N> {
    pub async fn parameters(&self) -> Result<SwapParametersRow> {
        table::fetch_one(&self.node, self.table("parameters"))
            .await?
            .ok_or_else(|| Error::EntityNotFound(SwapParametersRow::ENTITY.to_string()))
    }

    pub async fn settings(&self) -> Result<SwapSettingsRow> {
        table::fetch_one(&self.node, self.table("swapsettings"))
            .await?
            .ok_or_else(|| Error::EntityNotFound(SwapSettingsRow::ENTITY.to_string()))
    }

    /// Every recorded swap request, across page boundaries.
    pub async fn all_entries(&self) -> Result<Vec<SwapEntryRow>> {
        table::fetch_all(&self.node, self.table("swaptxs"), "txid").await
    }

    fn table(&self, table: &str) -> TableQuery {
        TableQuery::new(&self.config.contract, &self.config.contract, table)
    }
}
