//! Liquidator contract client.
//!
//! The liquidator auctions off collateral seized from margin-called
//! positions. Buying is memo-routed: stablecoin transfers buy collateral,
//! governance-token transfers buy accumulated surplus debt. Prices and
//! eligibility are enforced on-chain.

use fastnum::D128;
use serde::Deserialize;

use crate::{
    Network,
    action::{Action, TxOptions, TxOverrides},
    asset::{SymbolTable, balance_to_number},
    error::{Error, Result},
    node::{Receipt, TableQuery, TableReader, Transactor},
    table::{self, TableRow},
};

#[derive(Clone, Debug)]
pub struct LiquidatorConfig {
    pub contract: String,
    pub collateral_symbol: String,
    pub stable_token: String,
    pub stable_symbol: String,
    pub nut_token: String,
    pub nut_symbol: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LiquidatorParametersRow {
    pub parameter_id: u64,
    pub surplus_debt: String,
    pub bad_debt: String,
    pub collat_balance: String,
    pub nut_collat_balance: String,
}

impl TableRow for LiquidatorParametersRow {
    const ENTITY: &'static str = "liquidator parameters";
    const FIELDS: &'static [&'static str] = &[
        "parameter_id",
        "surplus_debt",
        "bad_debt",
        "collat_balance",
        "nut_collat_balance",
    ];
}

#[derive(Clone, Debug, Deserialize)]
pub struct LiquidatorSettingsRow {
    pub setting_id: u64,
    pub position_account: String,
    pub global_unlock: u8,
    pub auction_price: String,
    pub burn_rate: String,
}

impl TableRow for LiquidatorSettingsRow {
    const ENTITY: &'static str = "liquidator settings";
    const FIELDS: &'static [&'static str] = &[
        "setting_id",
        "position_account",
        "global_unlock",
        "auction_price",
        "burn_rate",
    ];
}

pub struct LiquidatorClient<N> {
    node: N,
    config: LiquidatorConfig,
    symbols: SymbolTable,
}

impl<N> LiquidatorClient<N> {
    /// Client for the liquidator paired with the EOS positions contract.
    pub fn eos(node: N, network: &Network) -> Self {
        Self::custom(
            node,
            LiquidatorConfig {
                contract: network.liquidator().to_string(),
                collateral_symbol: "EOS".to_string(),
                stable_token: network.stable_token().to_string(),
                stable_symbol: "EOSDT".to_string(),
                nut_token: network.nut_token().to_string(),
                nut_symbol: "NUT".to_string(),
            },
            network.symbols().clone(),
        )
    }

    pub fn custom(node: N, config: LiquidatorConfig, symbols: SymbolTable) -> Self {
        Self {
            node,
            config,
            symbols,
        }
    }

    pub fn config(&self) -> &LiquidatorConfig {
        &self.config
    }
}

impl<N: Transactor> LiquidatorClient<N> {
    /// Buys seized collateral with stablecoin at the current auction price.
    pub async fn transfer_stable(
        &self,
        sender: &str,
        amount: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let quantity = self
            .symbols
            .amount_to_asset_string(amount, &self.config.stable_symbol, None)?;
        let action = Action::transfer(
            &self.config.stable_token,
            sender,
            &self.config.contract,
            &quantity,
            &self.config.collateral_symbol,
            &options.permission,
        );
        self.node.transact(vec![action], &options).await
    }

    /// Buys accumulated surplus debt with governance tokens.
    pub async fn transfer_nut(
        &self,
        sender: &str,
        amount: D128,
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
            &self.config.stable_symbol,
            &options.permission,
        );
        self.node.transact(vec![action], &options).await
    }
}

impl<N: TableReader> LiquidatorClient<N> {
    pub async fn parameters(&self) -> Result<LiquidatorParametersRow> {
        let query = TableQuery::new(&self.config.contract, &self.config.contract, "parameters");
        table::fetch_one(&self.node, query)
            .await?
            .ok_or_else(|| Error::EntityNotFound(LiquidatorParametersRow::ENTITY.to_string()))
    }

    pub async fn settings(&self) -> Result<LiquidatorSettingsRow> {
        let query = TableQuery::new(&self.config.contract, &self.config.contract, "liqsettings");
        table::fetch_one(&self.node, query)
            .await?
            .ok_or_else(|| Error::EntityNotFound(LiquidatorSettingsRow::ENTITY.to_string()))
    }

    /// Stablecoin the liquidator currently holds for auction payouts.
    pub async fn stable_balance(&self) -> Result<D128> {
        let entries = self
            .node
            .get_currency_balance(
                &self.config.stable_token,
                &self.config.contract,
                &self.config.stable_symbol,
            )
            .await?;
        balance_to_number(&entries)
    }
}
