//! Savings contract client.
//!
//! Stablecoin staked with the savings contract accrues the savings rate.
//! Deposits are plain transfers; interest accrual happens on-chain.

use fastnum::D128;
use serde::Deserialize;
use serde_json::json;

use crate::{
    Network,
    action::{Action, TxOptions, TxOverrides},
    asset::{SymbolTable, balance_to_number},
    error::{Error, Result},
    node::{Receipt, TableQuery, TableReader, Transactor},
    table::{self, TableRow},
};

#[derive(Clone, Debug)]
pub struct SavingsConfig {
    pub contract: String,
    pub stable_token: String,
    pub stable_symbol: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SavingsPositionRow {
    pub position_id: u64,
    pub owner: String,
    pub balance: String,
    pub last_accrual: String,
}

impl TableRow for SavingsPositionRow {
    const ENTITY: &'static str = "savings position";
    const FIELDS: &'static [&'static str] = &["position_id", "owner", "balance", "last_accrual"];
}

#[derive(Clone, Debug, Deserialize)]
pub struct SavingsParametersRow {
    pub parameter_id: u64,
    pub total_funded: String,
    pub prev_date: String,
}

impl TableRow for SavingsParametersRow {
    const ENTITY: &'static str = "savings parameters";
    const FIELDS: &'static [&'static str] = &["parameter_id", "total_funded", "prev_date"];
}

#[derive(Clone, Debug, Deserialize)]
pub struct SavingsSettingsRow {
    pub setting_id: u64,
    pub sttoken_account: String,
    pub min_deposit: String,
    pub annual_rate: String,
}

impl TableRow for SavingsSettingsRow {
    const ENTITY: &'static str = "savings settings";
    const FIELDS: &'static [&'static str] =
        &["setting_id", "sttoken_account", "min_deposit", "annual_rate"];
}

pub struct SavingsClient<N> {
    node: N,
    config: SavingsConfig,
    symbols: SymbolTable,
}

impl<N> SavingsClient<N> {
    pub fn new(node: N, network: &Network) -> Self {
        Self::custom(
            node,
            SavingsConfig {
                contract: network.savings().to_string(),
                stable_token: network.stable_token().to_string(),
                stable_symbol: "EOSDT".to_string(),
            },
            network.symbols().clone(),
        )
    }

    pub fn custom(node: N, config: SavingsConfig, symbols: SymbolTable) -> Self {
        Self {
            node,
            config,
            symbols,
        }
    }

    pub fn config(&self) -> &SavingsConfig {
        &self.config
    }

    fn stable_asset(&self, amount: D128) -> Result<String> {
        self.symbols
            .amount_to_asset_string(amount, &self.config.stable_symbol, None)
    }
}

impl<N: Transactor> SavingsClient<N> {
    pub async fn stake(
        &self,
        owner: &str,
        amount: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::transfer(
            &self.config.stable_token,
            owner,
            &self.config.contract,
            &self.stable_asset(amount)?,
            "",
            &options.permission,
        );
        self.node.transact(vec![action], &options).await
    }

    pub async fn unstake(
        &self,
        owner: &str,
        amount: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "unstake",
            owner,
            &options.permission,
            json!({
                "to": owner,
                "quantity": self.stable_asset(amount)?,
            }),
        );
        self.node.transact(vec![action], &options).await
    }
}

impl<N: TableReader> SavingsClient<N> {
    pub async fn position_for(&self, owner: &str) -> Result<Option<SavingsPositionRow>> {
        let query = self
            .table("savpositions")
            .with_index(2, "name")
            .with_lower_bound(owner)
            .with_upper_bound(owner);
        table::fetch_one(&self.node, query).await
    }

    /// Every savings position, across page boundaries.
    pub async fn all_positions(&self) -> Result<Vec<SavingsPositionRow>> {
        table::fetch_all(&self.node, self.table("savpositions"), "position_id").await
    }

    pub async fn parameters(&self) -> Result<SavingsParametersRow> {
        table::fetch_one(&self.node, self.table("parameters"))
            .await?
            .ok_or_else(|| Error::EntityNotFound(SavingsParametersRow::ENTITY.to_string()))
    }

    pub async fn settings(&self) -> Result<SavingsSettingsRow> {
        table::fetch_one(&self.node, self.table("savsettings"))
            .await?
            .ok_or_else(|| Error::EntityNotFound(SavingsSettingsRow::ENTITY.to_string()))
    }

    /// Stablecoin funded into the contract for rate payouts.
    pub async fn funding_balance(&self) -> Result<D128> {
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

    fn table(&self, table: &str) -> TableQuery {
        TableQuery::new(&self.config.contract, &self.config.contract, table)
    }
}
