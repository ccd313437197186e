//! Collateralized debt positions client.
//!
//! One positions contract exists per collateral flavor. The client is a
//! generic table-backed facade over a [`PositionsConfig`] value object and
//! a row type resolved at construction: [`PositionsClient::eos`] serves
//! the extended row shape (EOS collateral carries a governance stake
//! field), [`PositionsClient::pbtc`] the basic shape. Both flavors share
//! every operation.

use std::marker::PhantomData;

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

/// Deployment facts for one collateral flavor of the positions contract.
#[derive(Clone, Debug)]
pub struct PositionsConfig {
    pub contract: String,
    pub oracle: String,
    pub collateral_token: String,
    pub collateral_symbol: String,
    pub stable_token: String,
    pub stable_symbol: String,
}

/// Position row served for EOS collateral.
#[derive(Clone, Debug, Deserialize)]
pub struct EosPositionRow {
    pub position_id: u64,
    pub maker: String,
    pub outstanding: String,
    pub governance: String,
    pub collateral: String,
}

impl TableRow for EosPositionRow {
    const ENTITY: &'static str = "position";
    const FIELDS: &'static [&'static str] =
        &["position_id", "maker", "outstanding", "governance", "collateral"];
}

/// Position row served for wrapped-token collateral.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenPositionRow {
    pub position_id: u64,
    pub maker: String,
    pub outstanding: String,
    pub collateral: String,
}

impl TableRow for TokenPositionRow {
    const ENTITY: &'static str = "position";
    const FIELDS: &'static [&'static str] =
        &["position_id", "maker", "outstanding", "collateral"];
}

#[derive(Clone, Debug, Deserialize)]
pub struct ParametersRow {
    pub parameter_id: u64,
    pub total_collateral: String,
    pub total_debt: String,
    pub stability_rate: String,
    pub prev_date: String,
}

impl TableRow for ParametersRow {
    const ENTITY: &'static str = "positions contract parameters";
    const FIELDS: &'static [&'static str] = &[
        "parameter_id",
        "total_collateral",
        "total_debt",
        "stability_rate",
        "prev_date",
    ];
}

#[derive(Clone, Debug, Deserialize)]
pub struct SettingsRow {
    pub setting_id: u64,
    pub global_lock: u8,
    pub liquidator_account: String,
    pub oraclize_account: String,
    pub sttoken_account: String,
    pub governance_account: String,
    pub stability_fee: String,
    pub critical_ltv: String,
    pub liquidation_penalty: String,
    pub referral_min_stake: String,
}

impl TableRow for SettingsRow {
    const ENTITY: &'static str = "positions contract settings";
    const FIELDS: &'static [&'static str] = &[
        "setting_id",
        "global_lock",
        "liquidator_account",
        "oraclize_account",
        "sttoken_account",
        "governance_account",
        "stability_fee",
        "critical_ltv",
        "liquidation_penalty",
        "referral_min_stake",
    ];
}

/// Oracle price feed row.
#[derive(Clone, Debug, Deserialize)]
pub struct RateRow {
    pub rate: String,
    pub update: String,
    pub provable_price: String,
    pub delphi_price: String,
}

impl TableRow for RateRow {
    const ENTITY: &'static str = "rate";
    const FIELDS: &'static [&'static str] = &["rate", "update", "provable_price", "delphi_price"];
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReferralRow {
    pub referral_id: u64,
    pub referral: String,
    pub staked_amount: String,
}

impl TableRow for ReferralRow {
    const ENTITY: &'static str = "referral";
    const FIELDS: &'static [&'static str] = &["referral_id", "referral", "staked_amount"];
}

/// Link between a position and the referral that brought its maker.
#[derive(Clone, Debug, Deserialize)]
pub struct PositionReferralRow {
    pub position_id: u64,
    pub referral_id: u64,
}

impl TableRow for PositionReferralRow {
    const ENTITY: &'static str = "position referral";
    const FIELDS: &'static [&'static str] = &["position_id", "referral_id"];
}

pub struct PositionsClient<N, R> {
    node: N,
    config: PositionsConfig,
    symbols: SymbolTable,
    _row: PhantomData<R>,
}

impl<N> PositionsClient<N, EosPositionRow> {
    /// Client for the EOS-collateral positions contract.
    pub fn eos(node: N, network: &Network) -> Self {
        Self::custom(
            node,
            PositionsConfig {
                contract: network.positions().to_string(),
                oracle: network.oracle().to_string(),
                collateral_token: network.eos_token().to_string(),
                collateral_symbol: "EOS".to_string(),
                stable_token: network.stable_token().to_string(),
                stable_symbol: "EOSDT".to_string(),
            },
            network.symbols().clone(),
        )
    }
}

impl<N> PositionsClient<N, TokenPositionRow> {
    /// Client for the PBTC-collateral positions contract.
    pub fn pbtc(node: N, network: &Network) -> Self {
        Self::custom(
            node,
            PositionsConfig {
                contract: network.pbtc_positions().to_string(),
                oracle: network.oracle().to_string(),
                collateral_token: network.pbtc_token().to_string(),
                collateral_symbol: "PBTC".to_string(),
                stable_token: network.stable_token().to_string(),
                stable_symbol: "EOSDT".to_string(),
            },
            network.symbols().clone(),
        )
    }
}

impl<N, R> PositionsClient<N, R> {
    pub fn custom(node: N, config: PositionsConfig, symbols: SymbolTable) -> Self {
        Self {
            node,
            config,
            symbols,
            _row: PhantomData,
        }
    }

    pub fn config(&self) -> &PositionsConfig {
        &self.config
    }

    fn collateral_asset(&self, amount: D128) -> Result<String> {
        self.symbols
            .amount_to_asset_string(amount, &self.config.collateral_symbol, None)
    }

    fn stable_asset(&self, amount: D128) -> Result<String> {
        self.symbols
            .amount_to_asset_string(amount, &self.config.stable_symbol, None)
    }

    fn position_memo(position_id: u64) -> String {
        format!("position_id:{position_id}")
    }
}

impl<N: Transactor, R> PositionsClient<N, R> {
    /// Opens a position in one transaction: creates an empty position for
    /// the maker, then deposits collateral routed to it. The debt to issue
    /// rides in the transfer memo; pass zero debt to only deposit.
    pub async fn create(
        &self,
        maker: &str,
        collateral: D128,
        debt: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let open = Action::new(
            &self.config.contract,
            "positionadd",
            maker,
            &options.permission,
            json!({ "maker": maker }),
        );
        let deposit = Action::transfer(
            &self.config.collateral_token,
            maker,
            &self.config.contract,
            &self.collateral_asset(collateral)?,
            &self.stable_asset(debt)?,
            &options.permission,
        );
        self.node.transact(vec![open, deposit], &options).await
    }

    /// Opens an empty position with no collateral and no debt.
    pub async fn create_empty(&self, maker: &str, overrides: &TxOverrides) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "positionadd",
            maker,
            &options.permission,
            json!({ "maker": maker }),
        );
        self.node.transact(vec![action], &options).await
    }

    pub async fn add_collateral(
        &self,
        maker: &str,
        position_id: u64,
        amount: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::transfer(
            &self.config.collateral_token,
            maker,
            &self.config.contract,
            &self.collateral_asset(amount)?,
            &Self::position_memo(position_id),
            &options.permission,
        );
        self.node.transact(vec![action], &options).await
    }

    pub async fn withdraw_collateral(
        &self,
        maker: &str,
        position_id: u64,
        amount: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "colwithdraw",
            maker,
            &options.permission,
            json!({
                "maker": maker,
                "collateral": self.collateral_asset(amount)?,
                "position_id": position_id,
            }),
        );
        self.node.transact(vec![action], &options).await
    }

    pub async fn generate_debt(
        &self,
        maker: &str,
        position_id: u64,
        debt: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "debtgenerate",
            maker,
            &options.permission,
            json!({
                "maker": maker,
                "debt": self.stable_asset(debt)?,
                "position_id": position_id,
            }),
        );
        self.node.transact(vec![action], &options).await
    }

    /// Pays debt back by transferring stablecoin to the contract.
    pub async fn burn_debt(
        &self,
        maker: &str,
        position_id: u64,
        debt: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::transfer(
            &self.config.stable_token,
            maker,
            &self.config.contract,
            &self.stable_asset(debt)?,
            &Self::position_memo(position_id),
            &options.permission,
        );
        self.node.transact(vec![action], &options).await
    }

    /// Flags an undercollateralized position for liquidation. Eligibility
    /// is checked on-chain, any account may call.
    pub async fn margin_call(
        &self,
        sender: &str,
        position_id: u64,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "margincall",
            sender,
            &options.permission,
            json!({ "position_id": position_id }),
        );
        self.node.transact(vec![action], &options).await
    }

    /// Deletes a position with zero debt and zero collateral.
    pub async fn delete_position(
        &self,
        maker: &str,
        position_id: u64,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "positiondel",
            maker,
            &options.permission,
            json!({ "position_id": position_id }),
        );
        self.node.transact(vec![action], &options).await
    }

    /// Transfers position ownership to another account.
    pub async fn give(
        &self,
        maker: &str,
        position_id: u64,
        to: &str,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "positiongive",
            maker,
            &options.permission,
            json!({ "position_id": position_id, "to": to }),
        );
        self.node.transact(vec![action], &options).await
    }
}

impl<N: TableReader, R: TableRow> PositionsClient<N, R> {
    pub async fn position_by_id(&self, position_id: u64) -> Result<Option<R>> {
        let query = self
            .table("positions")
            .with_lower_bound(&position_id.to_string())
            .with_upper_bound(&position_id.to_string());
        table::fetch_one(&self.node, query).await
    }

    pub async fn require_position(&self, position_id: u64) -> Result<R> {
        self.position_by_id(position_id)
            .await?
            .ok_or_else(|| Error::EntityNotFound(format!("position {position_id}")))
    }

    pub async fn positions_by_maker(&self, maker: &str) -> Result<Vec<R>> {
        let query = self
            .table("positions")
            .with_index(2, "name")
            .with_lower_bound(maker)
            .with_upper_bound(maker);
        table::parse_rows(self.node.get_table_rows(&query).await?.rows)
    }

    /// Every position in the contract, across page boundaries.
    pub async fn all_positions(&self) -> Result<Vec<R>> {
        table::fetch_all(&self.node, self.table("positions"), "position_id").await
    }

    pub async fn parameters(&self) -> Result<ParametersRow> {
        table::fetch_one(&self.node, self.table("parameters"))
            .await?
            .ok_or_else(|| Error::EntityNotFound(ParametersRow::ENTITY.to_string()))
    }

    pub async fn settings(&self) -> Result<SettingsRow> {
        table::fetch_one(&self.node, self.table("ctrsettings"))
            .await?
            .ok_or_else(|| Error::EntityNotFound(SettingsRow::ENTITY.to_string()))
    }

    /// Oracle price feed rows, one per traded symbol.
    pub async fn rates(&self) -> Result<Vec<RateRow>> {
        let query = TableQuery::new(&self.config.oracle, &self.config.oracle, "orarates");
        table::parse_rows(self.node.get_table_rows(&query).await?.rows)
    }

    pub async fn referral_by_id(&self, referral_id: u64) -> Result<Option<ReferralRow>> {
        let query = self
            .table("ctrreferrals")
            .with_lower_bound(&referral_id.to_string())
            .with_upper_bound(&referral_id.to_string());
        table::fetch_one(&self.node, query).await
    }

    pub async fn all_referrals(&self) -> Result<Vec<ReferralRow>> {
        table::fetch_all(&self.node, self.table("ctrreferrals"), "referral_id").await
    }

    pub async fn position_referrals(&self) -> Result<Vec<PositionReferralRow>> {
        table::fetch_all(&self.node, self.table("positionrefs"), "position_id").await
    }

    pub async fn collateral_balance(&self, account: &str) -> Result<D128> {
        let entries = self
            .node
            .get_currency_balance(
                &self.config.collateral_token,
                account,
                &self.config.collateral_symbol,
            )
            .await?;
        balance_to_number(&entries)
    }

    pub async fn stable_balance(&self, account: &str) -> Result<D128> {
        let entries = self
            .node
            .get_currency_balance(
                &self.config.stable_token,
                account,
                &self.config.stable_symbol,
            )
            .await?;
        balance_to_number(&entries)
    }

    fn table(&self, table: &str) -> TableQuery {
        TableQuery::new(&self.config.contract, &self.config.contract, table)
    }
}
