//! Governance contract client.
//!
//! Voting weight comes from governance tokens staked with the contract;
//! proposals carry their changes as a JSON document that the contract
//! applies once the vote passes.

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
pub struct GovernanceConfig {
    pub contract: String,
    pub nut_token: String,
    pub nut_symbol: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProposalRow {
    pub proposal_name: String,
    pub proposer: String,
    pub title: String,
    pub proposal_json: String,
    pub created_at: String,
    pub expires_at: String,
    pub proposal_type: u8,
}

impl TableRow for ProposalRow {
    const ENTITY: &'static str = "proposal";
    const FIELDS: &'static [&'static str] = &[
        "proposal_name",
        "proposer",
        "title",
        "proposal_json",
        "created_at",
        "expires_at",
        "proposal_type",
    ];
}

#[derive(Clone, Debug, Deserialize)]
pub struct VoteRow {
    pub id: u64,
    pub proposal_name: String,
    pub voter: String,
    pub vote: u8,
    pub updated_at: String,
    pub quantity: String,
}

impl TableRow for VoteRow {
    const ENTITY: &'static str = "vote";
    const FIELDS: &'static [&'static str] =
        &["id", "proposal_name", "voter", "vote", "updated_at", "quantity"];
}

/// Staked balance and unstaking state of one voter.
#[derive(Clone, Debug, Deserialize)]
pub struct VoterInfoRow {
    pub voter: String,
    pub voting_amount: String,
    pub withdrawal_date: String,
}

impl TableRow for VoterInfoRow {
    const ENTITY: &'static str = "voter info";
    const FIELDS: &'static [&'static str] = &["voter", "voting_amount", "withdrawal_date"];
}

#[derive(Clone, Debug, Deserialize)]
pub struct GovSettingsRow {
    pub setting_id: u64,
    pub position_account: String,
    pub min_proposal_weight: String,
    pub freeze_period: u64,
    pub min_participation: String,
    pub success_margin: String,
}

impl TableRow for GovSettingsRow {
    const ENTITY: &'static str = "governance settings";
    const FIELDS: &'static [&'static str] = &[
        "setting_id",
        "position_account",
        "min_proposal_weight",
        "freeze_period",
        "min_participation",
        "success_margin",
    ];
}

pub struct GovernanceClient<N> {
    node: N,
    config: GovernanceConfig,
    symbols: SymbolTable,
}

impl<N> GovernanceClient<N> {
    pub fn new(node: N, network: &Network) -> Self {
        Self::custom(
            node,
            GovernanceConfig {
                contract: network.governance().to_string(),
                nut_token: network.nut_token().to_string(),
                nut_symbol: "NUT".to_string(),
            },
            network.symbols().clone(),
        )
    }

    pub fn custom(node: N, config: GovernanceConfig, symbols: SymbolTable) -> Self {
        Self {
            node,
            config,
            symbols,
        }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    fn nut_asset(&self, amount: D128) -> Result<String> {
        self.symbols
            .amount_to_asset_string(amount, &self.config.nut_symbol, None)
    }
}

impl<N: Transactor> GovernanceClient<N> {
    /// Stakes governance tokens, increasing the voter's weight.
    pub async fn stake(
        &self,
        voter: &str,
        amount: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::transfer(
            &self.config.nut_token,
            voter,
            &self.config.contract,
            &self.nut_asset(amount)?,
            "",
            &options.permission,
        );
        self.node.transact(vec![action], &options).await
    }

    pub async fn unstake(
        &self,
        voter: &str,
        amount: D128,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "unstake",
            voter,
            &options.permission,
            json!({
                "voter": voter,
                "quantity": self.nut_asset(amount)?,
            }),
        );
        self.node.transact(vec![action], &options).await
    }

    /// Casts a vote on a proposal; `vote` is 1 for yes, 0 for no.
    pub async fn vote(
        &self,
        voter: &str,
        proposal_name: &str,
        vote: u8,
        vote_json: &str,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "vote",
            voter,
            &options.permission,
            json!({
                "voter": voter,
                "proposal_name": proposal_name,
                "vote": vote,
                "vote_json": vote_json,
            }),
        );
        self.node.transact(vec![action], &options).await
    }

    pub async fn unvote(
        &self,
        voter: &str,
        proposal_name: &str,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "unvote",
            voter,
            &options.permission,
            json!({
                "voter": voter,
                "proposal_name": proposal_name,
            }),
        );
        self.node.transact(vec![action], &options).await
    }

    pub async fn propose(
        &self,
        proposer: &str,
        proposal_name: &str,
        title: &str,
        proposal_json: &str,
        expires_at: &str,
        proposal_type: u8,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "propose",
            proposer,
            &options.permission,
            json!({
                "proposer": proposer,
                "proposal_name": proposal_name,
                "title": title,
                "proposal_json": proposal_json,
                "expires_at": expires_at,
                "proposal_type": proposal_type,
            }),
        );
        self.node.transact(vec![action], &options).await
    }

    /// Closes an expired proposal so its outcome can be applied.
    pub async fn expire_proposal(
        &self,
        sender: &str,
        proposal_name: &str,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "expire",
            sender,
            &options.permission,
            json!({ "proposal_name": proposal_name }),
        );
        self.node.transact(vec![action], &options).await
    }

    /// Applies the changes of a passed proposal to the managed contracts.
    pub async fn apply_changes(
        &self,
        sender: &str,
        proposal_name: &str,
        overrides: &TxOverrides,
    ) -> Result<Receipt> {
        let options = TxOptions::resolve(overrides);
        let action = Action::new(
            &self.config.contract,
            "applychanges",
            sender,
            &options.permission,
            json!({ "proposal_name": proposal_name }),
        );
        self.node.transact(vec![action], &options).await
    }
}

impl<N: TableReader> GovernanceClient<N> {
    pub async fn proposals(&self) -> Result<Vec<ProposalRow>> {
        let query = self.table("proposals");
        table::parse_rows(self.node.get_table_rows(&query).await?.rows)
    }

    /// Every vote in the contract, across page boundaries.
    pub async fn votes(&self) -> Result<Vec<VoteRow>> {
        table::fetch_all(&self.node, self.table("votes"), "id").await
    }

    pub async fn votes_for_proposal(&self, proposal_name: &str) -> Result<Vec<VoteRow>> {
        let query = self
            .table("votes")
            .with_index(2, "name")
            .with_lower_bound(proposal_name)
            .with_upper_bound(proposal_name);
        table::parse_rows(self.node.get_table_rows(&query).await?.rows)
    }

    pub async fn voter_info(&self, voter: &str) -> Result<Option<VoterInfoRow>> {
        let query = self
            .table("voters")
            .with_lower_bound(voter)
            .with_upper_bound(voter);
        table::fetch_one(&self.node, query).await
    }

    pub async fn settings(&self) -> Result<GovSettingsRow> {
        table::fetch_one(&self.node, self.table("govsettings"))
            .await?
            .ok_or_else(|| Error::EntityNotFound(GovSettingsRow::ENTITY.to_string()))
    }

    pub async fn nut_balance(&self, account: &str) -> Result<D128> {
        let entries = self
            .node
            .get_currency_balance(&self.config.nut_token, account, &self.config.nut_symbol)
            .await?;
        balance_to_number(&entries)
    }

    fn table(&self, table: &str) -> TableQuery {
        TableQuery::new(&self.config.contract, &self.config.contract, table)
    }
}
