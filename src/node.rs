//! Node boundary.
//!
//! The SDK talks to the chain through two seams: [`TableReader`] for the
//! read-only HTTP API and [`Transactor`] for transaction submission.
//! [`HttpNode`] is the bundled [`TableReader`]; submission requires
//! signing, which the SDK delegates, so [`Transactor`] is implemented by
//! the caller's wallet/signing stack (or by [`crate::testing::MockNode`]
//! in tests).

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

use crate::{
    action::{Action, TxOptions},
    error::{Error, Result},
};

/// Maximum number of rows the node returns per table query page.
pub const TABLE_PAGE_LIMIT: u32 = 10_000;

/// Bounded range query against a contract's persistent table.
#[derive(Clone, Debug, Serialize)]
pub struct TableQuery {
    pub code: String,
    pub scope: String,
    pub table: String,
    pub json: bool,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
}

impl TableQuery {
    pub fn new(code: &str, scope: &str, table: &str) -> Self {
        Self {
            code: code.to_string(),
            scope: scope.to_string(),
            table: table.to_string(),
            json: true,
            limit: TABLE_PAGE_LIMIT,
            lower_bound: None,
            upper_bound: None,
            index_position: None,
            key_type: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_lower_bound(mut self, lower_bound: &str) -> Self {
        self.lower_bound = Some(lower_bound.to_string());
        self
    }

    pub fn with_upper_bound(mut self, upper_bound: &str) -> Self {
        self.upper_bound = Some(upper_bound.to_string());
        self
    }

    /// Queries through a secondary index instead of the primary key.
    pub fn with_index(mut self, index_position: u32, key_type: &str) -> Self {
        self.index_position = Some(index_position);
        self.key_type = Some(key_type.to_string());
        self
    }
}

/// One page of a table range query.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TableRows {
    pub rows: Vec<Value>,
    #[serde(default)]
    pub more: bool,
}

/// Opaque success report of a submitted transaction.
#[derive(Clone, derive_more::Debug, Deserialize)]
pub struct Receipt {
    pub transaction_id: String,
    #[debug(skip)]
    #[serde(default)]
    pub processed: Value,
}

/// Remote read API.
pub trait TableReader {
    async fn get_table_rows(&self, query: &TableQuery) -> Result<TableRows>;

    async fn get_currency_balance(
        &self,
        code: &str,
        account: &str,
        symbol: &str,
    ) -> Result<Vec<String>>;
}

/// Remote submit API.
///
/// Implementations own connection handles and keys; the SDK never sees
/// either. A node-rejected transaction (auth failure, contract assertion,
/// expired window) must surface as an error, uninterpreted.
pub trait Transactor {
    async fn transact(&self, actions: Vec<Action>, options: &TxOptions) -> Result<Receipt>;
}

impl<T: TableReader> TableReader for &T {
    async fn get_table_rows(&self, query: &TableQuery) -> Result<TableRows> {
        (**self).get_table_rows(query).await
    }

    async fn get_currency_balance(
        &self,
        code: &str,
        account: &str,
        symbol: &str,
    ) -> Result<Vec<String>> {
        (**self).get_currency_balance(code, account, symbol).await
    }
}

impl<T: Transactor> Transactor for &T {
    async fn transact(&self, actions: Vec<Action>, options: &TxOptions) -> Result<Receipt> {
        (**self).transact(actions, options).await
    }
}

/// Read-only HTTP client for a chain node.
#[derive(Clone, Debug)]
pub struct HttpNode {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpNode {
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self::with_client(
            Url::parse(endpoint)?,
            reqwest::Client::new(),
        ))
    }

    /// Uses a caller-configured client, e.g. with custom timeouts.
    pub fn with_client(mut endpoint: Url, client: reqwest::Client) -> Self {
        // Url::join drops the last path segment without this
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.endpoint.join(path)?;
        tracing::trace!(%url, "node request");
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Remote(format!("{status}: {detail}")));
        }
        Ok(response.json().await?)
    }
}

impl TableReader for HttpNode {
    async fn get_table_rows(&self, query: &TableQuery) -> Result<TableRows> {
        self.call("v1/chain/get_table_rows", query).await
    }

    async fn get_currency_balance(
        &self,
        code: &str,
        account: &str,
        symbol: &str,
    ) -> Result<Vec<String>> {
        self.call(
            "v1/chain/get_currency_balance",
            &serde_json::json!({
                "code": code,
                "account": account,
                "symbol": symbol,
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_query_serialization_skips_unset_bounds() {
        let query = TableQuery::new("eosdtcntract", "eosdtcntract", "positions");
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["code"], "eosdtcntract");
        assert_eq!(body["json"], true);
        assert_eq!(body["limit"], 10_000);
        assert!(body.get("lower_bound").is_none());
        assert!(body.get("index_position").is_none());

        let query = query.with_lower_bound("5").with_index(2, "name");
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["lower_bound"], "5");
        assert_eq!(body["index_position"], 2);
        assert_eq!(body["key_type"], "name");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let node = HttpNode::with_client(
            Url::parse("https://node.example.com/api").unwrap(),
            reqwest::Client::new(),
        );
        assert_eq!(
            node.endpoint().join("v1/chain/get_table_rows").unwrap().as_str(),
            "https://node.example.com/api/v1/chain/get_table_rows"
        );
    }
}
