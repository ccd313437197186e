//! In-memory node double for tests.
//!
//! [`MockNode`] serves seeded table rows through the same bounded range
//! queries the real node answers, and records every submitted action list
//! so tests can assert on the exact payloads a client produced.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    action::{Action, TxOptions},
    error::{Error, Result},
    node::{Receipt, TableQuery, TableReader, TableRows, Transactor},
};

struct MockTable {
    id_field: &'static str,
    index_field: Option<&'static str>,
    rows: Vec<Value>,
}

#[derive(Default)]
pub struct MockNode {
    tables: HashMap<(String, String), MockTable>,
    balances: HashMap<(String, String, String), Vec<String>>,
    submitted: Mutex<Vec<(Vec<Action>, TxOptions)>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table whose rows are ordered by `id_field`.
    pub fn with_table(
        mut self,
        code: &str,
        table: &str,
        id_field: &'static str,
        rows: Vec<Value>,
    ) -> Self {
        self.tables.insert(
            (code.to_string(), table.to_string()),
            MockTable {
                id_field,
                index_field: None,
                rows,
            },
        );
        self
    }

    /// Seeds a table that additionally answers secondary-index queries
    /// against `index_field`.
    pub fn with_indexed_table(
        mut self,
        code: &str,
        table: &str,
        id_field: &'static str,
        index_field: &'static str,
        rows: Vec<Value>,
    ) -> Self {
        self.tables.insert(
            (code.to_string(), table.to_string()),
            MockTable {
                id_field,
                index_field: Some(index_field),
                rows,
            },
        );
        self
    }

    pub fn with_balance(
        mut self,
        code: &str,
        account: &str,
        symbol: &str,
        entries: &[&str],
    ) -> Self {
        self.balances.insert(
            (code.to_string(), account.to_string(), symbol.to_string()),
            entries.iter().map(|e| e.to_string()).collect(),
        );
        self
    }

    /// Action lists handed to [`Transactor::transact`], in order.
    pub async fn submitted(&self) -> Vec<(Vec<Action>, TxOptions)> {
        self.submitted.lock().await.clone()
    }
}

fn key_cmp(key: &Value, bound: &str) -> Option<Ordering> {
    match key {
        Value::Number(n) => Some(n.as_u64()?.cmp(&bound.parse().ok()?)),
        Value::String(s) => Some(s.as_str().cmp(bound)),
        _ => None,
    }
}

fn within(key: &Value, lower: Option<&str>, upper: Option<&str>) -> bool {
    let above =
        lower.is_none_or(|bound| key_cmp(key, bound).is_some_and(|ord| ord != Ordering::Less));
    let below =
        upper.is_none_or(|bound| key_cmp(key, bound).is_some_and(|ord| ord != Ordering::Greater));
    above && below
}

impl TableReader for MockNode {
    async fn get_table_rows(&self, query: &TableQuery) -> Result<TableRows> {
        let table = self
            .tables
            .get(&(query.code.clone(), query.table.clone()))
            .ok_or_else(|| {
                Error::Remote(format!("unknown table {}/{}", query.code, query.table))
            })?;
        let key_field = if query.index_position.is_some() {
            table
                .index_field
                .ok_or_else(|| Error::Remote(format!("{} has no secondary index", query.table)))?
        } else {
            table.id_field
        };
        let selected: Vec<Value> = table
            .rows
            .iter()
            .filter(|row| {
                within(
                    &row[key_field],
                    query.lower_bound.as_deref(),
                    query.upper_bound.as_deref(),
                )
            })
            .cloned()
            .collect();
        let more = selected.len() > query.limit as usize;
        Ok(TableRows {
            rows: selected.into_iter().take(query.limit as usize).collect(),
            more,
        })
    }

    async fn get_currency_balance(
        &self,
        code: &str,
        account: &str,
        symbol: &str,
    ) -> Result<Vec<String>> {
        Ok(self
            .balances
            .get(&(code.to_string(), account.to_string(), symbol.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

impl Transactor for MockNode {
    async fn transact(&self, actions: Vec<Action>, options: &TxOptions) -> Result<Receipt> {
        let mut submitted = self.submitted.lock().await;
        submitted.push((actions, options.clone()));
        Ok(Receipt {
            transaction_id: format!("mock-tx-{}", submitted.len()),
            processed: Value::Null,
        })
    }
}
