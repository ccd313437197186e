//! Typed table rows and the full-table scan.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Error, Result},
    node::{TableQuery, TableReader},
    validate,
};

/// A typed table row: the entity name, the exact field set the contract
/// serves, and the serde decode target.
///
/// Decoding always goes through field-set validation first, so a contract
/// upgrade that adds or removes fields fails loudly instead of producing
/// partially-filled rows.
pub trait TableRow: DeserializeOwned {
    const ENTITY: &'static str;
    const FIELDS: &'static [&'static str];
}

pub fn parse_row<R: TableRow>(row: Value) -> Result<R> {
    validate::validate_row(&row, R::ENTITY, R::FIELDS)?;
    serde_json::from_value(row).map_err(|source| Error::RowParse {
        entity: R::ENTITY.to_string(),
        source,
    })
}

pub fn parse_rows<R: TableRow>(rows: Vec<Value>) -> Result<Vec<R>> {
    rows.into_iter().map(parse_row).collect()
}

/// Fetches at most one row for a point query.
pub async fn fetch_one<N: TableReader, R: TableRow>(
    node: &N,
    query: TableQuery,
) -> Result<Option<R>> {
    let page = node.get_table_rows(&query.with_limit(1)).await?;
    page.rows.into_iter().next().map(parse_row).transpose()
}

/// Fetches every row of a table despite the node's page-size cap.
///
/// Rows must be ordered by an ascending numeric `id_field`; the next page
/// starts at the last accumulated row's id plus one, so nothing is fetched
/// twice. Gaps in the id space (deleted rows) are preserved as-is. The
/// scan assumes ids are never reused at lower values; a page that claims
/// more rows remain while delivering none violates that contract and
/// fails fast.
pub async fn fetch_all_rows<N: TableReader>(
    node: &N,
    query: TableQuery,
    id_field: &str,
) -> Result<Vec<Value>> {
    let mut rows: Vec<Value> = vec![];
    let mut lower_bound = 0u64;
    loop {
        let page = node
            .get_table_rows(&query.clone().with_lower_bound(&lower_bound.to_string()))
            .await?;
        debug!(
            table = %query.table,
            fetched = page.rows.len(),
            more = page.more,
            "table page"
        );
        if page.rows.is_empty() && page.more {
            return Err(Error::ProtocolViolation(format!(
                "{} scan returned an empty page flagged as having more rows",
                query.table
            )));
        }
        rows.extend(page.rows);
        if !page.more {
            return Ok(rows);
        }
        let last = rows.last().expect("scan accumulated at least one row");
        lower_bound = row_id(last, id_field, &query.table)? + 1;
    }
}

/// [`fetch_all_rows`] composed with typed decoding.
pub async fn fetch_all<N: TableReader, R: TableRow>(
    node: &N,
    query: TableQuery,
    id_field: &str,
) -> Result<Vec<R>> {
    parse_rows(fetch_all_rows(node, query, id_field).await?)
}

fn row_id(row: &Value, id_field: &str, table: &str) -> Result<u64> {
    // Nodes serve u64 ids as JSON numbers or as strings depending on size
    let id = match &row[id_field] {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    id.ok_or_else(|| {
        Error::ProtocolViolation(format!("{table} row carries no numeric {id_field}"))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_row_id_accepts_numbers_and_strings() {
        assert_eq!(row_id(&json!({"id": 7}), "id", "t").unwrap(), 7);
        assert_eq!(row_id(&json!({"id": "7"}), "id", "t").unwrap(), 7);
        assert!(row_id(&json!({"id": true}), "id", "t").is_err());
        assert!(row_id(&json!({"other": 7}), "id", "t").is_err());
    }
}
