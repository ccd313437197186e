use cdp_sdk::{
    error::{Error, Result},
    node::{TABLE_PAGE_LIMIT, TableQuery, TableReader, TableRows},
    table,
    testing::MockNode,
};
use serde_json::json;

fn position_rows(count: u64) -> Vec<serde_json::Value> {
    (0..count)
        .map(|id| json!({"position_id": id, "maker": format!("maker{}", id % 7)}))
        .collect()
}

/// Scans a table three node pages deep and checks the seams.
#[tokio::test]
async fn test_scan_concatenates_pages() {
    let total = 2 * TABLE_PAGE_LIMIT as u64 + 3427;
    let node = MockNode::new().with_table(
        "eosdtcntract",
        "positions",
        "position_id",
        position_rows(total),
    );

    let rows = table::fetch_all_rows(
        &node,
        TableQuery::new("eosdtcntract", "eosdtcntract", "positions"),
        "position_id",
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 23427);
    let ids: Vec<u64> = rows.iter().map(|r| r["position_id"].as_u64().unwrap()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

/// Deleted rows leave gaps in the id space; the scan preserves them and
/// still fetches nothing twice.
#[tokio::test]
async fn test_scan_preserves_id_gaps() {
    let rows: Vec<_> = [0u64, 1, 4, 9, 10, 11, 30, 31]
        .iter()
        .map(|id| json!({"position_id": id, "maker": "alice"}))
        .collect();
    let node = MockNode::new().with_table("eosdtcntract", "positions", "position_id", rows);

    let query = TableQuery::new("eosdtcntract", "eosdtcntract", "positions").with_limit(3);
    let rows = table::fetch_all_rows(&node, query, "position_id").await.unwrap();

    let ids: Vec<u64> = rows.iter().map(|r| r["position_id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 4, 9, 10, 11, 30, 31]);
}

#[tokio::test]
async fn test_scan_single_page() {
    let node = MockNode::new().with_table(
        "eosdtcntract",
        "positions",
        "position_id",
        position_rows(5),
    );
    let rows = table::fetch_all_rows(
        &node,
        TableQuery::new("eosdtcntract", "eosdtcntract", "positions"),
        "position_id",
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 5);
}

/// Node that claims more rows remain while delivering none.
struct LyingNode;

impl TableReader for LyingNode {
    async fn get_table_rows(&self, _query: &TableQuery) -> Result<TableRows> {
        Ok(TableRows {
            rows: vec![],
            more: true,
        })
    }

    async fn get_currency_balance(
        &self,
        _code: &str,
        _account: &str,
        _symbol: &str,
    ) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn test_scan_rejects_empty_page_with_more() {
    let result = table::fetch_all_rows(
        &LyingNode,
        TableQuery::new("eosdtcntract", "eosdtcntract", "positions"),
        "position_id",
    )
    .await;
    assert!(matches!(result, Err(Error::ProtocolViolation(_))));
}

#[tokio::test]
async fn test_scan_rejects_row_without_numeric_id() {
    let rows = vec![
        json!({"position_id": {"nested": 1}, "maker": "alice"}),
        json!({"position_id": 2, "maker": "bob"}),
    ];
    let node = MockNode::new().with_table("eosdtcntract", "positions", "maker", rows);

    // Limit of one forces a second page, so the cursor has to read the id
    let query = TableQuery::new("eosdtcntract", "eosdtcntract", "positions").with_limit(1);
    let result = table::fetch_all_rows(&node, query, "position_id").await;
    assert!(matches!(result, Err(Error::ProtocolViolation(_))));
}
