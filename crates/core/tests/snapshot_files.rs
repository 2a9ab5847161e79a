use chainscope_api::SearchTarget;
use chainscope_core::{ChainSearcher, ChainscopeError, SearchConfig, Snapshot};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use tokio_util::sync::CancellationToken;

const SHOP: &str = r#"{
    "methods": [
        { "owner": "Cart", "name": "total", "returns": "Money", "occurrences": 140 },
        { "owner": "Order", "name": "cart", "returns": "Cart", "occurrences": 90 },
        { "owner": "Checkout", "name": "order", "returns": "Order", "occurrences": 75 },
        { "owner": "Money", "name": "plus", "returns": "Money", "occurrences": 300,
          "overloads": [ { "parameters": [ { "type": "Money" } ] } ] },
        { "owner": "Prices", "name": "zero", "static": true, "returns": "Money", "occurrences": 20 }
    ],
    "call_order": [
        { "before": "Order#cart", "after": "Cart#total", "count": 60 }
    ],
    "scope": ["Checkout"]
}"#;

#[test]
fn test_search_over_snapshot_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SHOP.as_bytes()).unwrap();

    let snapshot = Snapshot::from_json_file(file.path()).unwrap();
    let chains = ChainSearcher::new(SearchConfig::default())
        .search(
            &SearchTarget::value("Money"),
            &snapshot.context(),
            &snapshot.index(),
            &CancellationToken::new(),
        )
        .unwrap();

    let rendered: Vec<String> = chains.iter().map(|c| c.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["Checkout.order().cart().total()", "Prices.zero()"]
    );
}

#[test]
fn test_config_and_snapshot_side_by_side() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("search.json");
    let snapshot_path = dir.path().join("shop.json");
    std::fs::write(&config_path, r#"{ "max_chain_length": 2 }"#).unwrap();
    std::fs::write(&snapshot_path, SHOP).unwrap();

    let config = SearchConfig::from_json_file(&config_path).unwrap();
    let snapshot = Snapshot::from_json_file(&snapshot_path).unwrap();
    let chains = ChainSearcher::new(config)
        .search(
            &SearchTarget::value("Money"),
            &snapshot.context(),
            &snapshot.index(),
            &CancellationToken::new(),
        )
        .unwrap();

    assert!(chains.iter().all(|c| c.len() <= 2));
    assert!(chains.iter().any(|c| c.to_string() == "Order.cart().total()"));
}

#[test]
fn test_missing_snapshot_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Snapshot::from_json_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ChainscopeError::Io(_)));
}

#[test]
fn test_malformed_snapshot_is_a_json_error() {
    let err = Snapshot::from_json_str(r#"{ "methods": 3 }"#).unwrap_err();
    assert!(matches!(err, ChainscopeError::Json(_)));
}
