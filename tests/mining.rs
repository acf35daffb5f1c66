use sigmine::io::{parse_confidence_table, parse_transactions, read_confidence_table, read_transactions, write_report};
use sigmine::{
    mine_significant_itemsets, ConditionalOrder, MinerConfig, MiningError, ReportFormat, SignificanceMeasure,
    TransactionDatabase,
};
use std::path::{Path, PathBuf};

fn data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

fn load(config: &MinerConfig) -> TransactionDatabase {
    let transactions = read_transactions(&data("friends.txt")).unwrap();
    let confidence = read_confidence_table(&data("confidence.txt")).unwrap();
    TransactionDatabase::new(transactions, confidence, config).unwrap()
}

#[test]
fn test_fixture_files_parse() {
    let transactions = read_transactions(&data("friends.txt")).unwrap();
    assert_eq!(transactions.len(), 7);
    assert_eq!(transactions[2].id, 3);
    assert_eq!(transactions[2].items.len(), 5);
    assert_eq!(transactions[6].items, vec![(3, 20), (5, 20), (2, 30)]);

    let confidence = read_confidence_table(&data("confidence.txt")).unwrap();
    assert_eq!(confidence.domain_size(), 8);
    assert_eq!(confidence.get(6), 0.9);
}

#[test]
fn test_text_report() {
    let config = MinerConfig::with_min_significance(0.5);
    let report = mine_significant_itemsets(&load(&config), &config).unwrap();

    let mut out = Vec::new();
    write_report(&mut out, &report, ReportFormat::Text, Path::new("buffer")).unwrap();
    let expected = "\
Found significant itemsets:
{ 6 }
{ 5 6 }
{ 6 7 }
{ 5 6 7 }
{ 7 }
{ 5 7 }
{ 5 }

Found (7) significant itemsets
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_json_report() {
    let config = MinerConfig::with_min_significance(0.5);
    let report = mine_significant_itemsets(&load(&config), &config).unwrap();

    let mut out = Vec::new();
    write_report(&mut out, &report, ReportFormat::Json, Path::new("buffer")).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let itemsets = json["itemsets"].as_array().unwrap();
    assert_eq!(itemsets.len(), 7);
    assert_eq!(itemsets[0]["items"], serde_json::json!([6]));
    assert_eq!(itemsets[0]["sources"], serde_json::json!([2, 3, 4]));
    assert_eq!(json["level_counts"], serde_json::json!([3, 3, 1]));
    assert_eq!(json["stats"]["global_tree_nodes"], 4);

    let ratio = itemsets[6]["significance"].as_f64().unwrap();
    assert!((ratio - 284.0 / 333.0).abs() < 1e-12);
}

#[test]
fn test_json_config_file() {
    let config = MinerConfig::from_json_file(&data("pattern_share.json")).unwrap();
    assert_eq!(config.measure, SignificanceMeasure::PatternShare);
    assert_eq!(config.conditional_order, ConditionalOrder::Inherited);
    assert_eq!(config.max_itemsets, MinerConfig::default().max_itemsets);

    let report = mine_significant_itemsets(&load(&config), &config).unwrap();
    let mut found: Vec<Vec<usize>> = report.itemsets.iter().map(|i| i.items.clone()).collect();
    found.sort();
    assert_eq!(found, vec![vec![1, 5, 6, 7], vec![5, 6], vec![5, 6, 7]]);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = read_transactions(&data("absent.txt"));
    assert!(matches!(result, Err(MiningError::Io { .. })));
}

#[test]
fn test_malformed_transactions() {
    let origin = Path::new("inline");

    let truncated = parse_transactions("2\n1 2 3 5\n", origin);
    assert!(matches!(truncated, Err(MiningError::Parse { .. })));

    let bad_weight = parse_transactions("1\n1 1 3 heavy\n", origin);
    match bad_weight {
        Err(MiningError::Parse { message, .. }) => assert!(message.contains("item weight")),
        other => panic!("expected a parse error, got {other:?}"),
    }

    let trailing = parse_transactions("1\n1 1 3 5\n9\n", origin);
    assert!(matches!(trailing, Err(MiningError::Parse { .. })));

    // Line breaks are not significant.
    let flat = parse_transactions("1 7 2 3 5 4 1", origin).unwrap();
    assert_eq!(flat[0].items, vec![(3, 5), (4, 1)]);
}

#[test]
fn test_malformed_confidence_table() {
    let origin = Path::new("inline");

    let out_of_domain = parse_confidence_table("2\n1 0.5\n3 0.5\n", origin);
    assert!(matches!(out_of_domain, Err(MiningError::ItemOutOfDomain { item: 3, domain: 2 })));

    let negative = parse_confidence_table("1\n1 -0.5\n", origin);
    assert!(matches!(negative, Err(MiningError::InvalidInput(_))));
}

#[test]
fn test_transaction_outside_domain() {
    let config = MinerConfig::default();
    let transactions = parse_transactions("1\n1 1 9 5\n", Path::new("inline")).unwrap();
    let confidence = read_confidence_table(&data("confidence.txt")).unwrap();

    let result = TransactionDatabase::new(transactions, confidence, &config);
    assert!(matches!(result, Err(MiningError::ItemOutOfDomain { item: 9, domain: 8 })));
}
