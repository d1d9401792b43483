use std::fs;
use std::path::PathBuf;

use fpl_terminal::error::{ErrorTier, Resource};
use fpl_terminal::fpl_fetch::{parse_bootstrap_json, parse_history_json, parse_transfers_json};
use fpl_terminal::table::Cell;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_bootstrap_fixture() {
    let raw = read_fixture("bootstrap.json");
    let directory = parse_bootstrap_json(&raw).expect("fixture should parse");
    // Elements without an integer id or a web_name are skipped.
    assert_eq!(directory.len(), 5);
    assert_eq!(directory.name(351), Some("Haaland"));
    assert_eq!(directory.name(999), None);
}

#[test]
fn bootstrap_without_elements_is_malformed() {
    let err = parse_bootstrap_json(r#"{"events": []}"#).unwrap_err();
    assert_eq!(err.tier(), ErrorTier::Other);
    assert_eq!(err.resource(), Resource::Players);
}

#[test]
fn parses_transfers_fixture() {
    let raw = read_fixture("transfers.json");
    let table = parse_transfers_json(&raw).expect("fixture should parse");
    assert_eq!(table.len(), 4);
    assert!(table.has_column("element_in"));
    assert!(table.has_column("element_out_cost"));
    assert!(matches!(table.get(0, "time"), Some(Cell::Time(_))));
    assert_eq!(
        table.get(3, "time"),
        Some(&Cell::Text("not a timestamp".to_string()))
    );
}

#[test]
fn transfers_without_time_get_a_null_time_column() {
    let raw = read_fixture("transfers_no_time.json");
    let table = parse_transfers_json(&raw).expect("fixture should parse");
    assert_eq!(table.len(), 2);
    let times = table.column("time").expect("time column is always present");
    assert!(times.iter().all(|cell| cell.is_null()));
}

#[test]
fn transfers_must_be_an_array() {
    let err = parse_transfers_json(r#"{"detail": "Not found."}"#).unwrap_err();
    assert_eq!(err.tier(), ErrorTier::Other);
    assert!(err.to_string().contains("transfers"));
}

#[test]
fn transfers_null_is_empty() {
    let table = parse_transfers_json("null").expect("null should parse");
    assert!(table.is_empty());
}

#[test]
fn history_flattens_current_then_past_seasons() {
    let raw = read_fixture("history.json");
    let table = parse_history_json(&raw).expect("fixture should parse");
    assert_eq!(table.len(), 4);
    let events: Vec<i64> = table
        .column("event")
        .unwrap()
        .into_iter()
        .filter_map(Cell::as_i64)
        .collect();
    assert_eq!(events, [3, 1, 2, 38]);
    // Season summaries without a nested history contribute no rows.
    assert!(!table.has_column("season_name"));
}

#[test]
fn empty_history_is_an_empty_table_not_an_error() {
    let raw = read_fixture("history_empty.json");
    let table = parse_history_json(&raw).expect("empty history should parse");
    assert!(table.is_empty());
    assert!(table.columns().is_empty());
}

#[test]
fn history_with_bad_json_is_malformed() {
    let err = parse_history_json("<html>maintenance</html>").unwrap_err();
    assert_eq!(err.tier(), ErrorTier::Other);
    assert_eq!(err.resource(), Resource::History);
}
