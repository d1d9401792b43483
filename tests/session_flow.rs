use std::fs;
use std::path::PathBuf;

use fpl_terminal::fake_source::{FakeCalls, FakeReply, FakeSource};
use fpl_terminal::fpl_fetch::TeamId;
use fpl_terminal::session::{
    NO_HISTORY, NO_TRANSFERS, SessionState, TabView, load_dashboard, submit,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_source() -> FakeSource {
    FakeSource::new(
        FakeReply::json(read_fixture("bootstrap.json")),
        FakeReply::json(read_fixture("transfers.json")),
        FakeReply::json(read_fixture("history.json")),
    )
}

#[test]
fn non_numeric_input_never_fetches() {
    let source = fixture_source();
    for raw in ["abc", "71O8828", "12 34", "-1"] {
        let state = submit(&source, raw);
        assert_eq!(
            state,
            SessionState::InvalidInput {
                entered: raw.to_string()
            }
        );
        assert_eq!(state.message(), Some("Please enter your Team ID to proceed."));
    }
    assert_eq!(source.calls(), FakeCalls::default());
}

#[test]
fn blank_input_keeps_waiting() {
    let source = fixture_source();
    assert_eq!(submit(&source, ""), SessionState::AwaitingInput);
    assert_eq!(source.calls().total(), 0);
}

#[test]
fn directory_failure_stops_the_session() {
    let source = FakeSource::new(
        FakeReply::Status(500),
        FakeReply::json(read_fixture("transfers.json")),
        FakeReply::json(read_fixture("history.json")),
    );
    let state = submit(&source, "7108828");

    let SessionState::Error(msg) = &state else {
        panic!("expected a fatal error, got {state:?}");
    };
    assert!(msg.starts_with("HTTP error occurred while fetching players"));
    assert!(msg.contains("500"));
    assert_eq!(
        source.calls(),
        FakeCalls {
            directory: 1,
            transfers: 0,
            history: 0,
        }
    );
}

#[test]
fn successful_load_fills_both_tabs() {
    let source = fixture_source();
    let state = submit(&source, "7108828");

    let SessionState::Displaying(dashboard) = &state else {
        panic!("expected a dashboard, got {state:?}");
    };
    assert_eq!(dashboard.team, TeamId::new(7108828).unwrap());
    assert_eq!(dashboard.transfers.table().map(|t| t.len()), Some(4));
    assert_eq!(dashboard.history.table().map(|t| t.len()), Some(4));
    assert!(dashboard.transfers.warnings().is_empty());
    assert_eq!(
        source.calls(),
        FakeCalls {
            directory: 1,
            transfers: 1,
            history: 1,
        }
    );

    let TabView::Ready { charts, .. } = &dashboard.history else {
        panic!("history should be ready");
    };
    assert!(charts.iter().all(|c| c.chart().is_some()));
}

#[test]
fn tabs_degrade_independently() {
    let source = FakeSource::new(
        FakeReply::json(read_fixture("bootstrap.json")),
        FakeReply::Status(404),
        FakeReply::json(read_fixture("history_empty.json")),
    );
    let team = TeamId::new(42).unwrap();
    let state = load_dashboard(&source, team);

    let SessionState::Displaying(dashboard) = state else {
        panic!("directory succeeded, so the dashboard should display");
    };
    let TabView::Failed(msg) = &dashboard.transfers else {
        panic!("transfers should fail, got {:?}", dashboard.transfers);
    };
    assert!(msg.starts_with("HTTP error occurred while fetching transfers"));
    assert_eq!(dashboard.history, TabView::Empty(NO_HISTORY.to_string()));
    assert_eq!(source.calls().total(), 3);
}

#[test]
fn empty_transfers_show_the_no_data_message() {
    let source = FakeSource::new(
        FakeReply::json(read_fixture("bootstrap.json")),
        FakeReply::json("[]"),
        FakeReply::Status(503),
    );
    let state = submit(&source, "1");
    let SessionState::Displaying(dashboard) = state else {
        panic!("expected a dashboard");
    };
    assert_eq!(dashboard.transfers, TabView::Empty(NO_TRANSFERS.to_string()));
    assert!(matches!(dashboard.history, TabView::Failed(_)));
}

#[test]
fn malformed_directory_is_an_other_error() {
    let source = FakeSource::new(
        FakeReply::json("{\"elements\": 3}"),
        FakeReply::json("[]"),
        FakeReply::json("{}"),
    );
    let SessionState::Error(msg) = submit(&source, "1") else {
        panic!("expected a fatal error");
    };
    assert!(msg.starts_with("Other error occurred while fetching players"));
    assert_eq!(source.calls().transfers, 0);
}
