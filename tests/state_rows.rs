use fpl_terminal::fake_source::{FakeReply, FakeSource};
use fpl_terminal::session::{SessionState, load_dashboard};
use fpl_terminal::state::{AppState, DashboardTab, PLAYER_DATA_UNAVAILABLE};

#[test]
fn invalid_input_stays_out_of_loading() {
    let mut state = AppState::new();
    for c in "12x".chars() {
        state.push_char(c);
    }
    assert_eq!(state.begin_submit(), None);
    assert!(matches!(state.session, SessionState::InvalidInput { .. }));
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[INFO] Please enter your Team ID to proceed.")
    );
}

#[test]
fn numeric_input_moves_to_loading_then_displaying() {
    let mut state = AppState::new();
    for c in "7108828".chars() {
        state.push_char(c);
    }
    let team = state.begin_submit().expect("numeric id should be accepted");
    assert_eq!(state.session, SessionState::Loading { team });

    let source = FakeSource::demo();
    state.finish_load(load_dashboard(&source, team));
    assert!(matches!(state.session, SessionState::Displaying(_)));
    assert_eq!(state.current_table().map(|t| t.len()), Some(4));
    assert!(
        state
            .logs
            .iter()
            .any(|line| line == "[INFO] Performance History: 6 rows")
    );
}

#[test]
fn scrolling_is_clamped_per_tab() {
    let mut state = AppState::new();
    state.push_char('1');
    let team = state.begin_submit().unwrap();
    state.finish_load(load_dashboard(&FakeSource::demo(), team));

    for _ in 0..10 {
        state.scroll_down();
    }
    assert_eq!(state.current_scroll(), 3);

    state.toggle_tab();
    assert_eq!(state.tab, DashboardTab::History);
    assert_eq!(state.current_scroll(), 0);
    state.scroll_up();
    assert_eq!(state.current_scroll(), 0);
}

#[test]
fn input_ignores_control_chars_and_backspace_pops() {
    let mut state = AppState::new();
    state.push_char('4');
    state.push_char('\n');
    state.push_char('2');
    assert_eq!(state.input, "42");
    state.pop_char();
    assert_eq!(state.input, "4");
}

#[test]
fn directory_failure_message_appears_once() {
    let mut state = AppState::new();
    state.push_char('9');
    let team = state.begin_submit().unwrap();
    let source = FakeSource::new(
        FakeReply::Status(500),
        FakeReply::json("[]"),
        FakeReply::json("{}"),
    );
    state.finish_load(load_dashboard(&source, team));

    let Some(msg) = state.session.message().map(str::to_string) else {
        panic!("expected an error state, got {:?}", state.session);
    };
    assert!(msg.starts_with("HTTP error occurred while fetching players"));
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some(PLAYER_DATA_UNAVAILABLE)
    );
    assert!(state.logs.iter().all(|line| !line.contains(&msg)));
}
