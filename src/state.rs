use std::collections::VecDeque;

use crate::export::{HISTORY_CSV, TRANSFERS_CSV};
use crate::fpl_fetch::TeamId;
use crate::session::{self, InputCheck, SessionState, TabView};
use crate::table::Table;

const MAX_LOGS: usize = 200;
const MAX_INPUT_LEN: usize = 20;

/// Console pointer for a failed load; the full error is shown in the body.
pub const PLAYER_DATA_UNAVAILABLE: &str = "[ERROR] Player data unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Transfers,
    History,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 2] = [DashboardTab::Transfers, DashboardTab::History];

    pub fn index(self) -> usize {
        match self {
            DashboardTab::Transfers => 0,
            DashboardTab::History => 1,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DashboardTab::Transfers => "Transfer History",
            DashboardTab::History => "Performance History",
        }
    }

    pub fn csv_file_name(self) -> &'static str {
        match self {
            DashboardTab::Transfers => TRANSFERS_CSV,
            DashboardTab::History => HISTORY_CSV,
        }
    }

    fn toggled(self) -> Self {
        match self {
            DashboardTab::Transfers => DashboardTab::History,
            DashboardTab::History => DashboardTab::Transfers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub input: String,
    pub session: SessionState,
    pub tab: DashboardTab,
    pub table_scroll: [usize; 2],
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            session: SessionState::AwaitingInput,
            tab: DashboardTab::Transfers,
            table_scroll: [0; 2],
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if !c.is_control() && self.input.chars().count() < MAX_INPUT_LEN {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn toggle_tab(&mut self) {
        self.tab = self.tab.toggled();
    }

    /// Validates the input. Returns the team to load and moves to `Loading`;
    /// otherwise settles in `AwaitingInput` or `InvalidInput` without fetching.
    pub fn begin_submit(&mut self) -> Option<TeamId> {
        match session::check_input(&self.input) {
            InputCheck::Blank => {
                self.session = SessionState::AwaitingInput;
                None
            }
            InputCheck::Invalid => {
                self.session = SessionState::InvalidInput {
                    entered: self.input.clone(),
                };
                self.push_log(format!("[INFO] {}", session::PROMPT));
                None
            }
            InputCheck::Team(team) => {
                self.session = SessionState::Loading { team };
                self.push_log(format!("[INFO] Fetching data for team {team}"));
                Some(team)
            }
        }
    }

    pub fn finish_load(&mut self, outcome: SessionState) {
        self.table_scroll = [0; 2];
        match &outcome {
            SessionState::Error(_) => self.push_log(PLAYER_DATA_UNAVAILABLE),
            SessionState::Displaying(dashboard) => {
                for tab in DashboardTab::ALL {
                    let view = match tab {
                        DashboardTab::Transfers => &dashboard.transfers,
                        DashboardTab::History => &dashboard.history,
                    };
                    let lines = tab_log_lines(tab, view);
                    for line in lines {
                        self.push_log(line);
                    }
                }
            }
            _ => {}
        }
        self.session = outcome;
    }

    pub fn tab_view(&self, tab: DashboardTab) -> Option<&TabView> {
        let SessionState::Displaying(dashboard) = &self.session else {
            return None;
        };
        Some(match tab {
            DashboardTab::Transfers => &dashboard.transfers,
            DashboardTab::History => &dashboard.history,
        })
    }

    pub fn current_table(&self) -> Option<&Table> {
        self.tab_view(self.tab).and_then(TabView::table)
    }

    pub fn scroll_down(&mut self) {
        let rows = self.current_table().map(Table::len).unwrap_or(0);
        let slot = &mut self.table_scroll[self.tab.index()];
        if *slot + 1 < rows {
            *slot += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        let slot = &mut self.table_scroll[self.tab.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn current_scroll(&self) -> usize {
        self.table_scroll[self.tab.index()]
    }
}

fn tab_log_lines(tab: DashboardTab, view: &TabView) -> Vec<String> {
    match view {
        TabView::Ready { shaped, .. } => {
            let mut lines = vec![format!(
                "[INFO] {}: {} rows",
                tab.title(),
                shaped.table.len()
            )];
            lines.extend(
                view.warnings()
                    .into_iter()
                    .map(|w| format!("[WARN] {}: {w}", tab.title())),
            );
            lines
        }
        TabView::Empty(msg) => vec![format!("[INFO] {}: {msg}", tab.title())],
        TabView::Failed(msg) => vec![format!("[ERROR] {}: {msg}", tab.title())],
    }
}
