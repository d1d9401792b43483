//! One submission of a team id, from raw input to the two dashboard tabs.

use tracing::{info, warn};

use crate::charts::{self, ChartOutcome};
use crate::fpl_fetch::{FplSource, PlayerDirectory, TeamId};
use crate::shaping::{self, Shaped};
use crate::table::Table;

pub const PROMPT: &str = "Please enter your Team ID to proceed.";
pub const NO_TRANSFERS: &str = "No transfer data available for this Team ID.";
pub const NO_HISTORY: &str = "No performance history data available for this Team ID.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCheck {
    Blank,
    Invalid,
    Team(TeamId),
}

/// Only non-empty strings of ASCII digits naming a positive id are queried.
pub fn check_input(raw: &str) -> InputCheck {
    if raw.is_empty() {
        return InputCheck::Blank;
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return InputCheck::Invalid;
    }
    raw.parse::<u64>()
        .ok()
        .and_then(TeamId::new)
        .map(InputCheck::Team)
        .unwrap_or(InputCheck::Invalid)
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabView {
    Ready {
        shaped: Shaped,
        charts: Vec<ChartOutcome>,
    },
    Empty(String),
    Failed(String),
}

impl TabView {
    pub fn table(&self) -> Option<&Table> {
        match self {
            TabView::Ready { shaped, .. } => Some(&shaped.table),
            _ => None,
        }
    }

    /// Shaping and chart warnings, in display order.
    pub fn warnings(&self) -> Vec<String> {
        match self {
            TabView::Ready { shaped, charts } => shaped
                .warnings
                .iter()
                .map(|w| w.message())
                .chain(charts.iter().filter_map(|c| match c {
                    ChartOutcome::Skipped { warning } => Some(warning.clone()),
                    ChartOutcome::Drawn(_) => None,
                }))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub team: TeamId,
    pub transfers: TabView,
    pub history: TabView,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitingInput,
    InvalidInput { entered: String },
    Loading { team: TeamId },
    Displaying(Dashboard),
    Error(String),
}

impl SessionState {
    pub fn message(&self) -> Option<&str> {
        match self {
            SessionState::InvalidInput { .. } => Some(PROMPT),
            SessionState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

pub fn submit(source: &dyn FplSource, raw: &str) -> SessionState {
    match check_input(raw) {
        InputCheck::Blank => SessionState::AwaitingInput,
        InputCheck::Invalid => SessionState::InvalidInput {
            entered: raw.to_string(),
        },
        InputCheck::Team(team) => load_dashboard(source, team),
    }
}

/// Runs the three fetches in order. A failed directory fetch ends the
/// submission; after that each tab succeeds or fails on its own.
pub fn load_dashboard(source: &dyn FplSource, team: TeamId) -> SessionState {
    info!(team = team.get(), "loading dashboard");
    let directory = match source.fetch_player_directory() {
        Ok(directory) => directory,
        Err(err) => {
            warn!(error = %err, "player directory unavailable");
            return SessionState::Error(err.to_string());
        }
    };

    let transfers = transfers_tab(source, team, &directory);
    let history = history_tab(source, team);
    SessionState::Displaying(Dashboard {
        team,
        transfers,
        history,
    })
}

fn transfers_tab(source: &dyn FplSource, team: TeamId, directory: &PlayerDirectory) -> TabView {
    match source.fetch_transfers(team) {
        Ok(raw) if raw.is_empty() => TabView::Empty(NO_TRANSFERS.to_string()),
        Ok(raw) => {
            let shaped = shaping::shape_transfers(raw, directory);
            let charts = charts::transfer_charts(&shaped.table);
            TabView::Ready { shaped, charts }
        }
        Err(err) => {
            warn!(error = %err, "transfers unavailable");
            TabView::Failed(err.to_string())
        }
    }
}

fn history_tab(source: &dyn FplSource, team: TeamId) -> TabView {
    match source.fetch_history(team) {
        Ok(raw) if raw.is_empty() => TabView::Empty(NO_HISTORY.to_string()),
        Ok(raw) => {
            let shaped = shaping::shape_history(raw);
            let charts = charts::history_charts(&shaped.table);
            TabView::Ready { shaped, charts }
        }
        Err(err) => {
            warn!(error = %err, "history unavailable");
            TabView::Failed(err.to_string())
        }
    }
}
