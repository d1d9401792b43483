use std::cell::Cell as CallCounter;

use reqwest::StatusCode;

use crate::error::{FetchError, Resource};
use crate::fpl_fetch::{
    FplSource, PlayerDirectory, TeamId, check_status, parse_bootstrap_json, parse_history_json,
    parse_transfers_json,
};
use crate::table::Table;

/// Canned response for one endpoint.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Json(String),
    Status(u16),
}

impl FakeReply {
    pub fn json(body: impl Into<String>) -> Self {
        FakeReply::Json(body.into())
    }

    fn body(&self, resource: Resource) -> Result<&str, FetchError> {
        match self {
            FakeReply::Json(body) => Ok(body.as_str()),
            FakeReply::Status(code) => {
                let status = StatusCode::from_u16(*code)
                    .map_err(|err| FetchError::malformed(resource, err.to_string()))?;
                check_status(resource, status, "")?;
                Ok("")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FakeCalls {
    pub directory: usize,
    pub transfers: usize,
    pub history: usize,
}

impl FakeCalls {
    pub fn total(&self) -> usize {
        self.directory + self.transfers + self.history
    }
}

/// Offline source serving canned JSON through the real parsers. Counts calls
/// so callers can check which fetches a flow issued.
#[derive(Debug)]
pub struct FakeSource {
    bootstrap: FakeReply,
    transfers: FakeReply,
    history: FakeReply,
    directory_calls: CallCounter<usize>,
    transfers_calls: CallCounter<usize>,
    history_calls: CallCounter<usize>,
}

impl FakeSource {
    pub fn new(bootstrap: FakeReply, transfers: FakeReply, history: FakeReply) -> Self {
        Self {
            bootstrap,
            transfers,
            history,
            directory_calls: CallCounter::new(0),
            transfers_calls: CallCounter::new(0),
            history_calls: CallCounter::new(0),
        }
    }

    /// Small fixed squad used by `FPL_SOURCE=fake`.
    pub fn demo() -> Self {
        Self::new(
            FakeReply::json(DEMO_BOOTSTRAP),
            FakeReply::json(DEMO_TRANSFERS),
            FakeReply::json(DEMO_HISTORY),
        )
    }

    pub fn calls(&self) -> FakeCalls {
        FakeCalls {
            directory: self.directory_calls.get(),
            transfers: self.transfers_calls.get(),
            history: self.history_calls.get(),
        }
    }
}

fn bump(counter: &CallCounter<usize>) {
    counter.set(counter.get() + 1);
}

impl FplSource for FakeSource {
    fn fetch_player_directory(&self) -> Result<PlayerDirectory, FetchError> {
        bump(&self.directory_calls);
        parse_bootstrap_json(self.bootstrap.body(Resource::Players)?)
    }

    fn fetch_transfers(&self, _team: TeamId) -> Result<Table, FetchError> {
        bump(&self.transfers_calls);
        parse_transfers_json(self.transfers.body(Resource::Transfers)?)
    }

    fn fetch_history(&self, _team: TeamId) -> Result<Table, FetchError> {
        bump(&self.history_calls);
        parse_history_json(self.history.body(Resource::History)?)
    }
}

const DEMO_BOOTSTRAP: &str = r#"{
  "elements": [
    {"id": 1, "web_name": "Raya"},
    {"id": 4, "web_name": "Saliba"},
    {"id": 17, "web_name": "Saka"},
    {"id": 182, "web_name": "Palmer"},
    {"id": 328, "web_name": "M.Salah"},
    {"id": 351, "web_name": "Haaland"},
    {"id": 401, "web_name": "Isak"},
    {"id": 220, "web_name": "Watkins"}
  ]
}"#;

const DEMO_TRANSFERS: &str = r#"[
  {"element_in": 401, "element_in_cost": 85, "element_out": 220, "element_out_cost": 90, "entry": 7108828, "event": 9, "time": "2024-10-25T14:02:11.512000Z"},
  {"element_in": 182, "element_in_cost": 108, "element_out": 17, "element_out_cost": 101, "entry": 7108828, "event": 6, "time": "2024-09-27T09:41:55.104000Z"},
  {"element_in": 220, "element_in_cost": 90, "element_out": 351, "element_out_cost": 150, "entry": 7108828, "event": 6, "time": "2024-09-27T09:40:02.901000Z"},
  {"element_in": 351, "element_in_cost": 150, "element_out": 401, "element_out_cost": 85, "entry": 7108828, "event": 3, "time": "2024-08-30T18:15:40.000000Z"}
]"#;

const DEMO_HISTORY: &str = r#"{
  "current": [
    {"event": 1, "points": 71, "total_points": 71, "rank": 1205334, "overall_rank": 1205334, "bank": 5, "value": 1000, "event_transfers": 0, "event_transfers_cost": 0, "points_on_bench": 6},
    {"event": 2, "points": 58, "total_points": 129, "rank": 2604112, "overall_rank": 1412007, "bank": 5, "value": 1002, "event_transfers": 0, "event_transfers_cost": 0, "points_on_bench": 3},
    {"event": 3, "points": 64, "total_points": 193, "rank": 889001, "overall_rank": 1004557, "bank": 0, "value": 1004, "event_transfers": 1, "event_transfers_cost": 0, "points_on_bench": 11},
    {"event": 4, "points": 49, "total_points": 242, "rank": 3114920, "overall_rank": 1330871, "bank": 0, "value": 1003, "event_transfers": 0, "event_transfers_cost": 0, "points_on_bench": 2},
    {"event": 5, "points": 77, "total_points": 319, "rank": 402118, "overall_rank": 870442, "bank": 0, "value": 1007, "event_transfers": 0, "event_transfers_cost": 0, "points_on_bench": 0},
    {"event": 6, "points": 55, "total_points": 374, "rank": 1788310, "overall_rank": 902113, "bank": 7, "value": 1009, "event_transfers": 2, "event_transfers_cost": 4, "points_on_bench": 9}
  ],
  "past": [
    {"season_name": "2023/24", "total_points": 2311, "rank": 310224}
  ],
  "chips": []
}"#;
