use std::collections::HashMap;
use std::fmt;

use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{FetchError, Resource};
use crate::http_client::http_client;
use crate::table::{Cell, Table};

pub const FPL_API_BASE: &str = "https://fantasy.premierleague.com/api";

const DETAIL_MAX_CHARS: usize = 200;

/// FPL entry (squad) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamId(u64);

impl TeamId {
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player id to `web_name` lookup, built once per submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerDirectory {
    names: HashMap<i64, String>,
}

impl PlayerDirectory {
    pub fn name(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(i64, String)> for PlayerDirectory {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Read-only access to the three upstream resources.
pub trait FplSource {
    fn fetch_player_directory(&self) -> Result<PlayerDirectory, FetchError>;
    fn fetch_transfers(&self, team: TeamId) -> Result<Table, FetchError>;
    fn fetch_history(&self, team: TeamId) -> Result<Table, FetchError>;
}

/// Live source backed by the public FPL API.
#[derive(Debug, Clone)]
pub struct FplApi {
    base: String,
}

impl Default for FplApi {
    fn default() -> Self {
        Self::new(FPL_API_BASE)
    }
}

impl FplApi {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn bootstrap_url(&self) -> String {
        format!("{}/bootstrap-static/", self.base)
    }

    pub fn transfers_url(&self, team: TeamId) -> String {
        format!("{}/entry/{team}/transfers/", self.base)
    }

    pub fn history_url(&self, team: TeamId) -> String {
        format!("{}/entry/{team}/history/", self.base)
    }

    fn get_body(&self, resource: Resource, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport { resource, source };
        let client = http_client().map_err(transport)?;

        debug!(%resource, url, "GET");
        let resp = client.get(url).send().map_err(transport)?;
        let status = resp.status();
        let body = resp.text().map_err(transport)?;
        check_status(resource, status, &body)?;
        info!(%resource, status = status.as_u16(), bytes = body.len(), "fetched");
        Ok(body)
    }
}

impl FplSource for FplApi {
    fn fetch_player_directory(&self) -> Result<PlayerDirectory, FetchError> {
        let body = self.get_body(Resource::Players, &self.bootstrap_url())?;
        parse_bootstrap_json(&body)
    }

    fn fetch_transfers(&self, team: TeamId) -> Result<Table, FetchError> {
        let body = self.get_body(Resource::Transfers, &self.transfers_url(team))?;
        parse_transfers_json(&body)
    }

    fn fetch_history(&self, team: TeamId) -> Result<Table, FetchError> {
        let body = self.get_body(Resource::History, &self.history_url(team))?;
        parse_history_json(&body)
    }
}

/// Maps a non-2xx status to `FetchError::Http`, keeping a short body excerpt.
pub fn check_status(resource: Resource, status: StatusCode, body: &str) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let excerpt: String = body.trim().chars().take(DETAIL_MAX_CHARS).collect();
    let detail = if excerpt.is_empty() {
        reason.to_string()
    } else {
        format!("{reason}: {excerpt}")
    };
    Err(FetchError::Http {
        resource,
        status: status.as_u16(),
        detail,
    })
}

#[derive(Debug, Deserialize)]
struct BootstrapResponse {
    elements: Vec<Value>,
}

pub fn parse_bootstrap_json(raw: &str) -> Result<PlayerDirectory, FetchError> {
    let resp: BootstrapResponse = serde_json::from_str(raw.trim())
        .map_err(|err| FetchError::malformed(Resource::Players, format!("invalid bootstrap json: {err}")))?;

    let total = resp.elements.len();
    let directory: PlayerDirectory = resp
        .elements
        .iter()
        .filter_map(|el| {
            let id = el.get("id")?.as_i64()?;
            let name = el.get("web_name")?.as_str()?;
            Some((id, name.to_string()))
        })
        .collect();
    if directory.len() < total {
        debug!(
            skipped = total - directory.len(),
            "bootstrap elements without id/web_name"
        );
    }
    Ok(directory)
}

pub fn parse_transfers_json(raw: &str) -> Result<Table, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(with_time_column(Table::default()));
    }
    let root: Value = serde_json::from_str(trimmed)
        .map_err(|err| FetchError::malformed(Resource::Transfers, format!("invalid transfers json: {err}")))?;
    let Some(items) = root.as_array() else {
        return Err(FetchError::malformed(
            Resource::Transfers,
            "expected a JSON array of transfers",
        ));
    };
    let records = objects(Resource::Transfers, items)?;
    Ok(with_time_column(Table::from_records(records)))
}

pub fn parse_history_json(raw: &str) -> Result<Table, FetchError> {
    let root: Value = serde_json::from_str(raw.trim())
        .map_err(|err| FetchError::malformed(Resource::History, format!("invalid history json: {err}")))?;
    let Some(root) = root.as_object() else {
        return Err(FetchError::malformed(
            Resource::History,
            "expected a JSON object with current/past",
        ));
    };

    let mut rows: Vec<&Map<String, Value>> = Vec::new();
    if let Some(current) = root.get("current").and_then(Value::as_array) {
        rows.extend(objects(Resource::History, current)?);
    }
    if let Some(past) = root.get("past").and_then(Value::as_array) {
        for season in past {
            if let Some(history) = season.get("history").and_then(Value::as_array) {
                rows.extend(objects(Resource::History, history)?);
            }
        }
    }

    if rows.is_empty() {
        return Ok(Table::default());
    }
    Ok(Table::from_records(rows))
}

fn objects<'a>(
    resource: Resource,
    items: &'a [Value],
) -> Result<Vec<&'a Map<String, Value>>, FetchError> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_object().ok_or_else(|| {
                FetchError::malformed(resource, format!("row {idx} is not a JSON object"))
            })
        })
        .collect()
}

// A missing `time` column is filled with nulls; unparseable values stay text
// for the shaper to coerce.
fn with_time_column(mut table: Table) -> Table {
    if !table.map_column("time", |cell| match cell {
        Cell::Text(raw) => DateTime::parse_from_rfc3339(raw)
            .map(Cell::Time)
            .unwrap_or_else(|_| cell.clone()),
        other => other.clone(),
    }) {
        table.set_column("time", Vec::new());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_entry_layout() {
        let api = FplApi::new("https://example.test/api/");
        let team = TeamId::new(7108828).unwrap();
        assert_eq!(api.bootstrap_url(), "https://example.test/api/bootstrap-static/");
        assert_eq!(
            api.transfers_url(team),
            "https://example.test/api/entry/7108828/transfers/"
        );
        assert_eq!(
            api.history_url(team),
            "https://example.test/api/entry/7108828/history/"
        );
    }

    #[test]
    fn non_success_status_is_http_error() {
        let err = check_status(
            Resource::Transfers,
            StatusCode::NOT_FOUND,
            "The game is being updated.",
        )
        .unwrap_err();
        match err {
            FetchError::Http { status, detail, .. } => {
                assert_eq!(status, 404);
                assert!(detail.contains("Not Found"));
                assert!(detail.contains("being updated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(check_status(Resource::Transfers, StatusCode::OK, "").is_ok());
    }

    #[test]
    fn team_id_rejects_zero() {
        assert!(TeamId::new(0).is_none());
        assert_eq!(TeamId::new(42).map(TeamId::get), Some(42));
    }

    #[test]
    fn bad_time_text_is_left_for_the_shaper() {
        let table = parse_transfers_json(r#"[{"time": "not a date"}]"#).unwrap();
        assert_eq!(table.get(0, "time"), Some(&Cell::Text("not a date".into())));
    }
}
