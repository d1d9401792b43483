//! Turns raw upstream tables into the display tables shown in each tab.
//!
//! Every step checks for the columns it touches first. Missing columns are
//! reported as warnings and the step continues with whatever is present.

use chrono::{DateTime, NaiveDateTime};

use crate::fpl_fetch::PlayerDirectory;
use crate::table::{Cell, SortOrder, Table};

pub const PLAYER_IN: &str = "Player In";
pub const PLAYER_OUT: &str = "Player Out";
pub const TEAM_ID: &str = "Team ID";
pub const GAMEWEEK: &str = "Gameweek";
pub const TRANSFER_TIME: &str = "Transfer Time";
pub const OVERALL_RANK: &str = "Overall Rank";
pub const RANK: &str = "Rank";
pub const POINTS: &str = "Points";
pub const TOTAL_POINTS: &str = "Total Points";
pub const BANK: &str = "Bank";
pub const TRANSFERS: &str = "Transfers";
pub const TRANSFERS_COST: &str = "Transfers Cost";
pub const BENCH_POINTS: &str = "Bench Points";
pub const SEASON: &str = "Season";

const ELEMENT_IN: &str = "element_in";
const ELEMENT_OUT: &str = "element_out";

/// Display columns of the transfers tab, as (column before rename, label).
pub const TRANSFER_COLUMNS: &[(&str, &str)] = &[
    (PLAYER_IN, PLAYER_IN),
    (PLAYER_OUT, PLAYER_OUT),
    ("entry", TEAM_ID),
    ("event", GAMEWEEK),
    ("time", TRANSFER_TIME),
];

pub const HISTORY_RENAMES: &[(&str, &str)] = &[
    ("season_name", SEASON),
    ("overall_rank", OVERALL_RANK),
    ("rank", RANK),
    ("total_points", TOTAL_POINTS),
    ("bank", BANK),
    ("points", POINTS),
    ("event_transfers", TRANSFERS),
    ("event_transfers_cost", TRANSFERS_COST),
    ("points_on_bench", BENCH_POINTS),
    ("event", GAMEWEEK),
];

pub const HISTORY_COLUMNS: &[&str] = &[
    GAMEWEEK,
    OVERALL_RANK,
    RANK,
    POINTS,
    TOTAL_POINTS,
    BANK,
    TRANSFERS,
    TRANSFERS_COST,
    BENCH_POINTS,
];

const NAIVE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeWarning {
    MissingPlayerIds,
    MissingColumns(Vec<String>),
}

impl ShapeWarning {
    pub fn message(&self) -> String {
        match self {
            ShapeWarning::MissingPlayerIds => {
                "Transfer data does not contain expected player ID columns.".to_string()
            }
            ShapeWarning::MissingColumns(cols) => format!(
                "The following columns are missing and will be excluded: {}",
                cols.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shaped {
    pub table: Table,
    pub warnings: Vec<ShapeWarning>,
}

pub fn shape_transfers(mut raw: Table, directory: &PlayerDirectory) -> Shaped {
    let mut warnings = Vec::new();

    if raw.has_column(ELEMENT_IN) && raw.has_column(ELEMENT_OUT) {
        for (id_col, name_col) in [(ELEMENT_IN, PLAYER_IN), (ELEMENT_OUT, PLAYER_OUT)] {
            let names = raw
                .column(id_col)
                .unwrap_or_default()
                .into_iter()
                .map(|cell| lookup_name(cell, directory))
                .collect();
            raw.set_column(name_col, names);
        }
        raw.drop_columns(&[ELEMENT_IN, ELEMENT_OUT]);
    } else {
        warnings.push(ShapeWarning::MissingPlayerIds);
    }

    let wanted: Vec<&str> = TRANSFER_COLUMNS.iter().map(|(from, _)| *from).collect();
    let mut table = select_reporting(&raw, &wanted, &mut warnings);
    table.rename_columns(TRANSFER_COLUMNS);

    table.map_column(TRANSFER_TIME, coerce_time);
    table.sort_by_column(TRANSFER_TIME, SortOrder::Descending);

    Shaped { table, warnings }
}

pub fn shape_history(mut raw: Table) -> Shaped {
    let mut warnings = Vec::new();

    raw.rename_columns(HISTORY_RENAMES);
    let mut table = select_reporting(&raw, HISTORY_COLUMNS, &mut warnings);
    table.sort_by_column(GAMEWEEK, SortOrder::Ascending);

    Shaped { table, warnings }
}

fn select_reporting(raw: &Table, wanted: &[&str], warnings: &mut Vec<ShapeWarning>) -> Table {
    let missing: Vec<String> = wanted
        .iter()
        .filter(|name| !raw.has_column(name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        warnings.push(ShapeWarning::MissingColumns(missing));
    }
    raw.select(wanted)
}

fn lookup_name(cell: &Cell, directory: &PlayerDirectory) -> Cell {
    cell.as_i64()
        .and_then(|id| directory.name(id))
        .map(|name| Cell::Text(name.to_string()))
        .unwrap_or(Cell::Null)
}

/// Anything that is not a timestamp after parsing becomes `Null`.
pub fn coerce_time(cell: &Cell) -> Cell {
    match cell {
        Cell::Time(_) => cell.clone(),
        Cell::Text(raw) => parse_time(raw.trim()).map(Cell::Time).unwrap_or(Cell::Null),
        _ => Cell::Null,
    }
}

fn parse_time(raw: &str) -> Option<DateTime<chrono::FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    // Naive timestamps are taken as UTC.
    NAIVE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_time_handles_naive_and_garbage() {
        let naive = coerce_time(&Cell::Text("2024-08-16 17:30:00".into()));
        assert!(matches!(naive, Cell::Time(t) if t.offset().local_minus_utc() == 0));
        assert_eq!(coerce_time(&Cell::Text("soon".into())), Cell::Null);
        assert_eq!(coerce_time(&Cell::Int(3)), Cell::Null);
    }

    #[test]
    fn missing_columns_listed_in_declared_order() {
        let mut raw = Table::new(vec!["points".to_string(), "event".to_string()]);
        raw.push_row(vec![Cell::Int(60), Cell::Int(1)]);
        let shaped = shape_history(raw);
        assert_eq!(shaped.table.columns(), [GAMEWEEK, POINTS]);
        assert_eq!(
            shaped.warnings,
            vec![ShapeWarning::MissingColumns(vec![
                OVERALL_RANK.to_string(),
                RANK.to_string(),
                TOTAL_POINTS.to_string(),
                BANK.to_string(),
                TRANSFERS.to_string(),
                TRANSFERS_COST.to_string(),
                BENCH_POINTS.to_string(),
            ])]
        );
    }
}
