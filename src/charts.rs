//! Chart descriptions derived from shaped tables. Rendering lives in the TUI;
//! this module only decides what to draw.

use std::collections::BTreeMap;

use crate::shaping::{GAMEWEEK, PLAYER_IN, PLAYER_OUT, RANK, TOTAL_POINTS};
use crate::table::{SortOrder, Table};

pub const TOP_PLAYERS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    /// Smaller values are drawn higher (rank 1 at the top).
    pub y_reversed: bool,
}

impl LineChart {
    pub fn x_bounds(&self) -> [f64; 2] {
        bounds(self.points.iter().map(|(x, _)| *x))
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        bounds(self.points.iter().map(|(_, y)| *y))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<u64>,
}

/// One bar per category and series; several series render side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    pub fn max_value(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Drawn(Chart),
    Skipped { warning: String },
}

impl ChartOutcome {
    pub fn chart(&self) -> Option<&Chart> {
        match self {
            ChartOutcome::Drawn(chart) => Some(chart),
            ChartOutcome::Skipped { .. } => None,
        }
    }
}

pub fn history_charts(table: &Table) -> Vec<ChartOutcome> {
    vec![total_points_chart(table), rank_chart(table)]
}

pub fn transfer_charts(table: &Table) -> Vec<ChartOutcome> {
    vec![transfers_per_gameweek_chart(table), players_in_out_chart(table)]
}

pub fn total_points_chart(table: &Table) -> ChartOutcome {
    gameweek_line(
        table,
        TOTAL_POINTS,
        "Total Points Over Gameweeks",
        false,
    )
}

pub fn rank_chart(table: &Table) -> ChartOutcome {
    gameweek_line(table, RANK, "Rank Over Gameweeks", true)
}

fn gameweek_line(table: &Table, y_col: &str, title: &str, y_reversed: bool) -> ChartOutcome {
    if !(table.has_column(GAMEWEEK) && table.has_column(y_col)) {
        return ChartOutcome::Skipped {
            warning: format!(
                "'{GAMEWEEK}' or '{y_col}' columns not found for plotting {}.",
                title.to_lowercase()
            ),
        };
    }

    let mut sorted = table.select(&[GAMEWEEK, y_col]);
    sorted.sort_by_column(GAMEWEEK, SortOrder::Ascending);
    let points = sorted
        .rows()
        .iter()
        .filter_map(|row| Some((row[0].as_f64()?, row[1].as_f64()?)))
        .collect();

    ChartOutcome::Drawn(Chart::Line(LineChart {
        title: title.to_string(),
        x_label: GAMEWEEK.to_string(),
        y_label: y_col.to_string(),
        points,
        y_reversed,
    }))
}

pub fn transfers_per_gameweek_chart(table: &Table) -> ChartOutcome {
    let Some(gameweeks) = table.column(GAMEWEEK) else {
        return ChartOutcome::Skipped {
            warning: format!(
                "'{GAMEWEEK}' column not found for plotting transfers per gameweek."
            ),
        };
    };

    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for gw in gameweeks.into_iter().filter_map(|cell| cell.as_i64()) {
        *counts.entry(gw).or_default() += 1;
    }

    ChartOutcome::Drawn(Chart::Bar(BarChart {
        title: "Number of Transfers per Gameweek".to_string(),
        x_label: GAMEWEEK.to_string(),
        y_label: "Transfers".to_string(),
        categories: counts.keys().map(|gw| gw.to_string()).collect(),
        series: vec![BarSeries {
            name: "Number of Transfers".to_string(),
            values: counts.into_values().collect(),
        }],
    }))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTransferCount {
    pub player: String,
    pub transfers_in: u64,
    pub transfers_out: u64,
}

/// In/out counts per named player, in order of first appearance.
pub fn player_transfer_counts(table: &Table) -> Option<Vec<PlayerTransferCount>> {
    let ins = table.column(PLAYER_IN)?;
    let outs = table.column(PLAYER_OUT)?;

    let mut counts: Vec<PlayerTransferCount> = Vec::new();
    let mut bump = |name: Option<&str>, incoming: bool| {
        let Some(name) = name else {
            return;
        };
        let idx = match counts.iter().position(|c| c.player == name) {
            Some(idx) => idx,
            None => {
                counts.push(PlayerTransferCount {
                    player: name.to_string(),
                    transfers_in: 0,
                    transfers_out: 0,
                });
                counts.len() - 1
            }
        };
        if incoming {
            counts[idx].transfers_in += 1;
        } else {
            counts[idx].transfers_out += 1;
        }
    };
    for (cell_in, cell_out) in ins.into_iter().zip(outs) {
        bump(cell_in.as_str(), true);
        bump(cell_out.as_str(), false);
    }
    Some(counts)
}

pub fn players_in_out_chart(table: &Table) -> ChartOutcome {
    let Some(mut counts) = player_transfer_counts(table) else {
        return ChartOutcome::Skipped {
            warning: format!(
                "'{PLAYER_IN}' or '{PLAYER_OUT}' columns not found for plotting players in/out."
            ),
        };
    };

    // Stable: ties keep first-appearance order.
    counts.sort_by(|a, b| b.transfers_in.cmp(&a.transfers_in));
    counts.truncate(TOP_PLAYERS);

    ChartOutcome::Drawn(Chart::Bar(BarChart {
        title: format!("Top {TOP_PLAYERS} Players Transferred In and Out"),
        x_label: "Player".to_string(),
        y_label: "Number of Transfers".to_string(),
        categories: counts.iter().map(|c| c.player.clone()).collect(),
        series: vec![
            BarSeries {
                name: "Transfers In".to_string(),
                values: counts.iter().map(|c| c.transfers_in).collect(),
            },
            BarSeries {
                name: "Transfers Out".to_string(),
                values: counts.iter().map(|c| c.transfers_out).collect(),
            },
        ],
    }))
}

fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if min == max {
        return [min - 1.0, max + 1.0];
    }
    [min, max]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pad_degenerate_ranges() {
        assert_eq!(bounds(std::iter::empty()), [0.0, 1.0]);
        assert_eq!(bounds([5.0].into_iter()), [4.0, 6.0]);
        assert_eq!(bounds([3.0, 1.0, 2.0].into_iter()), [1.0, 3.0]);
    }
}
