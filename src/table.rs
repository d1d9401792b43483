use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Time(DateTime<FixedOffset>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Cell {
    pub fn from_json(value: &Value) -> Cell {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Null),
            },
            Value::String(s) => Cell::Text(s.clone()),
            // Arrays (e.g. chip lists) are carried verbatim; nothing downstream reads them.
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text used for display and export. Nulls render as an empty string.
    pub fn display(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Time(t) => t.format(TIME_FORMAT).to_string(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Cell::Null => 4,
            Cell::Bool(_) => 0,
            Cell::Int(_) | Cell::Float(_) => 1,
            Cell::Time(_) => 2,
            Cell::Text(_) => 3,
        }
    }
}

fn compare_present(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Bool(x), Cell::Bool(y)) => x.cmp(y),
        (Cell::Time(x), Cell::Time(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        (Cell::Int(x), Cell::Int(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.kind_rank().cmp(&b.kind_rank()),
        },
    }
}

/// Row-major table addressed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from JSON objects. Nested objects are flattened into
    /// dotted column names; column order follows first appearance and cells a
    /// record does not carry are `Null`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut flat_rows = Vec::new();

        for record in records {
            let mut flat = Vec::with_capacity(record.len());
            flatten_object("", record, &mut flat);
            for (key, _) in &flat {
                if !index.contains_key(key) {
                    index.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
            flat_rows.push(flat);
        }

        let width = columns.len();
        let rows = flat_rows
            .into_iter()
            .map(|flat| {
                let mut row = vec![Cell::Null; width];
                for (key, cell) in flat {
                    if let Some(&idx) = index.get(&key) {
                        row[idx] = cell;
                    }
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Adds `name`, replacing an existing column of the same name. Missing
    /// trailing cells are filled with `Null`.
    pub fn set_column(&mut self, name: &str, mut cells: Vec<Cell>) {
        cells.resize(self.rows.len(), Cell::Null);
        match self.column_index(name) {
            Some(idx) => {
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row[idx] = cell;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row.push(cell);
                }
            }
        }
    }

    /// Rewrites every cell of `name` in place. Returns false if the column is absent.
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(&Cell) -> Cell) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        true
    }

    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !names.contains(&c.as_str()))
            .collect();
        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&true));
        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&true));
        }
    }

    /// Applies `(from, to)` renames for the columns that exist; others are ignored.
    pub fn rename_columns(&mut self, pairs: &[(&str, &str)]) {
        for column in &mut self.columns {
            if let Some((_, to)) = pairs.iter().find(|(from, _)| *from == column.as_str()) {
                *column = (*to).to_string();
            }
        }
    }

    /// Projects onto `names` in the given order, skipping names that are absent.
    pub fn select(&self, names: &[&str]) -> Table {
        let picks: Vec<(usize, &str)> = names
            .iter()
            .filter_map(|name| self.column_index(name).map(|idx| (idx, *name)))
            .collect();
        Table {
            columns: picks.iter().map(|(_, name)| name.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picks.iter().map(|(idx, _)| row[*idx].clone()).collect())
                .collect(),
        }
    }

    /// Stable sort on one column. Nulls go last in both directions. Returns
    /// false (and leaves the rows untouched) if the column is absent.
    pub fn sort_by_column(&mut self, name: &str, order: SortOrder) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.rows.sort_by(|a, b| match (a[idx].is_null(), b[idx].is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = compare_present(&a[idx], &b[idx]);
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            }
        });
        true
    }
}

fn flatten_object(prefix: &str, object: &Map<String, Value>, out: &mut Vec<(String, Cell)>) {
    for (key, value) in object {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) => flatten_object(&name, inner, out),
            other => out.push((name, Cell::from_json(other))),
        }
    }
}
