use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::table::Table;

pub const TRANSFERS_CSV: &str = "fpl_transfer_history.csv";
pub const HISTORY_CSV: &str = "fpl_performance_history.csv";
pub const WORKBOOK_FILE: &str = "fpl_team_report.xlsx";

/// Header row plus every row; no index column, nulls as empty fields.
pub fn to_csv(table: &Table) -> Result<Vec<u8>> {
    if table.columns().is_empty() {
        return Ok(Vec::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("write csv header")?;
    for (idx, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.display()))
            .with_context(|| format!("write csv row {idx}"))?;
    }
    writer.into_inner().context("flush csv buffer")
}

pub fn write_csv(dir: &Path, file_name: &str, table: &Table) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(file_name);
    let bytes = to_csv(table)?;
    fs::write(&path, bytes).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(path)
}

/// Writes each `(sheet name, table)` pair to its own worksheet.
pub fn write_workbook(path: &Path, sheets: &[(&str, &Table)]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let mut workbook = Workbook::new();
    for (name, table) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_table(sheet, table)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_table(sheet: &mut Worksheet, table: &Table) -> Result<()> {
    for (col_idx, name) in table.columns().iter().enumerate() {
        sheet
            .write_string(0, col_idx as u16, name)
            .with_context(|| format!("write header cell {col_idx}"))?;
    }
    for (row_idx, row) in table.rows().iter().enumerate() {
        let xl_row = row_idx as u32 + 1;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            let written = match cell.as_f64() {
                Some(number) => sheet.write_number(xl_row, col, number).map(|_| ()),
                None => sheet.write_string(xl_row, col, cell.display()).map(|_| ()),
            };
            written.with_context(|| format!("write cell ({xl_row},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn csv_quotes_and_blanks_nulls() {
        let mut table = Table::new(vec!["Player In".to_string(), "Gameweek".to_string()]);
        table.push_row(vec![Cell::Text("Smith, J".into()), Cell::Int(3)]);
        table.push_row(vec![Cell::Null, Cell::Int(4)]);
        let text = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert_eq!(text, "Player In,Gameweek\n\"Smith, J\",3\n,4\n");
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fpl_export_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn transfers_table() -> Table {
        let mut table = Table::new(vec!["Player In".to_string(), "Gameweek".to_string()]);
        table.push_row(vec![Cell::Text("Saka".into()), Cell::Int(5)]);
        table.push_row(vec![Cell::Text("Palmer".into()), Cell::Int(3)]);
        table
    }

    #[test]
    fn write_csv_creates_dir_and_matches_bytes() {
        let dir = scratch_dir("csv").join("nested");
        let table = transfers_table();
        let path = write_csv(&dir, TRANSFERS_CSV, &table).unwrap();
        assert_eq!(path, dir.join("fpl_transfer_history.csv"));
        assert_eq!(fs::read(&path).unwrap(), to_csv(&table).unwrap());
        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn workbook_writes_both_sheets_even_when_one_is_empty() {
        let root = scratch_dir("xlsx");
        let path = root.join("reports").join(WORKBOOK_FILE);
        let transfers = transfers_table();
        let history = Table::new(vec!["Gameweek".to_string(), "Points".to_string()]);
        assert!(history.is_empty());

        write_workbook(&path, &[("Transfers", &transfers), ("History", &history)]).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"PK"));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn workbook_rejects_duplicate_sheet_names() {
        let root = scratch_dir("dup");
        let path = root.join(WORKBOOK_FILE);
        let table = transfers_table();
        assert!(write_workbook(&path, &[("Transfers", &table), ("Transfers", &table)]).is_err());
        let _ = fs::remove_dir_all(root);
    }
}
