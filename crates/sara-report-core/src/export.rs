//! CSV export of a report table.
//!
//! One header row from the table columns, one row per record, no index
//! column. A table with no rows has nothing to export and produces no file.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::table::Table;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: the report has no records")]
    Empty,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// File name for the export of `date`, e.g. `report_data_2024-01-01.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("report_data_{}.csv", date.format("%Y-%m-%d"))
}

/// Encode `table` as UTF-8 CSV. Records without any fields give no header
/// and count as nothing to export.
pub fn to_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.is_empty() || table.columns.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Write the export for `date` into `dir`, returning the file path
pub fn write_csv(dir: &Path, date: NaiveDate, table: &Table) -> Result<PathBuf, ExportError> {
    let bytes = to_csv(table)?;
    std::fs::create_dir_all(dir)?;

    let path = dir.join(export_filename(date));
    std::fs::write(&path, &bytes)?;
    info!(path = %path.display(), rows = table.row_count(), "CSV exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{ReportPayload, DEFAULT_RECORDS_FIELDS};

    fn table(value: serde_json::Value) -> Table {
        Table::from_payload(&ReportPayload::from_value(value, DEFAULT_RECORDS_FIELDS).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(date(2024, 1, 1)), "report_data_2024-01-01.csv");
    }

    #[test]
    fn test_single_record_csv() {
        let t = table(json!([{"timestamp": "2024-01-01 09:00:00", "revenue": 100, "orders": 5}]));
        let csv = String::from_utf8(to_csv(&t).unwrap()).unwrap();
        assert_eq!(csv, "timestamp,revenue,orders\n2024-01-01 09:00:00,100,5\n");
    }

    #[test]
    fn test_quoting() {
        let t = table(json!([{"note": "a, \"quoted\" value", "n": 1}]));
        let csv = String::from_utf8(to_csv(&t).unwrap()).unwrap();
        assert_eq!(csv, "note,n\n\"a, \"\"quoted\"\" value\",1\n");
    }

    #[test]
    fn test_round_trip() {
        let t = table(json!([
            {"timestamp": "2024-01-01 09:00:00", "revenue": 100, "orders": 5},
            {"timestamp": "2024-01-01 10:00:00", "revenue": 12.5, "orders": 1},
            {"timestamp": "2024-01-01 11:00:00", "revenue": 0, "orders": 0},
        ]));
        let bytes = to_csv(&t).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, t.columns);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows, t.rows);
    }

    #[test]
    fn test_empty_table_is_nothing_to_export() {
        let t = table(json!([]));
        assert!(matches!(to_csv(&t), Err(ExportError::Empty)));

        let dir = std::env::temp_dir().join(format!("sara_report_empty_{}", std::process::id()));
        assert!(matches!(write_csv(&dir, date(2024, 1, 1), &t), Err(ExportError::Empty)));
        assert!(!dir.join("report_data_2024-01-01.csv").exists());
    }

    #[test]
    fn test_fieldless_records_are_nothing_to_export() {
        let t = table(json!([{}, {}]));
        assert_eq!(t.row_count(), 2);
        assert!(t.columns.is_empty());
        assert!(matches!(to_csv(&t), Err(ExportError::Empty)));
    }

    #[test]
    fn test_write_csv() {
        let dir = std::env::temp_dir().join(format!("sara_report_export_{}", std::process::id()));
        let t = table(json!([{"a": 1}]));

        let path = write_csv(&dir, date(2024, 5, 6), &t).unwrap();
        assert_eq!(path, dir.join("report_data_2024-05-06.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n1\n");

        let _ = std::fs::remove_dir_all(dir);
    }
}
