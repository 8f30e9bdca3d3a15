//! Uploaded file -> typed cost records.
//!
//! Reading is split from normalisation: [`csv_file`] and [`excel`] turn a
//! file into a [`RawTable`] of loosely typed cells, and [`normalize`]
//! resolves headers, coerces every cell and drops unusable rows.

pub mod csv_file;
pub mod dates;
pub mod excel;
pub mod headers;
pub mod numbers;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::data::CostRecord;
use headers::Field;

/// Everything that can go wrong turning a file into cost records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFileType(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse the CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not parse the Excel file: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("file contains no data rows")]
    Empty,

    #[error("file must have columns: date, totalcost, unitcost, volume (missing: {})", keys(.0))]
    MissingColumns(Vec<Field>),

    #[error("no valid data rows found in the file")]
    NoValidRows,
}

fn keys(fields: &[Field]) -> String {
    fields.iter().map(|f| f.key()).collect::<Vec<_>>().join(", ")
}

/// A loosely typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn to_date(&self) -> Option<chrono::NaiveDate> {
        match self {
            Cell::Number(n) => dates::from_excel_serial(*n),
            Cell::Text(s) => dates::parse_date_text(s),
        }
    }

    fn to_amount(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n).filter(|v| v.is_finite()),
            Cell::Text(s) => numbers::parse_float_prefix(s),
        }
    }

    fn to_volume(&self) -> Option<u64> {
        let whole = match self {
            Cell::Number(n) if n.is_finite() => n.trunc() as i64,
            Cell::Number(_) => return None,
            Cell::Text(s) => numbers::parse_int_prefix(s)?,
        };
        u64::try_from(whole).ok()
    }
}

/// Header row plus data rows. A missing cell is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<Cell>>>,
}

impl RawTable {
    fn column_of(&self, field: Field) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| headers::resolve(h) == Some(field))
    }
}

/// Resolve the four required columns and coerce every row.
///
/// Rows with an unparseable date or number are skipped. Order is preserved.
pub fn normalize(table: &RawTable) -> Result<Vec<CostRecord>, IngestError> {
    if table.rows.is_empty() {
        return Err(IngestError::Empty);
    }

    let mut columns = [0usize; 4];
    let mut missing = Vec::new();
    for (slot, field) in columns.iter_mut().zip(Field::ALL) {
        match table.column_of(field) {
            Some(idx) => *slot = idx,
            None => missing.push(field),
        }
    }
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        match parse_row(row, columns) {
            Some(record) => records.push(record),
            None => debug!(row = i + 2, "dropping row with missing or invalid values"),
        }
    }

    if records.is_empty() {
        return Err(IngestError::NoValidRows);
    }
    Ok(records)
}

fn parse_row(row: &[Option<Cell>], columns: [usize; 4]) -> Option<CostRecord> {
    let [date, total, unit, volume] = columns;
    let cell = |idx: usize| row.get(idx).and_then(Option::as_ref);
    Some(CostRecord {
        date: cell(date)?.to_date()?,
        total_cost: cell(total)?.to_amount()?,
        unit_cost: cell(unit)?.to_amount()?,
        volume: cell(volume)?.to_volume()?,
    })
}

/// Supported upload formats, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Workbook,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(FileKind::Workbook),
            _ => Err(IngestError::UnsupportedFileType(path.display().to_string())),
        }
    }
}

/// Read and normalise a `.csv` or Excel file.
pub fn load_file(path: &Path) -> Result<Vec<CostRecord>, IngestError> {
    let table = match FileKind::from_path(path)? {
        FileKind::Csv => {
            let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            csv_file::read_csv(file)?
        }
        FileKind::Workbook => excel::read_workbook(path)?,
    };
    let records = normalize(&table)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        records = records.len(),
        "loaded cost data"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Option<Cell> {
        Some(Cell::Text(s.to_string()))
    }

    fn num(n: f64) -> Option<Cell> {
        Some(Cell::Number(n))
    }

    fn table(headers: &[&str], rows: Vec<Vec<Option<Cell>>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn normalizes_text_rows() {
        let t = table(
            &["Date", "Total Cost", "Unit Cost", "Volume"],
            vec![vec![text("2024-01-01"), text("120000"), text("98.5"), text("1218")]],
        );
        let records = normalize(&t).unwrap();
        assert_eq!(
            records,
            vec![CostRecord::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                120000.0,
                98.5,
                1218
            )]
        );
    }

    #[test]
    fn columns_found_in_any_order() {
        let t = table(
            &["volume", "unitcost", "date", "totalcost", "notes"],
            vec![vec![num(1000.0), num(110.0), num(45444.0), num(110000.0), text("x")]],
        );
        let records = normalize(&t).unwrap();
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(records[0].volume, 1000);
    }

    #[test]
    fn numeric_volume_is_truncated() {
        let t = table(
            &["Date", "Total Cost", "Unit Cost", "Volume"],
            vec![vec![text("2024-01-01"), num(1.0), num(1.0), num(999.9)]],
        );
        assert_eq!(normalize(&t).unwrap()[0].volume, 999);
    }

    #[test]
    fn invalid_rows_are_dropped() {
        let t = table(
            &["Date", "Total Cost", "Unit Cost", "Volume"],
            vec![
                vec![text("2024-01-01"), text("100"), text("1"), text("100")],
                vec![text("garbage"), text("100"), text("1"), text("100")],
                vec![text("2024-02-01"), text("n/a"), text("1"), text("100")],
                vec![text("2024-03-01"), text("100"), None, text("100")],
                vec![text("2024-04-01"), text("100"), text("1"), text("-4")],
                vec![text("2024-05-01"), text("100"), text("1")],
            ],
        );
        let records = normalize(&t).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_columns_are_reported() {
        let t = table(&["Date", "Volume"], vec![vec![text("2024-01-01"), text("1")]]);
        match normalize(&t) {
            Err(IngestError::MissingColumns(missing)) => {
                assert_eq!(missing, vec![Field::TotalCost, Field::UnitCost]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn missing_columns_message_lists_required() {
        let err = IngestError::MissingColumns(vec![Field::Volume]);
        let msg = err.to_string();
        assert!(msg.contains("date, totalcost, unitcost, volume"));
        assert!(msg.contains("missing: volume"));
    }

    #[test]
    fn empty_table_is_an_error() {
        let t = table(&["Date", "Total Cost", "Unit Cost", "Volume"], vec![]);
        assert!(matches!(normalize(&t), Err(IngestError::Empty)));
    }

    #[test]
    fn all_invalid_is_no_valid_rows() {
        let t = table(
            &["Date", "Total Cost", "Unit Cost", "Volume"],
            vec![vec![text("nope"), text("1"), text("1"), text("1")]],
        );
        assert!(matches!(normalize(&t), Err(IngestError::NoValidRows)));
    }

    #[test]
    fn file_kind_by_extension() {
        assert_eq!(FileKind::from_path(Path::new("a.csv")).unwrap(), FileKind::Csv);
        assert_eq!(FileKind::from_path(Path::new("a.CSV")).unwrap(), FileKind::Csv);
        assert_eq!(
            FileKind::from_path(Path::new("a.xlsx")).unwrap(),
            FileKind::Workbook
        );
        assert_eq!(
            FileKind::from_path(Path::new("a.xls")).unwrap(),
            FileKind::Workbook
        );
        assert!(matches!(
            FileKind::from_path(Path::new("a.json")),
            Err(IngestError::UnsupportedFileType(_))
        ));
        assert!(FileKind::from_path(Path::new("noext")).is_err());
    }
}
