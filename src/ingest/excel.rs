use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::{Cell, IngestError, RawTable};

/// Read the first worksheet. The first row holds the headers.
///
/// Date-formatted cells come back as their serial day number so they go
/// through the same conversion as numeric dates typed into a sheet.
pub fn read_workbook(path: &Path) -> Result<RawTable, IngestError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(IngestError::Empty)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(first) => first.iter().map(header_text).collect(),
        None => return Err(IngestError::Empty),
    };

    let rows = rows
        .map(|row| row.iter().map(to_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(Option::is_some))
        .collect();

    Ok(RawTable { headers, rows })
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

fn to_cell(data: &Data) -> Option<Cell> {
    match data {
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        Data::DateTime(dt) => Some(Cell::Number(dt.as_f64())),
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Cell::Text(s.trim().to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
        Data::Bool(b) => Some(Cell::Text(b.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    #[test]
    fn numbers_stay_numbers() {
        assert_eq!(to_cell(&Data::Float(1.5)), Some(Cell::Number(1.5)));
        assert_eq!(to_cell(&Data::Int(7)), Some(Cell::Number(7.0)));
    }

    #[test]
    fn blank_strings_and_empties_are_absent() {
        assert_eq!(to_cell(&Data::String("  ".to_string())), None);
        assert_eq!(to_cell(&Data::Empty), None);
    }

    #[test]
    fn strings_are_trimmed() {
        assert_eq!(
            to_cell(&Data::String(" 2024-01-01 ".to_string())),
            Some(Cell::Text("2024-01-01".to_string()))
        );
    }

    #[test]
    fn date_cells_become_serials() {
        let june = Data::DateTime(ExcelDateTime::new(45444.0, ExcelDateTimeType::DateTime, false));
        let cell = to_cell(&june).unwrap();
        assert_eq!(cell, Cell::Number(45444.0));
        assert_eq!(cell.to_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn iso_date_cells_stay_text_and_parse() {
        let cell = to_cell(&Data::DateTimeIso("2024-06-01T00:00:00".to_string())).unwrap();
        assert_eq!(cell, Cell::Text("2024-06-01T00:00:00".to_string()));
        assert_eq!(cell.to_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn header_text_from_various_cells() {
        assert_eq!(header_text(&Data::String(" Date ".to_string())), "Date");
        assert_eq!(header_text(&Data::Empty), "");
    }

    #[test]
    fn missing_file_is_a_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_workbook(&dir.path().join("missing.xlsx"));
        assert!(matches!(result, Err(IngestError::Workbook(_))));
    }
}
