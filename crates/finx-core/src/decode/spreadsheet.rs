//! Spreadsheet decoding using calamine, with CSV handled by the csv crate.

use std::io::Cursor;

use calamine::{Data, Reader};
use tracing::debug;

use super::{Cell, Result, Sheet, Workbook};
use crate::error::DecodeError;

/// Decode an uploaded spreadsheet into a workbook.
///
/// `.csv` files become a single sheet; every other extension is handed to
/// calamine, which detects xlsx/xlsm/xlsb/xls/ods from the content.
pub fn decode_workbook(data: &[u8], file_name: &str) -> Result<Workbook> {
    if data.is_empty() {
        return Err(DecodeError::Empty);
    }

    if file_name.to_lowercase().ends_with(".csv") {
        return decode_csv(data);
    }

    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(data))
        .map_err(|e| DecodeError::Spreadsheet(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| DecodeError::Spreadsheet(format!("sheet '{}': {}", name, e)))?;

        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(convert_cell));
            rows.push(cells);
        }

        debug!("Decoded sheet '{}' with {} rows", name, rows.len());
        sheets.push(Sheet::new(name, rows));
    }

    Ok(Workbook { sheets })
}

fn decode_csv(data: &[u8]) -> Result<Workbook> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    debug!("Decoded CSV with {} rows", rows.len());
    Ok(Workbook {
        sheets: vec![Sheet::new("csv_data", rows)],
    })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_csv_rows() {
        let csv = "HD,x\nDT,1000020410,,5\nDT,\"1,234.50\"\n";
        let workbook = decode_workbook(csv.as_bytes(), "Report.CSV").unwrap();

        assert_eq!(workbook.sheets.len(), 1);
        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.name, "csv_data");
        assert!(sheet.cell(0, 0).is_marker("HD"));
        assert_eq!(sheet.cell(1, 1).as_text(), "1000020410");
        assert_eq!(sheet.cell(1, 2), &Cell::Empty);
        assert_eq!(sheet.cell(2, 1).as_text(), "1,234.50");
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(
            decode_workbook(&[], "report.xlsx"),
            Err(DecodeError::Empty)
        ));
    }

    #[test]
    fn test_garbage_spreadsheet_rejected() {
        let result = decode_workbook(b"definitely not a workbook", "report.xlsx");
        assert!(matches!(result, Err(DecodeError::Spreadsheet(_))));
    }
}
