use std::io::Cursor;

use calamine::{Data, Reader};
use psylink_core::time::from_excel_serial;

use crate::error::ImportError;
use crate::format::{self, InputKind};

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A file's header row and its data rows as cell text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// One data row. `row` is 1-based and counted from the header line, so it
/// matches what the user sees in the file even where blank lines were skipped.
/// A row that could not be decoded is kept as `Err(reason)` so it is counted
/// and reported rather than silently dropped.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub row: usize,
    pub cells: Result<Vec<String>, String>,
}

pub fn read(file_name: &str, bytes: &[u8]) -> Result<RawTable, ImportError> {
    match format::detect(file_name, bytes)? {
        InputKind::Delimited => read_csv(bytes),
        InputKind::Spreadsheet => read_spreadsheet(bytes),
    }
}

/// Comma-separated text. Completely empty lines are skipped by the tokenizer;
/// a line of only spaces is a row.
pub fn read_csv(bytes: &[u8]) -> Result<RawTable, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        None => return Err(ImportError::MissingHeader),
        Some(record) => record?,
    };
    let header_line = header.position().map_or(1, |pos| pos.line());
    let headers: Vec<String> = header.iter().map(|cell| cell.trim().to_string()).collect();

    let mut rows = Vec::new();
    let mut previous = 0;
    for record in records {
        let line = match &record {
            Ok(r) => r.position().map(|pos| pos.line()),
            Err(e) => e.position().map(|pos| pos.line()),
        };
        let row = line
            .and_then(|line| line.checked_sub(header_line))
            .filter(|&row| row > previous)
            .unwrap_or(previous + 1);
        previous = row;
        let cells = record
            .map(|r| r.iter().map(str::to_string).collect())
            .map_err(|e| format!("unreadable row: {e}"));
        rows.push(RawRow { row: row as usize, cells });
    }

    Ok(RawTable { headers, rows })
}

/// First worksheet of an `.xls`/`.xlsx`/`.ods` workbook.
pub fn read_spreadsheet(bytes: &[u8]) -> Result<RawTable, ImportError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::MissingHeader)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ImportError::MissingHeader)?
        .iter()
        .map(|cell| cell_text(cell).trim().to_string())
        .collect();
    let rows = rows
        .enumerate()
        .map(|(index, row)| RawRow {
            row: index + 1,
            cells: Ok(row.iter().map(cell_text).collect()),
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Whole numbers come back as floats; keep ids like 1001 free of ".0".
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => from_excel_serial(dt.as_f64())
            .map(|ts| ts.to_string())
            .unwrap_or_else(|_| dt.as_f64().to_string()),
        Data::Error(e) => e.to_string(),
    }
}
