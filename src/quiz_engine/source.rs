//! Reading tabular files into [`RawRow`]s.
//!
//! | Extension                       | Layout |
//! |---------------------------------|--------|
//! | `.xlsx`/`.xls`/`.xlsb`/`.ods`   | First worksheet; first row holds the headers |
//! | `.json`                         | Array of objects, one per row; key order is the column order |
//! | `.csv`                          | Header line then rows, comma separated, `"` quoting with `""` escapes |
//! | `.tsv`/`.txt`                   | Same as CSV with tab separators |
//!
//! Short rows are padded with blank cells so every row carries every header.
//! Rows whose cells are all blank are skipped.

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use serde_json::Value;

use crate::quiz_engine::{
    dataset::{Cell, RawRow},
    error::{QuizError, QuizResult},
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Json,
    Delimited(u8),
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<SourceFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            "json" => Some(SourceFormat::Json),
            "csv" => Some(SourceFormat::Delimited(b',')),
            "tsv" | "txt" => Some(SourceFormat::Delimited(b'\t')),
            _ => None,
        }
    }
}

/// Display name for status messages: the file name, or the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and split a tabular file. Any I/O or format problem is `SourceUnreadable`.
pub fn read_rows(path: &Path) -> QuizResult<Vec<RawRow>> {
    let name = display_name(path);
    let format = SourceFormat::from_path(path).ok_or_else(|| {
        QuizError::unreadable(&name, "unsupported file type (expected .xlsx, .xls, .ods, .json, .csv or .tsv)")
    })?;
    let rows = match format {
        SourceFormat::Workbook => {
            let workbook = open_workbook_auto(path).map_err(|e| QuizError::unreadable(&name, e))?;
            rows_from_workbook(workbook, &name)?
        }
        text => {
            let bytes = fs::read(path).map_err(|e| QuizError::unreadable(&name, e))?;
            parse_rows(&bytes, text, &name)?
        }
    };
    tracing::debug!(source = %name, rows = rows.len(), "read tabular source");
    Ok(rows)
}

/// Split in-memory file contents. Workbooks are sniffed from their bytes.
pub fn parse_rows(bytes: &[u8], format: SourceFormat, name: &str) -> QuizResult<Vec<RawRow>> {
    match format {
        SourceFormat::Workbook => {
            let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
                .map_err(|e| QuizError::unreadable(name, e))?;
            rows_from_workbook(workbook, name)
        }
        SourceFormat::Json => rows_from_json(strip_bom(bytes), name),
        SourceFormat::Delimited(sep) => rows_from_delimited(strip_bom(bytes), sep, name),
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

// ── workbooks ────────────────────────────────────────────────────────────────

fn rows_from_workbook<RS: Read + Seek>(mut workbook: Sheets<RS>, name: &str) -> QuizResult<Vec<RawRow>> {
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| QuizError::unreadable(name, e))?,
        None => return Err(QuizError::unreadable(name, "workbook has no worksheets")),
    };
    Ok(rows_from_range(&range))
}

fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(|h| h.to_string()).collect();

    rows.map(|cells| {
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            row.push(header.clone(), cells.get(i).map_or(Cell::Blank, cell_from_data));
        }
        row
    })
    .filter(|row| !row.is_blank())
    .collect()
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Blank,
        Data::String(s) if s.is_empty() => Cell::Blank,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number((*i).into()),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(f.to_string())),
        Data::Bool(b) => Cell::Bool(*b),
        // Dates, durations and error cells keep their displayed text.
        other => Cell::Text(other.to_string()),
    }
}

// ── text formats ─────────────────────────────────────────────────────────────

fn rows_from_json(bytes: &[u8], name: &str) -> QuizResult<Vec<RawRow>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| QuizError::unreadable(name, e))?;
    let Value::Array(items) = value else {
        return Err(QuizError::unreadable(name, "expected a JSON array of row objects"));
    };
    // Non-object items carry no headers and would be dropped by the normalizer anyway.
    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .map(RawRow::from_json_object)
        .collect())
}

fn rows_from_delimited(bytes: &[u8], sep: u8, name: &str) -> QuizResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sep)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| QuizError::unreadable(name, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| QuizError::unreadable(name, e))?;
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            let cell = match record.get(i) {
                None | Some("") => Cell::Blank,
                Some(v) => Cell::Text(v.to_string()),
            };
            row.push(header.clone(), cell);
        }
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}
