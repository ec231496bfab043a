//! Dataset normalizer: turns loosely-labelled spreadsheet rows into a
//! deduplicated pool of [`Entry`] values.
//!
//! Header names are untrusted. Each row is inspected on its own: the first
//! header containing `state` supplies the state, and the first header
//! containing `nickname`, `nick name`, `plate` or `slogan` supplies the
//! nickname. Rows missing either, or with a blank value, are dropped without
//! error.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::quiz_engine::{
    error::{QuizError, QuizResult},
    models::{Entry, MIN_ENTRIES},
};

const STATE_HEADERS: [&str; 1] = ["state"];
const NICKNAME_HEADERS: [&str; 4] = ["nickname", "nick name", "plate", "slogan"];

/// Built-in fallback pool used by the "sample" control.
pub const SAMPLE_ENTRIES: [(&str, &str); 8] = [
    ("Alaska",     "The Last Frontier"),
    ("California", "The Golden State"),
    ("Florida",    "The Sunshine State"),
    ("Hawaii",     "The Aloha State"),
    ("Maine",      "The Pine Tree State"),
    ("Nevada",     "The Silver State"),
    ("New York",   "The Empire State"),
    ("Texas",      "The Lone Star State"),
];

pub fn sample_entries() -> Vec<Entry> {
    SAMPLE_ENTRIES
        .iter()
        .map(|&(state, nickname)| Entry::new(state, nickname))
        .collect()
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One spreadsheet cell. Blank cells arrive as `Blank`, never as missing keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Blank,
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Cell {
    pub fn from_json(value: &Value) -> Cell {
        match value {
            Value::Null => Cell::Blank,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => Cell::Number(n.clone()),
            Value::String(s) => Cell::Text(s.clone()),
            // Nested structures are not spreadsheet scalars; keep their JSON text.
            other => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Blank => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => match n.as_f64() {
                // Spreadsheets show 1.0 as "1".
                Some(x) if n.is_f64() && x.fract() == 0.0 && x.abs() < 1e21 => {
                    write!(f, "{:.0}", x + 0.0)
                }
                _ => write!(f, "{n}"),
            },
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A row as a header→cell list in the source's column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, Cell)>,
}

impl RawRow {
    pub fn new() -> Self {
        RawRow::default()
    }

    pub fn with(mut self, header: impl Into<String>, cell: Cell) -> Self {
        self.push(header, cell);
        self
    }

    pub fn push(&mut self, header: impl Into<String>, cell: Cell) {
        self.cells.push((header.into(), cell));
    }

    /// Build a row from a JSON object, keeping key order.
    pub fn from_json_object(object: &serde_json::Map<String, Value>) -> Self {
        RawRow {
            cells: object
                .iter()
                .map(|(k, v)| (k.clone(), Cell::from_json(v)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is blank or whitespace.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| cell.to_string().trim().is_empty())
    }

    /// First cell whose lowercased header contains any of `needles`.
    fn find(&self, needles: &[&str]) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(header, _)| {
                let header = header.to_lowercase();
                needles.iter().any(|n| header.contains(n))
            })
            .map(|(_, cell)| cell)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn row_to_entry(row: &RawRow) -> Option<Entry> {
    let state = row.find(&STATE_HEADERS)?.to_string();
    let nickname = row.find(&NICKNAME_HEADERS)?.to_string();
    let (state, nickname) = (state.trim(), nickname.trim());
    if state.is_empty() || nickname.is_empty() {
        return None;
    }
    Some(Entry::new(state, nickname))
}

/// Extract and deduplicate entries without enforcing the minimum size.
///
/// Duplicates (case-insensitive on both fields) collapse onto the slot of
/// their first occurrence, carrying the last occurrence's values.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<Entry> {
    let mut out: Vec<Entry> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for entry in rows.iter().filter_map(row_to_entry) {
        match slots.get(&entry.dedupe_key()) {
            Some(&i) => out[i] = entry,
            None => {
                slots.insert(entry.dedupe_key(), out.len());
                out.push(entry);
            }
        }
    }
    out
}

/// Normalize `rows` and reject pools too small to build a question.
pub fn parse_dataset(rows: &[RawRow]) -> QuizResult<Vec<Entry>> {
    let entries = normalize_rows(rows);
    if entries.len() < MIN_ENTRIES {
        return Err(QuizError::DatasetTooSmall { found: entries.len() });
    }
    tracing::debug!(rows = rows.len(), entries = entries.len(), "normalized dataset");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn row(state: &str, nickname: &str) -> RawRow {
        RawRow::new().with("State", text(state)).with("Nickname", text(nickname))
    }

    #[test]
    fn headers_are_matched_case_insensitively_by_substring() {
        let rows = vec![
            RawRow::new()
                .with("US STATE NAME", text("Ohio"))
                .with("License Plate Slogan", text("Birthplace of Aviation")),
        ];
        assert_eq!(
            normalize_rows(&rows),
            vec![Entry::new("Ohio", "Birthplace of Aviation")]
        );
    }

    #[test]
    fn every_nickname_alias_is_recognised() {
        for header in ["Nickname", "Nick Name", "Plate text", "SLOGAN"] {
            let rows = vec![RawRow::new().with("state", text("Utah")).with(header, text("Life Elevated"))];
            assert_eq!(normalize_rows(&rows).len(), 1, "header {header:?} not recognised");
        }
    }

    #[test]
    fn first_matching_header_in_column_order_wins() {
        let rows = vec![
            RawRow::new()
                .with("State", text("Idaho"))
                .with("Statehood year", Cell::Number(1890.into()))
                .with("Plate", text("Famous Potatoes"))
                .with("Nickname", text("The Gem State")),
        ];
        assert_eq!(normalize_rows(&rows), vec![Entry::new("Idaho", "Famous Potatoes")]);
    }

    #[test]
    fn rows_missing_columns_or_values_are_dropped() {
        let rows = vec![
            RawRow::new().with("State", text("Iowa")),
            RawRow::new().with("Motto", text("Our liberties")).with("Nickname", text("Hawkeye State")),
            row("   ", "Blank state"),
            row("Kansas", "  "),
            RawRow::new().with("State", Cell::Blank).with("Nickname", text("Nothing")),
            row("  Oregon ", " Pacific Wonderland  "),
        ];
        assert_eq!(
            normalize_rows(&rows),
            vec![Entry::new("Oregon", "Pacific Wonderland")]
        );
    }

    #[test]
    fn duplicates_collapse_case_insensitively_to_last_seen() {
        let rows = vec![
            row("Texas", "The Lone Star State"),
            row("Maine", "Vacationland"),
            row("TEXAS", "the lone star state"),
        ];
        let entries = normalize_rows(&rows);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], Entry::new("TEXAS", "the lone star state"));
        assert_eq!(entries[1], Entry::new("Maine", "Vacationland"));
    }

    #[test]
    fn same_state_with_different_nicknames_is_kept() {
        let rows = vec![row("Maine", "Vacationland"), row("Maine", "The Pine Tree State")];
        assert_eq!(normalize_rows(&rows).len(), 2);
    }

    #[test]
    fn non_text_cells_are_stringified() {
        let rows = vec![
            RawRow::new().with("State", Cell::Number(51.into())).with("Slogan", Cell::Bool(true)),
        ];
        assert_eq!(normalize_rows(&rows), vec![Entry::new("51", "true")]);
    }

    #[test]
    fn whole_floats_print_without_a_fraction() {
        let number = |x: f64| Cell::Number(serde_json::Number::from_f64(x).unwrap());
        assert_eq!(number(1.0).to_string(), "1");
        assert_eq!(number(-0.0).to_string(), "0");
        assert_eq!(number(1971.0).to_string(), "1971");
        assert_eq!(number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Number(7u64.into()).to_string(), "7");

        let rows = crate::quiz_engine::source::parse_rows(
            br#"[{"State": 1.0, "Nickname": 12.50}]"#,
            crate::quiz_engine::source::SourceFormat::Json,
            "t.json",
        )
        .unwrap();
        assert_eq!(normalize_rows(&rows), vec![Entry::new("1", "12.5")]);
    }

    #[test]
    fn whitespace_only_rows_are_blank() {
        assert!(RawRow::new().with("State", Cell::Blank).with("Nickname", Cell::Text("  ".into())).is_blank());
        assert!(!RawRow::new().with("State", Cell::Bool(false)).is_blank());
    }

    #[test]
    fn dataset_too_small_below_four_entries() {
        let three: Vec<RawRow> = SAMPLE_ENTRIES[..3].iter().map(|&(s, n)| row(s, n)).collect();
        assert_eq!(parse_dataset(&three), Err(QuizError::DatasetTooSmall { found: 3 }));

        let four: Vec<RawRow> = SAMPLE_ENTRIES[..4].iter().map(|&(s, n)| row(s, n)).collect();
        assert_eq!(parse_dataset(&four).map(|e| e.len()), Ok(4));
    }

    #[test]
    fn duplicates_count_once_toward_the_minimum() {
        let mut rows: Vec<RawRow> = SAMPLE_ENTRIES[..3].iter().map(|&(s, n)| row(s, n)).collect();
        rows.push(row("alaska", "THE LAST FRONTIER"));
        assert_eq!(parse_dataset(&rows), Err(QuizError::DatasetTooSmall { found: 3 }));
    }

    #[test]
    fn sample_pool_has_eight_distinct_states() {
        let entries = sample_entries();
        assert_eq!(entries.len(), 8);
        let states: std::collections::HashSet<_> = entries.iter().map(|e| &e.state).collect();
        assert_eq!(states.len(), 8);
    }
}
