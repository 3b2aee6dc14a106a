//! Viewing history CSV loading.
//!
//! The streaming service exports a two-column CSV (`Title`, `Date`) with dates
//! written as `DD/MM/YYYY`. This module reads that file in one go and turns
//! every row into a [`ViewingRecord`]. A single bad date aborts the whole load.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::analytics::models::ViewingRecord;
use crate::error::{ViewstatsError, ViewstatsResult};

/// Date format used by the export
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const TITLE_COLUMN: &str = "Title";
const DATE_COLUMN: &str = "Date";

/// One row as read from the export, before date parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHistoryRow {
    /// 1-based line number in the source file (header is line 1)
    pub line: usize,
    /// Title text, `None` when the cell is empty
    pub title: Option<String>,
    /// Unparsed date text
    pub date_text: String,
}

impl RawHistoryRow {
    pub fn new(line: usize, title: Option<&str>, date_text: impl Into<String>) -> Self {
        Self {
            line,
            title: title.map(str::to_string),
            date_text: date_text.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvHistoryRow {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Date")]
    date: String,
}

/// Parse a single `DD/MM/YYYY` date.
pub fn parse_watch_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Turn raw rows into viewing records, preserving input order.
///
/// Fails fast on the first date that does not match `DD/MM/YYYY`.
/// Only an empty title cell becomes `None`; any other text is kept as exported.
pub fn load_records<I>(rows: I) -> ViewstatsResult<Vec<ViewingRecord>>
where
    I: IntoIterator<Item = RawHistoryRow>,
{
    rows.into_iter()
        .map(|row| {
            let watched_on = parse_watch_date(&row.date_text)
                .ok_or_else(|| ViewstatsError::malformed_date(row.line, row.date_text.clone()))?;
            let title = row.title.filter(|t| !t.is_empty());
            Ok(ViewingRecord::new(title, watched_on))
        })
        .collect()
}

/// Read raw rows from any CSV source with `Title` and `Date` headers.
pub fn read_history_rows<R: Read>(source: R) -> ViewstatsResult<Vec<RawHistoryRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    // BOM付きのエクスポートにも対応
    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    for required in [TITLE_COLUMN, DATE_COLUMN] {
        if !headers.iter().any(|h| h == required) {
            return Err(ViewstatsError::invalid_format(format!(
                "missing '{}' column (found: {})",
                required,
                headers.iter().collect::<Vec<_>>().join(", ")
            )));
        }
    }
    reader.set_headers(headers.clone());

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        let row: CsvHistoryRow = record.deserialize(Some(&headers))?;
        rows.push(RawHistoryRow {
            line,
            title: row.title,
            date_text: row.date,
        });
    }

    debug!(rows = rows.len(), "📄 Viewing history rows read");
    Ok(rows)
}

/// Read raw rows from a CSV file on disk.
pub fn read_history_file(path: impl AsRef<Path>) -> ViewstatsResult<Vec<RawHistoryRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ViewstatsError::io(path, e))?;
    read_history_rows(file)
}

/// Read and parse a viewing history file.
///
/// An export with a header but no rows is reported as an empty dataset.
pub fn load_history_file(path: impl AsRef<Path>) -> ViewstatsResult<Vec<ViewingRecord>> {
    let path = path.as_ref();
    let rows = read_history_file(path)?;
    if rows.is_empty() {
        return Err(ViewstatsError::empty_dataset(format!(
            "no rows found in '{}'",
            path.display()
        )));
    }

    let records = load_records(rows)?;
    info!(
        path = %path.display(),
        records = records.len(),
        "📥 Viewing history loaded"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_watch_date() {
        assert_eq!(parse_watch_date("24/12/2020"), Some(date(2020, 12, 24)));
        assert_eq!(parse_watch_date(" 01/02/2021 "), Some(date(2021, 2, 1)));
        assert_eq!(parse_watch_date("2020-12-24"), None);
        assert_eq!(parse_watch_date("31/02/2021"), None);
    }

    #[test]
    fn test_load_records_preserves_order() {
        let rows = vec![
            RawHistoryRow::new(2, Some("Show A: Season 1: Pilot"), "03/01/2021"),
            RawHistoryRow::new(3, None, "01/01/2021"),
            RawHistoryRow::new(4, Some("Random Special"), "02/01/2021"),
        ];

        let records = load_records(rows).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title.as_deref(), Some("Show A: Season 1: Pilot"));
        assert_eq!(records[0].watched_on, date(2021, 1, 3));
        assert_eq!(records[1].title, None);
        assert_eq!(records[2].watched_on, date(2021, 1, 2));
    }

    #[test]
    fn test_load_records_keeps_whitespace_title() {
        let rows = vec![
            RawHistoryRow::new(2, Some("   "), "03/01/2021"),
            RawHistoryRow::new(3, Some(""), "04/01/2021"),
        ];
        let records = load_records(rows).unwrap();
        assert_eq!(records[0].title.as_deref(), Some("   "));
        assert_eq!(records[1].title, None);
    }

    #[test]
    fn test_whitespace_title_is_classified_as_movie() {
        let rows = read_history_rows("Title,Date
   ,03/01/2021
".as_bytes()).unwrap();
        assert_eq!(rows[0].title.as_deref(), Some("   "));

        let records = load_records(rows).unwrap();
        let table = crate::analytics::classify_records(&records);
        assert_eq!(table.counts.movie_count, 1);
        assert_eq!(table.counts.series_count, 0);
    }

    #[test]
    fn test_load_records_fails_fast_on_bad_date() {
        let rows = vec![
            RawHistoryRow::new(2, Some("Ok"), "03/01/2021"),
            RawHistoryRow::new(3, Some("Bad"), "2021/01/03"),
            RawHistoryRow::new(4, Some("Never reached"), "nonsense"),
        ];

        match load_records(rows) {
            Err(ViewstatsError::MalformedDate { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "2021/01/03");
            }
            other => panic!("Expected MalformedDate, got {:?}", other),
        }
    }

    #[test]
    fn test_read_history_rows() {
        let csv = "Title,Date\n\"Show A: Season 1: Pilot\",03/01/2021\n,04/01/2021\nRandom Special,05/01/2021\n";
        let rows = read_history_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].title.as_deref(), Some("Show A: Season 1: Pilot"));
        assert_eq!(rows[1].title, None);
        assert_eq!(rows[2].date_text, "05/01/2021");
        assert_eq!(rows[2].line, 4);
    }

    #[test]
    fn test_read_history_rows_column_order_and_bom() {
        let csv = "\u{feff}Date,Title\n03/01/2021,Movie Night\n";
        let rows = read_history_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Movie Night"));
        assert_eq!(rows[0].date_text, "03/01/2021");
    }

    #[test]
    fn test_read_history_rows_missing_column() {
        let csv = "Title,When\nSomething,03/01/2021\n";
        match read_history_rows(csv.as_bytes()) {
            Err(ViewstatsError::InvalidFormat { reason }) => {
                assert!(reason.contains("'Date'"));
            }
            other => panic!("Expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_load_history_file_not_found() {
        match load_history_file("non_existent_history.csv") {
            Err(ViewstatsError::Io { path, .. }) => {
                assert!(path.ends_with("non_existent_history.csv"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
