//! I/O utilities for reading viewing history exports.
//!
//! This module loads the two-column CSV export into memory; nothing here
//! streams or writes files.

pub mod history_csv;

// Re-export commonly used types and functions
pub use history_csv::{
    load_history_file, load_records, parse_watch_date, read_history_file, read_history_rows,
    RawHistoryRow, DATE_FORMAT,
};
