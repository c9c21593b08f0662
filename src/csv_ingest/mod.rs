//! Bulk URL ingestion from uploaded CSV files.
//!
//! Spreadsheet exports arrive with arbitrary layouts, so the parser detects a
//! header row instead of forcing a schema. Rows are validated individually
//! and duplicates are kept in the output so callers can report exactly what
//! was skipped and why.

mod models;
mod parser;

pub use models::{CsvIngestError, ParseReport, ParsedCsvRow, RowStatus};
pub use parser::{is_accepted_csv_upload, parse_csv, MAX_CSV_ROWS};
