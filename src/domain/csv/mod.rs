// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Row and column types for question spreadsheets
// No I/O, no async, no external dependencies

mod columns;
mod csv_row;

pub use columns::{ColumnLayout, QuestionColumn, DEFAULT_HEADERS};
pub use csv_row::CsvRow;
