pub mod error;
pub mod question;
pub mod submission;

// Spreadsheet row and column types
pub mod csv;
