mod questions;

pub use questions::SqliteQuestionStore;
