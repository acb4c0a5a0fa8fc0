// ============================================================
// CSV ROW TYPES
// ============================================================
// A tokenized line of a question spreadsheet

use super::columns::{ColumnLayout, QuestionColumn};

/// A single tokenized, non-blank line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number among non-blank lines (the header is line 1)
    pub line_number: usize,

    /// Trimmed field values, quotes removed
    pub fields: Vec<String>,
}

impl CsvRow {
    pub fn new(line_number: usize, fields: Vec<String>) -> Self {
        Self {
            line_number,
            fields,
        }
    }

    /// Rows with fewer fields than the header row are not read at all
    pub fn is_short(&self, layout: &ColumnLayout) -> bool {
        self.fields.len() < layout.header_count()
    }

    /// Value of a semantic column, empty when the row does not reach it
    pub fn value(&self, layout: &ColumnLayout, column: QuestionColumn) -> &str {
        self.fields
            .get(layout.index_of(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::DEFAULT_HEADERS;

    #[test]
    fn test_short_row_detection() {
        let headers: Vec<String> = DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect();
        let layout = ColumnLayout::resolve(&headers, &headers).unwrap();

        let short = CsvRow::new(2, vec!["1".to_string(), "Reading".to_string()]);
        assert!(short.is_short(&layout));
        assert_eq!(short.value(&layout, QuestionColumn::Section), "Reading");
        assert_eq!(short.value(&layout, QuestionColumn::Explanation), "");

        let full = CsvRow::new(3, headers.clone());
        assert!(!full.is_short(&layout));
        assert_eq!(full.value(&layout, QuestionColumn::Type), "Type");
    }
}
