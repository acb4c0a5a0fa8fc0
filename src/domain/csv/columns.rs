// ============================================================
// QUESTION COLUMNS
// ============================================================
// Semantic column slots and their resolution against a header row

use crate::domain::error::ImportError;

/// Header names a question spreadsheet must carry, in slot order
pub const DEFAULT_HEADERS: [&str; 7] = [
    "Question Number",
    "Section",
    "Type",
    "Question Text",
    "Choices",
    "Correct Answer",
    "Explanation",
];

/// Semantic slot of a column. The n-th expected header names the n-th slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionColumn {
    QuestionNumber,
    Section,
    Type,
    QuestionText,
    Choices,
    CorrectAnswer,
    Explanation,
}

impl QuestionColumn {
    pub const ALL: [QuestionColumn; 7] = [
        QuestionColumn::QuestionNumber,
        QuestionColumn::Section,
        QuestionColumn::Type,
        QuestionColumn::QuestionText,
        QuestionColumn::Choices,
        QuestionColumn::CorrectAnswer,
        QuestionColumn::Explanation,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Column index of every slot within one document's header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    indices: [usize; 7],
    header_count: usize,
}

impl ColumnLayout {
    /// Resolve expected header names against the actual header row.
    ///
    /// Only presence matters: order and extra columns are accepted. Missing names are
    /// reported in expected order.
    pub fn resolve(expected: &[String], headers: &[String]) -> Result<Self, ImportError> {
        let missing: Vec<String> = expected
            .iter()
            .filter(|name| !headers.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns {
                missing,
                expected: expected.to_vec(),
            });
        }

        let mut indices = [0usize; 7];
        for column in QuestionColumn::ALL {
            let Some(name) = expected.get(column.slot()) else {
                // fewer expected names than slots: fall back to the slot's position
                indices[column.slot()] = column.slot();
                continue;
            };
            indices[column.slot()] = headers
                .iter()
                .position(|h| h == name)
                .unwrap_or(column.slot());
        }

        Ok(Self {
            indices,
            header_count: headers.len(),
        })
    }

    pub fn index_of(&self, column: QuestionColumn) -> usize {
        self.indices[column.slot()]
    }

    pub fn header_count(&self) -> usize {
        self.header_count
    }
}
