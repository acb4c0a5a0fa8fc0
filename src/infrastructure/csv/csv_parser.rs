// ============================================================
// CSV PARSER
// ============================================================
// Turn a question spreadsheet into validated question records

use crate::domain::csv::{ColumnLayout, CsvRow, QuestionColumn, DEFAULT_HEADERS};
use crate::domain::error::ImportError;
use crate::domain::question::{derive_answer_set, ImportContext, QuestionRecord};
use crate::infrastructure::registry::QuestionTypeRegistry;

use super::row_tokenizer::tokenize_row;

const DEFAULT_SECTION: &str = "Reading";

/// Question spreadsheet parser
pub struct CsvParser<'a> {
    registry: &'a dyn QuestionTypeRegistry,

    /// Required header names, in slot order
    expected_headers: Vec<String>,

    /// Section used when a row leaves the Section cell blank
    default_section: String,
}

impl<'a> CsvParser<'a> {
    /// Create a parser with the standard header names
    pub fn new(registry: &'a dyn QuestionTypeRegistry) -> Self {
        Self {
            registry,
            expected_headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
            default_section: DEFAULT_SECTION.to_string(),
        }
    }

    /// Set custom required header names
    pub fn with_expected_headers(mut self, headers: Vec<String>) -> Self {
        self.expected_headers = headers;
        self
    }

    /// Set the section used for blank Section cells
    pub fn with_default_section(mut self, section: impl Into<String>) -> Self {
        self.default_section = section.into();
        self
    }

    /// Parse the whole document. The first invalid row aborts the parse.
    pub fn parse_content(
        &self,
        content: &str,
        context: &ImportContext,
    ) -> Result<Vec<QuestionRecord>, ImportError> {
        let lines: Vec<&str> = content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.len() < 2 {
            return Err(ImportError::EmptyDocument);
        }

        // Text pasted from a BOM-prefixed file keeps the mark on the header line
        let headers = tokenize_row(lines[0].trim_start_matches('\u{feff}'));
        let layout = ColumnLayout::resolve(&self.expected_headers, &headers)?;

        let mut questions = Vec::new();
        for (idx, line) in lines.iter().enumerate().skip(1) {
            let row = CsvRow::new(idx + 1, tokenize_row(line));
            if row.is_short(&layout) {
                tracing::debug!(
                    line = row.line_number,
                    fields = row.fields.len(),
                    expected = layout.header_count(),
                    "Skipping short row"
                );
                continue;
            }

            let question_number = questions.len() as u32 + 1;
            questions.push(self.parse_row(&row, &layout, question_number, context)?);
        }

        if questions.is_empty() {
            return Err(ImportError::NoQuestionsFound);
        }

        Ok(questions)
    }

    fn parse_row(
        &self,
        row: &CsvRow,
        layout: &ColumnLayout,
        question_number: u32,
        context: &ImportContext,
    ) -> Result<QuestionRecord, ImportError> {
        let section = match row.value(layout, QuestionColumn::Section) {
            "" => self.default_section.clone(),
            value => value.to_string(),
        };
        let raw_type = row.value(layout, QuestionColumn::Type);

        let question_type = self.registry.map_free_text_to_canonical(raw_type);
        if !self
            .registry
            .is_type_valid_for_skill(&question_type, context.module, context.skill)
        {
            tracing::warn!(
                line = row.line_number,
                raw_type,
                mapped_type = %question_type,
                skill = %context.skill,
                "Rejecting question type"
            );
            return Err(ImportError::InvalidQuestionType {
                raw_type: raw_type.to_string(),
                row: row.line_number,
                mapped_type: question_type,
                valid_types: self.registry.list_valid_types(context.module, context.skill),
            });
        }

        let answer_set =
            derive_answer_set(&question_type, row.value(layout, QuestionColumn::Choices));

        Ok(QuestionRecord {
            question_number,
            section,
            question_text: row.value(layout, QuestionColumn::QuestionText).to_string(),
            question_type,
            answer_set,
            correct_answer: row.value(layout, QuestionColumn::CorrectAnswer).to_string(),
            explanation: row.value(layout, QuestionColumn::Explanation).to_string(),
            cambridge_book: context.cambridge_book.clone(),
            section_number: context.section_number,
            part_number: context.effective_part_number(),
        })
    }
}
