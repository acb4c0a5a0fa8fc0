// ============================================================
// QUESTION IMPORT USE CASE
// ============================================================
// Preview a question spreadsheet, then submit the parsed questions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

use crate::domain::error::{AppError, ImportError, Result};
use crate::domain::question::{ImportContext, QuestionRecord, QuestionTypeDefinition, Skill, TestModule};
use crate::domain::submission::{SubmissionBatch, SubmissionReceipt, SubmissionTarget};
use crate::infrastructure::config::ImportSettings;
use crate::infrastructure::csv::{decode_bytes, template_file_name, write_template, CsvParser};
use crate::infrastructure::registry::QuestionTypeRegistry;
use crate::infrastructure::submission::QuestionSubmitter;

/// Parsed questions shown to the operator before submitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub questions: Vec<QuestionRecord>,
    pub count: usize,
    /// Detected encoding, only for byte uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTemplate {
    pub file_name: String,
    pub content: String,
}

pub struct QuestionImportUseCase {
    registry: Arc<dyn QuestionTypeRegistry>,
    submitter: Arc<dyn QuestionSubmitter>,
    settings: ImportSettings,
}

impl QuestionImportUseCase {
    pub fn new(
        registry: Arc<dyn QuestionTypeRegistry>,
        submitter: Arc<dyn QuestionSubmitter>,
        settings: ImportSettings,
    ) -> Self {
        Self {
            registry,
            submitter,
            settings,
        }
    }

    fn parser(&self) -> CsvParser<'_> {
        CsvParser::new(self.registry.as_ref())
            .with_expected_headers(self.settings.expected_headers.clone())
            .with_default_section(self.settings.default_section.clone())
    }

    fn with_defaults(&self, mut context: ImportContext) -> ImportContext {
        if context.part_number.is_none() {
            context.part_number = Some(self.settings.default_part_number);
        }
        context
    }

    /// Parse document text without storing anything
    pub fn preview(&self, content: &str, context: ImportContext) -> Result<ImportPreview> {
        context.validate()?;
        let context = self.with_defaults(context);
        let start = Instant::now();

        let questions = self.parser().parse_content(content, &context)?;

        tracing::info!(
            module = %context.module,
            skill = %context.skill,
            count = questions.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Parsed question document"
        );

        Ok(ImportPreview {
            count: questions.len(),
            questions,
            encoding: None,
        })
    }

    /// Decode uploaded bytes, then preview them
    pub fn preview_bytes(&self, bytes: &[u8], context: ImportContext) -> Result<ImportPreview> {
        let decoded = decode_bytes(bytes);
        tracing::debug!(encoding = decoded.encoding, bytes = bytes.len(), "Decoded upload");

        let mut preview = self.preview(&decoded.text, context)?;
        preview.encoding = Some(decoded.encoding.to_string());
        Ok(preview)
    }

    /// Submit questions the operator already previewed
    pub async fn confirm(
        &self,
        target: SubmissionTarget,
        questions: Vec<QuestionRecord>,
    ) -> Result<SubmissionReceipt> {
        target.validate()?;
        if questions.is_empty() {
            return Err(ImportError::NoQuestionsFound.into());
        }
        check_reviewed_questions(&target, &questions)?;

        let batch = SubmissionBatch::new(target, questions);
        tracing::info!(
            import_id = %batch.import_id,
            test_id = %batch.target.test_id,
            part_number = batch.target.part_number,
            count = batch.questions.len(),
            backend = self.submitter.backend_name(),
            "Submitting questions"
        );

        match self.submitter.submit(&batch).await {
            Ok(receipt) => {
                tracing::info!(
                    import_id = %receipt.import_id,
                    stored = receipt.stored,
                    "Questions submitted"
                );
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!(import_id = %batch.import_id, error = %e, "Question submission failed");
                Err(e)
            }
        }
    }

    /// Parse and submit in one step. The target part is the one the rows were tagged with.
    pub async fn import(
        &self,
        content: &str,
        context: ImportContext,
        test_id: String,
        test_type: String,
    ) -> Result<SubmissionReceipt> {
        let context = self.with_defaults(context);
        let target = SubmissionTarget {
            test_id,
            test_type,
            part_number: context.effective_part_number(),
            module: context.module,
        };
        target.validate()?;

        let preview = self.preview(content, context)?;
        self.confirm(target, preview.questions).await
    }

    pub fn sample_template(&self, skill: Skill) -> Result<SampleTemplate> {
        Ok(SampleTemplate {
            file_name: template_file_name(skill),
            content: write_template(&self.settings.expected_headers, skill)?,
        })
    }

    pub fn question_types(&self, module: TestModule, skill: Skill) -> Vec<QuestionTypeDefinition> {
        self.registry.definitions(module, skill)
    }
}

/// Reviewed records must belong to the target part and keep distinct numbers
fn check_reviewed_questions(target: &SubmissionTarget, questions: &[QuestionRecord]) -> Result<()> {
    if let Some(question) = questions
        .iter()
        .find(|q| q.part_number != target.part_number)
    {
        return Err(AppError::ValidationError(format!(
            "Question {} is tagged part {} but the target is part {}",
            question.question_number, question.part_number, target.part_number
        )));
    }

    let mut seen = HashSet::new();
    if let Some(question) = questions.iter().find(|q| !seen.insert(q.question_number)) {
        return Err(AppError::ValidationError(format!(
            "Duplicate question number {}",
            question.question_number
        )));
    }
    Ok(())
}
