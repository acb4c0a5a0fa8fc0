use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::{AppError, Result};
use crate::domain::question::{AnswerSet, QuestionRecord};
use crate::domain::submission::{SubmissionBatch, SubmissionReceipt};
use crate::infrastructure::submission::QuestionSubmitter;

const QUESTIONS_SCHEMA: &str = include_str!("../../../resources/questions/schema.sql");

/// Local question bank. Re-importing a test part replaces its questions.
pub struct SqliteQuestionStore {
    pool: SqlitePool,
}

impl SqliteQuestionStore {
    pub async fn connect(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let db_url = db_path_to_url(db_path)?;
        let options = SqliteConnectOptions::from_str(&db_url)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to parse question database URL: {e}"))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to question database: {e}"))
            })?;

        Self::with_pool(pool).await
    }

    /// Single-connection in-memory store; the database lives as long as that connection
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse memory URL: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to open memory database: {e}")))?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        apply_schema(&pool).await?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Question database health check failed: {e}"))
            })?;

        Ok(Self { pool })
    }

    /// Questions stored for one test part, in question order
    pub async fn list_questions(&self, test_id: &str, part_number: u32) -> Result<Vec<QuestionRecord>> {
        let rows = sqlx::query_as::<_, QuestionEntity>(
            "SELECT question_number, section, question_type, question_text, options_json,
                    choices_json, correct_answer, explanation, cambridge_book, section_number,
                    part_number
             FROM questions
             WHERE test_id = ? AND part_number = ?
             ORDER BY question_number ASC",
        )
        .bind(test_id)
        .bind(part_number as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list questions: {e}")))?;

        rows.into_iter().map(QuestionEntity::into_record).collect()
    }

    /// Number of import batches recorded for a test
    pub async fn count_imports(&self, test_id: &str) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM question_imports WHERE test_id = ?")
            .bind(test_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count imports: {e}")))
    }
}

#[async_trait]
impl QuestionSubmitter for SqliteQuestionStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn submit(&self, batch: &SubmissionBatch) -> Result<SubmissionReceipt> {
        let target = &batch.target;
        let part_number = target.part_number as i64;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {e}")))?;

        let replaced = sqlx::query("DELETE FROM questions WHERE test_id = ? AND part_number = ?")
            .bind(&target.test_id)
            .bind(part_number)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to clear previous questions: {e}")))?
            .rows_affected();

        sqlx::query(
            "INSERT INTO question_imports
                (import_id, test_id, test_type, module, part_number, question_count, submitted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(batch.import_id.to_string())
        .bind(&target.test_id)
        .bind(&target.test_type)
        .bind(target.module.as_str())
        .bind(part_number)
        .bind(batch.questions.len() as i64)
        .bind(batch.submitted_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to record import: {e}")))?;

        for question in &batch.questions {
            let (options_json, choices_json) = encode_answer_set(question.answer_set.as_ref())?;

            sqlx::query(
                "INSERT INTO questions
                    (import_id, test_id, test_type, part_number, question_number, section,
                     question_type, question_text, options_json, choices_json, correct_answer,
                     explanation, cambridge_book, section_number)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(batch.import_id.to_string())
            .bind(&target.test_id)
            .bind(&target.test_type)
            .bind(part_number)
            .bind(question.question_number as i64)
            .bind(&question.section)
            .bind(&question.question_type)
            .bind(&question.question_text)
            .bind(options_json)
            .bind(choices_json)
            .bind(&question.correct_answer)
            .bind(&question.explanation)
            .bind(&question.cambridge_book)
            .bind(question.section_number.map(|n| n as i64))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to insert question {}: {e}",
                    question.question_number
                ))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit import: {e}")))?;

        tracing::debug!(
            test_id = %target.test_id,
            part_number,
            replaced,
            stored = batch.questions.len(),
            "Stored question batch"
        );

        Ok(SubmissionReceipt {
            import_id: batch.import_id,
            stored: batch.questions.len(),
            backend: self.backend_name().to_string(),
        })
    }
}

fn db_path_to_url(db_path: &Path) -> Result<String> {
    let db_path_str = db_path.to_str().ok_or_else(|| {
        AppError::DatabaseError("Question database path is not valid UTF-8".to_string())
    })?;
    Ok(format!("sqlite://{}", db_path_str.replace('\\', "/")))
}

async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    for statement in QUESTIONS_SCHEMA.split(';') {
        let stmt = statement.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to apply question schema statement: {e}"))
            })?;
    }
    Ok(())
}

fn encode_answer_set(answer_set: Option<&AnswerSet>) -> Result<(Option<String>, Option<String>)> {
    let encode = |value: serde_json::Result<String>| {
        value.map_err(|e| AppError::Internal(format!("Failed to encode answer set: {e}")))
    };
    match answer_set {
        Some(AnswerSet::Options(options)) => Ok((Some(encode(serde_json::to_string(options))?), None)),
        Some(AnswerSet::Choices(choices)) => Ok((None, Some(encode(serde_json::to_string(choices))?))),
        None => Ok((None, None)),
    }
}

// Internal entity for database mapping
#[derive(sqlx::FromRow)]
struct QuestionEntity {
    question_number: i64,
    section: String,
    question_type: String,
    question_text: String,
    options_json: Option<String>,
    choices_json: Option<String>,
    correct_answer: String,
    explanation: String,
    cambridge_book: Option<String>,
    section_number: Option<i64>,
    part_number: i64,
}

impl QuestionEntity {
    fn into_record(self) -> Result<QuestionRecord> {
        let decode_err =
            |e: serde_json::Error| AppError::DatabaseError(format!("Corrupt answer set: {e}"));

        let answer_set = match (self.options_json, self.choices_json) {
            (Some(options), _) => Some(AnswerSet::Options(
                serde_json::from_str::<Vec<String>>(&options).map_err(decode_err)?,
            )),
            (None, Some(choices)) => Some(AnswerSet::Choices(
                serde_json::from_str::<BTreeMap<String, String>>(&choices).map_err(decode_err)?,
            )),
            (None, None) => None,
        };

        Ok(QuestionRecord {
            question_number: self.question_number as u32,
            section: self.section,
            question_type: self.question_type,
            question_text: self.question_text,
            answer_set,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            cambridge_book: self.cambridge_book,
            section_number: self.section_number.map(|n| n as u32),
            part_number: self.part_number as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::TestModule;
    use crate::domain::submission::SubmissionTarget;

    fn question(number: u32, text: &str, answer_set: Option<AnswerSet>) -> QuestionRecord {
        QuestionRecord {
            question_number: number,
            section: "Reading".to_string(),
            question_type: "Multiple Choice".to_string(),
            question_text: text.to_string(),
            answer_set,
            correct_answer: "A".to_string(),
            explanation: String::new(),
            cambridge_book: Some("Cambridge 17".to_string()),
            section_number: Some(1),
            part_number: 2,
        }
    }

    fn target(part_number: u32) -> SubmissionTarget {
        SubmissionTarget {
            test_id: "test-17-1".to_string(),
            test_type: "reading".to_string(),
            part_number,
            module: TestModule::Ielts,
        }
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let store = SqliteQuestionStore::in_memory().await.unwrap();

        let mut pairs = BTreeMap::new();
        pairs.insert("A".to_string(), "1".to_string());
        let questions = vec![
            question(1, "First", Some(AnswerSet::Options(vec!["A".into(), "B".into()]))),
            question(2, "Second", Some(AnswerSet::Choices(pairs))),
            question(3, "Third", None),
        ];
        let batch = SubmissionBatch::new(target(2), questions.clone());

        let receipt = store.submit(&batch).await.unwrap();
        assert_eq!(receipt.stored, 3);
        assert_eq!(receipt.backend, "sqlite");
        assert_eq!(receipt.import_id, batch.import_id);

        let stored = store.list_questions("test-17-1", 2).await.unwrap();
        assert_eq!(stored, questions);
    }

    #[tokio::test]
    async fn test_reimport_replaces_part() {
        let store = SqliteQuestionStore::in_memory().await.unwrap();

        let first = SubmissionBatch::new(
            target(1),
            vec![question(1, "Old 1", None), question(2, "Old 2", None)],
        );
        store.submit(&first).await.unwrap();

        let other_part = SubmissionBatch::new(target(2), vec![question(1, "Part two", None)]);
        store.submit(&other_part).await.unwrap();

        let second = SubmissionBatch::new(target(1), vec![question(1, "New 1", None)]);
        store.submit(&second).await.unwrap();

        let part_one = store.list_questions("test-17-1", 1).await.unwrap();
        assert_eq!(part_one.len(), 1);
        assert_eq!(part_one[0].question_text, "New 1");

        let part_two = store.list_questions("test-17-1", 2).await.unwrap();
        assert_eq!(part_two.len(), 1);

        assert_eq!(store.count_imports("test-17-1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_test_is_empty() {
        let store = SqliteQuestionStore::in_memory().await.unwrap();
        assert!(store.list_questions("missing", 1).await.unwrap().is_empty());
    }

    #[test]
    fn test_db_path_to_url() {
        let url = db_path_to_url(Path::new("data/questions.db")).unwrap();
        assert_eq!(url, "sqlite://data/questions.db");
    }
}
