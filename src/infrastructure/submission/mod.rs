// ============================================================
// QUESTION SUBMISSION
// ============================================================
// Hand a validated batch of questions to a storage backend

mod http;

pub use http::HttpQuestionSubmitter;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::error::{AppError, Result};
use crate::domain::submission::{SubmissionBatch, SubmissionReceipt};
use crate::infrastructure::config::{StorageBackend, StorageConfig};
use crate::infrastructure::db::SqliteQuestionStore;

#[async_trait]
pub trait QuestionSubmitter: Send + Sync {
    /// Short name reported in receipts and logs
    fn backend_name(&self) -> &'static str;

    /// Store the whole batch. A failure leaves nothing half-written on our side.
    async fn submit(&self, batch: &SubmissionBatch) -> Result<SubmissionReceipt>;
}

/// Build the submitter selected by `storage.backend`
pub async fn build_submitter(config: &StorageConfig) -> Result<Arc<dyn QuestionSubmitter>> {
    match config.backend {
        StorageBackend::Sqlite => {
            let store = SqliteQuestionStore::connect(&config.sqlite_path).await?;
            tracing::info!(path = %config.sqlite_path.display(), "Using SQLite question store");
            Ok(Arc::new(store))
        }
        StorageBackend::Http => {
            let base_url = config.http.base_url.clone().ok_or_else(|| {
                AppError::ConfigError("storage.http.base_url is not set".to_string())
            })?;
            tracing::info!(base_url = %base_url, "Using HTTP question submitter");
            let submitter = HttpQuestionSubmitter::new(
                base_url,
                config.http.api_key.clone(),
                Duration::from_secs(config.http.timeout_secs),
            )?;
            Ok(Arc::new(submitter))
        }
    }
}
