use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::QuestionSubmitter;
use crate::domain::error::{AppError, Result};
use crate::domain::submission::{SubmissionBatch, SubmissionReceipt};

/// Posts batches to the content service's import endpoint
pub struct HttpQuestionSubmitter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpQuestionSubmitter {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Url::parse(&base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid submission base URL '{}': {}", base_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn import_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}questions/import", self.base_url)
        } else {
            format!("{}/questions/import", self.base_url)
        }
    }
}

#[async_trait]
impl QuestionSubmitter for HttpQuestionSubmitter {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn submit(&self, batch: &SubmissionBatch) -> Result<SubmissionReceipt> {
        let mut request = self.client.post(self.import_url()).json(batch);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| AppError::UploadError {
            message: format!("Request failed: {}", e),
            details: None,
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(upload_error_from_body(status.as_u16(), &text));
        }

        Ok(SubmissionReceipt {
            import_id: batch.import_id,
            stored: stored_count(&text).unwrap_or(batch.questions.len()),
            backend: self.backend_name().to_string(),
        })
    }
}

/// Pull `error`/`details` out of a failed response body, falling back to the raw text
fn upload_error_from_body(status: u16, body: &str) -> AppError {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let message = json
        .as_ref()
        .and_then(|v| v["error"].as_str().or_else(|| v["message"].as_str()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("HTTP {}", status));

    let details = match &json {
        Some(v) => v["details"].as_str().map(|s| s.to_string()),
        None if !body.trim().is_empty() => Some(body.trim().to_string()),
        None => None,
    };

    AppError::UploadError { message, details }
}

fn stored_count(body: &str) -> Option<usize> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json["stored"]
        .as_u64()
        .or_else(|| json["count"].as_u64())
        .map(|n| n as usize)
}
