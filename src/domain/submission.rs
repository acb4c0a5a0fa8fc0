use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::question::{QuestionRecord, TestModule, DEFAULT_PART_NUMBER};

/// Where a batch of imported questions is stored
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmissionTarget {
    #[validate(length(min = 1, max = 128))]
    pub test_id: String,

    /// e.g. "reading", "listening", "academic"
    #[validate(length(min = 1, max = 64))]
    pub test_type: String,

    #[serde(default = "default_part_number")]
    #[validate(range(min = 1))]
    pub part_number: u32,

    #[serde(default)]
    pub module: TestModule,
}

fn default_part_number() -> u32 {
    DEFAULT_PART_NUMBER
}

/// Payload handed to a submitter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionBatch {
    pub import_id: Uuid,
    #[serde(flatten)]
    pub target: SubmissionTarget,
    pub submitted_at: DateTime<Utc>,
    pub questions: Vec<QuestionRecord>,
}

impl SubmissionBatch {
    pub fn new(target: SubmissionTarget, questions: Vec<QuestionRecord>) -> Self {
        Self {
            import_id: Uuid::new_v4(),
            target,
            submitted_at: Utc::now(),
            questions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub import_id: Uuid,
    pub stored: usize,
    pub backend: String,
}
