use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::answer_set::AnswerSet;

/// One imported question, ready for preview and storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Position among imported rows, starting at 1
    pub question_number: u32,

    pub section: String,

    /// Canonical type from the registry, never the raw label
    pub question_type: String,

    pub question_text: String,

    /// Serialized as an `options` or `choices` key, absent when there are none
    #[serde(flatten)]
    pub answer_set: Option<AnswerSet>,

    pub correct_answer: String,

    pub explanation: String,

    pub cambridge_book: Option<String>,

    pub section_number: Option<u32>,

    pub part_number: u32,
}

impl QuestionRecord {
    pub fn options(&self) -> Option<&[String]> {
        match &self.answer_set {
            Some(AnswerSet::Options(options)) => Some(options),
            _ => None,
        }
    }

    pub fn choices(&self) -> Option<&BTreeMap<String, String>> {
        match &self.answer_set {
            Some(AnswerSet::Choices(choices)) => Some(choices),
            _ => None,
        }
    }
}
