use serde::{Deserialize, Serialize};
use validator::Validate;

use super::question_type::{Skill, TestModule};

pub const DEFAULT_PART_NUMBER: u32 = 1;

/// Caller-supplied parameters of one import
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportContext {
    #[serde(default)]
    pub module: TestModule,

    pub skill: Skill,

    /// Cambridge book the questions come from, e.g. "Cambridge 18"
    #[serde(default)]
    #[validate(length(min = 1, max = 120))]
    pub cambridge_book: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1))]
    pub section_number: Option<u32>,

    /// Defaults to 1 when absent
    #[serde(default)]
    #[validate(range(min = 1))]
    pub part_number: Option<u32>,
}

impl ImportContext {
    pub fn new(module: TestModule, skill: Skill) -> Self {
        Self {
            module,
            skill,
            cambridge_book: None,
            section_number: None,
            part_number: None,
        }
    }

    pub fn with_cambridge_book(mut self, book: impl Into<String>) -> Self {
        self.cambridge_book = Some(book.into());
        self
    }

    pub fn with_section_number(mut self, section: u32) -> Self {
        self.section_number = Some(section);
        self
    }

    pub fn with_part_number(mut self, part: u32) -> Self {
        self.part_number = Some(part);
        self
    }

    pub fn effective_part_number(&self) -> u32 {
        self.part_number.unwrap_or(DEFAULT_PART_NUMBER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_number_defaults_to_one() {
        let ctx = ImportContext::new(TestModule::Ielts, Skill::Reading);
        assert_eq!(ctx.effective_part_number(), 1);
        assert_eq!(ctx.with_part_number(3).effective_part_number(), 3);
    }

    #[test]
    fn test_zero_part_number_is_rejected() {
        let ctx = ImportContext::new(TestModule::Ielts, Skill::Listening).with_part_number(0);
        assert!(ctx.validate().is_err());
    }
}
