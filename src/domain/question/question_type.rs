// ============================================================
// TEST MODULES, SKILLS AND QUESTION TYPES
// ============================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MULTIPLE_CHOICE: &str = "Multiple Choice";
pub const TRUE_FALSE_NOT_GIVEN: &str = "True/False/Not Given";
pub const YES_NO_NOT_GIVEN: &str = "Yes/No/Not Given";

/// Test family a question bank belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestModule {
    #[default]
    Ielts,
    Pte,
    Toefl,
    General,
}

impl TestModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestModule::Ielts => "ielts",
            TestModule::Pte => "pte",
            TestModule::Toefl => "toefl",
            TestModule::General => "general",
        }
    }
}

impl fmt::Display for TestModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ielts" => Ok(TestModule::Ielts),
            "pte" => Ok(TestModule::Pte),
            "toefl" => Ok(TestModule::Toefl),
            "general" => Ok(TestModule::General),
            other => Err(format!(
                "Unsupported module: '{}'. Supported: ielts, pte, toefl, general",
                other
            )),
        }
    }
}

/// Test section that narrows the allowed question types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Reading,
    Listening,
    Writing,
    Speaking,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Reading,
        Skill::Listening,
        Skill::Writing,
        Skill::Speaking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Reading => "reading",
            Skill::Listening => "listening",
            Skill::Writing => "writing",
            Skill::Speaking => "speaking",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reading" => Ok(Skill::Reading),
            "listening" => Ok(Skill::Listening),
            "writing" => Ok(Skill::Writing),
            "speaking" => Ok(Skill::Speaking),
            other => Err(format!(
                "Unsupported skill: '{}'. Supported: reading, listening, writing, speaking",
                other
            )),
        }
    }
}

/// A canonical question type as shown to operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTypeDefinition {
    /// Canonical identifier stored with each question
    pub value: String,
    pub label: String,
    pub description: String,
    pub tips: String,
}

impl QuestionTypeDefinition {
    pub fn new(value: &str, description: &str, tips: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
            description: description.to_string(),
            tips: tips.to_string(),
        }
    }
}
