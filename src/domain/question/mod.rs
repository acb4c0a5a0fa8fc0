// ============================================================
// QUESTION DOMAIN LAYER
// ============================================================
// Question records, test modules/skills and answer-choice rules
// No I/O, no async

mod answer_set;
mod import_context;
mod question_record;
mod question_type;

pub use answer_set::{derive_answer_set, AnswerSet};
pub use import_context::{ImportContext, DEFAULT_PART_NUMBER};
pub use question_record::QuestionRecord;
pub use question_type::{
    QuestionTypeDefinition, Skill, TestModule, MULTIPLE_CHOICE, TRUE_FALSE_NOT_GIVEN,
    YES_NO_NOT_GIVEN,
};
