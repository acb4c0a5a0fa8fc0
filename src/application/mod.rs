pub mod use_cases;

pub use use_cases::question_import::{ImportPreview, QuestionImportUseCase, SampleTemplate};
