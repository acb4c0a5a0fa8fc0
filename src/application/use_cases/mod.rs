pub mod question_import;
