// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Row tokenizing, document parsing, encoding detection, templates

mod csv_parser;
mod encoding;
mod row_tokenizer;
mod template_writer;

pub use csv_parser::CsvParser;
pub use encoding::{decode_bytes, DecodedText};
pub use row_tokenizer::tokenize_row;
pub use template_writer::{template_file_name, write_template};
