pub mod parser;
pub mod sanitizer;

pub use parser::parse_questions;
pub use sanitizer::{clean, clean_field_text};
