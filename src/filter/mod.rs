mod binary;
mod language;
mod patterns;

pub use binary::{is_binary_by_content, is_binary_by_extension};
pub use language::get_language_hint;
pub use patterns::{compile_patterns, matches_any_pattern, parse_pattern_input, validate_patterns};
