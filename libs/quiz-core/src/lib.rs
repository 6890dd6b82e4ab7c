//! Core quiz question library.
//!
//! Provides:
//! - Question, Answer and Difficulty types
//! - Markdown codec (parse and generate) for question documents
//! - Code fence language detection (HTML vs JavaScript)
//! - Tag registry shared across documents

pub mod detector;
pub mod error;
pub mod fence;
pub mod generator;
mod marker;
pub mod parser;
pub mod tags;
pub mod types;

pub use detector::{detect, CodeLanguage};
pub use error::{ParseError, Result};
pub use fence::normalize_fences;
pub use generator::generate;
pub use parser::{parse, ParseOptions, ParsedQuestion};
pub use tags::{merge as merge_tags, TagRegistry};
pub use types::{Answer, Difficulty, Question};
