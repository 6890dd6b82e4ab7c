//! Markdown parser for question documents.
//!
//! # Format
//! ```markdown
//! ---
//! difficulty: 2
//! tags: closures, scope
//! ---
//!
//! What does this log?
//!
//! #
//! undefined
//!
//! # Correct
//! 42
//! ```
//!
//! The front matter block is optional. When it is missing entirely the
//! question gets difficulty 1 and no tags. Section markers are lines that
//! are exactly `#` or `# Correct`; marker-looking lines inside a fenced
//! code block belong to the block, and a marker written with a leading
//! backslash (`\#`) is body text with the backslash removed.

use crate::detector::CodeLanguage;
use crate::error::{ParseError, Result};
use crate::fence::{fence_tag, is_fence_close, normalize_fences};
use crate::marker::{is_escaped_marker, marker_kind, unescape_marker};
use crate::tags::split_tags;
use crate::types::{Answer, Difficulty, Question};
use std::collections::BTreeSet;

const FRONT_MATTER_DELIMITER: &str = "---";

/// Identity and defaults the document itself does not carry.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub id: Option<String>,
    pub title: String,
    /// Language for untagged fences whose body is blank.
    pub default_language: Option<CodeLanguage>,
    /// `Some(false)` leaves fence tags exactly as written. Carried into the
    /// record so regenerating the document keeps the same setting.
    pub enable_code_formatting: Option<bool>,
}

impl ParseOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_default_language(mut self, language: CodeLanguage) -> Self {
        self.default_language = Some(language);
        self
    }

    pub fn with_code_formatting(mut self, enabled: bool) -> Self {
        self.enable_code_formatting = Some(enabled);
        self
    }
}

/// Result of parsing: the record plus the document with fence language tags
/// normalized. The record's `markdown_content` holds the same normalized text.
#[derive(Debug, Clone)]
pub struct ParsedQuestion {
    pub question: Question,
    pub normalized: String,
}

/// Parse a markdown document into a question.
pub fn parse(content: &str, options: &ParseOptions) -> Result<ParsedQuestion> {
    let normalized = if options.enable_code_formatting.unwrap_or(true) {
        normalize_fences(content, options.default_language)
    } else {
        content.to_string()
    };
    let lines: Vec<&str> = normalized.lines().collect();

    let (front_matter, body_start) = parse_front_matter(&lines)?;

    let mut parser = Parser::new();
    for line in &lines[body_start..] {
        parser.process_line(line);
    }
    let (prompt, answers) = parser.finish();

    let question = Question {
        id: options.id.clone(),
        title: options.title.clone(),
        question: prompt,
        answers,
        difficulty: front_matter.difficulty,
        tags: front_matter.tags,
        markdown_content: Some(normalized.clone()),
        code_language: options.default_language,
        enable_code_formatting: options.enable_code_formatting,
    };

    Ok(ParsedQuestion {
        question,
        normalized,
    })
}

impl Question {
    /// Parse a document, keeping only the record.
    pub fn from_markdown(content: &str, options: &ParseOptions) -> Result<Self> {
        parse(content, options).map(|parsed| parsed.question)
    }
}

#[derive(Debug, Default)]
struct FrontMatter {
    difficulty: Difficulty,
    tags: BTreeSet<String>,
}

/// Returns the front matter and the index of the first body line.
///
/// A block counts as present when the first non-blank line is `---` and a
/// closing `---` follows somewhere. A lone opening `---` is an ordinary
/// horizontal rule and the document simply has no front matter.
fn parse_front_matter(lines: &[&str]) -> Result<(FrontMatter, usize)> {
    let Some(open) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Ok((FrontMatter::default(), 0));
    };

    if !is_delimiter(lines[open]) {
        return Ok((FrontMatter::default(), 0));
    }
    let Some(close) = lines[open + 1..]
        .iter()
        .position(|l| is_delimiter(l))
        .map(|offset| open + 1 + offset)
    else {
        return Ok((FrontMatter::default(), 0));
    };

    // Line numbers in errors are 1-indexed.
    let difficulty_idx = open + 1;
    let tags_idx = open + 2;

    let difficulty_value = lines
        .get(difficulty_idx)
        .filter(|_| difficulty_idx < close)
        .and_then(|l| l.trim().strip_prefix("difficulty:"))
        .ok_or_else(|| ParseError::malformed(difficulty_idx + 1, "expected `difficulty:` line"))?;

    let tags_value = lines
        .get(tags_idx)
        .filter(|_| tags_idx < close)
        .and_then(|l| l.trim().strip_prefix("tags:"))
        .ok_or_else(|| ParseError::malformed(tags_idx + 1, "expected `tags:` line"))?;

    if close != tags_idx + 1 {
        return Err(ParseError::malformed(
            tags_idx + 2,
            "expected closing `---` after `tags:`",
        ));
    }

    let difficulty = parse_difficulty(difficulty_value, difficulty_idx + 1)?;
    let tags = split_tags(tags_value);

    Ok((FrontMatter { difficulty, tags }, close + 1))
}

fn parse_difficulty(value: &str, line: usize) -> Result<Difficulty> {
    let value = value.trim();
    value
        .parse::<u8>()
        .ok()
        .and_then(Difficulty::from_value)
        .ok_or_else(|| ParseError::InvalidDifficulty {
            line,
            value: value.to_string(),
        })
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == FRONT_MATTER_DELIMITER
}

struct Parser {
    prompt: Option<String>,
    answers: Vec<Answer>,
    current_correct: Option<bool>,
    buffer: Vec<String>,
    in_fence: bool,
}

impl Parser {
    fn new() -> Self {
        Self {
            prompt: None,
            answers: Vec::new(),
            current_correct: None,
            buffer: Vec::new(),
            in_fence: false,
        }
    }

    fn process_line(&mut self, line: &str) {
        match self.parse_line(line) {
            LineType::Marker { correct } => {
                self.flush_section();
                self.current_correct = Some(correct);
            }
            LineType::Fence => {
                self.in_fence = !self.in_fence;
                self.buffer.push(line.to_string());
            }
            LineType::Text => self.buffer.push(line.to_string()),
            LineType::Escaped => self.buffer.push(unescape_marker(line).to_string()),
        }
    }

    fn parse_line(&self, line: &str) -> LineType {
        if self.in_fence {
            return if is_fence_close(line) {
                LineType::Fence
            } else {
                LineType::Text
            };
        }
        if fence_tag(line).is_some() {
            return LineType::Fence;
        }

        match marker_kind(line) {
            Some(correct) => LineType::Marker { correct },
            None if is_escaped_marker(line) => LineType::Escaped,
            None => LineType::Text,
        }
    }

    fn flush_section(&mut self) {
        let content = self.buffer.join("\n").trim().to_string();
        self.buffer.clear();
        self.in_fence = false;

        match self.current_correct {
            None => self.prompt = Some(content),
            Some(is_correct) => {
                let position = self.answers.len() + 1;
                self.answers.push(Answer {
                    id: format!("answer-{}", position),
                    text: content,
                    is_correct,
                });
            }
        }
    }

    fn finish(mut self) -> (String, Vec<Answer>) {
        self.flush_section();
        (self.prompt.unwrap_or_default(), self.answers)
    }
}

enum LineType {
    Marker { correct: bool },
    Fence,
    Text,
    Escaped,
}
