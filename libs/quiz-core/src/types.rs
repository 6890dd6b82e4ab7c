//! Core types for quiz questions.

use crate::detector::CodeLanguage;
use crate::tags::normalize_tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Question difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl Difficulty {
    /// Convert to numeric value (1-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Create from numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("difficulty must be 1, 2 or 3, got {}", value))
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.to_value()
    }
}

/// A single answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl Answer {
    /// Create an answer with a fresh identifier.
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            is_correct,
        }
    }
}

/// A quiz question record.
///
/// `id` is `None` until the question has been saved for the first time.
/// Answer order is significant: it decides the display label and the order
/// of sections in the markdown document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_language: Option<CodeLanguage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_code_formatting: Option<bool>,
}

impl Question {
    /// Create an unsaved question with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            question: String::new(),
            answers: Vec::new(),
            difficulty: Difficulty::default(),
            tags: BTreeSet::new(),
            markdown_content: None,
            code_language: None,
            enable_code_formatting: None,
        }
    }

    /// Whether the question has never been saved.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Return the id, assigning a new one first if the question is unsaved.
    pub fn ensure_id(&mut self) -> &str {
        self.id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .as_str()
    }

    /// Add a tag. Returns false if the tag was empty or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        match normalize_tag(tag) {
            Some(tag) => self.tags.insert(tag),
            None => false,
        }
    }

    /// Answers flagged correct, in display order.
    pub fn correct_answers(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter().filter(|a| a.is_correct)
    }

    /// Display label for the answer at `index`: A, B, ... Z, AA, AB, ...
    pub fn answer_label(index: usize) -> String {
        let mut label = Vec::new();
        let mut n = index + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            label.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        label.reverse();
        String::from_utf8_lossy(&label).into_owned()
    }

    /// Whether fenced code blocks get their language tags normalized.
    pub fn code_formatting_enabled(&self) -> bool {
        self.enable_code_formatting.unwrap_or(true)
    }
}
