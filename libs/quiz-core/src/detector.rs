//! Language detection for unlabeled code fences.
//!
//! Only two dialects are supported: HTML markup and JavaScript. A block is
//! markup when it contains something shaped like an HTML start tag
//! (`<div>`, `<img src="x" />`, `<my-widget>`); everything else, including
//! empty input, is JavaScript.

use serde::{Deserialize, Serialize};

/// Supported fence languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    /// HTML markup.
    Html,
    /// JavaScript and JSX.
    JavaScript,
}

impl Default for CodeLanguage {
    fn default() -> Self {
        Self::JavaScript
    }
}

impl CodeLanguage {
    /// The fence tag written for this language.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::JavaScript => "javascript",
        }
    }

    /// Parse a fence tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "html" => Some(Self::Html),
            "js" | "javascript" | "jsx" => Some(Self::JavaScript),
            _ => None,
        }
    }
}

/// Whether a fence tag is missing or the generic `js` placeholder, in which
/// case the block's content decides the language.
pub fn needs_detection(tag: &str) -> bool {
    let tag = tag.trim();
    tag.is_empty() || tag.eq_ignore_ascii_case("js")
}

/// Classify a code block.
pub fn detect(code: &str) -> CodeLanguage {
    if contains_start_tag(code) {
        CodeLanguage::Html
    } else {
        CodeLanguage::JavaScript
    }
}

fn contains_start_tag(code: &str) -> bool {
    let bytes = code.as_bytes();

    for (idx, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'<') {
        let rest = &bytes[idx + 1..];
        if !rest.first().is_some_and(u8::is_ascii_alphabetic) {
            continue;
        }

        let name_len = rest
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
            .count();
        let after = &rest[name_len..];

        match after.first() {
            Some(b'>') => return true,
            Some(b'/') if after.get(1) == Some(&b'>') => return true,
            Some(b) if b.is_ascii_whitespace() => {
                // Attributes run until `>`; another `<` first means this was a comparison.
                let end = after.iter().position(|b| *b == b'>' || *b == b'<');
                if matches!(end, Some(pos) if after[pos] == b'>') {
                    return true;
                }
            }
            _ => {}
        }
    }

    false
}
