//! Markdown generation for question records.

use crate::detector::CodeLanguage;
use crate::fence::normalize_fences;
use crate::marker::{escape_markers, CORRECT_MARKER, MARKER};
use crate::tags::join_tags;
use crate::types::Question;

/// Render a question as a markdown document.
///
/// Sections are separated by exactly one blank line and the output carries
/// no leading or trailing blank lines. With `enable_code_formatting` set,
/// fences with a missing or generic `js` tag are relabelled by the
/// detector; the generator never adds fences of its own. Body lines that
/// would read as section markers are escaped with a backslash.
pub fn generate(
    question: &Question,
    enable_code_formatting: bool,
    default_language: Option<CodeLanguage>,
) -> String {
    let render = |text: &str| -> String {
        let text = text.trim();
        if enable_code_formatting {
            escape_markers(&normalize_fences(text, default_language))
        } else {
            escape_markers(text)
        }
    };

    let mut sections = Vec::with_capacity(question.answers.len() + 2);
    sections.push(front_matter(question));

    let prompt = render(&question.question);
    if !prompt.is_empty() {
        sections.push(prompt);
    }

    for answer in &question.answers {
        let marker = if answer.is_correct { CORRECT_MARKER } else { MARKER };
        let text = render(&answer.text);
        if text.is_empty() {
            sections.push(marker.to_string());
        } else {
            sections.push(format!("{}\n{}", marker, text));
        }
    }

    sections.join("\n\n")
}

fn front_matter(question: &Question) -> String {
    let tags = join_tags(&question.tags);
    let tags_line = if tags.is_empty() {
        "tags:".to_string()
    } else {
        format!("tags: {}", tags)
    };

    format!(
        "---\ndifficulty: {}\n{}\n---",
        question.difficulty.to_value(),
        tags_line
    )
}

impl Question {
    /// Render using the record's own formatting settings.
    pub fn to_markdown(&self) -> String {
        generate(self, self.code_formatting_enabled(), self.code_language)
    }

    /// Regenerate and cache the markdown in `markdown_content`.
    pub fn refresh_markdown(&mut self) -> &str {
        let markdown = self.to_markdown();
        self.markdown_content.insert(markdown).as_str()
    }
}
