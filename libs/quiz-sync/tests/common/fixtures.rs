//! Test fixtures for generating question data.

use quiz_core::{Answer, Difficulty, Question};

/// A saved question with two answers, the second one correct.
pub fn question(id: &str, title: &str) -> Question {
    let mut question = Question::new(title);
    question.id = Some(id.to_string());
    question.question = format!("Prompt for {}", title);
    question.difficulty = Difficulty::Medium;
    question.add_tag("javascript");
    question.answers = vec![Answer::new("Wrong", false), Answer::new("Right", true)];
    question
}

/// Same question with a different prompt, to tell versions apart.
pub fn edited(question: &Question, prompt: &str) -> Question {
    let mut question = question.clone();
    question.question = prompt.to_string();
    question
}

/// Markdown for a document with the given prompt and tags.
pub fn document(prompt: &str, tags: &str) -> String {
    format!(
        "---\ndifficulty: 2\ntags: {}\n---\n\n{}\n\n#\nno\n\n# Correct\nyes",
        tags, prompt
    )
}
