//! File naming for persisted questions.

const EXTENSION: &str = ".md";

/// File name for a question title: lower-cased, whitespace runs collapsed
/// to a single hyphen, `.md` appended.
pub fn file_name_for_title(title: &str) -> String {
    let slug = title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    format!("{}{}", slug, EXTENSION)
}

/// Best-effort title for a file name. Case and the original whitespace are
/// not recoverable, so hyphens simply become spaces.
pub fn title_from_file_name(name: &str) -> String {
    name.strip_suffix(EXTENSION)
        .unwrap_or(name)
        .replace('-', " ")
}

/// Whether a file name looks like a question document.
pub fn is_document(name: &str) -> bool {
    name.ends_with(EXTENSION)
}
