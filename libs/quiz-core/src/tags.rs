//! Tag normalization and the registry of every tag seen across documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trim a tag. Empty tags are dropped, as are tags containing a comma or a
/// line break, which the single-line `tags:` field cannot hold.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() || tag.contains(is_separator) {
        None
    } else {
        Some(tag.to_string())
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | '\n' | '\r')
}

/// Split a comma-separated tag list, trimming pieces and dropping empty ones
/// and duplicates.
pub fn split_tags(list: &str) -> BTreeSet<String> {
    list.split(',').filter_map(normalize_tag).collect()
}

/// Join tags the way the front matter stores them. Tags that
/// [`normalize_tag`] would reject are left out.
pub fn join_tags<'a>(tags: impl IntoIterator<Item = &'a String>) -> String {
    tags.into_iter()
        .filter_map(|t| normalize_tag(t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Union two tag lists into a sorted, de-duplicated sequence.
///
/// Comparison is case-sensitive; only exact duplicates and empty strings are
/// dropped.
pub fn merge<I, J, S, T>(existing: I, new: J) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    J: IntoIterator<Item = T>,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut registry = TagRegistry::new();
    registry.extend(existing);
    registry.extend(new);
    registry.into_vec()
}

/// The de-duplicated, sorted universe of tags.
///
/// Persisted tags seed the registry; tags found in markdown documents are
/// merged in as documents load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagRegistry {
    tags: BTreeSet<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with persisted tags.
    pub fn seeded<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        registry.extend(tags);
        registry
    }

    /// Add a single tag. Returns true if it was not already known.
    pub fn insert(&mut self, tag: &str) -> bool {
        match normalize_tag(tag) {
            Some(tag) => self.tags.insert(tag),
            None => false,
        }
    }

    /// Merge tags in, returning how many were new.
    pub fn extend<I, S>(&mut self, tags: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .filter(|tag| self.insert(tag.as_ref()))
            .count()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tags.into_iter().collect()
    }
}
