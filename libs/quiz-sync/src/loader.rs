//! Loading persisted documents back into question records.

use quiz_core::{parse, ParseOptions, Question, TagRegistry};

use crate::error::{LoadError, StorageError};
use crate::naming::{is_document, title_from_file_name};
use crate::storage::QuestionStorage;

/// A document that parsed successfully.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub file_name: String,
    pub question: Question,
}

/// A document that could not be read or parsed.
#[derive(Debug)]
pub struct LoadFailure {
    pub file_name: String,
    pub error: LoadError,
}

/// Result of loading every document in storage.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<LoadedDocument>,
    pub failures: Vec<LoadFailure>,
    /// Tags seen in documents that the registry did not know yet.
    pub new_tags: usize,
}

/// Read and parse every markdown document in storage.
///
/// Tags found in the documents are merged into `registry`, which should
/// already hold the persisted tags. A file that fails to read or parse is
/// reported in the result and does not stop the others; only a failure to
/// list the storage aborts.
///
/// Documents do not carry an id, so every loaded question comes back unsaved
/// (`id: None`). Call [`Question::ensure_id`] or restore the id from the
/// caller's own records before handing it to the sync queue, which rejects
/// questions without one.
pub async fn load_documents(
    storage: &dyn QuestionStorage,
    registry: &mut TagRegistry,
) -> Result<LoadReport, StorageError> {
    let mut report = LoadReport::default();

    for file_name in storage.list_files().await? {
        if !is_document(&file_name) {
            continue;
        }

        match load_one(storage, &file_name).await {
            Ok(question) => {
                report.new_tags += registry.extend(&question.tags);
                report.documents.push(LoadedDocument {
                    file_name,
                    question,
                });
            }
            Err(error) => {
                tracing::warn!("Skipping {}: {}", file_name, error);
                report.failures.push(LoadFailure { file_name, error });
            }
        }
    }

    tracing::info!(
        "Loaded {} question document(s), {} failed",
        report.documents.len(),
        report.failures.len()
    );
    Ok(report)
}

async fn load_one(storage: &dyn QuestionStorage, file_name: &str) -> Result<Question, LoadError> {
    let content = storage.read_file(file_name).await?;
    let options = ParseOptions::new(title_from_file_name(file_name));
    Ok(parse(&content, &options)?.question)
}
