//! Local directory storage, alone and behind the queue.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use quiz_core::{ParseOptions, Question, TagRegistry};
use quiz_sync::{
    load_documents, EntryState, LocalStorage, QuestionStorage, StorageError, SyncQueue,
};
use tempfile::TempDir;

use common::fixtures;

fn storage() -> (TempDir, LocalStorage) {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(dir.path().join("questions"));
    (dir, storage)
}

#[tokio::test]
async fn write_creates_directory_and_file() {
    let (_dir, storage) = storage();

    storage.write_file("closures.md", "body").await.unwrap();

    assert!(storage.root().is_dir());
    assert_eq!(storage.read_file("closures.md").await.unwrap(), "body");

    storage.write_file("closures.md", "replaced").await.unwrap();
    assert_eq!(storage.read_file("closures.md").await.unwrap(), "replaced");
}

#[tokio::test]
async fn list_returns_sorted_markdown_files_only() {
    let (_dir, storage) = storage();
    storage.write_file("b.md", "").await.unwrap();
    storage.write_file("a.md", "").await.unwrap();
    storage.write_file("notes.txt", "").await.unwrap();
    tokio::fs::create_dir(storage.root().join("nested.md"))
        .await
        .unwrap();

    assert_eq!(
        storage.list_files().await.unwrap(),
        vec!["a.md".to_string(), "b.md".to_string()]
    );
}

#[tokio::test]
async fn list_of_missing_directory_is_empty() {
    let (_dir, storage) = storage();
    assert!(storage.list_files().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_files_report_not_found() {
    let (_dir, storage) = storage();

    let err = storage.delete_file("ghost.md").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(ref name) if name == "ghost.md"));
    assert!(err.is_not_found());

    let err = storage.read_file("ghost.md").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn invalid_names_are_rejected() {
    let (_dir, storage) = storage();
    let err = storage.write_file("../escape.md", "x").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidName(_)));
}

#[tokio::test]
async fn queue_persists_and_renames_on_disk() {
    let (_dir, storage) = storage();
    let storage = Arc::new(storage);
    // Long quiet period; flush drives the writes.
    let queue = SyncQueue::with_quiet_period(storage.clone(), Duration::from_secs(60));

    let question = fixtures::question("q1", "Arrow Functions");
    queue.enqueue(question.clone(), None).unwrap();
    queue.flush().await;

    let written = storage.read_file("arrow-functions.md").await.unwrap();
    assert_eq!(written, question.to_markdown());

    let mut renamed = question.clone();
    renamed.title = "Lambda Syntax".to_string();
    queue
        .enqueue(renamed.clone(), Some(question.title.clone()))
        .unwrap();
    queue.flush().await;

    assert_eq!(
        storage.list_files().await.unwrap(),
        vec!["lambda-syntax.md".to_string()]
    );
    assert_eq!(queue.state_of("q1"), Some(EntryState::Settled));

    let reparsed = Question::from_markdown(
        &storage.read_file("lambda-syntax.md").await.unwrap(),
        &ParseOptions::new(renamed.title.clone()).with_id("q1"),
    )
    .unwrap();
    assert_eq!(reparsed.question, renamed.question);
    assert_eq!(reparsed.tags, renamed.tags);
    assert_eq!(reparsed.difficulty, renamed.difficulty);

    queue.remove("q1", &renamed.title).await.unwrap();
    assert!(storage.list_files().await.unwrap().is_empty());
}

#[tokio::test]
async fn queued_documents_load_back() {
    let (_dir, storage) = storage();
    let storage = Arc::new(storage);
    let queue = SyncQueue::with_quiet_period(storage.clone(), Duration::from_secs(60));

    queue
        .enqueue(fixtures::question("q1", "Hoisting"), None)
        .unwrap();
    queue
        .enqueue(fixtures::question("q2", "Temporal Dead Zone"), None)
        .unwrap();
    queue.flush().await;

    let mut registry = TagRegistry::new();
    let report = load_documents(storage.as_ref(), &mut registry)
        .await
        .unwrap();

    let titles: Vec<_> = report
        .documents
        .iter()
        .map(|doc| doc.question.title.as_str())
        .collect();
    assert_eq!(titles, vec!["hoisting", "temporal dead zone"]);
    assert_eq!(registry.into_vec(), vec!["javascript".to_string()]);
}
