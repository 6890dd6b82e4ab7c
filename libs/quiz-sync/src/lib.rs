//! Persistence for quiz question documents.
//!
//! Provides:
//! - Debounced, coalescing sync queue that writes questions as markdown
//! - Storage trait plus a local directory implementation
//! - File naming derived from question titles
//! - Loading documents back into records and the tag registry
//! - Environment-driven configuration

pub mod config;
pub mod error;
pub mod loader;
pub mod naming;
pub mod queue;
pub mod storage;

pub use config::SyncConfig;
pub use error::{LoadError, Result, StorageError, SyncError};
pub use loader::{load_documents, LoadFailure, LoadReport, LoadedDocument};
pub use naming::{file_name_for_title, title_from_file_name};
pub use queue::{EntryState, SyncEvent, SyncQueue};
pub use storage::{LocalStorage, QuestionStorage};
