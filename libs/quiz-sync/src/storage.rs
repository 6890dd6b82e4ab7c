//! File storage for question documents.
//!
//! The queue only talks to [`QuestionStorage`]; the desktop build plugs in
//! [`LocalStorage`], tests plug in an in-memory recorder.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::naming::is_document;

/// Storage collaborator that persists documents by file name.
#[async_trait]
pub trait QuestionStorage: Send + Sync {
    /// Write a file, creating or overwriting it.
    async fn write_file(&self, name: &str, content: &str) -> Result<(), StorageError>;

    /// Delete a file. Returns [`StorageError::NotFound`] if it does not exist.
    async fn delete_file(&self, name: &str) -> Result<(), StorageError>;

    /// Read a file's contents.
    async fn read_file(&self, name: &str) -> Result<String, StorageError>;

    /// List the names of all stored documents.
    async fn list_files(&self) -> Result<Vec<String>, StorageError>;
}

/// Documents stored as files in a single directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a storage rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(|c: char| c == '/' || c == '\\')
            || name.contains('\0');
        if invalid {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl QuestionStorage for LocalStorage {
    async fn write_file(&self, name: &str, content: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, content).await?;

        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    async fn delete_file(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn read_file(&self, name: &str) -> Result<String, StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    async fn list_files(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_document(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}
