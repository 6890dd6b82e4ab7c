//! Common test utilities for sync integration tests.
//!
//! Provides an in-memory storage that records every operation and can be
//! told to fail or stall specific files.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use quiz_sync::{QuestionStorage, StorageError};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Storage operation as observed by the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write(String),
    Delete(String),
}

/// In-memory storage that records operations.
#[derive(Default)]
pub struct RecordingStorage {
    files: Mutex<BTreeMap<String, String>>,
    ops: Mutex<Vec<Op>>,
    failing_writes: Mutex<HashSet<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    write_delay: Mutex<Option<Duration>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a file without recording an operation.
    pub fn seed(&self, name: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_string());
    }

    pub fn fail_writes_to(&self, name: &str) {
        self.failing_writes.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_deletes_of(&self, name: &str) {
        self.failing_deletes.lock().unwrap().insert(name.to_string());
    }

    /// Make every write sleep before completing.
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Write(name) => Some(name),
                Op::Delete(_) => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Delete(name) => Some(name),
                Op::Write(_) => None,
            })
            .collect()
    }

    pub fn content(&self, name: &str) -> Option<String> {
        self.files.lock().unwrap().get(name).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl QuestionStorage for RecordingStorage {
    async fn write_file(&self, name: &str, content: &str) -> Result<(), StorageError> {
        self.ops.lock().unwrap().push(Op::Write(name.to_string()));

        let delay = *self.write_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_writes.lock().unwrap().contains(name) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }

        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_string());
        Ok(())
    }

    async fn delete_file(&self, name: &str) -> Result<(), StorageError> {
        self.ops.lock().unwrap().push(Op::Delete(name.to_string()));

        if self.failing_deletes.lock().unwrap().contains(name) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }

        match self.files.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(name.to_string())),
        }
    }

    async fn read_file(&self, name: &str) -> Result<String, StorageError> {
        self.content(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    async fn list_files(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.file_names())
    }
}
