//! Debounced, coalescing write queue for question documents.
//!
//! Every enqueue replaces any still-pending version of the same question, so
//! a burst of edits collapses into one write. The queue drains once no new
//! enqueue has arrived for the configured quiet period. Each drained entry
//! runs on its own task: delete the file of the previous title (on rename),
//! then write the freshly generated document. An id is never written by two
//! tasks at once; an enqueue that arrives while its id is in flight waits
//! for the next drain.

use chrono::{DateTime, Utc};
use quiz_core::{generate, Question};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::naming::file_name_for_title;
use crate::storage::QuestionStorage;

const EVENT_CAPACITY: usize = 64;

/// Settled and failed outcomes kept for [`SyncQueue::state_of`]; the oldest
/// are forgotten first.
const OUTCOME_CAPACITY: usize = 1024;

/// Lifecycle of a queued entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum EntryState {
    /// Waiting for the quiet period to elapse.
    Pending,
    /// Delete/write in flight.
    Draining,
    /// Last write succeeded.
    Settled,
    /// Last write or delete failed. The entry was dropped; nothing retries it.
    Failed { error: SyncError },
}

/// Outcome of one drained entry, broadcast to subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct SyncEvent {
    pub id: String,
    pub file_name: String,
    pub state: EntryState,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
struct PendingEntry {
    question: Question,
    previous_title: Option<String>,
}

struct QueueState {
    pending: HashMap<String, PendingEntry>,
    draining: HashSet<String>,
    /// Ids removed while their write was in flight.
    removed: HashSet<String>,
    outcomes: HashMap<String, EntryState>,
    outcome_order: VecDeque<String>,
    outcome_capacity: usize,
}

impl Default for QueueState {
    fn default() -> Self {
        Self::with_outcome_capacity(OUTCOME_CAPACITY)
    }
}

impl QueueState {
    fn with_outcome_capacity(outcome_capacity: usize) -> Self {
        Self {
            pending: HashMap::new(),
            draining: HashSet::new(),
            removed: HashSet::new(),
            outcomes: HashMap::new(),
            outcome_order: VecDeque::new(),
            outcome_capacity,
        }
    }

    fn record_outcome(&mut self, id: &str, state: EntryState) {
        if self.outcomes.insert(id.to_string(), state).is_some() {
            self.outcome_order.retain(|known| known != id);
        }
        self.outcome_order.push_back(id.to_string());

        while self.outcome_order.len() > self.outcome_capacity {
            if let Some(oldest) = self.outcome_order.pop_front() {
                self.outcomes.remove(&oldest);
            }
        }
    }

    fn forget_outcome(&mut self, id: &str) {
        if self.outcomes.remove(id).is_some() {
            self.outcome_order.retain(|known| known != id);
        }
    }
}

/// Inner state shared across clones.
struct SyncQueueInner {
    storage: Arc<dyn QuestionStorage>,
    state: Mutex<QueueState>,
    timer: mpsc::UnboundedSender<()>,
    events: broadcast::Sender<SyncEvent>,
    settled: watch::Sender<u64>,
}

/// Debounced write queue.
///
/// Clone-able; all clones share one queue. Must be created inside a tokio
/// runtime because the quiet-period timer runs as a task.
#[derive(Clone)]
pub struct SyncQueue {
    inner: Arc<SyncQueueInner>,
}

impl SyncQueue {
    pub fn new(storage: Arc<dyn QuestionStorage>, config: &SyncConfig) -> Self {
        Self::with_quiet_period(storage, config.quiet_period())
    }

    pub fn with_quiet_period(storage: Arc<dyn QuestionStorage>, quiet_period: Duration) -> Self {
        let (timer, signals) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (settled, _) = watch::channel(0);

        let inner = Arc::new(SyncQueueInner {
            storage,
            state: Mutex::new(QueueState::default()),
            timer,
            events,
            settled,
        });

        tokio::spawn(run_timer(Arc::downgrade(&inner), signals, quiet_period));

        Self { inner }
    }

    /// Queue the latest version of a question for writing.
    ///
    /// `previous_title` is the title the question was last persisted under;
    /// when it differs from the current title the old file is deleted before
    /// the new one is written. Replacing a still-pending entry keeps that
    /// entry's previous title, since its file is the one actually on disk.
    pub fn enqueue(&self, question: Question, previous_title: Option<String>) -> Result<()> {
        let id = question.id.clone().ok_or(SyncError::MissingId)?;
        if question.title.trim().is_empty() {
            return Err(SyncError::EmptyTitle);
        }

        {
            let mut state = self.inner.lock_state();
            let previous_title = match state.pending.remove(&id) {
                Some(superseded) => {
                    tracing::debug!("Coalesced pending update for question {}", id);
                    superseded.previous_title.or(previous_title)
                }
                None => previous_title,
            };
            state.pending.insert(
                id,
                PendingEntry {
                    question,
                    previous_title,
                },
            );
        }

        // The timer only stops once the queue itself is gone.
        let _ = self.inner.timer.send(());
        Ok(())
    }

    /// Delete a document file. A file that is already absent counts as deleted.
    pub async fn delete_file(&self, name: &str) -> Result<()> {
        self.inner.delete_document(name).await
    }

    /// Drop any pending write for a question and delete its document.
    ///
    /// If a pending rename never reached storage, the file under the old
    /// title is deleted too. A write already in flight is allowed to
    /// finish, then its file is deleted and no outcome is reported for it.
    pub async fn remove(&self, id: &str, title: &str) -> Result<()> {
        let superseded = {
            let mut state = self.inner.lock_state();
            state.forget_outcome(id);
            if state.draining.contains(id) {
                state.removed.insert(id.to_string());
            }
            state.pending.remove(id)
        };

        let current = file_name_for_title(title);
        if let Some(previous) = superseded.and_then(|entry| entry.previous_title) {
            let old = file_name_for_title(&previous);
            if old != current {
                self.inner.delete_document(&old).await?;
            }
        }

        self.inner.delete_document(&current).await
    }

    /// Drain immediately, skipping the quiet period, and wait until every
    /// entry (including ones re-queued while in flight) has settled.
    pub async fn flush(&self) {
        let mut settled = self.inner.settled.subscribe();
        loop {
            self.inner.start_drain();
            if self.inner.is_idle() {
                return;
            }
            if settled.changed().await.is_err() {
                return;
            }
        }
    }

    /// Subscribe to per-entry outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// Current state of a question's entry, if the queue has seen it.
    pub fn state_of(&self, id: &str) -> Option<EntryState> {
        let state = self.inner.lock_state();
        if state.pending.contains_key(id) {
            Some(EntryState::Pending)
        } else if state.draining.contains(id) {
            Some(EntryState::Draining)
        } else {
            state.outcomes.get(id).cloned()
        }
    }

    /// Number of entries waiting for the quiet period.
    pub fn pending_count(&self) -> usize {
        self.inner.lock_state().pending.len()
    }

    /// Whether any write is in flight.
    pub fn is_draining(&self) -> bool {
        !self.inner.lock_state().draining.is_empty()
    }
}

impl SyncQueueInner {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_idle(&self) -> bool {
        let state = self.lock_state();
        state.pending.is_empty() && state.draining.is_empty()
    }

    /// Move every pending entry whose id is not already in flight to its own
    /// drain task.
    fn start_drain(self: &Arc<Self>) {
        let batch = {
            let mut guard = self.lock_state();
            let state = &mut *guard;

            let ready: Vec<String> = state
                .pending
                .keys()
                .filter(|id| !state.draining.contains(*id))
                .cloned()
                .collect();

            let mut batch = Vec::with_capacity(ready.len());
            for id in ready {
                if let Some(entry) = state.pending.remove(&id) {
                    state.draining.insert(id.clone());
                    batch.push((id, entry));
                }
            }
            batch
        };

        if !batch.is_empty() {
            tracing::debug!("Draining {} queued question(s)", batch.len());
        }

        for (id, entry) in batch {
            let inner = Arc::clone(self);
            tokio::spawn(async move {
                inner.drain_entry(id, entry).await;
            });
        }
    }

    async fn drain_entry(&self, id: String, entry: PendingEntry) {
        let file_name = file_name_for_title(&entry.question.title);
        let result = self.persist(&entry, &file_name).await;

        let state = match result {
            Ok(()) => {
                tracing::info!("Saved question {} to {}", id, file_name);
                EntryState::Settled
            }
            Err(error) => {
                tracing::warn!("Failed to save question {}: {}", id, error);
                EntryState::Failed { error }
            }
        };

        // Still marked in flight here, so a re-enqueue cannot race the cleanup.
        let removed = self.lock_state().removed.remove(&id);
        if removed {
            // The question was removed mid-write; take the file back out.
            if let Err(error) = self.delete_document(&file_name).await {
                tracing::warn!("Failed to clean up removed question {}: {}", id, error);
            } else {
                tracing::info!("Discarded write of removed question {}", id);
            }
        }

        let requeued = {
            let mut guard = self.lock_state();
            guard.draining.remove(&id);
            guard.removed.remove(&id);
            if !removed {
                guard.record_outcome(&id, state.clone());
            }
            guard.pending.contains_key(&id)
        };

        if !removed {
            let _ = self.events.send(SyncEvent {
                id,
                file_name,
                state,
                at: Utc::now(),
            });
        }
        self.settled.send_modify(|count| *count += 1);

        // A newer version arrived while this one was in flight.
        if requeued {
            let _ = self.timer.send(());
        }
    }

    /// Delete the old file on rename, then write the new one.
    ///
    /// The write is attempted even when the delete fails so the latest edit
    /// is never lost; a write error takes precedence in the result.
    async fn persist(&self, entry: &PendingEntry, file_name: &str) -> Result<()> {
        let question = &entry.question;

        let mut delete_result = Ok(());
        if let Some(previous) = entry.previous_title.as_deref() {
            if previous != question.title {
                delete_result = self.delete_document(&file_name_for_title(previous)).await;
            }
        }

        let content = generate(
            question,
            question.code_formatting_enabled(),
            question.code_language,
        );

        self.write_document(file_name, &content).await?;
        delete_result
    }

    async fn write_document(&self, file_name: &str, content: &str) -> Result<()> {
        self.storage
            .write_file(file_name, content)
            .await
            .map_err(|e| SyncError::StorageWriteFailed {
                file: file_name.to_string(),
                message: e.to_string(),
            })
    }

    async fn delete_document(&self, name: &str) -> Result<()> {
        match self.storage.delete_file(name).await {
            Ok(()) => {
                tracing::info!("Deleted {}", name);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} already absent", name);
                Ok(())
            }
            Err(e) => Err(SyncError::StorageDeleteFailed {
                file: name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Quiet-period timer. Each signal restarts the countdown; when it runs out
/// the queue drains. Exits once the queue has been dropped.
async fn run_timer(
    inner: Weak<SyncQueueInner>,
    mut signals: mpsc::UnboundedReceiver<()>,
    quiet_period: Duration,
) {
    while signals.recv().await.is_some() {
        loop {
            match tokio::time::timeout(quiet_period, signals.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        let Some(queue) = inner.upgrade() else {
            return;
        };
        queue.start_drain();
    }
}
