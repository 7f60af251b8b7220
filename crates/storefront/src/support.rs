//! Support chat threads kept in client storage.
//!
//! The backend issues thread ids and produces replies, but the transcript of
//! each thread lives only on the client until the thread is ended and sent
//! off for sentiment analysis.

use cloudmart_core::{ChatMessage, SupportThread, ThreadId};
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::storage::{RecordStore, StorageError, keys};

/// Errors from support thread operations.
#[derive(Debug, Error)]
pub enum SupportError {
    /// Storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No thread with the given id exists.
    #[error("support thread not found: {0}")]
    NotFound(ThreadId),

    /// The thread was ended and no longer accepts messages.
    #[error("support thread {0} has ended")]
    ThreadEnded(ThreadId),

    /// Every thread has ended, or none was started.
    #[error("no active support thread")]
    NoActiveThread,

    /// The backend failed to answer.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type alias for support thread operations.
pub type Result<T> = std::result::Result<T, SupportError>;

/// Owns the list of support threads, newest first.
#[derive(Debug, Clone)]
pub struct SupportThreads {
    store: RecordStore,
}

impl SupportThreads {
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// All threads, newest first. A corrupted record reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn threads(&self) -> Result<Vec<SupportThread>> {
        Ok(self
            .store
            .read_lenient::<Vec<SupportThread>>(keys::SUPPORT_THREADS)?
            .unwrap_or_default())
    }

    /// The thread with `id`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn thread(&self, id: &ThreadId) -> Result<Option<SupportThread>> {
        Ok(self.threads()?.into_iter().find(|t| &t.id == id))
    }

    /// The first thread that has not ended, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn first_active(&self) -> Result<Option<SupportThread>> {
        Ok(self.threads()?.into_iter().find(|t| !t.ended))
    }

    /// Record a new, empty thread issued by the backend and put it first.
    ///
    /// The thread is named `Thread <n>` where `n` is the new thread count.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn create(&self, id: ThreadId) -> Result<SupportThread> {
        let mut threads = self.threads()?;
        let thread = SupportThread {
            id,
            name: format!("Thread {}", threads.len() + 1),
            messages: Vec::new(),
            ended: false,
        };
        threads.insert(0, thread.clone());
        self.save(&threads)?;
        Ok(thread)
    }

    /// Append `messages` to the transcript of thread `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] for an unknown thread,
    /// [`SupportError::ThreadEnded`] for an ended one, or a storage error.
    pub fn append_messages(
        &self,
        id: &ThreadId,
        messages: impl IntoIterator<Item = ChatMessage>,
    ) -> Result<SupportThread> {
        self.modify(id, |thread| {
            if thread.ended {
                return Err(SupportError::ThreadEnded(thread.id.clone()));
            }
            thread.messages.extend(messages);
            Ok(())
        })
    }

    /// Mark thread `id` as ended.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] for an unknown thread, or a storage error.
    pub fn end(&self, id: &ThreadId) -> Result<SupportThread> {
        self.modify(id, |thread| {
            thread.ended = true;
            Ok(())
        })
    }

    /// Delete thread `id`. Deleting an unknown thread is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn delete(&self, id: &ThreadId) -> Result<()> {
        let mut threads = self.threads()?;
        threads.retain(|t| &t.id != id);
        self.save(&threads)
    }

    fn modify(
        &self,
        id: &ThreadId,
        change: impl FnOnce(&mut SupportThread) -> Result<()>,
    ) -> Result<SupportThread> {
        let mut threads = self.threads()?;
        let thread = threads
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| SupportError::NotFound(id.clone()))?;
        change(thread)?;
        let updated = thread.clone();
        self.save(&threads)?;
        Ok(updated)
    }

    fn save(&self, threads: &[SupportThread]) -> Result<()> {
        Ok(self.store.write(keys::SUPPORT_THREADS, threads)?)
    }
}

/// Support conversation over the active thread.
///
/// The local transcript only changes after the backend has answered, so a
/// failed request leaves the thread exactly as it was.
#[derive(Debug, Clone)]
pub struct SupportChat {
    threads: SupportThreads,
    api: ApiClient,
}

impl SupportChat {
    #[must_use]
    pub const fn new(threads: SupportThreads, api: ApiClient) -> Self {
        Self { threads, api }
    }

    #[must_use]
    pub const fn threads(&self) -> &SupportThreads {
        &self.threads
    }

    /// Open a thread with the backend and record it locally.
    ///
    /// # Errors
    ///
    /// Returns an API error if no thread id is issued, or a storage error.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<SupportThread> {
        let id = self.api.start_support_thread().await?;
        let thread = self.threads.create(id)?;
        tracing::info!(thread_id = %thread.id, name = %thread.name, "Support thread started");
        Ok(thread)
    }

    /// Send `message` on the first active thread and return the reply.
    ///
    /// Both the message and the reply are appended once the reply arrives.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NoActiveThread`], an API error (transcript
    /// untouched), or a storage error.
    #[instrument(skip(self, message))]
    pub async fn send(&self, message: &str) -> Result<String> {
        let thread = self.threads.first_active()?.ok_or(SupportError::NoActiveThread)?;
        let reply = self.api.send_support_message(&thread.id, message).await?;
        self.threads.append_messages(
            &thread.id,
            [ChatMessage::user(message), ChatMessage::ai(reply.as_str())],
        )?;
        Ok(reply)
    }

    /// Submit the first active thread for sentiment analysis, then end it.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NoActiveThread`], an API error (thread stays
    /// active), or a storage error.
    #[instrument(skip(self))]
    pub async fn end_active(&self) -> Result<SupportThread> {
        let thread = self.threads.first_active()?.ok_or(SupportError::NoActiveThread)?;
        self.api.analyze_sentiment(&thread).await?;
        let ended = self.threads.end(&thread.id)?;
        tracing::info!(
            thread_id = %ended.id,
            messages = ended.messages.len(),
            "Support thread ended"
        );
        Ok(ended)
    }
}
