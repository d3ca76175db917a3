//! Boundary to the storage session collaborator.
//!
//! The session is durable and possibly slow. Every operation is awaited as
//! an opaque asynchronous call; timeout policy, if any, belongs to the
//! implementor, not to this crate.

use async_trait::async_trait;
use futures_core::stream::BoxStream;

use crate::error::{SessionError, StreamError};
use crate::model::{Entry, EntryDetail, EntryInfo};

/// Incremental directory listing; each item is one directory name.
///
/// The producer is trusted to emit a consistent set; names are appended
/// as they arrive, without duplicate suppression.
pub type DirectoryStream = BoxStream<'static, Result<String, StreamError>>;

/// Authoritative entry rebuild for one directory, emitting entries as they
/// are recovered from the underlying store.
pub type EntryStream = BoxStream<'static, Result<Entry, StreamError>>;

/// Storage session the view reads from and writes through.
#[async_trait]
pub trait Session: Send + Sync {
    /// Stream the directory namespace.
    fn stream_directory_list(&self) -> DirectoryStream;

    /// Fast-path cached entry list for `directory`.
    ///
    /// `None` when no cache exists. A returned list may be stale; the
    /// rebuild stream is the authoritative source.
    async fn entry_list_cache(&self, directory: &str) -> Option<Vec<Entry>>;

    /// Start an authoritative rebuild of the entry list for `directory`.
    fn create_entry_list_cache_streaming(&self, directory: &str) -> EntryStream;

    /// Create a new entry; the session assigns the id and returns the
    /// stored record.
    async fn create_entry(
        &self,
        directory: &str,
        info: EntryInfo,
        detail: EntryDetail,
    ) -> Result<Entry, SessionError>;

    /// Replace the entry identified by `id` wholesale.
    async fn update_entry(
        &self,
        directory: &str,
        id: &str,
        info: EntryInfo,
        detail: EntryDetail,
    ) -> Result<(), SessionError>;

    /// Delete the entry identified by `id`.
    async fn delete_entry(&self, directory: &str, id: &str) -> Result<(), SessionError>;
}
