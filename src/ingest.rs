//! Stream ingestion: the directory listing and the entry-cache protocol.
//!
//! Every fold goes through [`StateStore::mutate`]; ingestion tasks never
//! touch render state directly. Each task races its stream against the
//! view's shutdown handle so disposal cancels it.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use crate::session::Session;
use crate::shutdown::ShutdownHandle;
use crate::store::{Notice, StateStore};

/// Fold the directory-listing stream into `directory_list`.
///
/// Append semantics, no duplicate suppression — the producer is trusted to
/// emit a consistent set.
pub(crate) async fn run_directory_stream(
    store: Arc<StateStore>,
    session: Arc<dyn Session>,
    shutdown: ShutdownHandle,
) {
    let mut stream = session.stream_directory_list();
    loop {
        let item = tokio::select! {
            _ = shutdown.wait() => return,
            item = stream.next() => item,
        };
        match item {
            Some(Ok(name)) => {
                debug!(directory = %name, "directory listed");
                store.mutate(move |s| s.directory_list.push(name)).await;
            }
            Some(Err(err)) => {
                warn!(error = %err, "directory stream failed");
                store
                    .mutate(|s| s.notice = Some(Notice::stream(&err)))
                    .await;
                return;
            }
            None => {
                debug!("directory stream complete");
                return;
            }
        }
    }
}

/// Load the entry list for `directory`: bulk-apply the cached snapshot if
/// one exists, otherwise fall back to an authoritative rebuild.
pub(crate) async fn load_entry_list(
    store: Arc<StateStore>,
    session: Arc<dyn Session>,
    directory: String,
    shutdown: ShutdownHandle,
) {
    match session.entry_list_cache(&directory).await {
        Some(entries) => {
            info!(directory = %directory, count = entries.len(), "entry cache hit");
            store
                .mutate(move |s| {
                    if s.directory == directory {
                        s.entry_list = entries;
                        s.regenerating_cache = false;
                    }
                })
                .await;
        }
        None => {
            info!(directory = %directory, "entry cache missing, rebuilding");
            if begin_rebuild(&store, &directory).await {
                run_rebuild(store, session, directory, shutdown).await;
            }
        }
    }
}

/// Atomically claim the regeneration guard.
///
/// Returns false when a rebuild is already in flight or the directory is no
/// longer current; the request is then a no-op.
pub(crate) async fn begin_rebuild(store: &StateStore, directory: &str) -> bool {
    let claimed = store
        .mutate(|s| {
            if s.regenerating_cache || s.directory != directory {
                false
            } else {
                s.regenerating_cache = true;
                true
            }
        })
        .await;
    if !claimed {
        debug!(directory = %directory, "rebuild already in flight, ignoring request");
    }
    claimed
}

/// Consume the rebuild stream, upserting entries as they arrive.
///
/// Expects the guard to be claimed already. The guard is cleared exactly
/// once when the stream ends (success, failure, and shutdown alike), and
/// entries accumulated before a failure are kept as best-effort.
pub(crate) async fn run_rebuild(
    store: Arc<StateStore>,
    session: Arc<dyn Session>,
    directory: String,
    shutdown: ShutdownHandle,
) {
    info!(directory = %directory, "cache rebuild started");
    let mut stream = session.create_entry_list_cache_streaming(&directory);
    loop {
        let item = tokio::select! {
            _ = shutdown.wait() => break,
            item = stream.next() => item,
        };
        match item {
            Some(Ok(entry)) => {
                store
                    .mutate(move |s| {
                        // A rebuild that outlives a directory switch must
                        // not pollute the new list.
                        if entry.info.directory == s.directory {
                            s.upsert_entry(entry);
                        }
                    })
                    .await;
            }
            Some(Err(err)) => {
                warn!(directory = %directory, error = %err, "cache rebuild failed");
                store
                    .mutate(|s| s.notice = Some(Notice::stream(&err)))
                    .await;
                break;
            }
            None => {
                info!(directory = %directory, "cache rebuild complete");
                break;
            }
        }
    }
    // Unconditional completion handling, gated only on the directory still
    // being current so a stale rebuild cannot clobber a newer guard.
    store
        .mutate(|s| {
            if s.directory == directory {
                s.regenerating_cache = false;
            }
        })
        .await;
}
