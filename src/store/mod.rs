//! Canonical view state and the store that owns it.
//!
//! `ViewState` is the only shared mutable resource in the crate. It is
//! reachable exclusively through [`StateStore::mutate`] and
//! [`StateStore::snapshot`]; no other component holds a mutable reference
//! to it.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::detail::{DetailIntent, DetailReducer, DetailState};
use crate::error::{SessionError, StreamError};
use crate::filter::{self, MatchPolicy};
use crate::model::Entry;
use crate::mvi::Reducer;

/// Which concern a failure notice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Create,
    Update,
    Delete,
    Stream,
}

/// Non-fatal failure surfaced to the renderer as an inline indicator.
///
/// Cleared by the next successful operation of the same concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn session(err: &SessionError) -> Self {
        let kind = match err {
            SessionError::CreateFailed { .. } => NoticeKind::Create,
            SessionError::UpdateFailed { .. } => NoticeKind::Update,
            SessionError::DeleteFailed { .. } => NoticeKind::Delete,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }

    pub fn stream(err: &StreamError) -> Self {
        Self {
            kind: NoticeKind::Stream,
            message: err.to_string(),
        }
    }
}

/// The canonical mutable aggregate behind the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Namespace currently being browsed.
    pub directory: String,
    /// Directory names, appended as the listing stream emits them.
    pub directory_list: Vec<String>,
    /// True while a rebuild stream is in flight; guards duplicate rebuilds.
    pub regenerating_cache: bool,
    /// Full entry set for the current directory. At most one entry per
    /// `(directory, id)` pair.
    pub entry_list: Vec<Entry>,
    pub filter_text: String,
    /// Derived: `entry_list` restricted to filter matches, in list order.
    /// Recomputed by the store after every mutation, never set directly.
    pub filtered_entries: Vec<Entry>,
    pub detail: DetailState,
    /// Inline failure indicator, if any.
    pub notice: Option<Notice>,
}

impl ViewState {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            directory_list: Vec::new(),
            regenerating_cache: false,
            entry_list: Vec::new(),
            filter_text: String::new(),
            filtered_entries: Vec::new(),
            detail: DetailState::default(),
            notice: None,
        }
    }

    /// Insert or replace the entry with the same identity.
    pub fn upsert_entry(&mut self, entry: Entry) {
        let slot = self.entry_list.iter_mut().find(|existing| {
            existing.info.id == entry.info.id && existing.info.directory == entry.info.directory
        });
        match slot {
            Some(existing) => *existing = entry,
            None => self.entry_list.push(entry),
        }
    }

    /// Drop the entry with `id` from the list, if present.
    pub fn remove_entry(&mut self, id: &str) {
        self.entry_list.retain(|entry| entry.info.id != id);
    }

    /// Run one intent through the detail-pane reducer.
    pub fn dispatch_detail(&mut self, intent: DetailIntent) {
        self.detail = DetailReducer::reduce(std::mem::take(&mut self.detail), intent);
    }
}

/// Owner of the canonical state.
///
/// Mutations are strictly serialized behind a fair async lock; each one
/// republishes a snapshot through a single-slot overwrite-latest channel.
/// Subscribers always observe the final state of a burst but may skip
/// intermediates, and a slow subscriber can never stall the mutation path.
pub struct StateStore {
    state: Mutex<ViewState>,
    tx: watch::Sender<ViewState>,
    policy: Arc<dyn MatchPolicy>,
}

impl StateStore {
    pub fn new(mut initial: ViewState, policy: Arc<dyn MatchPolicy>) -> Self {
        initial.filtered_entries =
            filter::filter_entries(&initial.entry_list, &initial.filter_text, policy.as_ref());
        let (tx, _) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(initial),
            tx,
            policy,
        }
    }

    /// Apply `f` under the exclusive lock and publish the result.
    ///
    /// The lock queue is FIFO, so mutations apply in issue order. The
    /// filtered view is recomputed after `f` so its derivation invariant
    /// holds no matter what `f` touched. The snapshot is published while
    /// the lock is still held: `send_replace` never waits on consumers,
    /// and publishing after release could deliver two completed mutations
    /// out of order.
    ///
    /// Returns `f`'s value, which makes atomic test-and-set possible (the
    /// cache-regeneration guard relies on this).
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut state = self.state.lock().await;
        let out = f(&mut state);
        state.filtered_entries =
            filter::filter_entries(&state.entry_list, &state.filter_text, self.policy.as_ref());
        self.tx.send_replace(state.clone());
        out
    }

    /// Clone of the last published snapshot. Readers never block writers.
    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Coalescing snapshot broadcast for observers.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }
}
