//! Intents for the detail pane.

use crate::model::Entry;
use crate::mvi::Intent;

/// Events the detail-pane reducer consumes.
///
/// `SaveCommitted` and `DeleteCommitted` are dispatched only after the
/// storage session confirmed the operation; a failed session call never
/// reaches the reducer and the pane stays in its form state.
#[derive(Debug, Clone)]
pub enum DetailIntent {
    /// List selection settled on an entry (`None` when the selection was
    /// cleared or the index no longer resolves).
    SelectionChanged { entry: Option<Entry> },

    /// "New entry" action. The current selection is remembered so cancel
    /// can restore it.
    BeginCreate,

    /// "Edit" action on the viewed entry.
    BeginEdit,

    /// Create or update confirmed by the session; `entry` is the stored
    /// record as the backend returned it.
    SaveCommitted { entry: Entry },

    /// Cancel the in-progress form.
    Cancel,

    /// Delete confirmed by the session.
    DeleteCommitted,
}

impl Intent for DetailIntent {}
