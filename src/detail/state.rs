//! State for the detail pane.

use crate::model::Entry;
use crate::mvi::UiState;

/// Detail-pane state machine.
///
/// `user_triggered` distinguishes transitions caused by direct list
/// interaction from programmatic ones: when it is false the renderer must
/// re-impose list selection to match, when it is true it must not re-drive
/// selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// Nothing selected.
    Empty { user_triggered: bool },

    /// A stored entry is shown read-only.
    Viewing { entry: Entry, user_triggered: bool },

    /// A creation form is open. `last_selection` is restored on cancel.
    Creating { last_selection: Option<Entry> },

    /// An edit form is open for `entry`.
    Editing { entry: Entry },
}

impl Default for DetailState {
    fn default() -> Self {
        DetailState::Empty { user_triggered: true }
    }
}

impl UiState for DetailState {}

impl DetailState {
    /// Entry the pane is currently anchored to, if any.
    pub fn selected_entry(&self) -> Option<&Entry> {
        match self {
            DetailState::Viewing { entry, .. } | DetailState::Editing { entry } => Some(entry),
            DetailState::Creating { last_selection } => last_selection.as_ref(),
            DetailState::Empty { .. } => None,
        }
    }

    /// True while an in-progress form locks the pane to its operation.
    /// Selection changes are ignored and the list widget is disabled.
    pub fn locks_selection(&self) -> bool {
        matches!(
            self,
            DetailState::Creating { .. } | DetailState::Editing { .. }
        )
    }
}
