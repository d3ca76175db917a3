//! Reducer for the detail pane.

use crate::mvi::Reducer;

use super::intent::DetailIntent;
use super::state::DetailState;

/// Reducer for detail-pane state transitions.
///
/// Pure function — session calls and entry-list mutations are handled by
/// the orchestrator around the dispatch.
pub struct DetailReducer;

impl Reducer for DetailReducer {
    type State = DetailState;
    type Intent = DetailIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            DetailIntent::SelectionChanged { entry } => match state {
                // An open form is locked to its operation regardless of
                // list interaction.
                DetailState::Creating { .. } | DetailState::Editing { .. } => state,
                DetailState::Empty { .. } | DetailState::Viewing { .. } => match entry {
                    Some(entry) => DetailState::Viewing {
                        entry,
                        user_triggered: true,
                    },
                    None => DetailState::Empty { user_triggered: true },
                },
            },

            DetailIntent::BeginCreate => DetailState::Creating {
                last_selection: state.selected_entry().cloned(),
            },

            DetailIntent::BeginEdit => match state {
                DetailState::Viewing { entry, .. } => DetailState::Editing { entry },
                other => other,
            },

            DetailIntent::SaveCommitted { entry } => match state {
                DetailState::Creating { .. } | DetailState::Editing { .. } => {
                    DetailState::Viewing {
                        entry,
                        user_triggered: false,
                    }
                }
                other => other,
            },

            DetailIntent::Cancel => match state {
                DetailState::Creating {
                    last_selection: Some(entry),
                } => DetailState::Viewing {
                    entry,
                    user_triggered: false,
                },
                DetailState::Creating {
                    last_selection: None,
                } => DetailState::Empty {
                    user_triggered: false,
                },
                DetailState::Editing { entry } => DetailState::Viewing {
                    entry,
                    user_triggered: false,
                },
                other => other,
            },

            DetailIntent::DeleteCommitted => match state {
                DetailState::Viewing { .. } => DetailState::Empty {
                    user_triggered: false,
                },
                other => other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, EntryDetail, EntryInfo, EntryType};

    fn entry(name: &str) -> Entry {
        Entry::new(
            EntryInfo {
                id: name.to_lowercase(),
                name: name.to_string(),
                entry_type: EntryType::Login,
                directory: "/".to_string(),
            },
            EntryDetail::default(),
        )
    }

    fn viewing(name: &str) -> DetailState {
        DetailState::Viewing {
            entry: entry(name),
            user_triggered: true,
        }
    }

    // -- selection ---------------------------------------------------------

    #[test]
    fn empty_valid_selection_shows_entry() {
        let e = entry("Alice");
        let new = DetailReducer::reduce(
            DetailState::default(),
            DetailIntent::SelectionChanged { entry: Some(e.clone()) },
        );
        assert_eq!(new, DetailState::Viewing { entry: e, user_triggered: true });
    }

    #[test]
    fn viewing_cleared_selection_empties_pane() {
        let new = DetailReducer::reduce(
            viewing("Alice"),
            DetailIntent::SelectionChanged { entry: None },
        );
        assert_eq!(new, DetailState::Empty { user_triggered: true });
    }

    #[test]
    fn selection_ignored_while_creating() {
        let state = DetailState::Creating { last_selection: None };
        let new = DetailReducer::reduce(
            state.clone(),
            DetailIntent::SelectionChanged { entry: Some(entry("Bob")) },
        );
        assert_eq!(new, state);
    }

    #[test]
    fn selection_ignored_while_editing() {
        let state = DetailState::Editing { entry: entry("Alice") };
        let new = DetailReducer::reduce(
            state.clone(),
            DetailIntent::SelectionChanged { entry: None },
        );
        assert_eq!(new, state);
    }

    // -- create ------------------------------------------------------------

    #[test]
    fn begin_create_remembers_current_selection() {
        let new = DetailReducer::reduce(viewing("Alice"), DetailIntent::BeginCreate);
        assert_eq!(
            new,
            DetailState::Creating { last_selection: Some(entry("Alice")) }
        );
    }

    #[test]
    fn begin_create_from_empty_has_no_selection() {
        let new = DetailReducer::reduce(DetailState::default(), DetailIntent::BeginCreate);
        assert_eq!(new, DetailState::Creating { last_selection: None });
    }

    #[test]
    fn create_cancel_restores_last_selection() {
        let state = DetailState::Creating { last_selection: Some(entry("Alice")) };
        let new = DetailReducer::reduce(state, DetailIntent::Cancel);
        assert_eq!(
            new,
            DetailState::Viewing { entry: entry("Alice"), user_triggered: false }
        );
    }

    #[test]
    fn create_cancel_without_selection_empties_pane() {
        let state = DetailState::Creating { last_selection: None };
        let new = DetailReducer::reduce(state, DetailIntent::Cancel);
        assert_eq!(new, DetailState::Empty { user_triggered: false });
    }

    #[test]
    fn create_save_shows_new_entry_programmatically() {
        let state = DetailState::Creating { last_selection: Some(entry("Alice")) };
        let new = DetailReducer::reduce(
            state,
            DetailIntent::SaveCommitted { entry: entry("Dave") },
        );
        assert_eq!(
            new,
            DetailState::Viewing { entry: entry("Dave"), user_triggered: false }
        );
    }

    // -- edit --------------------------------------------------------------

    #[test]
    fn begin_edit_from_viewing() {
        let new = DetailReducer::reduce(viewing("Alice"), DetailIntent::BeginEdit);
        assert_eq!(new, DetailState::Editing { entry: entry("Alice") });
    }

    #[test]
    fn begin_edit_ignored_outside_viewing() {
        let new = DetailReducer::reduce(DetailState::default(), DetailIntent::BeginEdit);
        assert_eq!(new, DetailState::default());
    }

    #[test]
    fn edit_cancel_returns_to_viewing_same_entry() {
        let state = DetailState::Editing { entry: entry("Alice") };
        let new = DetailReducer::reduce(state, DetailIntent::Cancel);
        assert_eq!(
            new,
            DetailState::Viewing { entry: entry("Alice"), user_triggered: false }
        );
    }

    #[test]
    fn edit_save_shows_updated_entry() {
        let state = DetailState::Editing { entry: entry("Alice") };
        let new = DetailReducer::reduce(
            state,
            DetailIntent::SaveCommitted { entry: entry("Alicia") },
        );
        assert_eq!(
            new,
            DetailState::Viewing { entry: entry("Alicia"), user_triggered: false }
        );
    }

    // -- delete ------------------------------------------------------------

    #[test]
    fn delete_committed_empties_pane() {
        let new = DetailReducer::reduce(viewing("Alice"), DetailIntent::DeleteCommitted);
        assert_eq!(new, DetailState::Empty { user_triggered: false });
    }

    #[test]
    fn delete_committed_ignored_outside_viewing() {
        let state = DetailState::Creating { last_selection: None };
        let new = DetailReducer::reduce(state.clone(), DetailIntent::DeleteCommitted);
        assert_eq!(new, state);
    }

    // -- cancel in non-form states is a no-op ------------------------------

    #[test]
    fn cancel_outside_forms_is_noop() {
        let new = DetailReducer::reduce(viewing("Alice"), DetailIntent::Cancel);
        assert_eq!(new, viewing("Alice"));
    }
}
