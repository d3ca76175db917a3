//! Model-View-Intent (MVI) primitives.
//!
//! Base traits for unidirectional data flow in the view core:
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: immutable representation of a pane's state
//! - **Intent**: user actions or confirmed system events
//! - **Reducer**: pure function transforming state by intent
//!
//! Side effects (session calls, list mutations) happen around the dispatch,
//! never inside a reducer.

/// Marker trait for state machine values.
///
/// States are immutable (clone to produce the next one), self-contained,
/// and comparable so observers can skip unchanged values.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}

/// Marker trait for intents.
///
/// Intents represent user actions (selection, button presses) and confirmed
/// system events (a session call that succeeded).
pub trait Intent: Send + 'static {}

/// Reducer transforming state based on intents.
///
/// The reducer is the only place state transitions happen, and it must be a
/// pure function: `(State, Intent) -> State`.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    /// Process an intent and return the new state.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
