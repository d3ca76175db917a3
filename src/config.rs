//! View construction configuration.

use std::sync::Arc;

use crate::filter::{MatchPolicy, SubstringMatch};

/// Capabilities handed to the view at construction.
///
/// Plain data — nothing here is ambient or global. The embedding
/// application decides these once, up front.
#[derive(Clone)]
pub struct ViewConfig {
    /// Predicate used to derive the filtered entry list.
    pub match_policy: Arc<dyn MatchPolicy>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            match_policy: Arc::new(SubstringMatch),
        }
    }
}

impl ViewConfig {
    /// Replace the match policy.
    pub fn with_match_policy(mut self, policy: Arc<dyn MatchPolicy>) -> Self {
        self.match_policy = policy;
        self
    }
}
