//! Filter derivation over the entry list.
//!
//! `filter_entries` is a pure function: the filtered view is always exactly
//! the entry list restricted to matches, in entry-list order. The match
//! predicate itself is a pluggable policy; the default is a case-insensitive
//! substring match on the display name.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::model::{Entry, EntryInfo};

/// Predicate deciding whether an entry matches the filter text.
///
/// An empty filter must match everything.
pub trait MatchPolicy: Send + Sync {
    fn matches(&self, info: &EntryInfo, filter: &str) -> bool;
}

/// Case-insensitive substring match on the display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl MatchPolicy for SubstringMatch {
    fn matches(&self, info: &EntryInfo, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        info.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// Fuzzy match on the display name using skim scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatch;

impl MatchPolicy for FuzzyMatch {
    fn matches(&self, info: &EntryInfo, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        SkimMatcherV2::default().fuzzy_match(&info.name, filter).is_some()
    }
}

/// Derive the filtered view: `entries` restricted to matches, order preserved.
pub fn filter_entries(entries: &[Entry], filter: &str, policy: &dyn MatchPolicy) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| policy.matches(&entry.info, filter))
        .cloned()
        .collect()
}

/// Label for the entry counter: the total alone while unfiltered,
/// `filtered/total` while a filter is active.
pub fn count_label(filtered: usize, total: usize, filter: &str) -> String {
    if filter.is_empty() {
        total.to_string()
    } else {
        format!("{}/{}", filtered, total)
    }
}
