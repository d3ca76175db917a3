//! Data model shared with the storage session.
//!
//! Entries are immutable once constructed: an edit replaces the whole
//! record, it never mutates one in place.

use serde::{Deserialize, Serialize};

/// Kind of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Login,
    Note,
    #[default]
    Unspecified,
}

/// Identity and display attributes of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    /// Opaque id, unique within a directory.
    pub id: String,
    /// Display name shown in the list.
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Path in the hierarchical namespace this entry lives in.
    pub directory: String,
}

/// Field kinds carried by the type-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailFieldKind {
    Username,
    Password,
    Website,
    Note,
    Unknown,
}

/// One field of the type-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetailItem {
    pub kind: DetailFieldKind,
    pub value: String,
}

/// Type-specific payload of a record. Opaque to the view core beyond
/// pass-through to and from the session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryDetail {
    pub items: Vec<EntryDetailItem>,
}

/// A stored record: identity plus payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub info: EntryInfo,
    pub detail: EntryDetail,
}

impl Entry {
    pub fn new(info: EntryInfo, detail: EntryDetail) -> Self {
        Self { info, detail }
    }

    /// Entry id, unique within its directory.
    pub fn id(&self) -> &str {
        &self.info.id
    }
}
