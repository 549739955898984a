//! Note value type.
//!
//! # Invariants
//! - `title` is the identity of a note inside its tab; there is no other id.
//! - Titles handed to the model are trimmed and non-empty.

use crate::model::ordered_map::OrderedMap;

/// One titled text entry, detached from any tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Borrowed view of one note in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteView<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

impl NoteView<'_> {
    /// Copies the view into an owned [`Note`].
    pub fn to_note(&self) -> Note {
        Note::new(self.title, self.content)
    }
}

/// Trims a user-supplied tab name or note title.
///
/// Returns `None` when nothing is left after trimming.
pub(crate) fn normalize_name(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Resolves a user-supplied lookup name against stored keys.
///
/// An exact match wins, so names loaded verbatim stay reachable; otherwise
/// the trimmed form is looked up, matching what `normalize_name` stored.
pub(crate) fn lookup_key<'a, V>(keys: &OrderedMap<String, V>, raw: &'a str) -> &'a str {
    if keys.contains_key(raw) {
        raw
    } else {
        raw.trim()
    }
}
