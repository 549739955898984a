//! Durable state format registry and on-disk shapes.
//!
//! # Responsibility
//! - Register every state format this binary can read, oldest first.
//! - Describe each shape as serde types; no workspace rules live here.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - Only the latest format is ever written.
//! - Order is carried by explicit sequences (`tab_order`, note pair lists);
//!   keys of `notes` are never read for order in the current format.
//! - Legacy formats are pickled tuples; their note order is the insertion
//!   order of the pickled dicts.

use crate::model::workspace::NO_ACTIVE_TAB;
use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Known state file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFormat {
    /// Pickled `(notes, tab_order)`, written before the active tab was
    /// remembered.
    LegacyPair,
    /// Pickled `(notes, tab_order, active_index)`.
    LegacyTriple,
    /// JSON `{"version": 3, "payload": {...}}`.
    Envelope,
}

impl StateFormat {
    pub fn version(self) -> u32 {
        match self {
            Self::LegacyPair => 1,
            Self::LegacyTriple => 2,
            Self::Envelope => 3,
        }
    }
}

impl Display for StateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.version())
    }
}

const FORMATS: &[StateFormat] = &[
    StateFormat::LegacyPair,
    StateFormat::LegacyTriple,
    StateFormat::Envelope,
];

/// Returns the newest format version known by this binary.
pub fn latest_version() -> u32 {
    FORMATS.last().map_or(0, |format| format.version())
}

/// Returns the registered format for one envelope version.
pub(crate) fn format_for_version(version: u32) -> Option<StateFormat> {
    FORMATS
        .iter()
        .copied()
        .find(|format| format.version() == version)
}

/// Minimal probe used to route versioned envelopes.
#[derive(Debug, Deserialize)]
pub(crate) struct VersionProbe {
    pub version: u32,
}

/// Current envelope, borrowed for writing.
#[derive(Debug, Serialize)]
pub(crate) struct EnvelopeOut<'a> {
    pub version: u32,
    pub payload: PayloadOut<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PayloadOut<'a> {
    pub notes: BTreeMap<&'a str, Vec<(&'a str, &'a str)>>,
    pub tab_order: Vec<&'a str>,
    pub active_tab_index: i64,
}

/// Current envelope, owned for reading.
#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeIn {
    pub payload: PayloadIn,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayloadIn {
    pub notes: IndexMap<String, Vec<(String, String)>>,
    pub tab_order: Vec<String>,
    #[serde(default)]
    pub active_tab_index: ActiveIndex,
}

/// Stored active index. Values that are not an `i64` (null, strings,
/// oversized numbers) are kept as unusable so the notes still load.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ActiveIndex {
    Index(i64),
    Unusable(IgnoredAny),
}

impl ActiveIndex {
    pub fn raw(&self) -> i64 {
        match self {
            Self::Index(index) => *index,
            Self::Unusable(_) => NO_ACTIVE_TAB,
        }
    }
}

impl Default for ActiveIndex {
    fn default() -> Self {
        Self::Index(0)
    }
}

/// Tab name -> (title -> content), in document order.
pub(crate) type LegacyNotes = IndexMap<String, IndexMap<String, String>>;

/// Pre-envelope pickled tuple shapes, tried longest first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LegacyShape {
    Triple(LegacyNotes, Vec<String>, ActiveIndex),
    Pair(LegacyNotes, Vec<String>),
}

/// Shape-independent view of one decoded file.
#[derive(Debug)]
pub(crate) struct StoredState {
    pub format: StateFormat,
    pub notes: IndexMap<String, Vec<(String, String)>>,
    pub tab_order: Vec<String>,
    pub active_tab_index: i64,
}

impl From<PayloadIn> for StoredState {
    fn from(value: PayloadIn) -> Self {
        Self {
            format: StateFormat::Envelope,
            notes: value.notes,
            tab_order: value.tab_order,
            active_tab_index: value.active_tab_index.raw(),
        }
    }
}

impl From<LegacyShape> for StoredState {
    fn from(value: LegacyShape) -> Self {
        let (format, notes, tab_order, active_tab_index) = match value {
            LegacyShape::Triple(notes, order, active) => {
                (StateFormat::LegacyTriple, notes, order, active.raw())
            }
            LegacyShape::Pair(notes, order) => (StateFormat::LegacyPair, notes, order, 0),
        };
        Self {
            format,
            notes: notes
                .into_iter()
                .map(|(tab, notes)| (tab, notes.into_iter().collect()))
                .collect(),
            tab_order,
            active_tab_index,
        }
    }
}
