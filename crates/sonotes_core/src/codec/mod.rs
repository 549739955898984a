//! Workspace <-> durable bytes.
//!
//! # Responsibility
//! - Encode the full workspace as the latest versioned JSON envelope.
//! - Decode the current envelope and both historical pickled tuple shapes.
//! - Degrade unreadable input to an empty workspace instead of failing.
//!
//! # Invariants
//! - `decode(encode(w))` reproduces `w`, including tab order, note order and
//!   the active index.
//! - `decode` never fails; degradation is reported in [`DecodeReport`].
//! - Order-sequence names missing from the note map are skipped; the active
//!   index is re-pinned to a valid value.

pub mod format;

use crate::model::tab::Tab;
use crate::model::workspace::Workspace;
use format::{
    format_for_version, latest_version, EnvelopeIn, EnvelopeOut, LegacyShape, PayloadOut,
    StateFormat, StoredState, VersionProbe,
};
use log::{debug, warn};
use serde_pickle::{DeOptions, ErrorCode};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors from encoding or strict decoding.
#[derive(Debug)]
pub enum CodecError {
    /// Input is empty.
    Empty,
    /// Serialization failure, or envelope input that is not valid JSON.
    Json(serde_json::Error),
    /// Non-envelope input that is not a readable pickle stream.
    Pickle(serde_pickle::Error),
    /// Input parses but matches no registered shape.
    UnknownShape,
    /// Input is an envelope written by a newer binary.
    UnsupportedVersion { found: u32, latest: u32 },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "state is empty"),
            Self::Json(err) => write!(f, "state is not readable: {err}"),
            Self::Pickle(err) => write!(f, "legacy state is not readable: {err}"),
            Self::UnknownShape => write!(f, "state has an unrecognized shape"),
            Self::UnsupportedVersion { found, latest } => write!(
                f,
                "state format version {found} is newer than supported {latest}"
            ),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Pickle(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_pickle::Error> for CodecError {
    fn from(value: serde_pickle::Error) -> Self {
        Self::Pickle(value)
    }
}

/// Outcome of a lenient decode.
#[derive(Debug)]
pub struct DecodeReport {
    /// Reconstructed workspace; empty when the input was unreadable.
    pub workspace: Workspace,
    /// Format the input was read as, `None` when degraded.
    pub format: Option<StateFormat>,
    /// Why the input was discarded (the corrupt-state condition).
    pub corruption: Option<CodecError>,
    /// Tab names and note titles skipped during normalization.
    pub skipped_entries: usize,
}

impl DecodeReport {
    pub fn is_corrupt(&self) -> bool {
        self.corruption.is_some()
    }

    /// Whether the input was an older format that will be rewritten as latest.
    pub fn needs_upgrade(&self) -> bool {
        matches!(self.format, Some(format) if format.version() < latest_version())
    }
}

/// Serializes the full workspace as the latest envelope.
pub fn encode(workspace: &Workspace) -> CodecResult<Vec<u8>> {
    let mut notes = BTreeMap::new();
    for tab in workspace.tabs() {
        notes.insert(
            tab.name(),
            tab.notes()
                .map(|note| (note.title, note.content))
                .collect::<Vec<_>>(),
        );
    }
    let envelope = EnvelopeOut {
        version: latest_version(),
        payload: PayloadOut {
            notes,
            tab_order: workspace.tab_names().collect(),
            active_tab_index: workspace.active_tab_index(),
        },
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Reconstructs a workspace, degrading unreadable input to an empty one.
pub fn decode(bytes: &[u8]) -> DecodeReport {
    match decode_strict(bytes) {
        Ok((workspace, format, skipped_entries)) => {
            debug!(
                "event=state_decode module=codec status=ok format={} tabs={} notes={} skipped={}",
                format,
                workspace.tab_count(),
                workspace.note_count(),
                skipped_entries
            );
            DecodeReport {
                workspace,
                format: Some(format),
                corruption: None,
                skipped_entries,
            }
        }
        Err(err) => {
            warn!(
                "event=state_decode module=codec status=degraded bytes={} error={}",
                bytes.len(),
                err
            );
            DecodeReport {
                workspace: Workspace::new(),
                format: None,
                corruption: Some(err),
                skipped_entries: 0,
            }
        }
    }
}

/// Decodes without degradation.
///
/// Returns the workspace, the format it was read as, and how many entries
/// normalization skipped.
pub fn decode_strict(bytes: &[u8]) -> CodecResult<(Workspace, StateFormat, usize)> {
    let stored = read_stored_state(bytes)?;
    let format = stored.format;
    let (workspace, skipped) = build_workspace(stored);
    Ok((workspace, format, skipped))
}

fn read_stored_state(bytes: &[u8]) -> CodecResult<StoredState> {
    match bytes.iter().find(|byte| !byte.is_ascii_whitespace()) {
        None => Err(CodecError::Empty),
        Some(b'{') => read_envelope(bytes),
        Some(_) => read_legacy(bytes),
    }
}

fn read_envelope(bytes: &[u8]) -> CodecResult<StoredState> {
    let probe: VersionProbe = match serde_json::from_slice(bytes) {
        Ok(probe) => probe,
        Err(err) if err.is_data() => return Err(CodecError::UnknownShape),
        Err(err) => return Err(err.into()),
    };
    match format_for_version(probe.version) {
        Some(StateFormat::Envelope) => {
            let envelope: EnvelopeIn = serde_json::from_slice(bytes)?;
            Ok(envelope.payload.into())
        }
        None if probe.version > latest_version() => Err(CodecError::UnsupportedVersion {
            found: probe.version,
            latest: latest_version(),
        }),
        _ => Err(CodecError::UnknownShape),
    }
}

fn read_legacy(bytes: &[u8]) -> CodecResult<StoredState> {
    match serde_pickle::from_slice::<LegacyShape>(bytes, DeOptions::new()) {
        Ok(shape) => Ok(shape.into()),
        // Well-formed pickle holding something other than a legacy tuple.
        Err(serde_pickle::Error::Syntax(ErrorCode::Structure(_))) => {
            Err(CodecError::UnknownShape)
        }
        Err(err) => Err(err.into()),
    }
}

fn build_workspace(stored: StoredState) -> (Workspace, usize) {
    let StoredState {
        mut notes,
        tab_order,
        active_tab_index,
        ..
    } = stored;

    let mut workspace = Workspace::new();
    let mut seen = HashSet::new();
    let mut skipped = 0;

    for name in tab_order {
        if !seen.insert(name.clone()) {
            skipped += 1;
            continue;
        }
        let Some(entries) = notes.shift_remove(&name) else {
            skipped += 1;
            continue;
        };
        let mut tab = Tab::new(name);
        for (title, content) in entries {
            if !tab.push_loaded(title, content) {
                skipped += 1;
            }
        }
        if !workspace.push_loaded_tab(tab) {
            skipped += 1;
        }
    }
    // Tabs never listed in the order were never visible.
    skipped += notes.len();

    workspace.pin_loaded_active(active_tab_index);
    (workspace, skipped)
}
