//! Typed failures for tab/note/workspace commands.
//!
//! # Invariants
//! - A command that returns one of these errors left its target unchanged.
//! - Every variant carries the name or index needed for a user-facing message.

use crate::model::ordered_map::OrderedMapError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by model commands.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Coarse failure category shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Tab name or note title collision.
    DuplicateKey,
    /// Tab or note is missing.
    KeyNotFound,
    /// Reorder/select index is invalid.
    IndexOutOfRange,
    /// Caller input failed validation (blank name, empty content).
    InvalidInput,
    /// Durable state could not be read and was replaced by an empty workspace.
    CorruptState,
    /// Durable state could not be written; in-memory state is still valid.
    PersistenceWriteFailed,
    /// Durable state exists but could not be read at the I/O level; nothing
    /// was loaded.
    PersistenceReadFailed,
}

/// Which user-supplied name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    TabName,
    NoteTitle,
}

impl Display for NameField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TabName => write!(f, "tab name"),
            Self::NoteTitle => write!(f, "note title"),
        }
    }
}

/// Errors from model commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// Another tab already uses this name.
    DuplicateTab(String),
    /// Target tab already holds a note with this title.
    DuplicateTitle { tab: String, title: String },
    /// No tab with this name.
    TabNotFound(String),
    /// Tab has no note with this title.
    NoteNotFound { tab: String, title: String },
    /// Reorder/select position is outside `[0, len)`.
    IndexOutOfRange { index: i64, len: usize },
    /// Name or title is blank after trimming.
    InvalidName(NameField),
    /// New notes must carry content.
    EmptyContent,
}

impl WorkspaceError {
    /// Maps this error to its coarse category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateTab(_) | Self::DuplicateTitle { .. } => ErrorKind::DuplicateKey,
            Self::TabNotFound(_) | Self::NoteNotFound { .. } => ErrorKind::KeyNotFound,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::InvalidName(_) | Self::EmptyContent => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn from_note_map(err: OrderedMapError, tab: &str, title: &str) -> Self {
        match err {
            OrderedMapError::DuplicateKey => Self::DuplicateTitle {
                tab: tab.to_string(),
                title: title.to_string(),
            },
            OrderedMapError::KeyNotFound => Self::NoteNotFound {
                tab: tab.to_string(),
                title: title.to_string(),
            },
            OrderedMapError::IndexOutOfRange { index, len } => Self::out_of_range(index, len),
        }
    }

    pub(crate) fn from_tab_map(err: OrderedMapError, name: &str) -> Self {
        match err {
            OrderedMapError::DuplicateKey => Self::DuplicateTab(name.to_string()),
            OrderedMapError::KeyNotFound => Self::TabNotFound(name.to_string()),
            OrderedMapError::IndexOutOfRange { index, len } => Self::out_of_range(index, len),
        }
    }

    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len,
        }
    }
}

impl Display for WorkspaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTab(name) => write!(f, "tab `{name}` already exists"),
            Self::DuplicateTitle { tab, title } => {
                write!(f, "note `{title}` already exists in tab `{tab}`")
            }
            Self::TabNotFound(name) => write!(f, "tab not found: `{name}`"),
            Self::NoteNotFound { tab, title } => {
                write!(f, "note `{title}` not found in tab `{tab}`")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} item(s)")
            }
            Self::InvalidName(field) => write!(f, "{field} must not be blank"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for WorkspaceError {}
