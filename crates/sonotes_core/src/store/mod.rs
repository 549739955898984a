//! File-backed stores for workspace state and window geometry.
//!
//! # Responsibility
//! - Own all filesystem access for the two durable files.
//! - Report I/O failures with the path involved.
//!
//! # Invariants
//! - A missing file is "nothing stored yet", never an error.
//! - Writes replace the whole file; a failed write leaves the old file intact.

mod geometry_store;
mod workspace_store;

pub use geometry_store::{GeometryStore, WindowState};
pub use workspace_store::{LoadedWorkspace, WorkspaceStore, CORRUPT_BACKUP_SUFFIX};

use crate::codec::CodecError;
use crate::model::workspace::Workspace;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from file store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure on `path`.
    Io { path: PathBuf, source: io::Error },
    /// Workspace could not be serialized.
    Encode(CodecError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode workspace: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Encode(value)
    }
}

/// Durable backend for the whole workspace.
pub trait StateStore {
    /// Reads the stored workspace.
    fn load(&self) -> StoreResult<LoadedWorkspace>;
    /// Replaces the stored workspace.
    fn save(&self, workspace: &Workspace) -> StoreResult<()>;
}

impl StateStore for WorkspaceStore {
    fn load(&self) -> StoreResult<LoadedWorkspace> {
        WorkspaceStore::load(self)
    }

    fn save(&self, workspace: &Workspace) -> StoreResult<()> {
        WorkspaceStore::save(self, workspace)
    }
}

pub(crate) fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads a whole file, mapping "not found" to `None`.
pub(crate) fn read_optional(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error(path)(err)),
    }
}

/// Replaces `path` with `bytes` via a sibling temporary file and rename.
pub(crate) fn write_replace(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let tmp_path = temp_sibling(path);
    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(&tmp_path)(err));
    }
    fs::rename(&tmp_path, path).map_err(|err| {
        let _ = fs::remove_file(&tmp_path);
        io_error(path)(err)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
