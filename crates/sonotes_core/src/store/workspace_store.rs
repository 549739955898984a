use super::{io_error, read_optional, write_replace, StoreError, StoreResult};
use crate::codec::format::StateFormat;
use crate::codec::{decode, encode, CodecError};
use crate::model::workspace::Workspace;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Suffix of the copy kept when an unreadable state file is discarded.
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

/// Result of loading the state file.
#[derive(Debug)]
pub struct LoadedWorkspace {
    pub workspace: Workspace,
    /// Format the file was read as; `None` when missing or unreadable.
    pub format: Option<StateFormat>,
    /// Set when the file existed but could not be read.
    pub corruption: Option<CodecError>,
    /// Where the unreadable file was copied, when it was.
    pub backup_path: Option<PathBuf>,
}

/// Single-file store for the full workspace state.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    path: PathBuf,
}

impl WorkspaceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the state file.
    ///
    /// A missing file yields an empty workspace. An unreadable file also yields
    /// an empty workspace, after copying it to `<path>.corrupt`.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file exists but cannot be read.
    pub fn load(&self) -> StoreResult<LoadedWorkspace> {
        let started_at = Instant::now();
        let Some(bytes) = read_optional(&self.path)? else {
            info!("event=workspace_load module=store status=ok source=missing");
            return Ok(LoadedWorkspace {
                workspace: Workspace::new(),
                format: None,
                corruption: None,
                backup_path: None,
            });
        };

        let report = decode(&bytes);
        let backup_path = if report.is_corrupt() {
            self.preserve_corrupt(&bytes)
        } else {
            None
        };

        info!(
            "event=workspace_load module=store status={} format={} tabs={} notes={} skipped={} duration_ms={}",
            if report.is_corrupt() { "degraded" } else { "ok" },
            report
                .format
                .map_or_else(|| "none".to_string(), |format| format.to_string()),
            report.workspace.tab_count(),
            report.workspace.note_count(),
            report.skipped_entries,
            started_at.elapsed().as_millis()
        );

        Ok(LoadedWorkspace {
            workspace: report.workspace,
            format: report.format,
            corruption: report.corruption,
            backup_path,
        })
    }

    /// Encodes and overwrites the state file.
    pub fn save(&self, workspace: &Workspace) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = encode(workspace)
            .map_err(StoreError::from)
            .and_then(|bytes| write_replace(&self.path, &bytes));
        match &result {
            Ok(()) => info!(
                "event=workspace_save module=store status=ok tabs={} notes={} duration_ms={}",
                workspace.tab_count(),
                workspace.note_count(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=workspace_save module=store status=error error_code=state_write_failed duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn preserve_corrupt(&self, bytes: &[u8]) -> Option<PathBuf> {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(CORRUPT_BACKUP_SUFFIX);
        let backup = self.path.with_file_name(name);
        match fs::write(&backup, bytes).map_err(io_error(&backup)) {
            Ok(()) => {
                warn!(
                    "event=workspace_load module=store status=degraded action=backup_written bytes={}",
                    bytes.len()
                );
                Some(backup)
            }
            Err(err) => {
                error!(
                    "event=workspace_load module=store status=error error_code=backup_failed error={}",
                    err
                );
                None
            }
        }
    }
}
