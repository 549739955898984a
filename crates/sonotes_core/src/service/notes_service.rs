//! Write-through command service over one workspace.
//!
//! # Responsibility
//! - Apply tab/note commands to the in-memory workspace.
//! - Persist the full state after every successful command.
//!
//! # Invariants
//! - A rejected command never writes.
//! - A failed write keeps the applied change in memory; the in-memory
//!   workspace stays authoritative for the session. Values the command
//!   returned (a removed tab or note) travel in the error.
//! - Commands take `&mut self`; sharing one service across threads needs an
//!   outer lock.

use crate::codec::format::StateFormat;
use crate::config::StoreConfig;
use crate::model::error::{ErrorKind, WorkspaceError, WorkspaceResult};
use crate::model::note::Note;
use crate::model::tab::Tab;
use crate::model::workspace::Workspace;
use crate::store::{StateStore, StoreError, WorkspaceStore};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by service commands.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from service commands.
#[derive(Debug)]
pub enum ServiceError {
    /// Command was rejected; nothing changed.
    Workspace(WorkspaceError),
    /// Command was applied in memory but the state file was not written.
    PersistenceWriteFailed { source: StoreError, applied: Applied },
    /// State file exists but could not be read at startup.
    Load(StoreError),
}

/// Value produced by a command whose write failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Nothing,
    Position(usize),
    Tab(Tab),
    Note(Note),
}

impl From<()> for Applied {
    fn from(_: ()) -> Self {
        Self::Nothing
    }
}

impl From<usize> for Applied {
    fn from(value: usize) -> Self {
        Self::Position(value)
    }
}

impl From<Tab> for Applied {
    fn from(value: Tab) -> Self {
        Self::Tab(value)
    }
}

impl From<Note> for Applied {
    fn from(value: Note) -> Self {
        Self::Note(value)
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Workspace(err) => err.kind(),
            Self::PersistenceWriteFailed { .. } => ErrorKind::PersistenceWriteFailed,
            Self::Load(_) => ErrorKind::PersistenceReadFailed,
        }
    }

    /// Whether the in-memory workspace reflects the command.
    pub fn was_applied(&self) -> bool {
        matches!(self, Self::PersistenceWriteFailed { .. })
    }

    /// The command's result when it was applied but not saved.
    pub fn into_applied(self) -> Option<Applied> {
        match self {
            Self::PersistenceWriteFailed { applied, .. } => Some(applied),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workspace(err) => write!(f, "{err}"),
            Self::PersistenceWriteFailed { source, .. } => {
                write!(f, "failed to save notes: {source}")
            }
            Self::Load(err) => write!(f, "failed to load notes: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Workspace(err) => Some(err),
            Self::PersistenceWriteFailed { source, .. } => Some(source),
            Self::Load(err) => Some(err),
        }
    }
}

impl From<WorkspaceError> for ServiceError {
    fn from(value: WorkspaceError) -> Self {
        Self::Workspace(value)
    }
}

/// What startup found in the state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Format the file was read as; `None` for a fresh or degraded start.
    pub format: Option<StateFormat>,
    /// Whether an unreadable file was replaced by an empty workspace.
    pub recovered_from_corruption: bool,
    /// Copy of the unreadable file, when one was written.
    pub backup_path: Option<PathBuf>,
}

/// Command facade owning one workspace and its durable store.
pub struct NotesService<S: StateStore> {
    store: S,
    workspace: Workspace,
    load_summary: LoadSummary,
}

impl NotesService<WorkspaceStore> {
    /// Opens the state file named by `config`.
    pub fn open(config: &StoreConfig) -> ServiceResult<Self> {
        Self::load(WorkspaceStore::new(config.state_path()))
    }
}

impl<S: StateStore> NotesService<S> {
    /// Loads the workspace from `store`.
    ///
    /// # Errors
    /// - `ServiceError::Load` when the file exists but cannot be read at the
    ///   I/O level. Unreadable content is not an error; see [`LoadSummary`].
    pub fn load(store: S) -> ServiceResult<Self> {
        let loaded = store.load().map_err(|err| {
            error!(
                "event=service_open module=service status=error error_code=state_read_failed error={}",
                err
            );
            ServiceError::Load(err)
        })?;
        let load_summary = LoadSummary {
            format: loaded.format,
            recovered_from_corruption: loaded.corruption.is_some(),
            backup_path: loaded.backup_path,
        };
        info!(
            "event=service_open module=service status=ok tabs={} active={} recovered={}",
            loaded.workspace.tab_count(),
            loaded.workspace.active_tab_index(),
            load_summary.recovered_from_corruption
        );
        Ok(Self {
            store,
            workspace: loaded.workspace,
            load_summary,
        })
    }

    /// Wraps an existing workspace without reading the store.
    pub fn with_workspace(store: S, workspace: Workspace) -> Self {
        Self {
            store,
            workspace,
            load_summary: LoadSummary {
                format: None,
                recovered_from_corruption: false,
                backup_path: None,
            },
        }
    }

    pub fn load_summary(&self) -> &LoadSummary {
        &self.load_summary
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn tab_names(&self) -> Vec<String> {
        self.workspace.tab_names().map(str::to_string).collect()
    }

    /// Note titles of one tab, in display order.
    pub fn note_titles(&self, tab: &str) -> ServiceResult<Vec<String>> {
        Ok(self
            .require_tab(tab)?
            .note_titles()
            .map(str::to_string)
            .collect())
    }

    pub fn note_content(&self, tab: &str, title: &str) -> ServiceResult<&str> {
        Ok(self.require_tab(tab)?.content(title)?)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.workspace.active_tab()
    }

    pub fn create_tab(&mut self, name: &str) -> ServiceResult<usize> {
        self.apply("create_tab", |workspace| workspace.create_tab(name))
    }

    pub fn delete_tab(&mut self, name: &str) -> ServiceResult<Tab> {
        self.apply("delete_tab", |workspace| workspace.delete_tab(name))
    }

    pub fn rename_tab(&mut self, old_name: &str, new_name: &str) -> ServiceResult<()> {
        self.apply("rename_tab", |workspace| {
            workspace.rename_tab(old_name, new_name)
        })
    }

    pub fn reorder_tab(&mut self, from: usize, to: usize) -> ServiceResult<()> {
        self.apply("reorder_tab", |workspace| workspace.reorder_tab(from, to))
    }

    pub fn set_active_tab(&mut self, index: i64) -> ServiceResult<()> {
        self.apply("set_active_tab", |workspace| workspace.set_active_tab(index))
    }

    pub fn add_note(&mut self, tab: &str, title: &str, content: &str) -> ServiceResult<usize> {
        self.apply("add_note", |workspace| {
            workspace.add_note(tab, title, content)
        })
    }

    pub fn rename_note(
        &mut self,
        tab: &str,
        old_title: &str,
        new_title: &str,
    ) -> ServiceResult<()> {
        self.apply("rename_note", |workspace| {
            workspace.rename_note(tab, old_title, new_title)
        })
    }

    pub fn delete_note(&mut self, tab: &str, title: &str) -> ServiceResult<Note> {
        self.apply("delete_note", |workspace| workspace.delete_note(tab, title))
    }

    pub fn reorder_note(&mut self, tab: &str, from: usize, to: usize) -> ServiceResult<()> {
        self.apply("reorder_note", |workspace| {
            workspace.reorder_note(tab, from, to)
        })
    }

    pub fn update_note_content(
        &mut self,
        tab: &str,
        title: &str,
        content: &str,
    ) -> ServiceResult<()> {
        self.apply("update_note_content", |workspace| {
            workspace.update_note_content(tab, title, content)
        })
    }

    pub fn move_note(&mut self, source: &str, target: &str, title: &str) -> ServiceResult<()> {
        self.apply("move_note", |workspace| {
            workspace.move_note(source, target, title)
        })
    }

    /// Rewrites the current state unconditionally.
    pub fn flush(&self) -> ServiceResult<()> {
        self.persist("flush")
            .map_err(|source| ServiceError::PersistenceWriteFailed {
                source,
                applied: Applied::Nothing,
            })
    }

    fn apply<T: Into<Applied>>(
        &mut self,
        command: &'static str,
        f: impl FnOnce(&mut Workspace) -> WorkspaceResult<T>,
    ) -> ServiceResult<T> {
        let value = f(&mut self.workspace).map_err(|err| {
            debug!(
                "event=command module=service command={} status=rejected error_kind={:?}",
                command,
                err.kind()
            );
            ServiceError::Workspace(err)
        })?;
        if let Err(source) = self.persist(command) {
            return Err(ServiceError::PersistenceWriteFailed {
                source,
                applied: value.into(),
            });
        }
        debug!(
            "event=command module=service command={} status=ok tabs={} active={}",
            command,
            self.workspace.tab_count(),
            self.workspace.active_tab_index()
        );
        Ok(value)
    }

    fn persist(&self, command: &'static str) -> Result<(), StoreError> {
        self.store.save(&self.workspace).inspect_err(|err| {
            error!(
                "event=command module=service command={} status=error error_code=persistence_write_failed error={}",
                command, err
            );
        })
    }

    fn require_tab(&self, name: &str) -> ServiceResult<&Tab> {
        self.workspace
            .tab(name)
            .ok_or_else(|| WorkspaceError::TabNotFound(name.to_string()).into())
    }
}
