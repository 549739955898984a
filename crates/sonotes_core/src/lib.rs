//! Core domain logic for So Notes.
//! This crate is the single source of truth for tab/note ordering and the
//! durable state format.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use codec::format::{latest_version, StateFormat};
pub use codec::{decode, decode_strict, encode, CodecError, CodecResult, DecodeReport};
pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::error::{ErrorKind, NameField, WorkspaceError, WorkspaceResult};
pub use model::note::{Note, NoteView};
pub use model::ordered_map::{OrderedMap, OrderedMapError, OrderedMapResult};
pub use model::tab::Tab;
pub use model::workspace::{Workspace, NO_ACTIVE_TAB};
pub use service::notes_service::{
    Applied, LoadSummary, NotesService, ServiceError, ServiceResult,
};
pub use store::{
    GeometryStore, LoadedWorkspace, StateStore, StoreError, StoreResult, WindowState,
    WorkspaceStore, CORRUPT_BACKUP_SUFFIX,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
