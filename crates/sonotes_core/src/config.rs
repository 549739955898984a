//! Storage location configuration.
//!
//! # Responsibility
//! - Resolve where the state and geometry files live.
//! - Keep environment lookups out of the stores themselves.
//!
//! # Invariants
//! - File names default to the historical `notes.dat` / `window_geometry.dat`.
//! - A blank `SONOTES_DATA_DIR` is treated as unset.

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "SONOTES_DATA_DIR";
pub const DEFAULT_STATE_FILE_NAME: &str = "notes.dat";
pub const DEFAULT_GEOMETRY_FILE_NAME: &str = "window_geometry.dat";

/// Locations of the two durable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub state_file_name: String,
    pub geometry_file_name: String,
}

impl StoreConfig {
    /// Uses default file names inside `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            state_file_name: DEFAULT_STATE_FILE_NAME.to_string(),
            geometry_file_name: DEFAULT_GEOMETRY_FILE_NAME.to_string(),
        }
    }

    /// Resolves the data directory from `SONOTES_DATA_DIR`, falling back to
    /// the current directory.
    pub fn from_env() -> Self {
        Self::in_dir(resolve_data_dir(std::env::var(DATA_DIR_ENV).ok()))
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_file_name)
    }

    pub fn geometry_path(&self) -> PathBuf {
        self.data_dir.join(&self.geometry_file_name)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

fn resolve_data_dir(raw: Option<String>) -> PathBuf {
    raw.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
}
