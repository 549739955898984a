use super::{read_optional, write_replace, StoreResult};
use log::debug;
use std::path::{Path, PathBuf};

/// Display state of the window at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Normal,
    Maximized,
    Minimized,
}

/// Store for one opaque window-geometry string (`"<w>x<h>+<x>+<y>"`).
///
/// The string is passed through verbatim; it is never parsed.
#[derive(Debug, Clone)]
pub struct GeometryStore {
    path: PathBuf,
}

impl GeometryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the stored geometry.
    ///
    /// Callers must only pass geometry captured in the normal window state;
    /// see [`GeometryStore::save_if_normal`].
    pub fn save(&self, geometry: &str) -> StoreResult<()> {
        write_replace(&self.path, geometry.as_bytes())?;
        debug!(
            "event=geometry_save module=store status=ok bytes={}",
            geometry.len()
        );
        Ok(())
    }

    /// Saves only when `state` is [`WindowState::Normal`]; returns whether it wrote.
    pub fn save_if_normal(&self, state: WindowState, geometry: &str) -> StoreResult<bool> {
        if state != WindowState::Normal {
            debug!("event=geometry_save module=store status=skipped state={state:?}");
            return Ok(false);
        }
        self.save(geometry)?;
        Ok(true)
    }

    /// Returns the stored geometry, `None` when missing or blank.
    pub fn load(&self) -> StoreResult<Option<String>> {
        let Some(bytes) = read_optional(&self.path)? else {
            return Ok(None);
        };
        let geometry = String::from_utf8_lossy(&bytes).into_owned();
        if geometry.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(geometry))
    }
}

#[cfg(test)]
mod tests {
    use super::{GeometryStore, WindowState};

    #[test]
    fn geometry_round_trips_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = GeometryStore::new(dir.path().join("window_geometry.dat"));

        assert_eq!(store.load().unwrap(), None);
        store.save("800x600+10+20").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("800x600+10+20"));
    }

    #[test]
    fn non_normal_state_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = GeometryStore::new(dir.path().join("window_geometry.dat"));
        store.save("640x480+0+0").unwrap();

        assert!(!store
            .save_if_normal(WindowState::Maximized, "1920x1080+0+0")
            .unwrap());
        assert!(!store
            .save_if_normal(WindowState::Minimized, "1x1+0+0")
            .unwrap());
        assert_eq!(store.load().unwrap().as_deref(), Some("640x480+0+0"));

        assert!(store
            .save_if_normal(WindowState::Normal, "1024x768+5+5")
            .unwrap());
        assert_eq!(store.load().unwrap().as_deref(), Some("1024x768+5+5"));
    }

    #[test]
    fn blank_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("window_geometry.dat");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(GeometryStore::new(path).load().unwrap(), None);
    }
}
