use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::StoreError;
use crate::model::AppState;

/// Environment variable naming the state document used by [`JsonFileStore::from_env`].
pub const STATE_PATH_ENV: &str = "GULLY_CRICKET_STATE";
const DEFAULT_STATE_PATH: &str = "gully_cricket_state.json";

/// Durable home of the [`AppState`] document.
///
/// `load` returns the last document passed to `save`, or `None` before the
/// first save. `save` must replace the whole document at once.
pub trait StateStore {
    fn load(&self) -> Result<Option<AppState>, StoreError>;
    fn save(&self, state: &AppState) -> Result<(), StoreError>;
}

/// Keeps the document as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the path in `GULLY_CRICKET_STATE`, or `gully_cricket_state.json`.
    pub fn from_env() -> Self {
        let path = std::env::var_os(STATE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the document with `.tmp` appended to its full file name.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<AppState>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let state = serde_json::from_slice(&data)?;
        debug!(path = %self.path.display(), bytes = data.len(), "loaded state");
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write a sibling temp file, then rename it over the document.
        let temp_path = self.temp_path();
        {
            let file = File::create(&temp_path).map_err(|e| self.io_error(e))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush().map_err(|e| self.io_error(e))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| self.io_error(e))?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "saved state");
        Ok(())
    }
}

/// Holds the document in memory; useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<AppState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<AppState>, StoreError> {
        let guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let mut guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(state.clone());
        Ok(())
    }
}
