//! JSON file backed state store with atomic replacement

use crate::store::error::{StorageError, StoreResult};
use crate::store::state::QueueState;
use crate::store::StateStore;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const STATE_DIR: &str = ".cbq";
const STATE_FILE: &str = "state.json";

/// Default location of the state file: `~/.cbq/state.json`
pub fn default_state_path() -> StoreResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(STATE_DIR).join(STATE_FILE))
        .ok_or_else(|| StorageError::Location {
            message: "Cannot determine home directory; pass --state-file explicitly".to_string(),
        })
}

/// State store persisting `QueueState` as a JSON document
///
/// Saves write a temporary file next to the target and rename it into place,
/// so readers and crashes only ever see the old or the new document.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.cbq/state.json`
    pub fn at_default_location() -> StoreResult<Self> {
        default_state_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> StoreResult<QueueState> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::trace!("No state file at {}, using defaults", self.path.display());
                return Ok(QueueState::default());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(QueueState::default());
        }

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, state: &QueueState) -> StoreResult<()> {
        let data =
            serde_json::to_vec_pretty(state).map_err(|source| StorageError::Serialize { source })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        // Same directory as the target so the rename never crosses filesystems
        let mut tmp = tempfile::Builder::new()
            .prefix(".state-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| self.write_error(e))?;
        tmp.write_all(&data).map_err(|e| self.write_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        log::trace!(
            "Saved {} item(s) to {}",
            state.items.len(),
            self.path.display()
        );
        Ok(())
    }
}
