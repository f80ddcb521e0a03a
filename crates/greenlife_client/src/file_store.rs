//! crates/greenlife_client/src/file_store.rs
//!
//! A `Persistence` that keeps each key in its own JSON file, so the cart and
//! the logged-in user survive a restart.

use greenlife_core::ports::{Persistence, PortError, PortResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

/// Stores `key` at `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PortResult<PathBuf> {
        let safe = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(PortError::Validation(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Persistence for FileStore {
    fn load(&self, key: &str) -> PortResult<Option<String>> {
        match fs::read_to_string(self.path(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::from(e).into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> PortResult<()> {
        // Write then rename so a crash never leaves a half-written file.
        let path = self.path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| ClientError::from(e).into())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        match fs::remove_file(self.path(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(ClientError::from(e).into()),
            _ => Ok(()),
        }
    }
}
