use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub const APP_DIR: &str = "table_role_game";
const SNAPSHOT_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable slot holding one serialized session snapshot.
pub trait SnapshotStorage {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&mut self, json: &str) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// `<config_dir>/table_role_game`, or `./table_role_game` when the
/// platform has no config directory.
pub fn app_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_config_dir() -> Self {
        Self::new(app_config_dir().join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, json: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves half a snapshot behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the snapshot in memory only; used when persistence is switched off.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Option<String>,
}

impl MemoryStorage {
    #[cfg(test)]
    pub fn with_snapshot(json: impl Into<String>) -> Self {
        Self {
            data: Some(json.into()),
        }
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, json: &str) -> Result<(), StorageError> {
        self.data = Some(json.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.data = None;
        Ok(())
    }
}
