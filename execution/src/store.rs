//! Snapshot persistence.

use commonware_codec::{DecodeExt, Encode};
use groupclick_types::Snapshot;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt snapshot: {0}")]
    Decode(#[from] commonware_codec::Error),
}

/// Somewhere a snapshot can be saved to and loaded from.
pub trait Store {
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;
}

pub fn encode_snapshot(snapshot: &Snapshot) -> Vec<u8> {
    snapshot.encode().to_vec()
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, StoreError> {
    Ok(Snapshot::decode(bytes)?)
}

/// Stores the encoded snapshot in a single file.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-save leaves the previous snapshot intact.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Store for FileStore {
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        fs::write(&temp, encode_snapshot(snapshot))?;
        if let Err(err) = fs::rename(&temp, &self.path) {
            fs::remove_file(&temp).ok();
            return Err(err.into());
        }
        debug!(path = ?self.path, players = snapshot.players.len(), "saved snapshot");
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => decode_snapshot(&bytes).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
