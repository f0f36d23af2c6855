//! Snapshot persistence.
//!
//! Stores one [`ChartSnapshot`] per file, wrapped in a versioned
//! [`PersistedSnapshot`] and encoded with bincode.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use heart_common::consts::SNAPSHOT_FORMAT_VERSION;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::ChartSnapshot;

/// Snapshot file error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    #[error("failed to decode snapshot: {0}")]
    Decode(String),

    #[error("unsupported snapshot format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// On-disk envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub version: u32,
    /// Unix epoch seconds at save time.
    pub saved_at: u64,
    pub snapshot: ChartSnapshot,
}

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }

    /// Write `snapshot`, replacing any previous file.
    pub fn save(&self, snapshot: &ChartSnapshot) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let envelope = PersistedSnapshot {
            version: SNAPSHOT_FORMAT_VERSION,
            saved_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            snapshot: snapshot.clone(),
        };

        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, &envelope)
            .map_err(|e| PersistError::Encode(e.to_string()))?;
        // Dropping a BufWriter discards write errors.
        writer.flush().map_err(|e| self.io_error(e))?;

        info!(
            state = %snapshot.current_state,
            counter = snapshot.reset_event_counter,
            "Saved chart snapshot to {:?}",
            self.path
        );
        Ok(())
    }

    /// Read the stored snapshot. `Ok(None)` when no file exists yet.
    ///
    /// The snapshot is validated; a file holding an inconsistent snapshot
    /// is reported as a decode error.
    pub fn load(&self) -> Result<Option<ChartSnapshot>, PersistError> {
        if !self.path.exists() {
            debug!("No snapshot at {:?}, starting fresh", self.path);
            return Ok(None);
        }

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let envelope: PersistedSnapshot = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| PersistError::Decode(e.to_string()))?;

        if envelope.version != SNAPSHOT_FORMAT_VERSION {
            return Err(PersistError::Version {
                found: envelope.version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }
        envelope
            .snapshot
            .validate()
            .map_err(|e| PersistError::Decode(e.to_string()))?;

        debug!(
            "Loaded chart snapshot saved at {} from {:?}",
            envelope.saved_at, self.path
        );
        Ok(Some(envelope.snapshot))
    }

    /// Remove the stored snapshot, if any.
    pub fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
