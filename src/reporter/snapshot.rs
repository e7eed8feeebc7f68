//! Snapshot persistence between plugin invocations.
//!
//! The file holds exactly one snapshot as a JSON object
//! `{"<metric>": {"value": f64, "timestamp": i64}}`. Writes go to a temp file
//! in the same directory followed by a rename, so readers see either the old
//! or the new snapshot and never a partial one.

use crate::core::{MetricSnapshot, PluginError, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage for the most recent snapshot.
pub trait SnapshotStore {
    /// Read the last persisted snapshot, `None` when nothing was stored yet
    fn load(&self) -> Result<Option<MetricSnapshot>>;

    /// Replace the stored snapshot
    fn persist(&self, snapshot: &MetricSnapshot) -> Result<()>;
}

/// Snapshot stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }

    fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            e
        })
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<MetricSnapshot>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PluginError::snapshot_load(&self.path, e.to_string())),
        };

        // An empty file is what a freshly provisioned tempfile looks like
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|e| PluginError::snapshot_load(&self.path, e.to_string()))
    }

    fn persist(&self, snapshot: &MetricSnapshot) -> Result<()> {
        let bytes = serde_json::to_vec(snapshot).map_err(|e| {
            PluginError::snapshot_persist(&self.path, std::io::Error::new(ErrorKind::InvalidData, e))
        })?;
        self.write_atomic(&bytes)
            .map_err(|e| PluginError::snapshot_persist(&self.path, e))?;
        debug!(path = ?self.path, metrics = snapshot.len(), "Snapshot persisted");
        Ok(())
    }
}
