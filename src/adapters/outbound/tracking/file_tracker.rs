use crate::graph_engine::domain::GraphPath;
use crate::graph_engine::services::CycleTracking;
use crate::ports::outbound::SeenTracker;
use crate::shared::{GraphError, Result};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::sync::Mutex;
use tempfile::TempDir;
use uuid::Uuid;

/// File-backed seen-tracker for very large graphs, where holding every
/// path key in memory is not an option.
///
/// One marker file per key under a tracker-private scratch directory;
/// `create_new` gives an OS-level atomic check-and-set. The directory is
/// removed wholesale at `on_traverse_complete`, so an aborted traversal
/// leaves nothing behind once the engine's guard runs.
pub struct FileSeenTracker {
    token: String,
    index_dir: Mutex<Option<TempDir>>,
}

impl FileSeenTracker {
    pub fn new() -> Result<Self> {
        let token = Uuid::new_v4().to_string();
        let index_dir = tempfile::Builder::new()
            .prefix(&format!("seen-{}-", token))
            .tempdir()
            .map_err(|error| {
                GraphError::tracker(format!("cannot create seen index: {}", error))
            })?;
        Ok(Self {
            token,
            index_dir: Mutex::new(Some(index_dir)),
        })
    }

    /// Content-hashed marker name; key text can contain path separators
    fn marker_name(key: &str) -> String {
        blake3::hash(key.as_bytes()).to_hex().to_string()
    }
}

impl SeenTracker for FileSeenTracker {
    fn has_seen(&self, path: &GraphPath, filter_key: &str) -> Result<bool> {
        let guard = self
            .index_dir
            .lock()
            .map_err(|_| GraphError::tracker("seen index lock poisoned"))?;
        let Some(dir) = guard.as_ref() else {
            anyhow::bail!(GraphError::tracker(format!(
                "tracker {} used after teardown",
                self.token
            )));
        };
        let key = CycleTracking::seen_key(path, filter_key);
        let marker = dir.path().join(Self::marker_name(&key));
        match OpenOptions::new().write(true).create_new(true).open(&marker) {
            Ok(_) => Ok(false),
            Err(error) if error.kind() == ErrorKind::AlreadyExists => Ok(true),
            Err(error) => anyhow::bail!(GraphError::tracker(format!(
                "cannot record seen key: {}",
                error
            ))),
        }
    }

    fn on_traverse_complete(&self) -> Result<()> {
        let mut guard = self
            .index_dir
            .lock()
            .map_err(|_| GraphError::tracker("seen index lock poisoned"))?;
        if let Some(dir) = guard.take() {
            dir.close()
                .map_err(|error| GraphError::tracker(format!("cannot remove seen index: {}", error)))?;
        }
        Ok(())
    }

    fn token(&self) -> &str {
        &self.token
    }
}
