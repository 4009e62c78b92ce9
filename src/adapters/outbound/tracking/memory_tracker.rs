use crate::graph_engine::domain::GraphPath;
use crate::graph_engine::services::CycleTracking;
use crate::ports::outbound::SeenTracker;
use crate::shared::{GraphError, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// In-memory seen-tracker: a concurrent string-key set.
///
/// The default choice for everyday graph sizes; the check-and-set is a
/// single `DashMap::insert`, so it is atomic even though trackers are
/// never shared between traversals.
pub struct MemorySeenTracker {
    token: String,
    seen: DashMap<String, ()>,
    released: AtomicBool,
}

impl MemorySeenTracker {
    pub fn new() -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            seen: DashMap::new(),
            released: AtomicBool::new(false),
        }
    }

    /// Whether `on_traverse_complete` has run
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Default for MemorySeenTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SeenTracker for MemorySeenTracker {
    fn has_seen(&self, path: &GraphPath, filter_key: &str) -> Result<bool> {
        if self.is_released() {
            anyhow::bail!(GraphError::tracker(format!(
                "tracker {} used after teardown",
                self.token
            )));
        }
        let key = CycleTracking::seen_key(path, filter_key);
        Ok(self.seen.insert(key, ()).is_some())
    }

    fn on_traverse_complete(&self) -> Result<()> {
        self.released.store(true, Ordering::SeqCst);
        self.seen.clear();
        Ok(())
    }

    fn token(&self) -> &str {
        &self.token
    }
}
