use crate::graph_engine::domain::GraphPath;
use crate::shared::Result;

/// SeenTracker port: per-traversal bookkeeping that prevents infinite
/// re-expansion of previously visited (path, filter) combinations.
///
/// Instances are created per traversal invocation and never shared
/// across concurrent traversals. Implementations must make `has_seen` an
/// atomic check-and-set: the first call with a given key records it and
/// answers false; any later identical call answers true.
pub trait SeenTracker: Send + Sync {
    /// Checks whether an equivalent path was already traversed under an
    /// equivalent filter, recording it in the same step.
    ///
    /// Implementations derive the structural key through
    /// [`CycleTracking::seen_key`](crate::graph_engine::services::CycleTracking::seen_key)
    /// so that every backend keys cyclic paths identically.
    fn has_seen(&self, path: &GraphPath, filter_key: &str) -> Result<bool>;

    /// Releases any external index held by this tracker. Must be called
    /// (and is, via the engine's guard) even when a traversal aborts.
    fn on_traverse_complete(&self) -> Result<()>;

    /// Unique token identifying this tracker instance; never derived from
    /// wall-clock time.
    fn token(&self) -> &str;
}
