/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces the engine uses to reach external
/// systems: the physical graph store, the per-traversal seen index and
/// wire-form exporters.
pub mod graph_exporter;
pub mod graph_storage;
pub mod seen_tracker;

pub use graph_exporter::GraphExporter;
pub use graph_storage::{GraphStorageConnection, StorageCapability};
pub use seen_tracker::SeenTracker;
