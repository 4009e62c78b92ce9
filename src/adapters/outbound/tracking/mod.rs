/// The two interchangeable seen-tracker backends: in-memory for everyday
/// graphs, file-backed for graphs too large to track in memory.
pub mod file_tracker;
pub mod memory_tracker;

pub use file_tracker::FileSeenTracker;
pub use memory_tracker::MemorySeenTracker;
