pub mod memory_storage;

pub use memory_storage::MemoryStorage;
