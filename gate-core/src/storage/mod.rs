//! Key/value storage: a pluggable persistent substrate and a TTL cache
//! layered on top of it.
//!
//! Nothing in the core flow depends on storage; [`ExpiringStore`] is a
//! utility available to hosts. Its public operations never propagate
//! backend faults: they log and return a failure indicator instead.

mod backend;
mod expiring;
mod json_file;
mod memory;

pub use backend::{StorageBackend, StorageError};
pub use expiring::{DEFAULT_TTL, ExpiringStore};
pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
