//! cronpulse-store — filesystem capability surface for the metric engine.
//!
//! The exposition file is mutated through a tiny [`Storage`] trait (read,
//! write, create directory, existence check) with two implementations:
//! [`OsStorage`] for production and [`MemoryStorage`] for deterministic
//! tests. Backends are selected at construction time and passed in, never
//! swapped through globals.

pub mod error;
pub mod storage;

pub use error::{StorageError, StorageResult};
pub use storage::{MemoryStorage, OsStorage, Storage};
