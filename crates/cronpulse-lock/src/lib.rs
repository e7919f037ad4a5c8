//! cronpulse-lock — mutual exclusion keyed by exposition file path.
//!
//! Independent cron job invocations are separate processes, so the
//! production lock is an OS advisory lock on a sidecar file, released by
//! the kernel when the holding descriptor closes (crash-safe). Tests and
//! single-process embedders use the in-memory [`LockRegistry`] instead.
//!
//! Both backends are produced through the [`LockFactory`] trait so the
//! metric writer never knows which one it is using.

pub mod error;
pub mod file;
pub mod locker;
pub mod memory;

pub use error::{LockError, LockResult};
pub use file::{FileLockFactory, FileLocker};
pub use locker::{LockFactory, Locker};
pub use memory::{LockRegistry, MemoryLocker};
