//! In-memory keyed mutex registry for single-process and test use.
//!
//! Every locker created from the same registry for the same path contends
//! on the same mutex object. There is no crash recovery; callers must
//! release what they acquire, which is acceptable only in-process.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use parking_lot::lock_api::ArcMutexGuard;

use crate::error::LockResult;
use crate::locker::{LockFactory, Locker};

type Slot = Arc<Mutex<()>>;
type SlotGuard = ArcMutexGuard<parking_lot::RawMutex, ()>;

/// Registry mapping exposition file paths to shared mutexes.
///
/// The registry is an explicit object handed to writers (usually behind an
/// `Arc`), never a module-level static.
#[derive(Debug, Default)]
pub struct LockRegistry {
    slots: Mutex<HashMap<String, Slot>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or create the mutex for `path`.
    fn slot(&self, path: &Path) -> Slot {
        let key = path.display().to_string();
        let mut slots = self.slots.lock();
        slots.entry(key).or_default().clone()
    }

    /// Drop all registered mutexes. Test isolation only: lockers that
    /// currently hold a slot keep it, but new lockers start fresh.
    pub fn reset(&self) {
        self.slots.lock().clear();
    }
}

impl LockFactory for LockRegistry {
    fn locker(&self, path: &Path) -> Box<dyn Locker> {
        Box::new(MemoryLocker {
            slot: self.slot(path),
            guard: None,
        })
    }
}

/// Locker over one registry slot.
pub struct MemoryLocker {
    slot: Slot,
    guard: Option<SlotGuard>,
}

impl Locker for MemoryLocker {
    fn lock(&mut self) -> LockResult<()> {
        if self.guard.is_none() {
            self.guard = Some(self.slot.lock_arc());
        }
        Ok(())
    }

    fn unlock(&mut self) -> LockResult<()> {
        self.guard.take();
        Ok(())
    }
}
