//! Instance id allocation.
//!
//! Each registered device holds a unique instance id for its entire live
//! span; the id is returned to the pool only at final release. The global
//! allocator is process-wide state shared by every registration call site
//! and is safe for concurrent use.

use counterd_types::{CounterError, CounterResult};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Lock-protected allocator handing out the smallest available id first.
#[derive(Debug, Default)]
pub struct InstanceIdAllocator {
    capacity: Option<u32>,
    pool: Mutex<IdPool>,
}

#[derive(Debug, Default)]
struct IdPool {
    /// Lowest id never handed out.
    next: u32,
    /// Released ids below `next`, available for reuse.
    free: BTreeSet<u32>,
}

impl InstanceIdAllocator {
    /// Creates an unbounded allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator that refuses to exceed `capacity` live ids.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity: Some(capacity),
            pool: Mutex::new(IdPool::default()),
        }
    }

    /// Allocates the smallest id not currently live.
    pub fn allocate(&self) -> CounterResult<u32> {
        let mut pool = self.lock();
        if let Some(capacity) = self.capacity {
            let live = pool.next as usize - pool.free.len();
            if live >= capacity as usize {
                return Err(CounterError::resource_exhausted("instance ids"));
            }
        }
        if let Some(&id) = pool.free.iter().next() {
            pool.free.remove(&id);
            Ok(id)
        } else {
            let id = pool.next;
            pool.next += 1;
            Ok(id)
        }
    }

    /// Returns an id to the pool.
    ///
    /// Releasing an id that is not live is a caller bug; it is logged and
    /// ignored.
    pub fn release(&self, id: u32) {
        let mut pool = self.lock();
        if id >= pool.next {
            warn!(id, "release of instance id that was never allocated");
            return;
        }
        if !pool.free.insert(id) {
            warn!(id, "double release of instance id");
        }
    }

    /// Returns the number of currently live ids.
    pub fn live(&self) -> usize {
        let pool = self.lock();
        pool.next as usize - pool.free.len()
    }

    fn lock(&self) -> MutexGuard<'_, IdPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL_IDS: Lazy<InstanceIdAllocator> = Lazy::new(InstanceIdAllocator::new);

/// Returns the process-wide instance id allocator.
pub fn instance_ids() -> &'static InstanceIdAllocator {
    &GLOBAL_IDS
}
