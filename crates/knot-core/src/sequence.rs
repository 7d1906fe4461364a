use crate::error::StoreResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Allocates collision-free ids for short codes.
///
/// Every call returns a value never returned before, even under
/// concurrent callers. Implementations must advance atomically and
/// fail rather than hand out a duplicate; counting existing records is
/// not an acceptable strategy.
#[async_trait]
pub trait IdAllocator: Send + Sync + 'static {
    /// Returns the next unallocated id. The first id is 1.
    async fn next_id(&self) -> StoreResult<u64>;
}

/// An in-process allocator backed by an atomic counter.
///
/// Uniqueness holds for the lifetime of the process. Pair it with the
/// in-memory store; durable stores should use their own store-native
/// sequence so ids survive restarts.
#[derive(Debug)]
pub struct AtomicSequence {
    counter: AtomicU64,
}

impl AtomicSequence {
    /// Creates a sequence whose first id is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a sequence resuming from a known next id.
    pub fn starting_at(next: u64) -> Self {
        Self {
            counter: AtomicU64::new(next),
        }
    }
}

impl Default for AtomicSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdAllocator for AtomicSequence {
    async fn next_id(&self) -> StoreResult<u64> {
        Ok(self.counter.fetch_add(1, Ordering::SeqCst))
    }
}
