//! Thread-safe object pool.
//!
//! Idle values sit in a FIFO queue behind a mutex. A checkout on an empty
//! pool runs the factory while that mutex is held, so concurrent checkouts
//! serialize on construction cost. Returns beyond the configured capacity
//! are dropped instead of stored.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::lease::Lease;
use crate::tracking::{PoolStats, StatsSnapshot};

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// State shared between a pool handle and every lease it issued.
pub(crate) struct PoolInner<T> {
    factory: Factory<T>,
    capacity: Option<usize>,
    idle: Mutex<VecDeque<T>>,
    stats: PoolStats,
}

impl<T> PoolInner<T> {
    /// Take back a value from a released lease.
    ///
    /// Never fails: at capacity the value is dropped and existing idle
    /// values are left untouched.
    pub(crate) fn return_object(&self, value: T) {
        let mut idle = self.idle.lock();
        if self.capacity.is_some_and(|cap| idle.len() >= cap) {
            drop(idle);
            self.stats.record_discard();
            #[cfg(feature = "tracing")]
            tracing::debug!(capacity = ?self.capacity, "pool full, discarding returned value");
            return;
        }

        idle.push_back(value);
        let stored = idle.len();
        drop(idle);

        self.stats.record_return(stored);
        #[cfg(feature = "tracing")]
        tracing::trace!(stored, "value returned to pool");
    }
}

/// A pool of interchangeable values of one type.
///
/// `ObjectPool` is a cheap handle: clones share the same idle store, and
/// every [`Lease`] keeps that store alive until it is released.
pub struct ObjectPool<T> {
    inner: Arc<PoolInner<T>>,
}

impl<T: Send + 'static> ObjectPool<T> {
    /// Create an empty pool that keeps every returned value.
    ///
    /// The factory runs while the pool lock is held and that lock is not
    /// reentrant: a factory that calls back into the same pool (including
    /// through a clone of this handle) deadlocks. Other pools are fine.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::build(Box::new(factory), None)
    }

    /// Create an empty pool that keeps at most `capacity` idle values.
    /// Values released while the pool is full are dropped.
    pub fn bounded<F>(factory: F, capacity: usize) -> Result<Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        if capacity < 1 {
            return Err(Error::InvalidArgument(format!(
                "pool capacity below 1 (got {capacity})"
            )));
        }
        Ok(Self::build(Box::new(factory), Some(capacity)))
    }

    pub(crate) fn build(factory: Factory<T>, capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                factory,
                capacity,
                idle: Mutex::new(VecDeque::new()),
                stats: PoolStats::default(),
            }),
        }
    }

    /// Check out a value, reusing the oldest idle one or building a new one.
    ///
    /// Never waits for a value to come back. A panic in the factory
    /// propagates to the caller and leaves the pool usable.
    pub fn get_object(&self) -> Lease<T> {
        let value = {
            let mut idle = self.inner.idle.lock();
            match idle.pop_front() {
                Some(value) => {
                    self.inner.stats.record_reuse();
                    value
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("pool empty, constructing new value");
                    let value = (self.inner.factory)();
                    self.inner.stats.record_create();
                    value
                }
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!("value checked out");
        Lease::new(value, Arc::clone(&self.inner))
    }
}

impl<T> ObjectPool<T> {
    /// Number of idle values currently held.
    pub fn stored_count(&self) -> usize {
        self.inner.idle.lock().len()
    }

    /// Maximum idle values kept; `None` means unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }
}

impl<T> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("capacity", &self.inner.capacity)
            .field("stored", &self.stored_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn new_pool_is_empty() {
        let pool = ObjectPool::new(|| 0u32);
        assert_eq!(pool.stored_count(), 0);
        assert_eq!(pool.capacity(), None);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = ObjectPool::bounded(|| 0u32, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn empty_pool_runs_factory_once_per_checkout() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let pool = ObjectPool::new(move || counter.fetch_add(1, Ordering::SeqCst));

        let a = pool.get_object();
        let b = pool.get_object();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*a.value().unwrap(), 0);
        assert_eq!(*b.value().unwrap(), 1);
    }

    #[test]
    fn reuse_is_fifo() {
        let next = AtomicUsize::new(0);
        let pool = ObjectPool::new(move || next.fetch_add(1, Ordering::SeqCst));

        let first = pool.get_object();
        let second = pool.get_object();
        drop(first);
        drop(second);

        assert_eq!(*pool.get_object().value().unwrap(), 0);
    }

    #[test]
    fn full_pool_discards_extra_returns() {
        let pool = ObjectPool::bounded(|| vec![0u8; 4], 1).unwrap();

        let a = pool.get_object();
        let b = pool.get_object();
        drop(a);
        drop(b);

        assert_eq!(pool.stored_count(), 1);
        let stats = pool.stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.returned, 1);
        assert_eq!(stats.discarded, 1);
    }

    #[test]
    fn clones_share_the_idle_store() {
        let pool = ObjectPool::new(String::new);
        let other = pool.clone();

        drop(pool.get_object());
        assert_eq!(other.stored_count(), 1);
    }

    #[test]
    fn factory_may_draw_from_another_pool() {
        let parts = ObjectPool::bounded(|| vec![0u8; 8], 2).unwrap();
        let source = parts.clone();
        let pool = ObjectPool::new(move || source.get_object().value().map(Vec::len).unwrap_or(0));

        assert_eq!(*pool.get_object().value().unwrap(), 8);
        assert_eq!(parts.stored_count(), 1);
        assert_eq!(pool.stored_count(), 1);
    }

    #[test]
    fn lease_outlives_pool_handle() {
        let pool = ObjectPool::new(|| 7u64);
        let lease = pool.get_object();
        drop(pool);

        assert_eq!(*lease.value().unwrap(), 7);
        drop(lease);
    }
}
