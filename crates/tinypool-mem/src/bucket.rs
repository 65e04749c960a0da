//! Size classes for [`SegmentedPool`](crate::SegmentedPool).

use tinypool_core::BucketConfig;

use crate::error::{Error, Result};
use crate::lease::Lease;
use crate::pool::ObjectPool;
use crate::tracking::StatsSnapshot;

/// Immutable description of one bucket: the buffer length it serves and
/// how many idle buffers it may keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketDefinition {
    size: usize,
    capacity: Option<usize>,
}

impl BucketDefinition {
    /// A bucket that keeps every returned buffer.
    pub fn new(size: usize) -> Result<Self> {
        if size < 1 {
            return Err(Error::InvalidArgument(
                "bucket buffer size below 1".to_string(),
            ));
        }
        Ok(Self {
            size,
            capacity: None,
        })
    }

    /// A bucket that keeps at most `capacity` idle buffers.
    pub fn with_capacity(size: usize, capacity: usize) -> Result<Self> {
        let def = Self::new(size)?;
        if capacity < 1 {
            return Err(Error::InvalidArgument(
                "bucket capacity below 1".to_string(),
            ));
        }
        Ok(Self {
            capacity: Some(capacity),
            ..def
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub(crate) fn create_bucket<T>(&self) -> Bucket<T>
    where
        T: Clone + Default + Send + 'static,
    {
        let size = self.size;
        let factory = move || vec![T::default(); size];
        // Capacity was validated when the definition was built.
        let pool = ObjectPool::build(Box::new(factory), self.capacity);
        Bucket { size, pool }
    }
}

impl TryFrom<BucketConfig> for BucketDefinition {
    type Error = Error;

    fn try_from(cfg: BucketConfig) -> Result<Self> {
        match cfg.capacity {
            Some(capacity) => Self::with_capacity(cfg.size, capacity),
            None => Self::new(cfg.size),
        }
    }
}

/// One size class of a segmented pool, backed by its own pool of buffers.
///
/// Buckets are only built by [`SegmentedPool`](crate::SegmentedPool); from
/// the outside they are read-only.
pub struct Bucket<T> {
    size: usize,
    pool: ObjectPool<Vec<T>>,
}

impl<T> Bucket<T> {
    /// Length of every buffer this bucket hands out.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> Option<usize> {
        self.pool.capacity()
    }

    /// Idle buffers currently held by this bucket.
    pub fn stored_count(&self) -> usize {
        self.pool.stored_count()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.pool.stats()
    }
}

impl<T: Send + 'static> Bucket<T> {
    pub(crate) fn get_buffer(&self) -> Lease<Vec<T>> {
        self.pool.get_object()
    }
}

impl<T> std::fmt::Debug for Bucket<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bucket")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("stored", &self.stored_count())
            .finish()
    }
}
