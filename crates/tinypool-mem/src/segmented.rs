//! Size-bucketed buffer pool.
//!
//! A [`SegmentedPool`] owns one [`Bucket`] per [`BucketDefinition`], sorted
//! by buffer size. A request for `n` elements is served by the first bucket
//! whose size is at least `n`, so the returned buffer may be longer than
//! requested. The bucket list is fixed at construction.

use tinypool_core::PoolConfig;

use crate::bucket::{Bucket, BucketDefinition};
use crate::error::{Error, Result};
use crate::lease::Lease;

#[derive(Debug)]
pub struct SegmentedPool<T> {
    buckets: Vec<Bucket<T>>,
    max_size: usize,
}

impl<T> SegmentedPool<T>
where
    T: Clone + Default + Send + 'static,
{
    /// Build a pool from one or more bucket definitions, in any order.
    ///
    /// Definitions with equal sizes become separate buckets; the one listed
    /// first is the one that serves requests.
    pub fn new<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = BucketDefinition>,
    {
        let mut buckets: Vec<Bucket<T>> = definitions
            .into_iter()
            .map(|def| def.create_bucket())
            .collect();
        // Stable: equal sizes keep their input order.
        buckets.sort_by_key(Bucket::size);

        let Some(max_size) = buckets.last().map(Bucket::size) else {
            return Err(Error::InvalidArgument(
                "segmented pool needs at least one bucket definition".to_string(),
            ));
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            buckets = buckets.len(),
            max_size,
            "segmented pool built"
        );

        Ok(Self { buckets, max_size })
    }

    /// Build a pool from a serialized layout, validating every bucket.
    pub fn from_config(cfg: &PoolConfig) -> Result<Self> {
        let definitions = cfg
            .buckets
            .iter()
            .copied()
            .map(BucketDefinition::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(definitions)
    }

    /// Lease a buffer of at least `requested` elements from the smallest
    /// bucket that fits. The buffer length is the bucket size.
    pub fn get_buffer(&self, requested: usize) -> Result<Lease<Vec<T>>> {
        if requested > self.max_size {
            return Err(Error::InvalidArgument(format!(
                "requested size {requested} exceeds maximum buffer size {}",
                self.max_size
            )));
        }

        let bucket = self
            .buckets
            .iter()
            .find(|b| b.size() >= requested)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("no bucket can serve size {requested}"))
            })?;

        #[cfg(feature = "tracing")]
        tracing::trace!(requested, bucket = bucket.size(), "buffer requested");
        Ok(bucket.get_buffer())
    }
}

impl<T> SegmentedPool<T> {
    /// Largest request this pool can serve.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Buckets in ascending size order.
    pub fn buckets(&self) -> &[Bucket<T>] {
        &self.buckets
    }

    /// Idle buffers across all buckets.
    pub fn stored_count(&self) -> usize {
        self.buckets.iter().map(Bucket::stored_count).sum()
    }
}
