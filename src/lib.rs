#![forbid(unsafe_code)]
//! tinypool: recycle expensive objects and fixed-size buffers across threads.
//!
//! ```
//! use tinypool::{BucketDefinition, SegmentedPool};
//!
//! let pool: SegmentedPool<u8> = SegmentedPool::new([
//!     BucketDefinition::new(64)?,
//!     BucketDefinition::with_capacity(1024, 4)?,
//! ])?;
//!
//! let buf = pool.get_buffer(100)?;
//! assert_eq!(buf.value()?.len(), 1024);
//! drop(buf);
//! assert_eq!(pool.buckets()[1].stored_count(), 1);
//! # Ok::<(), tinypool::Error>(())
//! ```

pub use tinypool_core::config::{BucketConfig, PoolConfig};
pub use tinypool_mem::{
    Bucket, BucketDefinition, Error, Lease, ObjectPool, Result, SegmentedPool, StatsSnapshot,
};
