#![forbid(unsafe_code)]
//! tinypool-mem: object pool, scoped leases, and the segmented buffer pool.
//!
//! Every pooled value leaves a pool wrapped in a [`Lease`]. Releasing the
//! lease (explicitly or by dropping it) hands the value back to the pool it
//! came from, unless that pool is already holding its maximum number of
//! idle values, in which case the value is simply dropped.
//!
//! [`SegmentedPool`] layers size classes on top: one [`ObjectPool`] of
//! buffers per [`BucketDefinition`], and a request is served by the smallest
//! bucket that is large enough.

pub mod bucket;
pub mod error;
pub mod lease;
pub mod pool;
pub mod segmented;
pub mod tracking;

pub use bucket::{Bucket, BucketDefinition};
pub use error::{Error, Result};
pub use lease::Lease;
pub use pool::ObjectPool;
pub use segmented::SegmentedPool;
pub use tracking::StatsSnapshot;
