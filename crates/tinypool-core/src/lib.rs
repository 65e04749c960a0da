#![forbid(unsafe_code)]
//! tinypool-core: configuration and error types shared by the pool crates.
//!
//! Nothing in here allocates pooled resources. The pooling engine itself
//! lives in `tinypool-mem`; this crate only describes *how* a pool should be
//! laid out so the description can be loaded from JSON or the environment.

pub mod config;
pub mod error;

pub use config::{BucketConfig, PoolConfig};
pub use error::{Error, Result};
