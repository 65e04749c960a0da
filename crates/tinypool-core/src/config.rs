//! Pool layout configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding a bucket list such as `700,1400:2,2000:2`.
pub const BUCKETS_ENV: &str = "TINYPOOL_BUCKETS";

/// One size class of a segmented pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Length of every buffer handed out by this bucket.
    pub size: usize,

    /// Maximum number of idle buffers kept; `None` keeps every returned buffer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl BucketConfig {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            capacity: None,
        }
    }

    pub fn with_capacity(size: usize, capacity: usize) -> Self {
        Self {
            size,
            capacity: Some(capacity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Bucket layout. Order does not matter; the pool sorts by size.
    pub buckets: Vec<BucketConfig>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            buckets: vec![
                BucketConfig::new(700),
                BucketConfig::with_capacity(1400, 2),
                BucketConfig::with_capacity(2000, 2),
            ],
        }
    }
}

impl PoolConfig {
    /// Parse a config from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        if cfg.buckets.is_empty() {
            return Err(Error::Config("no buckets configured".into()));
        }
        Ok(cfg)
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TINYPOOL_BUCKETS`: comma separated `size[:capacity]` entries
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var(BUCKETS_ENV) {
            if let Ok(buckets) = parse_bucket_list(&s) {
                cfg.buckets = buckets;
            }
        }

        cfg
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse `size[:capacity]` entries separated by commas.
///
/// Only the syntax is checked here; range checks (size and capacity of at
/// least one) happen when the bucket definitions are built.
pub fn parse_bucket_list(s: &str) -> Result<Vec<BucketConfig>> {
    let mut buckets = Vec::new();
    for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (size, capacity) = match entry.split_once(':') {
            Some((size, cap)) => (size.trim(), Some(cap.trim())),
            None => (entry, None),
        };
        let size = size
            .parse::<usize>()
            .map_err(|e| Error::Parse(format!("bucket size '{size}': {e}")))?;
        let capacity = capacity
            .map(|c| {
                c.parse::<usize>()
                    .map_err(|e| Error::Parse(format!("bucket capacity '{c}': {e}")))
            })
            .transpose()?;
        buckets.push(BucketConfig { size, capacity });
    }

    if buckets.is_empty() {
        return Err(Error::Config("no buckets configured".into()));
    }
    Ok(buckets)
}
