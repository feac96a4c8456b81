//! Builder for [`TopKCounter`].
//!
//! ## Example
//!
//! ```rust
//! use topkit::builder::TopKBuilder;
//!
//! let mut counter = TopKBuilder::new(100)
//!     .bucket_hint(64)
//!     .build::<String>()
//!     .unwrap();
//! counter.offer("GET /index.html".to_string());
//! assert_eq!(counter.count("GET /index.html"), Some(1));
//!
//! assert!(TopKBuilder::new(0).build::<u64>().is_err());
//! ```

use std::hash::Hash;

use crate::ds::{DEFAULT_BUCKET_PREALLOC, StreamSummary};
use crate::error::ConfigError;
use crate::topk::TopKCounter;

/// Configures and creates a [`TopKCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopKBuilder {
    capacity: usize,
    bucket_hint: usize,
}

impl TopKBuilder {
    /// Starts a builder for a counter tracking at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
        }
    }

    /// Number of buckets to pre-allocate.
    ///
    /// Streams with many distinct counts benefit from a larger hint. The
    /// bucket arena grows on demand either way.
    pub fn bucket_hint(mut self, buckets: usize) -> Self {
        self.bucket_hint = buckets;
        self
    }

    /// Builds the counter.
    ///
    /// Fails with [`ConfigError`] if the capacity is 0.
    pub fn build<K>(self) -> Result<TopKCounter<K>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        let summary = StreamSummary::with_capacity_and_bucket_hint(self.capacity, self.bucket_hint);
        Ok(TopKCounter::from_parts(self.capacity, summary))
    }
}
