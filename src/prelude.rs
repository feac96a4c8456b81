pub use crate::builder::TopKBuilder;
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentTopKCounter;
pub use crate::ds::{CounterMeta, StreamSummary};
pub use crate::error::{ConfigError, DecodeError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::TopKMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
pub use crate::topk::{Offer, TopKCounter, TopKEntry};
pub use crate::traits::SnapshotItem;
