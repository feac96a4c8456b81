//! # Metrics Trait Hierarchy
//!
//! ```text
//!   ┌────────────────────────────┐      ┌────────────────────────────┐
//!   │   TopKMetricsRecorder      │      │  TopKMetricsReadRecorder   │
//!   │   (&mut self: offer,       │      │  (&self: peek, top_k,      │
//!   │    evict, promote, clear)  │      │   encode)                  │
//!   └─────────────┬──────────────┘      └──────────────┬─────────────┘
//!                 └──────────────┬─────────────────────┘
//!                                ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │───►│ MetricsExporter<S>           │
//!   │ (tests, benches)             │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Recorders only write counters; providers only read them; exporters only
//! publish snapshots.

/// Counters written on mutating paths.
pub trait TopKMetricsRecorder {
    fn record_offer_call(&mut self);
    fn record_offer_new(&mut self);
    fn record_offer_existing(&mut self);
    fn record_eviction(&mut self);
    fn record_promotion(&mut self, scan_steps: usize);
    fn record_bucket_created(&mut self);
    fn record_bucket_removed(&mut self);
    fn record_clear(&mut self);
}

/// Counters written on read-only paths (uses interior mutability).
pub trait TopKMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_top_k_call(&self);
    fn record_encode_call(&self);
}

/// Produce a point-in-time copy of the metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
