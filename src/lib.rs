//! topkit: approximate top-K counting with the Space-Saving algorithm.
//!
//! [`TopKCounter`](topk::TopKCounter) tracks the most frequent items of an
//! unbounded stream in fixed memory, with a per-item overestimation bound,
//! and can be snapshotted to a compact binary form and restored exactly.
//!
//! See `DESIGN.md` for internal architecture and invariants.
//!
//! ## Feature flags
//!
//! - `metrics`: offer/eviction/promotion counters and a Prometheus text
//!   exporter.
//! - `concurrency`: `ConcurrentTopKCounter`, a `parking_lot` mutex wrapper.

pub mod builder;
pub mod codec;
#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod prelude;
pub mod topk;
pub mod traits;
