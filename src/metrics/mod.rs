//! Observability counters for [`TopKCounter`](crate::topk::TopKCounter).
//!
//! Compiled only with the `metrics` feature. Recording is split from
//! snapshotting and exporting:
//!
//! - [`traits::TopKMetricsRecorder`] / [`traits::TopKMetricsReadRecorder`]:
//!   written by the counter on `&mut self` and `&self` paths respectively.
//! - [`traits::MetricsSnapshotProvider`]: copies the counters plus gauges into
//!   a [`snapshot::TopKMetricsSnapshot`].
//! - [`traits::MetricsExporter`]: publishes a snapshot, e.g. through
//!   [`exporter::PrometheusTextExporter`].

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
