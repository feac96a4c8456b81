use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::TopKMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for top-K metrics snapshots.
///
/// Writes the Prometheus text exposition format so output can be scraped
/// directly or forwarded to an OpenTelemetry collector.
///
/// # Example
///
/// ```
/// use topkit::metrics::exporter::PrometheusTextExporter;
/// use topkit::metrics::snapshot::TopKMetricsSnapshot;
/// use topkit::metrics::traits::MetricsExporter;
///
/// let exporter = PrometheusTextExporter::new("trending", Vec::new());
/// exporter.export(&TopKMetricsSnapshot { offer_calls: 3, ..Default::default() });
///
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("trending_offer_calls_total 3"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<TopKMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TopKMetricsSnapshot) {
        self.write_counter("offer_calls_total", snapshot.offer_calls);
        self.write_counter("offer_new_total", snapshot.offer_new);
        self.write_counter("offer_existing_total", snapshot.offer_existing);
        self.write_counter("evictions_total", snapshot.evictions);
        self.write_counter("promotions_total", snapshot.promotions);
        self.write_counter(
            "promotion_scan_steps_total",
            snapshot.promotion_scan_steps,
        );
        self.write_counter("buckets_created_total", snapshot.buckets_created);
        self.write_counter("buckets_removed_total", snapshot.buckets_removed);
        self.write_counter("peek_calls_total", snapshot.peek_calls);
        self.write_counter("top_k_calls_total", snapshot.top_k_calls);
        self.write_counter("encode_calls_total", snapshot.encode_calls);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_gauge("tracked_items", snapshot.tracked as u64);
        self.write_gauge("buckets", snapshot.buckets as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}
