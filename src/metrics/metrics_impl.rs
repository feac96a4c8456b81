use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{TopKMetricsReadRecorder, TopKMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct TopKMetrics {
    pub offer_calls: u64,
    pub offer_new: u64,
    pub offer_existing: u64,
    pub evictions: u64,
    pub promotions: u64,
    pub promotion_scan_steps: u64,
    pub buckets_created: u64,
    pub buckets_removed: u64,
    pub clear_calls: u64,
    pub peek_calls: MetricsCell,
    pub top_k_calls: MetricsCell,
    pub encode_calls: MetricsCell,
}

impl TopKMetrics {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl TopKMetricsRecorder for TopKMetrics {
    fn record_offer_call(&mut self) {
        self.offer_calls += 1;
    }

    fn record_offer_new(&mut self) {
        self.offer_new += 1;
    }

    fn record_offer_existing(&mut self) {
        self.offer_existing += 1;
    }

    fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    fn record_promotion(&mut self, scan_steps: usize) {
        self.promotions += 1;
        self.promotion_scan_steps += scan_steps as u64;
    }

    fn record_bucket_created(&mut self) {
        self.buckets_created += 1;
    }

    fn record_bucket_removed(&mut self) {
        self.buckets_removed += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl TopKMetricsReadRecorder for TopKMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_top_k_call(&self) {
        self.top_k_calls.incr();
    }

    fn record_encode_call(&self) {
        self.encode_calls.incr();
    }
}
