#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TopKMetricsSnapshot {
    pub offer_calls: u64,
    pub offer_new: u64,
    pub offer_existing: u64,
    pub evictions: u64,

    pub promotions: u64,
    pub promotion_scan_steps: u64, // buckets inspected while placing promoted counters
    pub buckets_created: u64,
    pub buckets_removed: u64,

    pub peek_calls: u64,
    pub top_k_calls: u64,
    pub encode_calls: u64,
    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub tracked: usize,
    pub buckets: usize,
    pub capacity: usize,
}

impl TopKMetricsSnapshot {
    /// Mean buckets inspected per promotion.
    pub fn avg_scan_steps(&self) -> f64 {
        if self.promotions == 0 {
            0.0
        } else {
            self.promotion_scan_steps as f64 / self.promotions as f64
        }
    }
}
