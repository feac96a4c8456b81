//! # Space-Saving Top-K Counter
//!
//! Fixed-capacity approximate heavy-hitter tracking over an unbounded
//! stream. Each tracked item owns a counter; when the counter table is full,
//! a new item takes over the least-favored counter of the minimum bucket and
//! inherits its count as an overestimation bound.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                        TopKCounter<K>                                │
//!   │                                                                      │
//!   │   capacity: usize   (fixed, > 0)                                     │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │ StreamSummary<K>                                             │   │
//!   │   │   index: K -> SlotId                                         │   │
//!   │   │   buckets (ascending):  [0] ◄──► [2] ◄──► [5] ◄──► [9]       │   │
//!   │   │                          │        │        │        │        │   │
//!   │   │                         d,e      c,f       b        a        │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   metrics: TopKMetrics   (feature "metrics")                         │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Offer Flow
//!
//! ```text
//!   offer_return_all(item, n)
//!        │
//!        ▼
//!   tracked? ── yes ───────────────────────────────┐
//!        │ no                                      │
//!        ▼                                         │
//!   size < capacity?                               │
//!        │ yes: new counter in the count-0 bucket  │
//!        │ no:  recycle oldest counter of the min  │
//!        │      bucket, error = min count          │
//!        ▼                                         ▼
//!   promote(counter, n): scan toward max, join or create bucket,
//!   drop the emptied origin bucket
//! ```
//!
//! ## Guarantees
//!
//! For every tracked item, `count - error <= true frequency <= count`.
//! Any item whose true frequency exceeds the minimum tracked count is
//! guaranteed to be tracked.
//!
//! ## Example
//!
//! ```
//! use topkit::topk::TopKCounter;
//!
//! let mut counter = TopKCounter::new(3);
//! for item in ["X", "X", "Y", "Z", "A", "B", "C", "X", "X", "A", "C", "A", "A", "X"] {
//!     counter.offer(item.to_string());
//! }
//!
//! let mut top = counter.peek(3);
//! top.sort();
//! assert_eq!(top, vec!["A", "C", "X"]);
//! ```

use std::borrow::Borrow;
use std::hash::Hash;

use crate::codec;
use crate::ds::{CounterMeta, RankedIter, StreamSummary};
use crate::error::{ConfigError, DecodeError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::TopKMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TopKMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    MetricsReset, MetricsSnapshotProvider, TopKMetricsReadRecorder, TopKMetricsRecorder,
};
use crate::traits::SnapshotItem;

/// Outcome of [`TopKCounter::offer_return_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer<K> {
    /// `true` if the item was not tracked before this offer.
    pub is_new: bool,
    /// The item whose counter was recycled to make room, if any.
    pub dropped: Option<K>,
}

/// One row of a [`TopKCounter::top_k`] result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKEntry<K> {
    pub item: K,
    /// Estimated frequency; never below the true frequency.
    pub count: u64,
    /// Maximum overestimation included in `count`.
    pub error: u64,
}

impl<K> TopKEntry<K> {
    /// Lower bound on the true frequency.
    #[inline]
    pub fn guaranteed_count(&self) -> u64 {
        self.count.saturating_sub(self.error)
    }
}

impl<K: Clone> From<CounterMeta<'_, K>> for TopKEntry<K> {
    fn from(meta: CounterMeta<'_, K>) -> Self {
        Self {
            item: meta.item.clone(),
            count: meta.count,
            error: meta.error,
        }
    }
}

/// Approximate top-K counter using the Space-Saving algorithm.
///
/// Tracks at most `capacity` distinct items. Offering a tracked item costs a
/// hash lookup plus a short bucket scan; offering an untracked item at
/// capacity additionally recycles one counter.
///
/// Not thread-safe; wrap in a lock (see `ConcurrentTopKCounter` with the
/// `concurrency` feature) for shared use.
#[derive(Debug, Clone)]
pub struct TopKCounter<K> {
    capacity: usize,
    summary: StreamSummary<K>,
    #[cfg(feature = "metrics")]
    metrics: TopKMetrics,
}

impl<K> TopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a counter that tracks at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. Use [`try_new`](Self::try_new) to handle
    /// that case as an error.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        Self::from_parts(capacity, StreamSummary::with_capacity(capacity))
    }

    /// Creates a counter, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(Self::new(capacity))
    }

    pub(crate) fn from_parts(capacity: usize, summary: StreamSummary<K>) -> Self {
        Self {
            capacity,
            summary,
            #[cfg(feature = "metrics")]
            metrics: TopKMetrics::default(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of distinct items currently tracked.
    #[inline]
    pub fn size(&self) -> usize {
        self.summary.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    #[inline]
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.summary.contains(item)
    }

    /// Returns the tracked state of `item`.
    pub fn get<Q>(&self, item: &Q) -> Option<TopKEntry<K>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.summary.get(item).map(TopKEntry::from)
    }

    /// Estimated count of `item`, or `None` if untracked.
    pub fn count<Q>(&self, item: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.summary.get(item).map(|meta| meta.count)
    }

    /// Overestimation bound of `item`, or `None` if untracked.
    pub fn error<Q>(&self, item: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.summary.get(item).map(|meta| meta.error)
    }

    /// `count - error` for `item`: occurrences seen while it was tracked.
    pub fn guaranteed_count<Q>(&self, item: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.summary.get(item).map(|meta| meta.count - meta.error)
    }

    /// Smallest tracked count; the error a newly admitted item would get at
    /// capacity.
    #[inline]
    pub fn min_count(&self) -> Option<u64> {
        self.summary.min_count()
    }

    /// Offers one occurrence of `item`. Returns `true` if it was not tracked.
    #[inline]
    pub fn offer(&mut self, item: K) -> bool {
        self.offer_return_all(item, 1).is_new
    }

    /// Offers `increment` occurrences of `item`. Returns `true` if it was not
    /// tracked.
    #[inline]
    pub fn offer_n(&mut self, item: K, increment: u64) -> bool {
        self.offer_return_all(item, increment).is_new
    }

    /// Offers `increment` occurrences of `item` and returns the item evicted
    /// to make room, if any.
    #[inline]
    pub fn offer_return_dropped(&mut self, item: K, increment: u64) -> Option<K> {
        self.offer_return_all(item, increment).dropped
    }

    /// Offers `increment` occurrences of `item`.
    ///
    /// An untracked item takes a fresh counter while there is room, otherwise
    /// it recycles the oldest counter of the minimum bucket: the counter keeps
    /// its count and records it as the new item's error. An increment of 0
    /// leaves counts unchanged but refreshes the item's position among equal
    /// counts.
    pub fn offer_return_all(&mut self, item: K, increment: u64) -> Offer<K> {
        #[cfg(feature = "metrics")]
        self.metrics.record_offer_call();

        let (id, is_new, dropped) = match self.summary.index_of(&item) {
            Some(id) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_offer_existing();
                (id, false, None)
            },
            None if self.summary.len() < self.capacity => {
                #[cfg(feature = "metrics")]
                self.metrics.record_offer_new();
                (self.summary.insert_untracked(item), true, None)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_offer_new();
                match self.summary.recycle_min(item) {
                    Ok((id, dropped)) => {
                        #[cfg(feature = "metrics")]
                        self.metrics.record_eviction();
                        (id, true, Some(dropped))
                    },
                    Err(item) => (self.summary.insert_untracked(item), true, None),
                }
            },
        };

        let promotion = self.summary.promote(id, increment);
        #[cfg(feature = "metrics")]
        if let Some(promotion) = promotion {
            self.metrics.record_promotion(promotion.scan_steps);
            if promotion.bucket_created {
                self.metrics.record_bucket_created();
            }
            if promotion.bucket_removed {
                self.metrics.record_bucket_removed();
            }
        }
        #[cfg(not(feature = "metrics"))]
        let _ = promotion;

        Offer { is_new, dropped }
    }

    /// Offers one occurrence of each item. Returns how many were newly
    /// admitted.
    pub fn offer_batch<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        items
            .into_iter()
            .map(|item| self.offer(item))
            .filter(|is_new| *is_new)
            .count()
    }

    /// Up to `k` items, most frequent first.
    ///
    /// Equal counts are ordered most recently promoted first.
    pub fn peek(&self, k: usize) -> Vec<K> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        self.summary
            .iter()
            .take(k)
            .map(|meta| meta.item.clone())
            .collect()
    }

    /// Up to `k` entries with counts and errors, in [`peek`](Self::peek) order.
    pub fn top_k(&self, k: usize) -> Vec<TopKEntry<K>> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_top_k_call();

        self.summary.iter().take(k).map(TopKEntry::from).collect()
    }

    /// Lazily iterates every tracked counter in ranked order.
    #[inline]
    pub fn iter(&self) -> RankedIter<'_, K> {
        self.summary.iter()
    }

    /// Forgets every tracked item. Capacity is unchanged.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.summary.clear();
    }

    /// Rough heap footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.summary.approx_bytes()
    }

    /// Read-only access to the underlying structure.
    #[inline]
    pub fn summary(&self) -> &StreamSummary<K> {
        &self.summary
    }

    /// Verifies the bucket list and index, plus `size <= capacity`.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.summary.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "tracking {} items with capacity {}",
                self.summary.len(),
                self.capacity
            )));
        }
        self.summary.check_invariants()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("top-k invariant violated: {err}");
        }
    }
}

impl<K> TopKCounter<K>
where
    K: SnapshotItem + Eq + Hash + Clone,
{
    /// Serializes the full state.
    ///
    /// Layout (all integers u64 little-endian): capacity, bucket count, then
    /// per bucket from the smallest count up: count, member count and per
    /// member `count, error, item length, item bytes`; finally one 0 byte.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Appends the snapshot to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_encode_call();
        codec::encode_into(self.capacity, &self.summary, buf);
    }

    /// Exact length of [`encode`](Self::encode)'s output.
    pub fn encoded_len(&self) -> usize {
        codec::encoded_len(&self.summary)
    }

    /// Rebuilds a counter from [`encode`](Self::encode) output.
    ///
    /// Malformed input fails with a [`DecodeError`]; nothing is built unless
    /// the whole buffer validates.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (capacity, summary) = codec::decode(bytes)?;
        Ok(Self::from_parts(capacity, summary))
    }
}

impl<K> Extend<K> for TopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for item in iter {
            self.offer(item);
        }
    }
}

impl<'a, K> IntoIterator for &'a TopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    type Item = CounterMeta<'a, K>;
    type IntoIter = RankedIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "metrics")]
impl<K> TopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> TopKMetricsSnapshot {
        TopKMetricsSnapshot {
            offer_calls: self.metrics.offer_calls,
            offer_new: self.metrics.offer_new,
            offer_existing: self.metrics.offer_existing,
            evictions: self.metrics.evictions,
            promotions: self.metrics.promotions,
            promotion_scan_steps: self.metrics.promotion_scan_steps,
            buckets_created: self.metrics.buckets_created,
            buckets_removed: self.metrics.buckets_removed,
            peek_calls: self.metrics.peek_calls.get(),
            top_k_calls: self.metrics.top_k_calls.get(),
            encode_calls: self.metrics.encode_calls.get(),
            clear_calls: self.metrics.clear_calls,
            tracked: self.summary.len(),
            buckets: self.summary.bucket_count(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K> MetricsSnapshotProvider<TopKMetricsSnapshot> for TopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> TopKMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K> MetricsReset for TopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_all(counter: &mut TopKCounter<String>, items: &[&str]) {
        for item in items {
            counter.offer(item.to_string());
        }
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn new_counter_is_empty() {
            let counter: TopKCounter<String> = TopKCounter::new(4);
            assert_eq!(counter.capacity(), 4);
            assert_eq!(counter.size(), 0);
            assert!(counter.is_empty());
            assert!(counter.peek(10).is_empty());
            assert_eq!(counter.min_count(), None);
        }

        #[test]
        #[should_panic(expected = "capacity must be > 0")]
        fn new_rejects_zero_capacity() {
            let _ = TopKCounter::<u64>::new(0);
        }

        #[test]
        fn try_new_reports_zero_capacity() {
            let err = TopKCounter::<u64>::try_new(0).unwrap_err();
            assert_eq!(err.message(), "capacity must be > 0");
            assert!(TopKCounter::<u64>::try_new(1).is_ok());
        }

        #[test]
        fn repeated_offers_count_up_by_one() {
            let mut counter = TopKCounter::new(2);
            for expected in 1..=5 {
                counter.offer("hot".to_string());
                assert_eq!(counter.count("hot"), Some(expected));
                assert_eq!(counter.error("hot"), Some(0));
            }
        }

        #[test]
        fn offer_n_adds_increment() {
            let mut counter = TopKCounter::new(2);
            assert!(counter.offer_n(7u64, 10));
            assert!(!counter.offer_n(7u64, 5));
            assert_eq!(counter.count(&7u64), Some(15));
        }

        #[test]
        fn zero_increment_admits_without_counting() {
            let mut counter = TopKCounter::new(2);
            assert!(counter.offer_n("idle".to_string(), 0));
            assert_eq!(counter.count("idle"), Some(0));
            assert_eq!(counter.summary().bucket_count(), 1);
            counter.debug_validate_invariants();
        }

        #[test]
        fn counts_saturate() {
            let mut counter = TopKCounter::new(1);
            counter.offer_n(1u64, u64::MAX - 1);
            counter.offer_n(1u64, 10);
            assert_eq!(counter.count(&1u64), Some(u64::MAX));
        }

        #[test]
        fn clear_keeps_capacity() {
            let mut counter = TopKCounter::new(3);
            offer_all(&mut counter, &["a", "b", "c"]);
            counter.clear();
            assert!(counter.is_empty());
            assert_eq!(counter.capacity(), 3);
            assert!(counter.offer("a".to_string()));
        }

        #[test]
        fn offer_batch_and_extend() {
            let mut counter = TopKCounter::new(4);
            let admitted = counter.offer_batch(["a", "b", "a", "c"].map(String::from));
            assert_eq!(admitted, 3);
            counter.extend(["a".to_string()]);
            assert_eq!(counter.count("a"), Some(3));
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn capacity_one_recycles_counter() {
            let mut counter = TopKCounter::new(1);
            assert_eq!(counter.offer_return_dropped("a".to_string(), 1), None);
            assert_eq!(
                counter.offer_return_dropped("b".to_string(), 1),
                Some("a".to_string())
            );

            assert_eq!(counter.size(), 1);
            assert!(!counter.contains("a"));
            let entry = counter.get("b").unwrap();
            assert_eq!(entry.error, 1);
            assert_eq!(entry.count, 2);
            assert_eq!(entry.guaranteed_count(), 1);
        }

        #[test]
        fn evicts_oldest_member_of_min_bucket() {
            let mut counter = TopKCounter::new(3);
            offer_all(&mut counter, &["a", "b", "c"]);
            // a, b and c share count 1; a reached it first.
            let outcome = counter.offer_return_all("d".to_string(), 1);
            assert!(outcome.is_new);
            assert_eq!(outcome.dropped.as_deref(), Some("a"));
        }

        #[test]
        fn touched_member_is_not_evicted_next() {
            let mut counter = TopKCounter::new(2);
            offer_all(&mut counter, &["a", "b"]);
            counter.offer_n("a".to_string(), 0);
            assert_eq!(
                counter.offer_return_dropped("c".to_string(), 1).as_deref(),
                Some("b")
            );
        }

        #[test]
        fn reintroduced_item_reports_new() {
            let mut counter = TopKCounter::new(1);
            assert!(counter.offer("a".to_string()));
            assert!(!counter.offer("a".to_string()));
            assert!(counter.offer("b".to_string()));
            assert!(counter.offer("a".to_string()));
            assert!(!counter.offer("a".to_string()));
        }
    }

    mod ranking {
        use super::*;

        #[test]
        fn reference_stream_keeps_heavy_hitters() {
            let mut counter = TopKCounter::new(3);
            offer_all(
                &mut counter,
                &["X", "X", "Y", "Z", "A", "B", "C", "X", "X", "A", "C", "A", "A", "X"],
            );

            let top = counter.top_k(3);
            let rows: Vec<(&str, u64, u64)> = top
                .iter()
                .map(|entry| (entry.item.as_str(), entry.count, entry.error))
                .collect();
            assert_eq!(rows, vec![("X", 5, 2), ("A", 5, 2), ("C", 4, 2)]);
            assert_eq!(counter.peek(3), vec!["X", "A", "C"]);
        }

        #[test]
        fn peek_never_pads() {
            let mut counter = TopKCounter::new(10);
            offer_all(&mut counter, &["a", "b"]);
            assert_eq!(counter.peek(5).len(), 2);
            assert_eq!(counter.top_k(0).len(), 0);
        }

        #[test]
        fn ties_rank_most_recent_first() {
            let mut counter = TopKCounter::new(4);
            offer_all(&mut counter, &["a", "b", "c"]);
            assert_eq!(counter.peek(3), vec!["c", "b", "a"]);
        }

        #[test]
        fn iter_matches_top_k() {
            let mut counter = TopKCounter::new(4);
            offer_all(&mut counter, &["a", "b", "b", "c", "c", "c"]);
            let via_iter: Vec<_> = counter.iter().map(|meta| meta.item.clone()).collect();
            assert_eq!(via_iter, counter.peek(usize::MAX));
            assert_eq!((&counter).into_iter().count(), 3);
        }
    }

    mod snapshot {
        use super::*;

        #[test]
        fn encode_decode_preserves_ranking() {
            let mut counter = TopKCounter::new(3);
            offer_all(
                &mut counter,
                &["X", "X", "Y", "Z", "A", "B", "C", "X", "X", "A", "C", "A", "A", "X"],
            );

            let bytes = counter.encode();
            assert_eq!(bytes.len(), counter.encoded_len());

            let restored = TopKCounter::<String>::decode(&bytes).unwrap();
            assert_eq!(restored.capacity(), 3);
            assert_eq!(restored.top_k(3), counter.top_k(3));
            restored.debug_validate_invariants();
        }

        #[test]
        fn decoded_counter_keeps_evicting_in_order() {
            let mut counter = TopKCounter::new(2);
            offer_all(&mut counter, &["a", "b"]);
            let mut restored = TopKCounter::<String>::decode(&counter.encode()).unwrap();

            assert_eq!(
                counter.offer_return_dropped("c".to_string(), 1),
                restored.offer_return_dropped("c".to_string(), 1)
            );
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn offers_and_reads_are_recorded() {
            let mut counter = TopKCounter::new(1);
            counter.offer("a".to_string());
            counter.offer("a".to_string());
            counter.offer("b".to_string());
            let _ = counter.peek(1);
            let _ = counter.top_k(1);
            let _ = counter.encode();

            let snap = counter.snapshot();
            assert_eq!(snap.offer_calls, 3);
            assert_eq!(snap.offer_new, 2);
            assert_eq!(snap.offer_existing, 1);
            assert_eq!(snap.evictions, 1);
            assert_eq!(snap.promotions, 3);
            assert_eq!(snap.peek_calls, 1);
            assert_eq!(snap.top_k_calls, 1);
            assert_eq!(snap.encode_calls, 1);
            assert_eq!(snap.tracked, 1);
            assert_eq!(snap.capacity, 1);

            counter.reset_metrics();
            assert_eq!(counter.snapshot().offer_calls, 0);
        }
    }
}
