//! Stream Summary: the bucket-indexed counter layout behind Space-Saving.
//!
//! Counters that share an estimated count live in the same bucket; buckets are
//! kept in a doubly-linked list ordered by strictly increasing count. Moving a
//! counter to a higher count only touches the buckets between its old and new
//! value, which in Space-Saving workloads is almost always the adjacent one.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                         StreamSummary<K> Layout                             │
//! │                                                                             │
//! │   index: FxHashMap<K, SlotId>          counters: SlotArena<Counter<K>>      │
//! │   ┌────────┬────────┐                  ┌──────┬──────────────────────────┐  │
//! │   │ "x"    │ c0     │─────────────────►│ c0   │ count:4 err:0 bucket:b2  │  │
//! │   │ "a"    │ c1     │─────────────────►│ c1   │ count:4 err:1 bucket:b2  │  │
//! │   │ "c"    │ c2     │─────────────────►│ c2   │ count:2 err:1 bucket:b1  │  │
//! │   └────────┴────────┘                  └──────┴──────────────────────────┘  │
//! │                                                                             │
//! │   buckets: SlotArena<Bucket>  (ascending count, doubly linked)              │
//! │                                                                             │
//! │   min_bucket                                              max_bucket        │
//! │       │                                                       │             │
//! │       ▼                                                       ▼             │
//! │   [b1 count=2] ◄──────────────────────────────────────► [b2 count=4]        │
//! │     head ──► c2 ◄── tail                     head ──► c1 ◄──► c0 ◄── tail   │
//! │                                               (newest)        (oldest)      │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inside a bucket the head is the counter most recently promoted into it and
//! the tail is the one that has sat there longest. Eviction recycles the tail
//! of the minimum bucket; ranked walks go from the maximum bucket down and
//! read each bucket head to tail.
//!
//! ## Operations
//!
//! | Operation      | Time                         | Notes                              |
//! |----------------|------------------------------|------------------------------------|
//! | `insert`       | O(1)                         | Admits at count 0                  |
//! | `increment`    | O(1) amortized               | Worst case O(distinct counts)      |
//! | `replace_min`  | O(1)                         | Recycles the least-favored counter |
//! | `get`          | O(1)                         | Count/error lookup                 |
//! | `iter`         | O(k) for the first k         | Max count first                    |
//!
//! ## Example
//!
//! ```
//! use topkit::ds::StreamSummary;
//!
//! let mut summary = StreamSummary::new();
//! summary.insert("a");
//! summary.insert("b");
//! summary.increment(&"a", 3);
//! summary.increment(&"b", 1);
//!
//! let ranked: Vec<_> = summary.iter().map(|meta| (*meta.item, meta.count)).collect();
//! assert_eq!(ranked, vec![("a", 3), ("b", 1)]);
//!
//! // At capacity, the least-favored counter is recycled for a new item.
//! assert_eq!(summary.replace_min("c"), Some("b"));
//! let c = summary.get(&"c").unwrap();
//! assert_eq!((c.count, c.error), (1, 1));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe. Wrap the owning [`TopKCounter`](crate::topk::TopKCounter)
//! in a lock (see `ConcurrentTopKCounter` behind the `concurrency` feature).

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Default bucket pre-allocation.
///
/// The number of live buckets is the number of distinct counts present, which
/// stays small for skewed streams.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

#[derive(Debug, Clone)]
#[repr(C)]
struct Counter<K> {
    // Hot fields - touched on every promotion
    prev: Option<SlotId>,
    next: Option<SlotId>,
    bucket: SlotId,
    count: u64,
    error: u64,
    // Cold field - only read on eviction and ranked walks
    item: K,
}

#[derive(Debug, Clone)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<SlotId>,
    next: Option<SlotId>,
    count: u64,
    len: usize,
}

/// Read-only view of a tracked counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterMeta<'a, K> {
    pub item: &'a K,
    /// Estimated count (an overestimate of the true frequency).
    pub count: u64,
    /// Upper bound on how far `count` may exceed the true frequency.
    pub error: u64,
}

/// Outcome of moving a counter to a new count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    /// The counter's count after the move.
    pub count: u64,
    /// Buckets inspected while looking for the destination.
    pub scan_steps: usize,
    /// A bucket was created for the new count.
    pub bucket_created: bool,
    /// The source bucket emptied and was unlinked.
    pub bucket_removed: bool,
}

/// Bucket-indexed Space-Saving counters with an item index.
///
/// `StreamSummary` does not enforce a capacity; that policy lives in
/// [`TopKCounter`](crate::topk::TopKCounter), which decides between
/// [`insert`](Self::insert) and [`replace_min`](Self::replace_min).
///
/// # Example
///
/// ```
/// use topkit::ds::StreamSummary;
///
/// let mut summary = StreamSummary::new();
/// assert!(summary.insert("page"));
/// assert!(!summary.insert("page"));
///
/// let promotion = summary.increment(&"page", 5).unwrap();
/// assert_eq!(promotion.count, 5);
/// assert!(promotion.bucket_created);
/// assert!(promotion.bucket_removed);  // the count-0 bucket emptied
/// assert_eq!(summary.bucket_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StreamSummary<K> {
    counters: SlotArena<Counter<K>>,
    buckets: SlotArena<Bucket>,
    index: FxHashMap<K, SlotId>,
    min_bucket: Option<SlotId>,
    max_bucket: Option<SlotId>,
}

impl<K> StreamSummary<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty summary.
    pub fn new() -> Self {
        Self {
            counters: SlotArena::new(),
            buckets: SlotArena::new(),
            index: FxHashMap::default(),
            min_bucket: None,
            max_bucket: None,
        }
    }

    /// Creates an empty summary with room for `capacity` counters.
    ///
    /// Uses [`DEFAULT_BUCKET_PREALLOC`] for the bucket arena.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_bucket_hint(capacity, DEFAULT_BUCKET_PREALLOC)
    }

    /// Creates an empty summary with room for `capacity` counters and
    /// `bucket_hint` distinct counts.
    pub fn with_capacity_and_bucket_hint(capacity: usize, bucket_hint: usize) -> Self {
        Self {
            counters: SlotArena::with_capacity(capacity),
            buckets: SlotArena::with_capacity(bucket_hint),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            min_bucket: None,
            max_bucket: None,
        }
    }

    /// Number of tracked items.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Number of live buckets, i.e. distinct counts present.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains_key(item)
    }

    /// Returns the counter tracking `item`, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use topkit::ds::StreamSummary;
    ///
    /// let mut summary = StreamSummary::new();
    /// summary.insert("hello".to_string());
    /// summary.increment("hello", 2);
    ///
    /// // Borrowed lookups avoid building a `String`.
    /// assert_eq!(summary.get("hello").map(|m| m.count), Some(2));
    /// assert!(summary.get("missing").is_none());
    /// ```
    #[inline]
    pub fn get<Q>(&self, item: &Q) -> Option<CounterMeta<'_, K>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let id = *self.index.get(item)?;
        self.meta(id)
    }

    /// Smallest count present.
    pub fn min_count(&self) -> Option<u64> {
        self.buckets.get(self.min_bucket?).map(|bucket| bucket.count)
    }

    /// Largest count present.
    pub fn max_count(&self) -> Option<u64> {
        self.buckets.get(self.max_bucket?).map(|bucket| bucket.count)
    }

    /// The counter [`replace_min`](Self::replace_min) would recycle next.
    pub fn peek_min(&self) -> Option<CounterMeta<'_, K>> {
        let bucket = self.buckets.get(self.min_bucket?)?;
        self.meta(bucket.tail?)
    }

    /// Starts tracking `item` at count 0.
    ///
    /// Returns `false` (and changes nothing) if `item` is already tracked.
    pub fn insert(&mut self, item: K) -> bool {
        if self.index.contains_key(&item) {
            return false;
        }
        self.insert_untracked(item);
        true
    }

    /// Adds `by` to the count of `item` and moves it to the matching bucket.
    ///
    /// Returns `None` if `item` is not tracked. An increment of 0 keeps the
    /// count and moves the counter to the most-recent end of its bucket.
    /// Counts saturate at `u64::MAX`.
    #[inline]
    pub fn increment<Q>(&mut self, item: &Q, by: u64) -> Option<Promotion>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let id = *self.index.get(item)?;
        self.promote(id, by)
    }

    /// Hands the least-favored counter of the minimum bucket to `item`.
    ///
    /// The recycled counter keeps its count, takes `item` as its identity and
    /// records the bucket's count as its error. Returns the item that was
    /// dropped, or `None` if the summary is empty or `item` is already tracked.
    pub fn replace_min(&mut self, item: K) -> Option<K> {
        if self.index.contains_key(&item) {
            return None;
        }
        self.recycle_min(item).ok().map(|(_, dropped)| dropped)
    }

    /// Iterates counters from the highest count to the lowest.
    ///
    /// Equal counts are yielded most recently promoted first.
    pub fn iter(&self) -> RankedIter<'_, K> {
        RankedIter {
            summary: self,
            bucket: self.max_bucket,
            counter: None,
        }
    }

    /// Iterates buckets from the lowest count to the highest.
    pub fn iter_buckets(&self) -> BucketIter<'_, K> {
        BucketIter {
            summary: self,
            current: self.min_bucket,
        }
    }

    pub fn clear(&mut self) {
        self.counters.clear();
        self.buckets.clear();
        self.index.clear();
        self.min_bucket = None;
        self.max_bucket = None;
    }

    /// Clears all state and releases spare storage.
    pub fn clear_shrink(&mut self) {
        self.clear();
        self.counters.shrink_to_fit();
        self.buckets.shrink_to_fit();
        self.index.shrink_to_fit();
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.counters.approx_bytes()
            + self.buckets.approx_bytes()
            + self.index.capacity() * std::mem::size_of::<(K, SlotId)>()
    }

    /// Verifies the structural invariants, reporting the first violation.
    ///
    /// Checks bucket ordering and linkage, that every counter sits in a bucket
    /// with its own count, that `error <= count`, and that the item index is
    /// the exact inverse of the counters.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.counters.len() {
            return Err(InvariantError::new(format!(
                "index holds {} items but {} counters are live",
                self.index.len(),
                self.counters.len()
            )));
        }

        let mut seen_buckets = 0usize;
        let mut seen_counters = 0usize;
        let mut prev_bucket: Option<SlotId> = None;
        let mut prev_count: Option<u64> = None;
        let mut cursor = self.min_bucket;

        while let Some(bucket_id) = cursor {
            let bucket = self
                .buckets
                .get(bucket_id)
                .ok_or_else(|| InvariantError::new("bucket link points at a freed slot"))?;
            if bucket.prev != prev_bucket {
                return Err(InvariantError::new(format!(
                    "bucket {} has a broken prev link",
                    bucket.count
                )));
            }
            if let Some(previous) = prev_count {
                if bucket.count <= previous {
                    return Err(InvariantError::new(format!(
                        "bucket counts not strictly increasing: {} then {}",
                        previous, bucket.count
                    )));
                }
            }
            if bucket.len == 0 || bucket.head.is_none() {
                return Err(InvariantError::new(format!(
                    "empty bucket {} left in the list",
                    bucket.count
                )));
            }

            let mut members = 0usize;
            let mut last = None;
            let mut member = bucket.head;
            while let Some(id) = member {
                let counter = self
                    .counters
                    .get(id)
                    .ok_or_else(|| InvariantError::new("member link points at a freed slot"))?;
                if counter.bucket != bucket_id || counter.count != bucket.count {
                    return Err(InvariantError::new(format!(
                        "counter with count {} filed under bucket {}",
                        counter.count, bucket.count
                    )));
                }
                if counter.error > counter.count {
                    return Err(InvariantError::new(format!(
                        "error {} exceeds count {}",
                        counter.error, counter.count
                    )));
                }
                if counter.prev != last {
                    return Err(InvariantError::new("counter has a broken prev link"));
                }
                if self.index.get(&counter.item) != Some(&id) {
                    return Err(InvariantError::new("index entry does not match its counter"));
                }
                last = Some(id);
                member = counter.next;
                members += 1;
            }
            if bucket.tail != last || bucket.len != members {
                return Err(InvariantError::new(format!(
                    "bucket {} tail/len disagree with its members",
                    bucket.count
                )));
            }

            seen_buckets += 1;
            seen_counters += members;
            prev_bucket = Some(bucket_id);
            prev_count = Some(bucket.count);
            cursor = bucket.next;
        }

        if self.max_bucket != prev_bucket {
            return Err(InvariantError::new("max bucket is not the end of the list"));
        }
        if seen_buckets != self.buckets.len() {
            return Err(InvariantError::new("unlinked buckets are still allocated"));
        }
        if seen_counters != self.counters.len() {
            return Err(InvariantError::new("counters exist outside any bucket"));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    /// Panics if [`check_invariants`](Self::check_invariants) fails.
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("stream summary invariant violated: {err}");
        }
    }

    #[inline]
    pub(crate) fn index_of(&self, item: &K) -> Option<SlotId> {
        self.index.get(item).copied()
    }

    pub(crate) fn insert_untracked(&mut self, item: K) -> SlotId {
        let bucket = match self.min_bucket {
            Some(id) if self.buckets.get(id).is_some_and(|b| b.count == 0) => id,
            _ => self.link_bucket_after(None, 0),
        };
        let id = self.counters.insert(Counter {
            prev: None,
            next: None,
            bucket,
            count: 0,
            error: 0,
            item: item.clone(),
        });
        self.index.insert(item, id);
        self.push_front(bucket, id);
        id
    }

    /// Gives the oldest counter of the minimum bucket to `item`. Hands `item`
    /// back if the summary is empty.
    pub(crate) fn recycle_min(&mut self, item: K) -> Result<(SlotId, K), K> {
        let Some((id, floor)) = self
            .min_bucket
            .and_then(|min| self.buckets.get(min))
            .and_then(|bucket| Some((bucket.tail?, bucket.count)))
        else {
            return Err(item);
        };
        let Some(counter) = self.counters.get_mut(id) else {
            return Err(item);
        };
        let dropped = std::mem::replace(&mut counter.item, item.clone());
        counter.error = floor;
        self.index.remove(&dropped);
        self.index.insert(item, id);
        Ok((id, dropped))
    }

    pub(crate) fn promote(&mut self, id: SlotId, by: u64) -> Option<Promotion> {
        let (origin, old_count) = {
            let counter = self.counters.get(id)?;
            (counter.bucket, counter.count)
        };
        let new_count = old_count.saturating_add(by);
        let mut promotion = Promotion {
            count: new_count,
            scan_steps: 0,
            bucket_created: false,
            bucket_removed: false,
        };

        let mut cursor = self.buckets.get(origin)?.next;
        self.detach(origin, id);

        let target = if new_count == old_count {
            origin
        } else {
            // last_below trails the scan: the last bucket with count < new_count.
            let mut last_below = origin;
            let mut found = None;
            while let Some(candidate) = cursor {
                let Some(bucket) = self.buckets.get(candidate) else {
                    break;
                };
                promotion.scan_steps += 1;
                if bucket.count == new_count {
                    found = Some(candidate);
                    break;
                }
                if bucket.count > new_count {
                    break;
                }
                last_below = candidate;
                cursor = bucket.next;
            }
            match found {
                Some(bucket) => bucket,
                None => {
                    promotion.bucket_created = true;
                    self.link_bucket_after(Some(last_below), new_count)
                },
            }
        };

        if let Some(counter) = self.counters.get_mut(id) {
            counter.count = new_count;
            counter.bucket = target;
        }
        self.push_front(target, id);

        if target != origin && self.buckets.get(origin).is_some_and(|b| b.len == 0) {
            self.unlink_bucket(origin);
            promotion.bucket_removed = true;
        }
        Some(promotion)
    }

    /// Appends a bucket at the maximum end. Used when rebuilding from a snapshot,
    /// where buckets arrive in ascending order.
    pub(crate) fn push_bucket_back(&mut self, count: u64) -> SlotId {
        self.link_bucket_after(self.max_bucket, count)
    }

    /// Appends a counter at the oldest end of `bucket`, taking the bucket's
    /// count. Returns `false` if `item` is already tracked.
    pub(crate) fn push_member_back(&mut self, bucket: SlotId, item: K, error: u64) -> bool {
        if self.index.contains_key(&item) {
            return false;
        }
        let Some(count) = self.buckets.get(bucket).map(|b| b.count) else {
            return false;
        };
        let id = self.counters.insert(Counter {
            prev: None,
            next: None,
            bucket,
            count,
            error,
            item: item.clone(),
        });
        self.index.insert(item, id);
        self.push_back(bucket, id);
        true
    }

    fn meta(&self, id: SlotId) -> Option<CounterMeta<'_, K>> {
        self.counters.get(id).map(|counter| CounterMeta {
            item: &counter.item,
            count: counter.count,
            error: counter.error,
        })
    }

    /// Links a new empty bucket after `prev` (`None` = at the minimum end).
    fn link_bucket_after(&mut self, prev: Option<SlotId>, count: u64) -> SlotId {
        let next = match prev {
            Some(prev) => self.buckets.get(prev).and_then(|bucket| bucket.next),
            None => self.min_bucket,
        };
        let id = self.buckets.insert(Bucket {
            head: None,
            tail: None,
            prev,
            next,
            count,
            len: 0,
        });

        match prev.and_then(|prev| self.buckets.get_mut(prev)) {
            Some(prev_bucket) => prev_bucket.next = Some(id),
            None => self.min_bucket = Some(id),
        }
        match next.and_then(|next| self.buckets.get_mut(next)) {
            Some(next_bucket) => next_bucket.prev = Some(id),
            None => self.max_bucket = Some(id),
        }
        id
    }

    fn unlink_bucket(&mut self, id: SlotId) {
        let Some(bucket) = self.buckets.remove(id) else {
            return;
        };
        match bucket.prev.and_then(|prev| self.buckets.get_mut(prev)) {
            Some(prev_bucket) => prev_bucket.next = bucket.next,
            None => self.min_bucket = bucket.next,
        }
        match bucket.next.and_then(|next| self.buckets.get_mut(next)) {
            Some(next_bucket) => next_bucket.prev = bucket.prev,
            None => self.max_bucket = bucket.prev,
        }
    }

    fn push_front(&mut self, bucket_id: SlotId, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(bucket_id) else {
            return;
        };
        let old_head = bucket.head;
        if let Some(counter) = self.counters.get_mut(id) {
            counter.prev = None;
            counter.next = old_head;
        }
        match old_head.and_then(|head| self.counters.get_mut(head)) {
            Some(head) => head.prev = Some(id),
            None => bucket.tail = Some(id),
        }
        bucket.head = Some(id);
        bucket.len += 1;
    }

    fn push_back(&mut self, bucket_id: SlotId, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(bucket_id) else {
            return;
        };
        let old_tail = bucket.tail;
        if let Some(counter) = self.counters.get_mut(id) {
            counter.prev = old_tail;
            counter.next = None;
        }
        match old_tail.and_then(|tail| self.counters.get_mut(tail)) {
            Some(tail) => tail.next = Some(id),
            None => bucket.head = Some(id),
        }
        bucket.tail = Some(id);
        bucket.len += 1;
    }

    fn detach(&mut self, bucket_id: SlotId, id: SlotId) {
        let Some((prev, next)) = self
            .counters
            .get(id)
            .map(|counter| (counter.prev, counter.next))
        else {
            return;
        };
        let Some(bucket) = self.buckets.get_mut(bucket_id) else {
            return;
        };
        match prev.and_then(|prev| self.counters.get_mut(prev)) {
            Some(prev_counter) => prev_counter.next = next,
            None => bucket.head = next,
        }
        match next.and_then(|next| self.counters.get_mut(next)) {
            Some(next_counter) => next_counter.prev = prev,
            None => bucket.tail = prev,
        }
        bucket.len -= 1;
        if let Some(counter) = self.counters.get_mut(id) {
            counter.prev = None;
            counter.next = None;
        }
    }
}

impl<K> Default for StreamSummary<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Ranked iterator over counters, highest count first.
///
/// Created by [`StreamSummary::iter`].
pub struct RankedIter<'a, K> {
    summary: &'a StreamSummary<K>,
    bucket: Option<SlotId>,
    counter: Option<SlotId>,
}

impl<'a, K> Iterator for RankedIter<'a, K> {
    type Item = CounterMeta<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.counter {
                let counter = self.summary.counters.get(id)?;
                self.counter = counter.next;
                return Some(CounterMeta {
                    item: &counter.item,
                    count: counter.count,
                    error: counter.error,
                });
            }
            let bucket = self.summary.buckets.get(self.bucket?)?;
            self.counter = bucket.head;
            self.bucket = bucket.prev;
        }
    }
}

/// Ascending iterator over buckets.
///
/// Created by [`StreamSummary::iter_buckets`].
pub struct BucketIter<'a, K> {
    summary: &'a StreamSummary<K>,
    current: Option<SlotId>,
}

impl<'a, K> Iterator for BucketIter<'a, K> {
    type Item = BucketView<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.summary.buckets.get(self.current?)?;
        self.current = bucket.next;
        Some(BucketView {
            summary: self.summary,
            count: bucket.count,
            len: bucket.len,
            head: bucket.head,
        })
    }
}

/// One bucket: a shared count and its members in stored order.
pub struct BucketView<'a, K> {
    summary: &'a StreamSummary<K>,
    count: u64,
    len: usize,
    head: Option<SlotId>,
}

impl<'a, K> BucketView<'a, K> {
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members from most recently promoted to least recently promoted.
    pub fn members(&self) -> MemberIter<'a, K> {
        MemberIter {
            summary: self.summary,
            current: self.head,
        }
    }
}

/// Iterator over one bucket's members.
pub struct MemberIter<'a, K> {
    summary: &'a StreamSummary<K>,
    current: Option<SlotId>,
}

impl<'a, K> Iterator for MemberIter<'a, K> {
    type Item = CounterMeta<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let counter = self.summary.counters.get(self.current?)?;
        self.current = counter.next;
        Some(CounterMeta {
            item: &counter.item,
            count: counter.count,
            error: counter.error,
        })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: invariants hold after any mix of insert, increment and replace_min
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_invariants_always_hold(
            ops in prop::collection::vec((0u8..3, 0u32..16, 0u64..5), 0..200)
        ) {
            let mut summary: StreamSummary<u32> = StreamSummary::new();

            for (op, item, by) in ops {
                match op {
                    0 => { summary.insert(item); }
                    1 => { summary.increment(&item, by); }
                    2 => { summary.replace_min(item); }
                    _ => unreachable!(),
                }
                prop_assert!(summary.check_invariants().is_ok());
            }
        }

        /// Property: ranked iteration is non-increasing in count and visits every counter once
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_ranked_iter_is_sorted(
            ops in prop::collection::vec((0u32..32, 1u64..8), 0..150)
        ) {
            let mut summary: StreamSummary<u32> = StreamSummary::new();
            for (item, by) in ops {
                summary.insert(item);
                summary.increment(&item, by);
            }

            let counts: Vec<u64> = summary.iter().map(|meta| meta.count).collect();
            prop_assert_eq!(counts.len(), summary.len());
            prop_assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]));
        }

        /// Property: without eviction, counts are exact sums of increments
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_counts_are_exact_without_eviction(
            ops in prop::collection::vec((0u32..10, 0u64..6), 0..100)
        ) {
            let mut summary: StreamSummary<u32> = StreamSummary::new();
            let mut expected = std::collections::HashMap::new();

            for (item, by) in ops {
                summary.insert(item);
                summary.increment(&item, by);
                *expected.entry(item).or_insert(0u64) += by;
            }

            for (item, count) in expected {
                let meta = summary.get(&item).unwrap();
                prop_assert_eq!(meta.count, count);
                prop_assert_eq!(meta.error, 0);
            }
        }
    }
}
