//! Thread-safe wrapper around [`TopKCounter`].
//!
//! Every call takes one `parking_lot::Mutex` for its whole duration, so an
//! offer is never observed half-applied and snapshots are consistent. Read
//! paths also lock exclusively: ranking walks the bucket list, and the
//! read-side metrics are not `Sync`.
//!
//! ```
//! use std::thread;
//! use topkit::concurrent::ConcurrentTopKCounter;
//!
//! let counter = ConcurrentTopKCounter::new(8);
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let counter = counter.clone();
//!         thread::spawn(move || {
//!             for _ in 0..100 {
//!                 counter.offer("hot".to_string());
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(counter.count("hot"), Some(400));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ConfigError, DecodeError};
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TopKMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::MetricsSnapshotProvider;
use crate::topk::{Offer, TopKCounter, TopKEntry};
use crate::traits::SnapshotItem;

/// A [`TopKCounter`] shared behind `Arc<Mutex<_>>`. Clones share state.
#[derive(Clone)]
pub struct ConcurrentTopKCounter<K> {
    inner: Arc<Mutex<TopKCounter<K>>>,
}

impl<K> fmt::Debug for ConcurrentTopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counter = self.inner.lock();
        f.debug_struct("ConcurrentTopKCounter")
            .field("size", &counter.size())
            .field("capacity", &counter.capacity())
            .finish_non_exhaustive()
    }
}

impl<K> From<TopKCounter<K>> for ConcurrentTopKCounter<K> {
    fn from(counter: TopKCounter<K>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(counter)),
        }
    }
}

impl<K> ConcurrentTopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        TopKCounter::new(capacity).into()
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        TopKCounter::try_new(capacity).map(Self::from)
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.lock().contains(item)
    }

    pub fn count<Q>(&self, item: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.lock().count(item)
    }

    pub fn get<Q>(&self, item: &Q) -> Option<TopKEntry<K>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.lock().get(item)
    }

    pub fn offer(&self, item: K) -> bool {
        self.inner.lock().offer(item)
    }

    pub fn offer_n(&self, item: K, increment: u64) -> bool {
        self.inner.lock().offer_n(item, increment)
    }

    pub fn offer_return_dropped(&self, item: K, increment: u64) -> Option<K> {
        self.inner.lock().offer_return_dropped(item, increment)
    }

    pub fn offer_return_all(&self, item: K, increment: u64) -> Offer<K> {
        self.inner.lock().offer_return_all(item, increment)
    }

    /// Offers a batch under a single lock acquisition.
    pub fn offer_batch<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        self.inner.lock().offer_batch(items)
    }

    pub fn peek(&self, k: usize) -> Vec<K> {
        self.inner.lock().peek(k)
    }

    pub fn top_k(&self, k: usize) -> Vec<TopKEntry<K>> {
        self.inner.lock().top_k(k)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Runs `f` with the lock held.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut TopKCounter<K>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Returns the counter if this is the last handle, otherwise gives the
    /// wrapper back.
    pub fn into_inner(self) -> Result<TopKCounter<K>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<K> ConcurrentTopKCounter<K>
where
    K: SnapshotItem + Eq + Hash + Clone,
{
    pub fn encode(&self) -> Vec<u8> {
        self.inner.lock().encode()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        TopKCounter::decode(bytes).map(Self::from)
    }
}

#[cfg(feature = "metrics")]
impl<K> MetricsSnapshotProvider<TopKMetricsSnapshot> for ConcurrentTopKCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> TopKMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn concurrent_offers_respect_capacity() {
        let counter = ConcurrentTopKCounter::new(16);
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for i in 0..500u64 {
                        counter.offer(i % 40 + t);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.size(), 16);
        counter.with_lock(|inner| inner.check_invariants()).unwrap();
    }

    #[test]
    fn into_inner_requires_last_handle() {
        let counter = ConcurrentTopKCounter::new(2);
        counter.offer("a".to_string());
        let other = counter.clone();

        let counter = counter.into_inner().unwrap_err();
        drop(other);
        let inner = counter.into_inner().unwrap();
        assert_eq!(inner.count("a"), Some(1));
    }

    #[test]
    fn encode_round_trips_through_wrapper() {
        let counter = ConcurrentTopKCounter::new(4);
        counter.offer_batch(["a", "b", "b"].map(String::from));
        let restored = ConcurrentTopKCounter::<String>::decode(&counter.encode()).unwrap();
        assert_eq!(restored.top_k(4), counter.top_k(4));
    }
}
