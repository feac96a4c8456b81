use std::cell::Cell;

/// A counter that can be bumped through a shared reference.
///
/// Used for read-path metrics (`peek`, `top_k`, `encode`) that only hold
/// `&TopKCounter`. The owning counter is not `Sync`, so every access is
/// already confined to one thread at a time.
#[repr(transparent)]
#[derive(Debug, Default, Clone)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
