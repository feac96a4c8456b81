pub mod slot_arena;
pub mod stream_summary;

pub use slot_arena::{SlotArena, SlotId};
pub use stream_summary::{
    BucketIter, BucketView, CounterMeta, DEFAULT_BUCKET_PREALLOC, MemberIter, Promotion,
    RankedIter, StreamSummary,
};
