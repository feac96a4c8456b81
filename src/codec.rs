//! Binary snapshot codec for [`TopKCounter`](crate::topk::TopKCounter).
//!
//! ## Layout
//!
//! All integers are unsigned 64-bit little-endian.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ capacity                                          8 bytes    │
//! │ bucket_count                                      8 bytes    │
//! │ ┌── per bucket, lowest count first ──────────────────────┐   │
//! │ │ count                                           8 bytes│   │
//! │ │ member_count                                    8 bytes│   │
//! │ │ ┌── per member, newest first ──────────────────────┐   │   │
//! │ │ │ count                                     8 bytes│   │   │
//! │ │ │ error                                     8 bytes│   │   │
//! │ │ │ item_len                                  8 bytes│   │   │
//! │ │ │ item                               item_len bytes│   │   │
//! │ │ └──────────────────────────────────────────────────┘   │   │
//! │ └────────────────────────────────────────────────────────┘   │
//! │ terminator (0)                                    1 byte     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Encoding is a pure function of the counter state. Decoding rebuilds the
//! bucket order, the member order inside every bucket, each counter's owning
//! bucket and the item index, so ranked queries on the decoded counter match
//! the encoded one exactly.
//!
//! Decoding reads through a bounds-checked cursor: each field is checked
//! against the bytes that remain before it is consumed, and declared counts
//! are checked against the minimum bytes they imply before anything is
//! allocated. The counter under construction is private to [`decode`] and is
//! only returned once the whole buffer has validated.

use std::hash::Hash;

use crate::ds::StreamSummary;
use crate::error::DecodeError;
use crate::traits::SnapshotItem;

/// Bytes for the capacity and bucket-count header.
pub const HEADER_LEN: usize = 16;
/// Bytes for a bucket's count and member-count fields.
pub const BUCKET_HEADER_LEN: usize = 16;
/// Bytes for a member's count, error and item-length fields.
pub const MEMBER_HEADER_LEN: usize = 24;
/// Value of the final byte.
pub const TERMINATOR: u8 = 0;

/// Exact size of the snapshot [`encode_into`] would write.
pub fn encoded_len<K>(summary: &StreamSummary<K>) -> usize
where
    K: SnapshotItem + Eq + Hash + Clone,
{
    let body: usize = summary
        .iter_buckets()
        .map(|bucket| {
            BUCKET_HEADER_LEN
                + bucket
                    .members()
                    .map(|member| MEMBER_HEADER_LEN + member.item.item_bytes().len())
                    .sum::<usize>()
        })
        .sum();
    HEADER_LEN + body + 1
}

/// Appends the snapshot of `summary` with the given `capacity` to `buf`.
pub fn encode_into<K>(capacity: usize, summary: &StreamSummary<K>, buf: &mut Vec<u8>)
where
    K: SnapshotItem + Eq + Hash + Clone,
{
    buf.reserve(encoded_len(summary));
    put_u64(buf, capacity as u64);
    put_u64(buf, summary.bucket_count() as u64);
    for bucket in summary.iter_buckets() {
        put_u64(buf, bucket.count());
        put_u64(buf, bucket.len() as u64);
        for member in bucket.members() {
            let item = member.item.item_bytes();
            put_u64(buf, member.count);
            put_u64(buf, member.error);
            put_u64(buf, item.len() as u64);
            buf.extend_from_slice(&item);
        }
    }
    buf.push(TERMINATOR);
}

/// Rebuilds `(capacity, summary)` from a snapshot.
pub fn decode<K>(bytes: &[u8]) -> Result<(usize, StreamSummary<K>), DecodeError>
where
    K: SnapshotItem + Eq + Hash + Clone,
{
    let mut reader = SnapshotReader::new(bytes);

    let raw_capacity = reader.read_u64("capacity")?;
    if raw_capacity == 0 {
        return Err(DecodeError::ZeroCapacity);
    }
    let capacity = usize::try_from(raw_capacity).map_err(|_| DecodeError::LengthOverflow {
        field: "capacity",
        value: raw_capacity,
    })?;
    let bucket_count = reader.read_len("bucket count", BUCKET_HEADER_LEN)?;

    // The capacity field is untrusted; size the allocation by what the buffer can hold.
    let reserve = capacity.min(reader.remaining() / MEMBER_HEADER_LEN);
    let mut summary = StreamSummary::with_capacity_and_bucket_hint(reserve, bucket_count);
    let mut tracked = 0usize;
    let mut previous: Option<u64> = None;

    for bucket_index in 0..bucket_count {
        let count = reader.read_u64("bucket count value")?;
        if let Some(previous) = previous {
            if count <= previous {
                return Err(DecodeError::BucketOrder { previous, count });
            }
        }
        let members = reader.read_len("member count", MEMBER_HEADER_LEN)?;
        if members == 0 {
            return Err(DecodeError::EmptyBucket {
                index: bucket_index,
            });
        }
        tracked += members;
        if tracked > capacity {
            return Err(DecodeError::CapacityExceeded {
                capacity: raw_capacity,
                tracked,
            });
        }

        let bucket = summary.push_bucket_back(count);
        for member_index in 0..members {
            let counter_count = reader.read_u64("counter count")?;
            let error = reader.read_u64("counter error")?;
            let item_len = reader.read_len("item length", 1)?;
            let item_bytes = reader.read_bytes("item", item_len)?;

            if counter_count != count {
                return Err(DecodeError::CountMismatch {
                    bucket: count,
                    counter: counter_count,
                });
            }
            if error > counter_count {
                return Err(DecodeError::ErrorExceedsCount {
                    count: counter_count,
                    error,
                });
            }
            let item = K::from_item_bytes(item_bytes)?;
            if !summary.push_member_back(bucket, item, error) {
                return Err(DecodeError::DuplicateItem {
                    bucket: bucket_index,
                    member: member_index,
                });
            }
        }
        previous = Some(count);
    }

    let terminator = reader.read_u8("terminator")?;
    if terminator != TERMINATOR {
        return Err(DecodeError::InvalidTerminator(terminator));
    }
    if reader.remaining() > 0 {
        return Err(DecodeError::TrailingBytes(reader.remaining()));
    }
    Ok((capacity, summary))
}

#[inline]
fn put_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Forward-only cursor that refuses to read past the end of its buffer.
struct SnapshotReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SnapshotReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::Truncated {
                field,
                needed: len,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(field, 1)?[0])
    }

    fn read_u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.read_bytes(field, 8)?);
        Ok(u64::from_le_bytes(raw))
    }

    /// Reads a count of records that each occupy at least `unit` bytes.
    ///
    /// Rejects values that cannot fit in the rest of the buffer, so a forged
    /// count cannot drive a large allocation or a long loop.
    fn read_len(&mut self, field: &'static str, unit: usize) -> Result<usize, DecodeError> {
        let value = self.read_u64(field)?;
        let overflow = DecodeError::LengthOverflow { field, value };
        let len = usize::try_from(value).map_err(|_| overflow.clone())?;
        match len.checked_mul(unit) {
            Some(bytes) if bytes <= self.remaining() => Ok(len),
            _ => Err(overflow),
        }
    }
}
