//! Error types for the topkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (zero capacity).
//! - [`InvariantError`]: Returned by `check_invariants` when the counter
//!   structure is internally inconsistent.
//! - [`DecodeError`]: Returned when a snapshot buffer is malformed or
//!   truncated. Decoding is the only fallible operation on a live counter.
//!
//! ## Example Usage
//!
//! ```
//! use topkit::error::{ConfigError, DecodeError};
//! use topkit::topk::TopKCounter;
//!
//! let bad: Result<TopKCounter<String>, ConfigError> = TopKCounter::try_new(0);
//! assert!(bad.is_err());
//!
//! let err = TopKCounter::<String>::decode(&[1, 2, 3]).unwrap_err();
//! assert!(matches!(err, DecodeError::Truncated { field: "capacity", .. }));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal counter invariants are violated.
///
/// Produced by [`TopKCounter::check_invariants`](crate::topk::TopKCounter::check_invariants)
/// and [`StreamSummary::check_invariants`](crate::ds::StreamSummary::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
///
/// Produced by [`TopKCounter::try_new`](crate::topk::TopKCounter::try_new) and
/// [`TopKBuilder::build`](crate::builder::TopKBuilder::build).
///
/// # Example
///
/// ```
/// use topkit::topk::TopKCounter;
///
/// let err = TopKCounter::<u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Error returned when a snapshot cannot be decoded.
///
/// Every length and count field is validated against the remaining buffer
/// before it is used, so a malformed buffer surfaces here instead of as an
/// out-of-bounds read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended before `field` could be read.
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },
    /// A length or count field does not fit the platform or the buffer.
    LengthOverflow { field: &'static str, value: u64 },
    /// The snapshot declares a capacity of zero.
    ZeroCapacity,
    /// More counters than the declared capacity.
    CapacityExceeded { capacity: u64, tracked: usize },
    /// A bucket with no members.
    EmptyBucket { index: usize },
    /// Bucket counts are not strictly increasing.
    BucketOrder { previous: u64, count: u64 },
    /// A member's count differs from its bucket's count.
    CountMismatch { bucket: u64, counter: u64 },
    /// A member's error is larger than its count.
    ErrorExceedsCount { count: u64, error: u64 },
    /// The same item appears twice.
    DuplicateItem { bucket: usize, member: usize },
    /// Item bytes could not be converted into the item type.
    InvalidItem(String),
    /// The terminator byte is not zero.
    InvalidTerminator(u8),
    /// Bytes remain after the terminator.
    TrailingBytes(usize),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated {
                field,
                needed,
                remaining,
            } => write!(
                f,
                "truncated snapshot: {field} needs {needed} bytes, {remaining} remaining"
            ),
            DecodeError::LengthOverflow { field, value } => {
                write!(f, "{field} value {value} exceeds the snapshot size")
            },
            DecodeError::ZeroCapacity => f.write_str("snapshot capacity must be > 0"),
            DecodeError::CapacityExceeded { capacity, tracked } => write!(
                f,
                "snapshot tracks {tracked} items but capacity is {capacity}"
            ),
            DecodeError::EmptyBucket { index } => write!(f, "bucket {index} has no members"),
            DecodeError::BucketOrder { previous, count } => write!(
                f,
                "bucket counts must strictly increase: {count} follows {previous}"
            ),
            DecodeError::CountMismatch { bucket, counter } => write!(
                f,
                "counter with count {counter} stored in bucket with count {bucket}"
            ),
            DecodeError::ErrorExceedsCount { count, error } => {
                write!(f, "counter error {error} exceeds its count {count}")
            },
            DecodeError::DuplicateItem { bucket, member } => {
                write!(f, "duplicate item at bucket {bucket}, member {member}")
            },
            DecodeError::InvalidItem(msg) => write!(f, "invalid item bytes: {msg}"),
            DecodeError::InvalidTerminator(byte) => {
                write!(f, "expected terminator byte 0, found {byte}")
            },
            DecodeError::TrailingBytes(extra) => {
                write!(f, "{extra} trailing bytes after the terminator")
            },
        }
    }
}

impl std::error::Error for DecodeError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
