//! Item traits used at the snapshot boundary.
//!
//! The counter itself only needs `Eq + Hash + Clone` items. Persisting a
//! counter additionally needs a byte form for each item, which
//! [`SnapshotItem`] provides.
//!
//! ```text
//!   TopKCounter<K>::encode()            TopKCounter<K>::decode(bytes)
//!          │                                       ▲
//!          ▼                                       │
//!   K::item_bytes(&item) ──► [len][bytes] ──► K::from_item_bytes(&bytes)
//! ```
//!
//! ## Provided implementations
//!
//! | Type      | Byte form               | Decode failure            |
//! |-----------|-------------------------|---------------------------|
//! | `String`  | UTF-8 bytes             | invalid UTF-8             |
//! | `Vec<u8>` | raw bytes               | never                     |
//! | `u64`     | 8-byte little-endian    | length other than 8       |

use std::borrow::Cow;

use crate::error::DecodeError;

/// An item with a stable byte representation for snapshots.
///
/// `from_item_bytes(&item.item_bytes())` must reproduce an item equal to
/// `item`; otherwise a decoded counter would not find its own entries.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use topkit::error::DecodeError;
/// use topkit::traits::SnapshotItem;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Endpoint(u16);
///
/// impl SnapshotItem for Endpoint {
///     fn item_bytes(&self) -> Cow<'_, [u8]> {
///         Cow::Owned(self.0.to_le_bytes().to_vec())
///     }
///
///     fn from_item_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
///         let raw: [u8; 2] = bytes
///             .try_into()
///             .map_err(|_| DecodeError::InvalidItem("endpoint must be 2 bytes".into()))?;
///         Ok(Endpoint(u16::from_le_bytes(raw)))
///     }
/// }
///
/// let port = Endpoint(8080);
/// assert_eq!(Endpoint::from_item_bytes(&port.item_bytes()).unwrap(), port);
/// ```
pub trait SnapshotItem: Sized {
    /// Bytes written for this item.
    fn item_bytes(&self) -> Cow<'_, [u8]>;

    /// Rebuilds an item from bytes produced by [`item_bytes`](Self::item_bytes).
    fn from_item_bytes(bytes: &[u8]) -> Result<Self, DecodeError>;
}

impl SnapshotItem for String {
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }

    fn from_item_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|err| DecodeError::InvalidItem(err.to_string()))
    }
}

impl SnapshotItem for Vec<u8> {
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }

    fn from_item_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(bytes.to_vec())
    }
}

impl SnapshotItem for u64 {
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(self.to_le_bytes().to_vec())
    }

    fn from_item_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| {
            DecodeError::InvalidItem(format!("u64 item needs 8 bytes, got {}", bytes.len()))
        })?;
        Ok(u64::from_le_bytes(raw))
    }
}
