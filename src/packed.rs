//! The seam between fixed-width identifier layouts and the format-agnostic helpers.

use crate::{base64url, Result};

/// A fixed-width identifier whose first six bytes carry a big-endian Unix timestamp in
/// milliseconds.
///
/// Implemented by [`Stamp`](crate::Stamp) (6 bytes) and [`Uuid`](crate::Uuid) (16 bytes). The
/// [`convert`](crate::convert) helpers are generic over this trait.
pub trait Packed: Copy + Ord {
    /// Length of the raw byte form.
    const LEN: usize;

    /// Length of the lowercase hexadecimal form.
    const HEX_LEN: usize = Self::LEN * 2;

    /// Length of the unpadded Base64URL form.
    const BASE64URL_LEN: usize = base64url::encoded_len(Self::LEN);

    /// Creates an identifier from exactly [`Self::LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInput::InvalidLength`](crate::MalformedInput::InvalidLength) for any
    /// other length. Bytes are never padded or truncated.
    fn from_slice(bytes: &[u8]) -> Result<Self>;

    /// Returns the raw big-endian bytes.
    fn as_slice(&self) -> &[u8];

    /// Returns the 48-bit timestamp field.
    fn timestamp(&self) -> u64;
}

/// Largest millisecond value the 48-bit timestamp field can carry, some 8,900 years past 1970.
pub const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// Writes the lower 48 bits of `unix_ts_ms` big-endian.
pub(crate) const fn pack_timestamp(unix_ts_ms: u64) -> [u8; 6] {
    [
        (unix_ts_ms >> 40) as u8,
        (unix_ts_ms >> 32) as u8,
        (unix_ts_ms >> 24) as u8,
        (unix_ts_ms >> 16) as u8,
        (unix_ts_ms >> 8) as u8,
        unix_ts_ms as u8,
    ]
}

/// Reads a 48-bit big-endian timestamp from the first six bytes.
pub(crate) const fn unpack_timestamp(bytes: &[u8]) -> u64 {
    (bytes[0] as u64) << 40
        | (bytes[1] as u64) << 32
        | (bytes[2] as u64) << 24
        | (bytes[3] as u64) << 16
        | (bytes[4] as u64) << 8
        | bytes[5] as u64
}
