#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use alloc::string::String;
use fstr::FStr;

use crate::packed::{pack_timestamp, unpack_timestamp, MAX_TIMESTAMP};
use crate::{base64url, hex, Error, Packed, Result};

/// Represents a 48-bit timestamp identifier: six bytes holding a big-endian Unix timestamp in
/// milliseconds and nothing else.
///
/// The byte order makes the derived [`Ord`] sort by time. The hexadecimal text sorts the same
/// way; the Base64URL text does not, as its alphabet is not in ASCII order.
///
/// # Examples
///
/// ```rust
/// use stampid::Stamp;
///
/// let x = Stamp::from_timestamp(0x0102_0304_0506)?;
/// assert_eq!(x.as_bytes(), &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
/// assert_eq!(x.to_string(), "AQIDBAUG");
/// assert_eq!(&x.encode_hex() as &str, "010203040506");
/// assert_eq!("AQIDBAUG".parse::<Stamp>()?, x);
/// # Ok::<(), stampid::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Stamp([u8; 6]);

impl Stamp {
    /// The earliest representable stamp (the Unix epoch).
    pub const MIN: Self = Self([0x00; 6]);

    /// The latest representable stamp.
    pub const MAX: Self = Self([0xff; 6]);

    /// Creates a stamp from a millisecond timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `unix_ts_ms` does not fit in 48 bits. The value is never
    /// truncated.
    pub const fn from_timestamp(unix_ts_ms: u64) -> Result<Self> {
        if unix_ts_ms > MAX_TIMESTAMP {
            Err(Error::OutOfRange { unix_ts_ms })
        } else {
            Ok(Self(pack_timestamp(unix_ts_ms)))
        }
    }

    /// Returns the timestamp field in milliseconds since the Unix epoch.
    pub const fn timestamp(&self) -> u64 {
        unpack_timestamp(&self.0)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Returns the 8-character unpadded Base64URL representation.
    pub fn encode(&self) -> String {
        base64url::encode(&self.0)
    }

    /// Returns the 12-digit lowercase hexadecimal representation in a stack-allocated string.
    pub fn encode_hex(&self) -> FStr<12> {
        hex::encode_array(&self.0)
    }

    /// Parses the 12-digit lowercase hexadecimal representation.
    pub fn from_hex(src: &str) -> Result<Self> {
        hex::decode_exact(src).map(Self)
    }
}

impl Packed for Stamp {
    const LEN: usize = 6;

    fn from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; 6]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::invalid_length(Self::LEN, bytes.len()))
    }

    fn as_slice(&self) -> &[u8] {
        &self.0
    }

    fn timestamp(&self) -> u64 {
        Stamp::timestamp(self)
    }
}

impl fmt::Display for Stamp {
    /// Writes the 8-character unpadded Base64URL representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Stamp {
    type Err = Error;

    /// Creates an object from the 8-character unpadded Base64URL representation.
    fn from_str(src: &str) -> Result<Self> {
        base64url::decode_exact(src).map(Self)
    }
}

impl From<Stamp> for [u8; 6] {
    fn from(src: Stamp) -> Self {
        src.0
    }
}

impl From<[u8; 6]> for Stamp {
    fn from(src: [u8; 6]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Stamp {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self> {
        Self::from_slice(src)
    }
}

impl AsRef<[u8]> for Stamp {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Stamp> for String {
    fn from(src: Stamp) -> Self {
        src.encode()
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Packed, Stamp};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Stamp {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Stamp {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Stamp;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "an 8-character Base64URL stamp or 6 bytes")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_slice(value).map_err(de::Error::custom)
        }
    }

}
