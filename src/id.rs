#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use alloc::string::String;
use fstr::FStr;

use crate::packed::{pack_timestamp, unpack_timestamp};
use crate::{base64url, hex, Error, MalformedInput, Packed, Result};

/// Represents a 128-bit identifier in the UUIDv7 layout.
///
/// ```text
/// bytes 0-5   48-bit unix_ts_ms, big-endian
/// byte  6     ver (0111) | top 4 bits of the 12-bit sequence
/// byte  7     low 8 bits of the 12-bit sequence
/// byte  8     var (10) | top 6 random bits
/// bytes 9-15  56 random bits
/// ```
///
/// Its default text form is the 22-character unpadded Base64URL encoding; the canonical
/// 8-4-4-4-12 form is available through [`Uuid::encode`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUIDv7 byte array from field values.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` exceeds 48 bits, `sequence` exceeds 12 bits, or `rand_tail` exceeds
    /// 62 bits. Generators check the timestamp beforehand and report [`Error::OutOfRange`].
    pub const fn from_fields_v7(unix_ts_ms: u64, sequence: u16, rand_tail: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || sequence >= 1 << 12 || rand_tail >= 1 << 62 {
            panic!("invalid field value");
        }

        let ts = pack_timestamp(unix_ts_ms);
        Self([
            ts[0],
            ts[1],
            ts[2],
            ts[3],
            ts[4],
            ts[5],
            0x70 | (sequence >> 8) as u8,
            sequence as u8,
            0x80 | (rand_tail >> 56) as u8,
            (rand_tail >> 48) as u8,
            (rand_tail >> 40) as u8,
            (rand_tail >> 32) as u8,
            (rand_tail >> 24) as u8,
            (rand_tail >> 16) as u8,
            (rand_tail >> 8) as u8,
            rand_tail as u8,
        ])
    }

    /// Returns the 48-bit `unix_ts_ms` field.
    pub const fn timestamp(&self) -> u64 {
        unpack_timestamp(&self.0)
    }

    /// Returns the 12-bit sequence field.
    pub const fn sequence(&self) -> u16 {
        ((self.0[6] as u16 & 0x0f) << 8) | self.0[7] as u16
    }

    /// Returns the 62 random bits following the variant field.
    pub const fn rand_tail(&self) -> u64 {
        let mut tail = (self.0[8] & 0x3f) as u64;
        let mut i = 9;
        while i < 16 {
            tail = (tail << 8) | self.0[i] as u64;
            i += 1;
        }
        tail
    }

    /// Reports the variant field value of the UUID.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0x0..=0x7 => Variant::Var0,
            0x8..=0xb => Variant::Var10,
            0xc..=0xd => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the version field value of the UUID, or `None` if it is not in the
    /// [`Variant::Var10`] family.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 8-4-4-4-12 canonical hexadecimal representation in a stack-allocated string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stampid::Uuid;
    ///
    /// let x = Uuid::from_fields_v7(0x0180_9424_3e59, 0xc05, 0x1219_566f_82ff_f672);
    /// assert_eq!(&x.encode() as &str, "01809424-3e59-7c05-9219-566f82fff672");
    /// assert_eq!(x.to_string(), "AYCUJD5ZfAWSGVZvgv_2cg");
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for i in 0..16 {
            let e = self.0[i] as usize;
            if let Some(b) = buf_iter.next() {
                *b = DIGITS[e >> 4];
            }
            if let Some(b) = buf_iter.next() {
                *b = DIGITS[e & 15];
            }
            if i == 3 || i == 5 || i == 7 || i == 9 {
                if let Some(b) = buf_iter.next() {
                    *b = b'-';
                }
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte is an ASCII hex digit or hyphen
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Returns the 32-digit lowercase hexadecimal representation without separators.
    pub fn encode_hex(&self) -> FStr<32> {
        hex::encode_array(&self.0)
    }

    /// Returns the 22-character unpadded Base64URL representation.
    pub fn encode_base64url(&self) -> String {
        base64url::encode(&self.0)
    }

    /// Parses the 8-4-4-4-12 canonical representation. Upper-case digits are accepted.
    pub fn parse_canonical(src: &str) -> Result<Self> {
        let src = src.as_bytes();
        if src.len() != 36 {
            return Err(Error::invalid_length(36, src.len()));
        }
        let mut dst = [0u8; 16];
        let mut iter = src.iter().copied().enumerate();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = next_digit(&mut iter)?;
            let lo = next_digit(&mut iter)?;
            *e = (hi << 4) | lo;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                match iter.next() {
                    Some((_, b'-')) => {}
                    Some((index, byte)) => {
                        return Err(MalformedInput::InvalidCharacter { byte, index }.into())
                    }
                    None => return Err(Error::invalid_length(36, src.len())),
                }
            }
        }
        Ok(Self(dst))
    }
}

fn next_digit(iter: &mut impl Iterator<Item = (usize, u8)>) -> Result<u8> {
    match iter.next() {
        Some((index, byte)) => match (byte as char).to_digit(16) {
            Some(d) => Ok(d as u8),
            None => Err(MalformedInput::InvalidCharacter { byte, index }.into()),
        },
        None => Err(MalformedInput::UndecodableText.into()),
    }
}

/// The reserved variants of UUIDs.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Variant {
    /// NCS-reserved (`0xxx`)
    Var0,
    /// RFC 9562 (`10xx`), the family of UUIDv7
    Var10,
    /// Microsoft-reserved (`110x`)
    Var110,
    /// Reserved for the future (`111x`)
    VarReserved,
}

impl Packed for Uuid {
    const LEN: usize = 16;

    fn from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; 16]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::invalid_length(Self::LEN, bytes.len()))
    }

    fn as_slice(&self) -> &[u8] {
        &self.0
    }

    fn timestamp(&self) -> u64 {
        Uuid::timestamp(self)
    }
}

impl fmt::Display for Uuid {
    /// Writes the 22-character unpadded Base64URL representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_base64url())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from the 22-character Base64URL or the 8-4-4-4-12 canonical
    /// representation.
    fn from_str(src: &str) -> Result<Self> {
        if src.len() == 36 {
            Self::parse_canonical(src)
        } else {
            base64url::decode_exact(src).map(Self)
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self> {
        Self::from_slice(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.encode_base64url()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Packed, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode_base64url())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
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
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_slice(value).map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{Uuid, Variant};
    use crate::{Error, Packed};

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((u64, u16, u64), &'static str, &'static str)] {
        const MAX_UINT48: u64 = (1 << 48) - 1;
        const MAX_UINT12: u16 = (1 << 12) - 1;
        const MAX_UINT62: u64 = (1 << 62) - 1;

        &[
            (
                (0, 0, 0),
                "00000000-0000-7000-8000-000000000000",
                "AAAAAAAAcACAAAAAAAAAAA",
            ),
            (
                (MAX_UINT48, 0, 0),
                "ffffffff-ffff-7000-8000-000000000000",
                "________cACAAAAAAAAAAA",
            ),
            (
                (0, MAX_UINT12, 0),
                "00000000-0000-7fff-8000-000000000000",
                "AAAAAAAAf_-AAAAAAAAAAA",
            ),
            (
                (0, 0, MAX_UINT62),
                "00000000-0000-7000-bfff-ffffffffffff",
                "AAAAAAAAcAC__________w",
            ),
            (
                (MAX_UINT48, MAX_UINT12, MAX_UINT62),
                "ffffffff-ffff-7fff-bfff-ffffffffffff",
                "________f_-__________w",
            ),
            (
                (0x17f22e279b0, 0xcc3, 0x18c4dc0c0c07398f),
                "017f22e2-79b0-7cc3-98c4-dc0c0c07398f",
                "AX8i4nmwfMOYxNwMDAc5jw",
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (fs, canonical, text) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(&e.encode() as &str, *canonical);
            assert_eq!(&e.to_string(), text);
            assert_eq!(e.encode_hex().len(), 32);
            assert_eq!(Ok(e), canonical.parse());
            assert_eq!(Ok(e), canonical.to_uppercase().parse());
            assert_eq!(Ok(e), text.parse());
        }
    }

    /// Extracts every field packed by from_fields_v7
    #[test]
    fn extracts_every_field_packed_by_from_fields_v7() {
        for (fs, _, _) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(e.timestamp(), fs.0);
            assert_eq!(e.sequence(), fs.1);
            assert_eq!(e.rand_tail(), fs.2);
            assert_eq!(e.version(), Some(7));
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.as_bytes()[6] >> 4, 0x7);
            assert_eq!(e.as_bytes()[8] >> 6, 0b10);
        }
    }

    /// Panics on fields wider than their slots
    #[test]
    #[should_panic(expected = "invalid field value")]
    fn panics_on_fields_wider_than_their_slots() {
        Uuid::from_fields_v7(1 << 48, 0, 0);
    }

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let cases = [
            "",
            " 0180a8f0-5b82-75b4-9fef-ecad657c30bb",
            "0180a8f0-5b84-7438-ab50-f0626f78002b ",
            "+0180a8f0-5b84-7438-ab50-f06405d35edb",
            "+180a8f0-5b84-7438-ab50-f066aa10a367",
            "0180a8f05b847438ab50f068decfbfd7",
            "0180a8f0-5b847438-ab50-f06991838802",
            "{0180a8f0-5b84-7438-ab50-f06ac2e5e082}",
            "0180a8f0-5b84-74 8-ab50-f06bed27bdc7",
            "0180a8g0-5b84-7438-ab50-f06c91175b8a",
            "0180a8f0-5b84-7438-ab50_f06d3ea24429",
            "AYCuWQeRfnmIBALOK1vI0",
            "AYCuWQeRfnmIBALOK1vI0g=",
            "AYCuWQeRfnmIBALOK1vI0+",
        ];

        for e in cases {
            assert!(e.parse::<Uuid>().is_err(), "{e}");
        }
    }

    /// Returns Nil and Max UUIDs
    #[test]
    fn returns_nil_and_max_uuids() {
        assert_eq!(
            &Uuid::NIL.encode() as &str,
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            &Uuid::MAX.encode() as &str,
            "ffffffff-ffff-ffff-ffff-ffffffffffff"
        );
        assert_eq!(Uuid::NIL.variant(), Variant::Var0);
        assert_eq!(Uuid::NIL.version(), None);
        assert_eq!(Uuid::MAX.variant(), Variant::VarReserved);
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (fs, _, _) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(Uuid::from(<[u8; 16]>::from(e)), e);
            assert_eq!(Uuid::from(u128::from(e)), e);
            assert_eq!(Uuid::from_slice(e.as_slice()), Ok(e));
            assert_eq!(e.encode().parse(), Ok(e));
            assert_eq!(e.encode_base64url().parse(), Ok(e));
            #[cfg(feature = "uuid")]
            assert_eq!(Uuid::from(<uuid::Uuid>::from(e)), e);
            #[cfg(feature = "uuid")]
            assert_eq!(uuid::Uuid::from(e).as_bytes(), &<[u8; 16]>::from(e));
        }
        assert_eq!(Uuid::from_slice(&[0; 15]), Err(Error::invalid_length(16, 15)));
    }
}
