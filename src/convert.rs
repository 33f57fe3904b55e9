//! Format-agnostic validation, conversion, and timestamp helpers.
//!
//! Every helper is generic over the [`Packed`] layout, so the same calls serve 6-byte stamps
//! and 16-byte UUIDs. A value is passed as anything viewable as bytes: raw bytes for
//! [`Format::Raw`] and the ASCII text for [`Format::Hex`] and [`Format::Base64Url`].
//!
//! ```rust
//! use stampid::{convert, Encoded, Format, Stamp};
//!
//! let hex = convert::convert::<Stamp>("AZUBdUmJ", Format::Base64Url, Format::Hex)?;
//! assert_eq!(hex, Encoded::Hex("019501754989".into()));
//!
//! let back = convert::convert::<Stamp>(&hex, Format::Hex, Format::Base64Url)?;
//! assert_eq!(back.as_str(), Some("AZUBdUmJ"));
//!
//! assert!(convert::validate::<Stamp>("AZUBdUmJ", Format::Base64Url));
//! assert!(!convert::validate::<Stamp>("AZUBdUm=", Format::Base64Url));
//! # Ok::<(), stampid::Error>(())
//! ```
//!
//! Validation looks at structure only: length, alphabet, and decodability. Any 48-bit timestamp
//! is plausible.

use crate::{base64url, hex, Encoded, Error, Format, MalformedInput, Packed, Result};

/// Decodes `value` given in `format` into the identifier layout `P`.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] when the length does not match the layout, a byte lies
/// outside the alphabet of `format`, or Base64URL text is not canonical.
pub fn decode<P: Packed>(value: impl AsRef<[u8]>, format: Format) -> Result<P> {
    let value = value.as_ref();
    match format {
        Format::Raw => P::from_slice(value),
        Format::Hex => {
            let text = text_of(value, P::HEX_LEN)?;
            P::from_slice(&hex::decode(text)?)
        }
        Format::Base64Url => {
            let text = text_of(value, P::BASE64URL_LEN)?;
            P::from_slice(&base64url::decode(text)?)
        }
    }
}

/// Checks the length of text input and views it as `str`.
fn text_of(value: &[u8], expected: usize) -> Result<&str> {
    if value.len() != expected {
        return Err(Error::invalid_length(expected, value.len()));
    }
    core::str::from_utf8(value).map_err(|err| {
        let index = err.valid_up_to();
        MalformedInput::InvalidCharacter {
            byte: value[index],
            index,
        }
        .into()
    })
}

/// Returns true if `value` is a structurally valid `P` in `format`.
///
/// Hex text must be lowercase, as emitted by [`Format::Hex`]. Never fails: every rejection
/// collapses to `false`.
pub fn validate<P: Packed>(value: impl AsRef<[u8]>, format: Format) -> bool {
    decode::<P>(value, format).is_ok()
}

/// Like [`validate`] but takes the format as a textual token.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for an unknown token; malformed values still yield
/// `Ok(false)`.
pub fn validate_token<P: Packed>(value: impl AsRef<[u8]>, format: &str) -> Result<bool> {
    Ok(validate::<P>(value, format.parse()?))
}

/// Re-encodes `value` from one format to another, validating it on the way.
pub fn convert<P: Packed>(value: impl AsRef<[u8]>, from: Format, to: Format) -> Result<Encoded> {
    let packed = decode::<P>(value, from)?;
    Ok(to.encode(packed.as_slice()))
}

/// Like [`convert`] but takes the formats as textual tokens.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for an unknown token before looking at `value`.
pub fn convert_tokens<P: Packed>(value: impl AsRef<[u8]>, from: &str, to: &str) -> Result<Encoded> {
    let (from, to) = (from.parse()?, to.parse()?);
    convert::<P>(value, from, to)
}

/// Returns the 48-bit timestamp field of `value` in milliseconds since the Unix epoch.
pub fn timestamp_ms<P: Packed>(value: impl AsRef<[u8]>, format: Format) -> Result<u64> {
    decode::<P>(value, format).map(|e| e.timestamp())
}

/// Returns the instant encoded in the timestamp field of `value`.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub fn timestamp_to_date<P: Packed>(
    value: impl AsRef<[u8]>,
    format: Format,
) -> Result<std::time::SystemTime> {
    let unix_ts_ms = timestamp_ms::<P>(value, format)?;
    Ok(std::time::UNIX_EPOCH + std::time::Duration::from_millis(unix_ts_ms))
}

/// Returns `now_ms` minus the timestamp of `value`.
///
/// The result is negative when the minting clock ran ahead of `now_ms`; callers tolerate that.
pub fn age_at<P: Packed>(value: impl AsRef<[u8]>, format: Format, now_ms: u64) -> Result<i64> {
    let unix_ts_ms = timestamp_ms::<P>(value, format)?;
    // the timestamp has 48 bits, so the difference cannot overflow
    Ok(now_ms.min(i64::MAX as u64) as i64 - unix_ts_ms as i64)
}

/// Returns the age of `value` in milliseconds against the system clock.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub fn age<P: Packed>(value: impl AsRef<[u8]>, format: Format) -> Result<i64> {
    use crate::generator::{StdSystemTime, TimeSource};
    age_at::<P>(value, format, StdSystemTime.unix_ts_ms())
}

/// Returns true if `value` is valid and its age at `now_ms` lies within `0..=max_age_ms`.
pub fn is_fresh_at<P: Packed>(
    value: impl AsRef<[u8]>,
    max_age_ms: u64,
    format: Format,
    now_ms: u64,
) -> bool {
    match age_at::<P>(value, format, now_ms) {
        Ok(age) => age >= 0 && age as u64 <= max_age_ms,
        Err(_) => false,
    }
}

/// Returns true if `value` is valid, not from the future, and at most `max_age_ms` old.
///
/// # Examples
///
/// ```rust
/// use stampid::{convert, Format, Stamp};
///
/// let stamp = stampid::stamp()?;
/// assert!(convert::is_fresh::<Stamp>(stamp.encode(), 60_000, Format::Base64Url));
/// assert!(!convert::is_fresh::<Stamp>("AAAAAAAA", 60_000, Format::Base64Url));
/// assert!(!convert::is_fresh::<Stamp>("not a stamp", 60_000, Format::Base64Url));
/// # Ok::<(), stampid::Error>(())
/// ```
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub fn is_fresh<P: Packed>(value: impl AsRef<[u8]>, max_age_ms: u64, format: Format) -> bool {
    use crate::generator::{StdSystemTime, TimeSource};
    is_fresh_at::<P>(value, max_age_ms, format, StdSystemTime.unix_ts_ms())
}
