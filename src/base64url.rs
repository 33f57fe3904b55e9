//! Unpadded Base64URL codec (RFC 4648 §5).
//!
//! Encoding never emits `=`; decoding rejects it along with every other byte outside
//! `[A-Za-z0-9_-]`. Text whose final character carries stray low bits is not canonical and is
//! rejected too, so `encode(decode(text)) == text` holds for everything [`decode`] accepts.
//!
//! ```rust
//! use stampid::base64url;
//!
//! let text = base64url::encode(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
//! assert_eq!(text, "AQIDBAUG");
//! assert_eq!(base64url::decode(&text)?, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
//! # Ok::<(), stampid::Error>(())
//! ```

use alloc::{string::String, vec::Vec};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::{Error, MalformedInput, Result};

/// Returns the number of characters the unpadded encoding of `byte_len` bytes occupies.
pub const fn encoded_len(byte_len: usize) -> usize {
    (byte_len * 4 + 2) / 3
}

/// Encodes `bytes` as unpadded Base64URL text. Empty input yields an empty string.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes unpadded Base64URL text of any length. An empty string decodes to zero bytes.
///
/// # Errors
///
/// Returns [`MalformedInput::InvalidCharacter`] for any byte outside `[A-Za-z0-9_-]` (padding
/// included) and [`MalformedInput::UndecodableText`] for impossible lengths or non-canonical
/// trailing bits.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    check_alphabet(text)?;
    URL_SAFE_NO_PAD
        .decode(text)
        .map_err(|_| MalformedInput::UndecodableText.into())
}

/// Encodes exactly `expected` bytes, failing instead of padding or truncating.
///
/// This is the length-specialized half used by fixed-width identifiers: 6 bytes produce 8
/// characters and 16 bytes produce 22.
pub fn encode_exact(bytes: &[u8], expected: usize) -> Result<String> {
    if bytes.len() != expected {
        return Err(Error::invalid_length(expected, bytes.len()));
    }
    Ok(encode(bytes))
}

/// Decodes text that must hold exactly `N` bytes, i.e. exactly [`encoded_len`]`(N)` characters.
pub fn decode_exact<const N: usize>(text: &str) -> Result<[u8; N]> {
    let expected = encoded_len(N);
    if text.len() != expected {
        return Err(Error::invalid_length(expected, text.len()));
    }
    let bytes = decode(text)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| Error::invalid_length(N, bytes.len()))
}

/// Returns true if `text` is decodable unpadded Base64URL of any length.
pub fn is_valid(text: &str) -> bool {
    decode(text).is_ok()
}

fn check_alphabet(text: &str) -> Result<()> {
    match text
        .bytes()
        .enumerate()
        .find(|(_, b)| !(b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_'))
    {
        Some((index, byte)) => Err(MalformedInput::InvalidCharacter { byte, index }.into()),
        None => Ok(()),
    }
}
