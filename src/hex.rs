//! Fixed-width lowercase hexadecimal representation.

use alloc::{string::String, vec::Vec};

use fstr::FStr;

use crate::{Error, MalformedInput, Result};

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encodes `bytes` as lowercase hexadecimal without separators.
pub fn encode(bytes: &[u8]) -> String {
    let mut dst = String::with_capacity(bytes.len() * 2);
    for &e in bytes {
        dst.push(DIGITS[(e >> 4) as usize] as char);
        dst.push(DIGITS[(e & 15) as usize] as char);
    }
    dst
}

/// Encodes a byte array into a stack-allocated string of `M == 2 * N` characters.
pub(crate) fn encode_array<const N: usize, const M: usize>(src: &[u8; N]) -> FStr<M> {
    debug_assert_eq!(M, N * 2);
    let mut buffer = [0u8; M];
    for (chunk, &e) in buffer.chunks_exact_mut(2).zip(src) {
        chunk[0] = DIGITS[(e >> 4) as usize];
        chunk[1] = DIGITS[(e & 15) as usize];
    }
    debug_assert!(buffer.is_ascii());
    // SAFETY: every byte is taken from DIGITS
    unsafe { FStr::from_bytes_unchecked(buffer) }
}

/// Decodes lowercase hexadecimal text of any even length.
///
/// # Errors
///
/// Returns [`MalformedInput::UndecodableText`] for an odd number of digits and
/// [`MalformedInput::InvalidCharacter`] for anything but `[0-9a-f]`, upper-case digits included.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let src = text.as_bytes();
    if src.len() % 2 != 0 {
        return Err(MalformedInput::UndecodableText.into());
    }
    let mut dst = Vec::with_capacity(src.len() / 2);
    for (i, pair) in src.chunks_exact(2).enumerate() {
        dst.push((digit(pair[0], i * 2)? << 4) | digit(pair[1], i * 2 + 1)?);
    }
    Ok(dst)
}

/// Decodes lowercase text that must hold exactly `N` bytes, i.e. exactly `2 * N` digits.
pub fn decode_exact<const N: usize>(text: &str) -> Result<[u8; N]> {
    let src = text.as_bytes();
    if src.len() != N * 2 {
        return Err(Error::invalid_length(N * 2, src.len()));
    }
    let mut dst = [0u8; N];
    for (i, (e, pair)) in dst.iter_mut().zip(src.chunks_exact(2)).enumerate() {
        *e = (digit(pair[0], i * 2)? << 4) | digit(pair[1], i * 2 + 1)?;
    }
    Ok(dst)
}

fn digit(byte: u8, index: usize) -> Result<u8> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        _ => Err(MalformedInput::InvalidCharacter { byte, index }.into()),
    }
}
