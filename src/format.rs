//! Output representations and the tagged values carrying them.

#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use alloc::{string::String, vec::Vec};

use crate::{base64url, hex, Error};

/// The representations an identifier can be produced in or converted between.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Format {
    /// Raw big-endian bytes.
    #[cfg_attr(feature = "serde", serde(alias = "buffer", alias = "bytes"))]
    Raw,

    /// Fixed-width lowercase hexadecimal without separators.
    Hex,

    /// Unpadded URL-safe Base64 (RFC 4648 §5).
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "base64"))]
    Base64Url,
}

impl Format {
    /// Returns the token naming this format.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Hex => "hex",
            Self::Base64Url => "base64url",
        }
    }

    /// Encodes `bytes` in this format.
    pub fn encode(self, bytes: &[u8]) -> Encoded {
        match self {
            Self::Raw => Encoded::Raw(bytes.to_vec()),
            Self::Hex => Encoded::Hex(hex::encode(bytes)),
            Self::Base64Url => Encoded::Base64Url(base64url::encode(bytes)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for Format {
    type Err = Error;

    /// Parses a format token, ignoring ASCII case.
    ///
    /// Accepts `raw` (alias `buffer`, `bytes`), `hex`, and `base64url` (alias `base64`). Any
    /// other token is [`Error::UnsupportedFormat`].
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const TOKENS: &[(&str, Format)] = &[
            ("raw", Format::Raw),
            ("buffer", Format::Raw),
            ("bytes", Format::Raw),
            ("hex", Format::Hex),
            ("base64url", Format::Base64Url),
            ("base64", Format::Base64Url),
        ];
        TOKENS
            .iter()
            .find(|(token, _)| token.eq_ignore_ascii_case(src))
            .map(|(_, format)| *format)
            .ok_or(Error::UnsupportedFormat)
    }
}

/// An identifier rendered in one of the supported [`Format`]s.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Encoded {
    /// Raw big-endian bytes.
    Raw(Vec<u8>),

    /// Lowercase hexadecimal text.
    Hex(String),

    /// Unpadded Base64URL text.
    Base64Url(String),
}

impl Encoded {
    /// Returns the format of this value.
    pub const fn format(&self) -> Format {
        match self {
            Self::Raw(_) => Format::Raw,
            Self::Hex(_) => Format::Hex,
            Self::Base64Url(_) => Format::Base64Url,
        }
    }

    /// Returns the raw bytes, or the ASCII bytes of a text representation.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Raw(bytes) => bytes.as_slice(),
            Self::Hex(text) | Self::Base64Url(text) => text.as_bytes(),
        }
    }

    /// Returns the text of a text representation, or `None` for raw bytes.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Raw(_) => None,
            Self::Hex(text) | Self::Base64Url(text) => Some(text.as_str()),
        }
    }

    /// Consumes the value, returning its text, or `None` for raw bytes.
    pub fn into_string(self) -> Option<String> {
        match self {
            Self::Raw(_) => None,
            Self::Hex(text) | Self::Base64Url(text) => Some(text),
        }
    }
}

impl AsRef<[u8]> for Encoded {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for Encoded {
    /// Writes the text of a text representation; raw bytes are written as hexadecimal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(bytes) => f.write_str(&hex::encode(bytes)),
            Self::Hex(text) | Self::Base64Url(text) => f.write_str(text),
        }
    }
}
