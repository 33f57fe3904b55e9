//! Error types shared by the codec, the packers, and the generators.

use core::fmt;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors this crate can produce.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Generator configuration rejected at construction time.
    InvalidConfiguration(&'static str),

    /// The timestamp to emit does not fit in 48 bits.
    ///
    /// This signals a misconfigured clock and is never retried or clamped.
    OutOfRange {
        /// The offending millisecond value.
        unix_ts_ms: u64,
    },

    /// Structural failure while validating or decoding an encoded value.
    MalformedInput(MalformedInput),

    /// A format token that names no supported representation.
    UnsupportedFormat,
}

/// The structural reasons an encoded value can be rejected.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MalformedInput {
    /// The value has the wrong number of bytes or characters.
    InvalidLength { expected: usize, actual: usize },

    /// A byte outside the alphabet of the format.
    InvalidCharacter { byte: u8, index: usize },

    /// Characters are in the alphabet but do not form canonical unpadded text.
    UndecodableText,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(reason) => write!(f, "invalid configuration: {reason}"),
            Self::OutOfRange { unix_ts_ms } => {
                write!(f, "timestamp {unix_ts_ms} exceeds 48-bit capacity")
            }
            Self::MalformedInput(err) => write!(f, "malformed input: {err}"),
            Self::UnsupportedFormat => write!(f, "unsupported format"),
        }
    }
}

impl fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => {
                write!(f, "expected length {expected}, got {actual}")
            }
            Self::InvalidCharacter { byte, index } => {
                write!(f, "invalid byte {byte:#04x} at index {index}")
            }
            Self::UndecodableText => write!(f, "non-canonical text"),
        }
    }
}

impl core::error::Error for Error {}

impl core::error::Error for MalformedInput {}

impl From<MalformedInput> for Error {
    fn from(src: MalformedInput) -> Self {
        Self::MalformedInput(src)
    }
}

impl Error {
    pub(crate) const fn invalid_length(expected: usize, actual: usize) -> Self {
        Self::MalformedInput(MalformedInput::InvalidLength { expected, actual })
    }
}
