//! Compact, time-sortable identifiers
//!
//! ```rust
//! // 48-bit stamp, 8 characters of unpadded Base64URL
//! let stamp = stampid::stamp()?;
//! println!("{}", stamp); // e.g. "AZUBdUmJ"
//!
//! // 128-bit UUIDv7, 22 characters of unpadded Base64URL
//! let id = stampid::generate_id()?;
//! println!("{}", id); // e.g. "AYCUJD5ZfAWSGVZvgv_2cg"
//! # Ok::<(), stampid::Error>(())
//! ```
//!
//! Every identifier starts with a 48-bit big-endian Unix timestamp in milliseconds, so the raw
//! bytes and the hexadecimal text sort by creation time. The Base64URL alphabet is not in ASCII
//! order; compare decoded values rather than Base64URL strings.
//!
//! # Field and bit layout
//!
//! The 48-bit [`Stamp`] carries nothing but the timestamp:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Its generator keeps a sub-millisecond counter outside the output. Once
//! [`StampConfig::max_sub_ms`] stamps share a millisecond, the [`OverflowPolicy`] either moves
//! one millisecond ahead of the clock or busy-polls until the clock gets there.
//!
//! The 128-bit [`Uuid`] follows the UUIDv7 layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |       sequence        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                         rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `sequence` field is randomly initialized whenever `unix_ts_ms` advances and
//!   incremented for each further UUID within the same millisecond.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `rand` bits are filled with a cryptographically strong random number.
//!
//! Both generators ride out clock rollbacks on the last emitted millisecond and move one
//! millisecond ahead only when its counter is exhausted, so emitted timestamps may run slightly
//! ahead of the real-time clock. A timestamp that no longer fits in 48 bits is reported as
//! [`Error::OutOfRange`].
//!
//! # Formats
//!
//! Identifiers are produced in and converted between raw bytes, fixed-width lowercase
//! hexadecimal, and unpadded Base64URL (see [`Format`] and the [`convert`] module).
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide default generators behind [`stamp`], [`generate`],
//!   [`uuid7`], and [`generate_id`]. Implies `std`.
//!
//! Optional features:
//!
//! - `std`: enables the system clock and the wall-clock helpers. Without it the crate is
//!   `no_std` with `alloc`.
//! - `serde`: enables serialization and deserialization of identifiers, formats, and
//!   configuration.
//! - `uuid`: enables conversion from/to the UUID type of the `uuid` crate.
//! - `tracing`: emits `tracing` spans and events from the generators.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod error;
pub use error::{Error, MalformedInput, Result};

pub mod base64url;
pub mod hex;

mod packed;
pub use packed::{Packed, MAX_TIMESTAMP};

mod stamp;
pub use stamp::Stamp;

mod id;
pub use id::{Uuid, Variant};

mod format;
pub use format::{Encoded, Format};

mod config;
pub use config::{OverflowPolicy, StampConfig};

pub mod generator;
#[cfg(feature = "std")]
pub use generator::StdSystemTime;
pub use generator::{RandSource, StampGenerator, TimeSource, V7Generator};

pub mod convert;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{generate, generate_id, stamp, uuid7};
