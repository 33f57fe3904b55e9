//! Configuration of the 48-bit [`StampGenerator`](crate::StampGenerator).

#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use crate::{Error, Format, Result};

/// What a stamp generator does when more than `max_sub_ms` stamps are requested within one
/// millisecond.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum OverflowPolicy {
    /// Moves the timestamp one millisecond ahead of the clock and resets the counter.
    ///
    /// Never blocks; emitted timestamps may briefly run ahead of wall-clock time.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "advance"))]
    AdvanceClock,

    /// Busy-polls the clock until it passes the last emitted millisecond.
    ///
    /// There is no timeout; callers that need bounded latency use [`Self::AdvanceClock`].
    #[cfg_attr(feature = "serde", serde(alias = "block"))]
    BlockUntilNextMs,
}

impl OverflowPolicy {
    /// Returns the token naming this policy.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdvanceClock => "advance-clock",
            Self::BlockUntilNextMs => "block-until-next-ms",
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for OverflowPolicy {
    type Err = Error;

    /// Parses `advance-clock` (alias `advance`) or `block-until-next-ms` (alias `block`),
    /// ignoring ASCII case.
    fn from_str(src: &str) -> Result<Self> {
        const TOKENS: &[(&str, OverflowPolicy)] = &[
            ("advance-clock", OverflowPolicy::AdvanceClock),
            ("advance", OverflowPolicy::AdvanceClock),
            ("block-until-next-ms", OverflowPolicy::BlockUntilNextMs),
            ("block", OverflowPolicy::BlockUntilNextMs),
        ];
        TOKENS
            .iter()
            .find(|(token, _)| token.eq_ignore_ascii_case(src))
            .map(|(_, policy)| *policy)
            .ok_or(Error::InvalidConfiguration("unknown overflow policy"))
    }
}

/// Settings of a [`StampGenerator`](crate::StampGenerator).
///
/// # Examples
///
/// ```rust
/// use stampid::{Format, OverflowPolicy, StampConfig};
///
/// let config = StampConfig::from_tokens(1024, "block", "hex")?;
/// assert_eq!(config.max_sub_ms, 1024);
/// assert_eq!(config.overflow_policy, OverflowPolicy::BlockUntilNextMs);
/// assert_eq!(config.default_format, Format::Hex);
///
/// assert!(StampConfig::from_tokens(0, "advance", "hex").is_err());
/// # Ok::<(), stampid::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StampConfig {
    /// Number of stamps that may share one millisecond, within `1..=65536`.
    pub max_sub_ms: u32,

    /// What to do once `max_sub_ms` stamps have been emitted within one millisecond.
    pub overflow_policy: OverflowPolicy,

    /// Format used by [`StampGenerator::generate_default`](crate::StampGenerator::generate_default).
    pub default_format: Format,
}

impl StampConfig {
    /// Default number of stamps per millisecond.
    pub const DEFAULT_MAX_SUB_MS: u32 = 4096;

    /// Upper bound of `max_sub_ms`.
    pub const MAX_SUB_MS_LIMIT: u32 = 65536;

    /// Creates a validated configuration.
    pub fn new(
        max_sub_ms: u32,
        overflow_policy: OverflowPolicy,
        default_format: Format,
    ) -> Result<Self> {
        let config = Self {
            max_sub_ms,
            overflow_policy,
            default_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Creates a validated configuration from textual policy and format tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an out-of-range `max_sub_ms` or an unknown
    /// token.
    pub fn from_tokens(max_sub_ms: u32, overflow_policy: &str, default_format: &str) -> Result<Self> {
        let overflow_policy = overflow_policy.parse()?;
        let default_format = default_format
            .parse()
            .map_err(|_| Error::InvalidConfiguration("unknown default format"))?;
        Self::new(max_sub_ms, overflow_policy, default_format)
    }

    /// Checks that `max_sub_ms` lies within `1..=65536`.
    pub fn validate(&self) -> Result<()> {
        if (1..=Self::MAX_SUB_MS_LIMIT).contains(&self.max_sub_ms) {
            Ok(())
        } else {
            Err(Error::InvalidConfiguration(
                "`max_sub_ms` must be within 1..=65536",
            ))
        }
    }
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            max_sub_ms: Self::DEFAULT_MAX_SUB_MS,
            overflow_policy: OverflowPolicy::default(),
            default_format: Format::default(),
        }
    }
}
