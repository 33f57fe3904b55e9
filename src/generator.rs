//! Generators and the clock and randomness sources they draw from.
//!
//! Both generators keep their state in plain fields mutated through `&mut self`, so the borrow
//! checker enforces the single-owner discipline: an instance is used by one thread at a time,
//! and callers that share one wrap it in a `Mutex` as the process-wide default generators do.
//!
//! # Clock reconciliation
//!
//! On every call the generator compares the clock reading `now` with the last emitted
//! millisecond:
//!
//! | Reading                 | [`StampGenerator`]                    | [`V7Generator`]                      |
//! | ----------------------- | ------------------------------------- | ------------------------------------ |
//! | `now > last`            | adopt `now`, counter = 0              | adopt `now`, sequence = random 12 bits |
//! | `now <= last`           | counter + 1; on overflow apply policy | sequence + 1; on overflow `last + 1`, sequence = 0 |
//!
//! A reading behind `last` (a clock rollback, or a clock that has not yet caught up with a
//! millisecond reached by overflow) continues the last millisecond, so the output never runs
//! further ahead of the clock than the counter bound forces it to.
//!
//! A timestamp beyond 48 bits fails with [`Error::OutOfRange`](crate::Error::OutOfRange) and
//! leaves the generator state untouched.

pub mod with_rand08;

mod stamp;
pub use stamp::StampGenerator;

mod v7;
pub use v7::V7Generator;

/// A trait that defines the minimum random number generator interface for [`V7Generator`].
///
/// Implementations should be cryptographically secure; the random tail is the only
/// unpredictable part of an identifier.
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;

    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> u64;
}

/// A trait that defines the minimum system clock interface for the generators.
pub trait TimeSource {
    /// Returns the current Unix time in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

impl<F: FnMut() -> u64> TimeSource for F {
    fn unix_ts_ms(&mut self) -> u64 {
        self()
    }
}

/// The default [`TimeSource`] that reads [`std::time::SystemTime`].
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

#[cfg(feature = "std")]
impl TimeSource for StdSystemTime {
    /// Returns the current Unix time in milliseconds, `0` for instants before the epoch, or
    /// `u64::MAX` for instants no `u64` can hold, so that the generator reports them as out of
    /// range rather than truncating.
    fn unix_ts_ms(&mut self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Spins until `time` reports a millisecond past `last`, re-reading the clock on every turn.
pub(crate) fn wait_for_next_ms(time: &mut impl TimeSource, last: u64) -> u64 {
    #[cfg(feature = "tracing")]
    tracing::debug!(last, "busy-polling for the next millisecond");
    loop {
        let now = time.unix_ts_ms();
        if now > last {
            return now;
        }

        #[cfg(feature = "std")]
        std::thread::yield_now();
        #[cfg(not(feature = "std"))]
        core::hint::spin_loop();
    }
}
