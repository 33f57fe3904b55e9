use core::cmp::Ordering;

use alloc::vec::Vec;
#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{RandSource, TimeSource};
use crate::{Encoded, Error, Format, Result, Uuid, MAX_TIMESTAMP};

#[cfg(feature = "std")]
use super::StdSystemTime;

const MAX_SEQUENCE: u16 = (1 << 12) - 1;

/// Represents a UUIDv7 generator that encapsulates a 12-bit sequence and guarantees the
/// monotonic order of UUIDs generated within the same millisecond.
///
/// The sequence starts from a random value whenever the millisecond advances, which lowers the
/// chance of two processes minting the same prefix at a millisecond boundary. It is incremented
/// within a millisecond, including while the clock reads behind the last emitted millisecond;
/// when it would pass 4095 the generator moves to the next millisecond without blocking. Every
/// UUID also carries 62 fresh random bits.
///
/// The following example guarantees the process-wide (cross-thread) monotonicity using Rust's
/// standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use stampid::V7Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(V7Generator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V7Generator<R, T> {
    timestamp: u64,
    sequence: u16,

    /// The random number generator used by the generator.
    rng: R,

    /// The clock the generator reads.
    time: T,
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<R: RandSource> V7Generator<R, StdSystemTime> {
    /// Creates a generator instance reading the system clock.
    pub const fn new(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> V7Generator<R, T> {
    /// Creates a generator instance with a custom random number generator and clock.
    pub const fn with_rand_and_time_sources(rng: R, time: T) -> Self {
        Self {
            timestamp: 0,
            sequence: 0,
            rng,
            time,
        }
    }

    /// Returns the last emitted millisecond, `0` before the first call.
    pub const fn last_timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Generates a new UUIDv7 object from the current clock reading.
    pub fn generate(&mut self) -> Result<Uuid> {
        let unix_ts_ms = self.time.unix_ts_ms();
        self.generate_core(unix_ts_ms)
    }

    /// Generates a new UUIDv7 object from a given clock reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the millisecond to emit does not fit in 48 bits. The
    /// generator state is left unchanged.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Result<Uuid> {
        let (timestamp, sequence) = match unix_ts_ms.cmp(&self.timestamp) {
            Ordering::Greater => (unix_ts_ms, (self.rng.next_u32() as u16) & MAX_SEQUENCE),
            // stay on the last emitted millisecond until the clock passes it
            Ordering::Equal | Ordering::Less if self.sequence < MAX_SEQUENCE => {
                #[cfg(feature = "tracing")]
                if unix_ts_ms < self.timestamp {
                    tracing::debug!(
                        now = unix_ts_ms,
                        last = self.timestamp,
                        "clock behind the last emitted millisecond"
                    );
                }
                (self.timestamp, self.sequence + 1)
            }
            Ordering::Equal | Ordering::Less => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    last = self.timestamp,
                    "sequence overflow; advancing past the clock"
                );
                (self.timestamp + 1, 0)
            }
        };

        if timestamp > MAX_TIMESTAMP {
            return Err(Error::OutOfRange {
                unix_ts_ms: timestamp,
            });
        }
        self.timestamp = timestamp;
        self.sequence = sequence;
        Ok(Uuid::from_fields_v7(
            timestamp,
            sequence,
            self.rng.next_u64() >> 2,
        ))
    }

    /// Generates a UUIDv7 rendered in `format`.
    pub fn generate_as(&mut self, format: Format) -> Result<Encoded> {
        self.generate().map(|e| format.encode(e.as_bytes()))
    }

    /// Generates `n` UUIDs by `n` sequential calls.
    ///
    /// The batch is all-or-nothing: the first failing call aborts it and the UUIDs produced so
    /// far are dropped. The calls that succeeded have still advanced the generator state.
    pub fn generate_batch(&mut self, n: usize) -> Result<Vec<Uuid>> {
        (0..n).map(|_| self.generate()).collect()
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use stampid::V7Generator;
///
/// V7Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for V7Generator<R, T> {
    type Item = Result<Uuid>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> core::iter::FusedIterator for V7Generator<R, T> {}
