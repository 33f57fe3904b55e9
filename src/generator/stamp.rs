use core::cmp::Ordering;

use alloc::vec::Vec;
#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{wait_for_next_ms, TimeSource};
use crate::{Encoded, Format, OverflowPolicy, Result, Stamp, StampConfig};

#[cfg(feature = "std")]
use super::StdSystemTime;

/// Represents a 48-bit stamp generator that keeps a sub-millisecond counter and guarantees the
/// non-decreasing order of stamps.
///
/// Up to [`StampConfig::max_sub_ms`] consecutive stamps share one millisecond; the next one
/// triggers the configured [`OverflowPolicy`]. The counter is not part of the output, so
/// `(timestamp, counter)` is strictly increasing while the stamps alone are non-decreasing.
///
/// # Examples
///
/// ```rust
/// use stampid::{StampConfig, StampGenerator};
///
/// let config = StampConfig { max_sub_ms: 2, ..Default::default() };
/// let mut g = StampGenerator::with_config_and_time_source(config, || 1_700_000_000_000)?;
/// assert_eq!(g.generate()?.timestamp(), 1_700_000_000_000);
/// assert_eq!(g.generate()?.timestamp(), 1_700_000_000_000);
/// assert_eq!(g.generate()?.timestamp(), 1_700_000_000_001); // counter overflow
/// # Ok::<(), stampid::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StampGenerator<T> {
    timestamp: u64,
    counter: u32,
    config: StampConfig,

    /// The clock the generator reads.
    time: T,
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl StampGenerator<StdSystemTime> {
    /// Creates a generator with the default configuration and the system clock.
    pub fn new() -> Self {
        Self::with_time_source(StdSystemTime)
    }

    /// Creates a generator with the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) if `config`
    /// does not validate.
    pub fn with_config(config: StampConfig) -> Result<Self> {
        Self::with_config_and_time_source(config, StdSystemTime)
    }
}

#[cfg(feature = "std")]
impl Default for StampGenerator<StdSystemTime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> StampGenerator<T> {
    /// Creates a generator with the default configuration and a custom clock.
    pub fn with_time_source(time: T) -> Self {
        Self {
            timestamp: 0,
            counter: 0,
            config: StampConfig::default(),
            time,
        }
    }

    /// Creates a generator with a custom configuration and clock.
    pub fn with_config_and_time_source(config: StampConfig, time: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::with_time_source(time)
        })
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &StampConfig {
        &self.config
    }

    /// Returns the last emitted millisecond, `0` before the first call.
    pub const fn last_timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Returns the sub-millisecond counter paired with the last emitted millisecond.
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Generates a stamp from the current clock reading.
    pub fn generate(&mut self) -> Result<Stamp> {
        let unix_ts_ms = self.time.unix_ts_ms();
        self.generate_core(unix_ts_ms)
    }

    /// Generates a stamp from a given clock reading.
    ///
    /// Under [`OverflowPolicy::BlockUntilNextMs`] a counter overflow still polls the generator's
    /// own clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`](crate::Error::OutOfRange) if the millisecond to emit does
    /// not fit in 48 bits. The generator state is left unchanged.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Result<Stamp> {
        let (timestamp, counter) = match unix_ts_ms.cmp(&self.timestamp) {
            Ordering::Greater => (unix_ts_ms, 0),
            Ordering::Equal | Ordering::Less => {
                // stay on the last emitted millisecond until the clock passes it
                #[cfg(feature = "tracing")]
                if unix_ts_ms < self.timestamp {
                    tracing::debug!(
                        now = unix_ts_ms,
                        last = self.timestamp,
                        "clock behind the last emitted millisecond"
                    );
                }
                let counter = self.counter + 1;
                if counter < self.config.max_sub_ms {
                    (self.timestamp, counter)
                } else {
                    match self.config.overflow_policy {
                        OverflowPolicy::AdvanceClock => {
                            #[cfg(feature = "tracing")]
                            tracing::debug!(
                                last = self.timestamp,
                                "counter overflow; advancing past the clock"
                            );
                            (self.timestamp + 1, 0)
                        }
                        OverflowPolicy::BlockUntilNextMs => {
                            (wait_for_next_ms(&mut self.time, self.timestamp), 0)
                        }
                    }
                }
            }
        };

        let stamp = Stamp::from_timestamp(timestamp)?;
        self.timestamp = timestamp;
        self.counter = counter;
        Ok(stamp)
    }

    /// Generates a stamp rendered in `format`.
    pub fn generate_as(&mut self, format: Format) -> Result<Encoded> {
        self.generate().map(|e| format.encode(e.as_bytes()))
    }

    /// Generates a stamp rendered in the configured default format.
    pub fn generate_default(&mut self) -> Result<Encoded> {
        self.generate_as(self.config.default_format)
    }

    /// Generates `n` stamps by `n` sequential calls.
    ///
    /// The batch is all-or-nothing: the first failing call aborts it and the stamps produced so
    /// far are dropped. The calls that succeeded have still advanced the generator state.
    pub fn generate_batch(&mut self, n: usize) -> Result<Vec<Stamp>> {
        (0..n).map(|_| self.generate()).collect()
    }
}

/// Supports operations as an infinite iterator that produces a new stamp for each call of
/// `next()`.
impl<T: TimeSource> Iterator for StampGenerator<T> {
    type Item = Result<Stamp>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T: TimeSource> core::iter::FusedIterator for StampGenerator<T> {}

#[cfg(test)]
mod tests {
    use super::StampGenerator;
    use crate::generator::tests::ScriptedClock;
    use crate::{Encoded, Error, Format, OverflowPolicy, StampConfig, MAX_TIMESTAMP};

    fn config(max_sub_ms: u32, overflow_policy: OverflowPolicy) -> StampConfig {
        StampConfig {
            max_sub_ms,
            overflow_policy,
            ..Default::default()
        }
    }

    /// Emits non-decreasing stamps with strictly increasing timestamp-counter pairs
    #[test]
    fn emits_non_decreasing_stamps_with_strictly_increasing_timestamp_counter_pairs() {
        let ts = 0x0123_4567_89abu64;
        let mut g = StampGenerator::with_time_source(|| 0);
        let mut prev = (g.generate_core(ts).unwrap(), g.counter());
        assert_eq!(prev.0.timestamp(), ts);
        assert_eq!(prev.1, 0);
        for i in 0..100_000u64 {
            let curr = (g.generate_core(ts - i.min(4_000)).unwrap(), g.counter());
            assert!(prev.0 <= curr.0);
            assert!((prev.0.timestamp(), prev.1) < (curr.0.timestamp(), curr.1));
            assert_eq!(curr.0.timestamp(), g.last_timestamp());
            prev = curr;
        }
    }

    /// Emits exactly max_sub_ms stamps per millisecond before advancing
    #[test]
    fn emits_exactly_max_sub_ms_stamps_per_millisecond_before_advancing() {
        let ts = 1_700_000_000_000u64;
        for n in [1u32, 2, 3, 100, 4096] {
            let cfg = config(n, OverflowPolicy::AdvanceClock);
            let mut g = StampGenerator::with_config_and_time_source(cfg, move || ts).unwrap();
            for i in 0..n {
                assert_eq!(g.generate().unwrap().timestamp(), ts);
                assert_eq!(g.counter(), i);
            }
            assert_eq!(g.generate().unwrap().timestamp(), ts + 1);
            assert_eq!(g.counter(), 0);
        }
    }

    /// Resets the counter when the clock advances
    #[test]
    fn resets_the_counter_when_the_clock_advances() {
        let clock = ScriptedClock::new(&[100, 100, 100, 101, 101, 105]);
        let mut g = StampGenerator::with_time_source(clock);
        let expected = [(100, 0), (100, 1), (100, 2), (101, 0), (101, 1), (105, 0)];
        for (ts, counter) in expected {
            assert_eq!(g.generate().unwrap().timestamp(), ts);
            assert_eq!(g.counter(), counter);
        }
    }

    /// Stays on the last millisecond when the clock moves backward
    #[test]
    fn stays_on_the_last_millisecond_when_the_clock_moves_backward() {
        let clock = ScriptedClock::new(&[500, 400, 300, 503, 503, 504]);
        let mut g = StampGenerator::with_time_source(clock);
        let expected = [(500, 0), (500, 1), (500, 2), (503, 0), (503, 1), (504, 0)];
        for (ts, counter) in expected {
            assert_eq!(g.generate().unwrap().timestamp(), ts);
            assert_eq!(g.counter(), counter);
        }
    }

    /// Returns to the clock once it passes a millisecond reached by overflow
    #[test]
    fn returns_to_the_clock_once_it_passes_a_millisecond_reached_by_overflow() {
        let clock = ScriptedClock::new(&[1_000, 1_000, 1_000, 1_000, 1_000, 1_005, 1_005]);
        let cfg = config(2, OverflowPolicy::AdvanceClock);
        let mut g = StampGenerator::with_config_and_time_source(cfg, clock).unwrap();
        let expected = [
            (1_000, 0),
            (1_000, 1),
            (1_001, 0),
            (1_001, 1),
            (1_002, 0),
            (1_005, 0),
            (1_005, 1),
        ];
        for (ts, counter) in expected {
            assert_eq!(g.generate().unwrap().timestamp(), ts);
            assert_eq!(g.counter(), counter);
        }
    }

    /// Runs ahead of a frozen clock by one millisecond per max_sub_ms stamps
    #[test]
    fn runs_ahead_of_a_frozen_clock_by_one_millisecond_per_max_sub_ms_stamps() {
        let cfg = config(2, OverflowPolicy::AdvanceClock);
        let mut g = StampGenerator::with_config_and_time_source(cfg, || 1_000).unwrap();
        let timestamps: Vec<u64> = (0..10).map(|_| g.generate().unwrap().timestamp()).collect();
        assert_eq!(
            timestamps,
            [1_000, 1_000, 1_001, 1_001, 1_002, 1_002, 1_003, 1_003, 1_004, 1_004]
        );
    }

    /// Catches up with the clock after a rollback without skipping ahead
    #[test]
    fn catches_up_with_the_clock_after_a_rollback_without_skipping_ahead() {
        let clock = ScriptedClock::new(&[500, 400, 400, 501]);
        let mut g = StampGenerator::with_time_source(clock);
        let expected = [(500, 0), (500, 1), (500, 2), (501, 0)];
        for (ts, counter) in expected {
            assert_eq!(g.generate().unwrap().timestamp(), ts);
            assert_eq!(g.counter(), counter);
        }
    }

    /// Blocks until the clock passes the last millisecond on counter overflow
    #[test]
    fn blocks_until_the_clock_passes_the_last_millisecond_on_counter_overflow() {
        // stalls for a few polls and jumps backward once before moving on
        let clock = ScriptedClock::new(&[200, 200, 200, 200, 199, 200, 202]);
        let cfg = config(2, OverflowPolicy::BlockUntilNextMs);
        let mut g = StampGenerator::with_config_and_time_source(cfg, clock).unwrap();
        assert_eq!(g.generate().unwrap().timestamp(), 200);
        assert_eq!(g.generate().unwrap().timestamp(), 200);
        assert_eq!(g.generate().unwrap().timestamp(), 202);
        assert_eq!(g.counter(), 0);
    }

    /// Fails with OutOfRange and keeps its state when the clock exceeds 48 bits
    #[test]
    fn fails_with_out_of_range_and_keeps_its_state_when_the_clock_exceeds_48_bits() {
        let clock = ScriptedClock::new(&[1_000, MAX_TIMESTAMP + 1, u64::MAX, 1_000]);
        let mut g = StampGenerator::with_time_source(clock);
        assert_eq!(g.generate().unwrap().timestamp(), 1_000);
        assert_eq!(
            g.generate(),
            Err(Error::OutOfRange {
                unix_ts_ms: MAX_TIMESTAMP + 1
            })
        );
        assert_eq!(
            g.generate(),
            Err(Error::OutOfRange {
                unix_ts_ms: u64::MAX
            })
        );
        assert_eq!(g.last_timestamp(), 1_000);
        assert_eq!(g.generate().unwrap().timestamp(), 1_000);
        assert_eq!(g.counter(), 1);
    }

    /// Refuses to advance past the 48-bit limit on overflow or rollback
    #[test]
    fn refuses_to_advance_past_the_48_bit_limit_on_overflow_or_rollback() {
        let cfg = config(1, OverflowPolicy::AdvanceClock);
        let mut g = StampGenerator::with_config_and_time_source(cfg, || MAX_TIMESTAMP).unwrap();
        assert_eq!(g.generate().unwrap().timestamp(), MAX_TIMESTAMP);
        assert_eq!(
            g.generate(),
            Err(Error::OutOfRange {
                unix_ts_ms: MAX_TIMESTAMP + 1
            })
        );
        assert_eq!(
            g.generate_core(1),
            Err(Error::OutOfRange {
                unix_ts_ms: MAX_TIMESTAMP + 1
            })
        );
    }

    /// Rejects invalid configuration at construction
    #[test]
    fn rejects_invalid_configuration_at_construction() {
        for n in [0, 65537] {
            let cfg = config(n, OverflowPolicy::AdvanceClock);
            assert!(matches!(
                StampGenerator::with_config_and_time_source(cfg, || 0),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    /// Renders stamps in the requested and the default format
    #[test]
    fn renders_stamps_in_the_requested_and_the_default_format() {
        let cfg = StampConfig {
            default_format: Format::Hex,
            ..Default::default()
        };
        let mut g = StampGenerator::with_config_and_time_source(cfg, || 0x0102_0304_0506).unwrap();
        assert_eq!(
            g.generate_as(Format::Base64Url),
            Ok(Encoded::Base64Url("AQIDBAUG".into()))
        );
        assert_eq!(
            g.generate_as(Format::Raw),
            Ok(Encoded::Raw(vec![1, 2, 3, 4, 5, 6]))
        );
        assert_eq!(
            g.generate_default(),
            Ok(Encoded::Hex("010203040506".into()))
        );
    }

    /// Generates batches sequentially and aborts a batch at the first failure
    #[test]
    fn generates_batches_sequentially_and_aborts_a_batch_at_the_first_failure() {
        let cfg = config(2, OverflowPolicy::AdvanceClock);
        let mut g = StampGenerator::with_config_and_time_source(cfg, || 10).unwrap();
        let batch = g.generate_batch(5).unwrap();
        let timestamps: Vec<u64> = batch.iter().map(|e| e.timestamp()).collect();
        assert_eq!(timestamps, [10, 10, 11, 11, 12]);
        assert!(g.generate_batch(0).unwrap().is_empty());

        let cfg = config(1, OverflowPolicy::AdvanceClock);
        let mut g =
            StampGenerator::with_config_and_time_source(cfg, || MAX_TIMESTAMP - 1).unwrap();
        assert!(g.generate_batch(3).is_err());
        assert_eq!(g.last_timestamp(), MAX_TIMESTAMP);
    }

    /// Iterates as an infinite stream
    #[test]
    fn iterates_as_an_infinite_stream() {
        let g = StampGenerator::with_time_source(ScriptedClock::new(&[7, 8, 9]));
        let v: Vec<u64> = g.take(4).map(|e| e.unwrap().timestamp()).collect();
        assert_eq!(v, [7, 8, 9, 9]);
    }

    #[cfg(feature = "std")]
    #[test]
    fn encodes_up_to_date_timestamp_with_the_system_clock() {
        use std::time;
        let mut g = StampGenerator::new();
        for _ in 0..10_000 {
            let ts_now = time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis() as i64;
            let ts = g.generate().unwrap().timestamp() as i64;
            assert!((ts_now - ts).abs() < 16);
        }
    }
}
