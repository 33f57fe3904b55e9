//! Default generators and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Encoded, Format, Result, Stamp, Uuid};
use inner::GlobalGenInner;

/// Returns the lock handle of the process-wide default generators, creating them if none exist.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("stampid: could not lock global generator")
}

/// Generates a 48-bit stamp object.
///
/// This function employs a process-wide generator with the default [`StampConfig`] and
/// guarantees the process-wide monotonic order of stamps. On Unix, the generator is reset when
/// the process ID changes (i.e., upon process forks).
///
/// # Examples
///
/// ```rust
/// let stamp = stampid::stamp()?;
/// println!("{}", stamp); // e.g., "AZUBdUmJ"
/// println!("{:?}", stamp.as_bytes()); // as 6-byte big-endian array
/// # Ok::<(), stampid::Error>(())
/// ```
///
/// [`StampConfig`]: crate::StampConfig
pub fn stamp() -> Result<Stamp> {
    lock_global_gen().get_mut().stamp.generate()
}

/// Generates a 48-bit stamp rendered in `format`.
///
/// # Examples
///
/// ```rust
/// use stampid::Format;
///
/// let text = stampid::generate(Format::Base64Url)?;
/// assert_eq!(text.as_bytes().len(), 8);
///
/// let hex = stampid::generate("hex".parse()?)?;
/// assert_eq!(hex.as_bytes().len(), 12);
/// # Ok::<(), stampid::Error>(())
/// ```
pub fn generate(format: Format) -> Result<Encoded> {
    stamp().map(|e| format.encode(e.as_bytes()))
}

/// Generates a UUIDv7 object.
///
/// This function employs a process-wide generator and guarantees the process-wide monotonic
/// order of UUIDs generated within the same millisecond. On Unix, this function resets the
/// generator when the process ID changes (i.e., upon process forks) to prevent collisions across
/// processes.
///
/// # Examples
///
/// ```rust
/// let uuid = stampid::uuid7()?;
/// println!("{}", uuid); // e.g., "AYCUJD5ZfAWSGVZvgv_2cg"
/// println!("{}", uuid.encode()); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// # Ok::<(), stampid::Error>(())
/// ```
pub fn uuid7() -> Result<Uuid> {
    lock_global_gen().get_mut().v7.generate()
}

/// Generates a UUIDv7 as 22 characters of unpadded Base64URL.
///
/// # Examples
///
/// ```rust
/// let id = stampid::generate_id()?;
/// assert_eq!(id.len(), 22);
/// # Ok::<(), stampid::Error>(())
/// ```
pub fn generate_id() -> Result<String> {
    uuid7().map(|e| e.encode_base64url())
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use crate::generator::{RandSource, StampGenerator, StdSystemTime, V7Generator};

    /// The random number generator of the default UUIDv7 generator.
    ///
    /// It employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to emulate the strategy used by
    /// [`rand::rngs::ThreadRng`].
    #[derive(Debug)]
    pub struct GlobalGenRng(ReseedingRng<ChaCha12Core, OsRng>);

    impl RandSource for GlobalGenRng {
        fn next_u32(&mut self) -> u32 {
            rand::RngCore::next_u32(&mut self.0)
        }

        fn next_u64(&mut self) -> u64 {
            rand::RngCore::next_u64(&mut self.0)
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        pub stamp: StampGenerator<StdSystemTime>,
        pub v7: V7Generator<GlobalGenRng, StdSystemTime>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            let core = ChaCha12Core::from_rng(OsRng)
                .expect("stampid: could not initialize global generator");
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                stamp: StampGenerator::new(),
                v7: V7Generator::new(GlobalGenRng(ReseedingRng::new(core, 1024 * 64, OsRng))),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to this instance, resetting the generator states on Unix
        /// if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut Self {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            self
        }
    }
}
