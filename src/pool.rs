//! Buffered pool of secure random bytes and the UUIDv7 builder on top of it.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Result, Uuid, UUID_SIZE};

/// Distance the cursor moves between two consecutive windows.
///
/// Smaller than [`UUID_SIZE`]: the first six bytes of every window are overwritten by the
/// timestamp anyway, so each window starts over the previous window's last six random bytes.
/// Buffer sizes of the form `10 * n + 16` waste no bytes.
pub const STRIDE: usize = 10;

/// Buffer size of a newly created pool.
pub const DEFAULT_BUFFER_SIZE: usize = 96;

/// One memory page, a larger buffer size for heavy generation.
pub const PAGE_BUFFER_SIZE: usize = 4096;

/// Represents a buffer of random bytes from which UUIDv7 identifiers are carved, refilled in
/// whole from a cryptographically secure random number generator.
///
/// The buffer, its cursor and the random number generator live behind one mutex that is held
/// only while a window is advanced to, refilled if needed and copied out. Timestamp stamping
/// happens on the caller's copy after the lock is released.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use uuidv7::RandomPool;
///
/// let pool = sync::Arc::new(RandomPool::new(OsRng));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let pool = sync::Arc::clone(&pool);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", pool.generate().unwrap(), i);
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug)]
pub struct RandomPool<R> {
    state: Mutex<PoolState<R>>,
}

#[derive(Debug)]
struct PoolState<R> {
    buffer: Vec<u8>,
    /// Start of the most recently served window; at or past the end when exhausted.
    cursor: usize,
    rng: R,
}

impl<R: RngCore> RandomPool<R> {
    /// Creates an exhausted pool of [`DEFAULT_BUFFER_SIZE`] bytes. The first acquisition fills
    /// it.
    pub fn new(rng: R) -> Self {
        Self::from_state(PoolState {
            buffer: vec![0; DEFAULT_BUFFER_SIZE],
            cursor: DEFAULT_BUFFER_SIZE,
            rng,
        })
    }

    /// Creates an exhausted pool that uses `buffer` as its storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `buffer` is shorter than [`UUID_SIZE`].
    pub fn with_buffer(rng: R, buffer: Vec<u8>) -> Result<Self> {
        check_buffer_len(buffer.len())?;
        Ok(Self::from_state(PoolState {
            cursor: buffer.len(),
            buffer,
            rng,
        }))
    }

    fn from_state(state: PoolState<R>) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Locks the state, ignoring poisoning: no update to it can be observed half-done.
    fn lock(&self) -> MutexGuard<'_, PoolState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the size of the current buffer in bytes.
    pub fn buffer_len(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Advances to the next 16-byte window of random bytes and returns a copy of it.
    ///
    /// The cursor advances by [`STRIDE`] bytes, so consecutive windows share six bytes. When the
    /// window would run past the end of the buffer, the whole buffer is refilled first and the
    /// window restarts at offset zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSource`] if the random number generator fails during a refill. The
    /// pool stays exhausted, so the next call tries to refill again.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn acquire_window(&self) -> Result<[u8; UUID_SIZE]> {
        self.lock().next_window()
    }

    /// Replaces the buffer wholesale. The new buffer is treated as exhausted, so the next
    /// acquisition refills it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `buffer` is shorter than [`UUID_SIZE`]. The
    /// current buffer and cursor are kept in that case.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, buffer), fields(len = buffer.len())))]
    pub fn set_buffer(&self, buffer: Vec<u8>) -> Result<()> {
        check_buffer_len(buffer.len())?;
        let mut state = self.lock();
        state.cursor = buffer.len();
        state.buffer = buffer;
        Ok(())
    }

    /// Replaces the buffer with a fresh one of `len` bytes, e.g. [`PAGE_BUFFER_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `len` is less than [`UUID_SIZE`].
    pub fn set_buffer_size(&self, len: usize) -> Result<()> {
        check_buffer_len(len)?;
        self.set_buffer(vec![0; len])
    }

    /// Marks the buffer as exhausted so that no byte in it is served again.
    #[cfg(feature = "global_gen")]
    pub(crate) fn invalidate(&self) {
        let mut state = self.lock();
        state.cursor = state.buffer.len();
    }

    /// Generates a new UUIDv7 object from the current system time.
    ///
    /// A system clock set before the Unix epoch yields a negative timestamp, whose low 48 bits are
    /// embedded as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSource`] if the pool could not be refilled.
    pub fn generate(&self) -> Result<Uuid> {
        self.generate_with_time(unix_ts_ms_now())
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSource`] if the pool could not be refilled.
    pub fn generate_with_time(&self, unix_ts_ms: i64) -> Result<Uuid> {
        let window = self.acquire_window()?;
        Ok(Uuid::from_random_v7(unix_ts_ms, window))
    }
}

impl<R: RngCore> PoolState<R> {
    fn next_window(&mut self) -> Result<[u8; UUID_SIZE]> {
        self.cursor = self.cursor.saturating_add(STRIDE);
        let mut end = self.cursor.saturating_add(UUID_SIZE);
        if end > self.buffer.len() {
            self.refill()?;
            end = UUID_SIZE;
        }

        let mut window = [0u8; UUID_SIZE];
        window.copy_from_slice(&self.buffer[self.cursor..end]);
        Ok(window)
    }

    fn refill(&mut self) -> Result<()> {
        if let Err(err) = self.rng.try_fill_bytes(&mut self.buffer) {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %err, "failed to refill random pool");
            self.cursor = self.buffer.len();
            return Err(err.into());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.buffer.len(), "refilled random pool");
        self.cursor = 0;
        Ok(())
    }
}

fn check_buffer_len(len: usize) -> Result<()> {
    if len < UUID_SIZE {
        Err(Error::InvalidConfiguration { len })
    } else {
        Ok(())
    }
}

/// Returns the current Unix time in milliseconds, negative if the clock is before the epoch.
fn unix_ts_ms_now() -> i64 {
    unix_ts_ms(SystemTime::now())
}

/// Converts `time` to Unix milliseconds, saturating at the bounds of `i64`.
fn unix_ts_ms(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(err) => i64::try_from(err.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
    }
}
