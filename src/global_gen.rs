//! Process-wide random pool and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync::OnceLock;

use rand::rngs::OsRng;

use crate::{RandomPool, Result, Uuid};

/// Returns the process-wide pool, creating one backed by [`OsRng`] if none exists.
///
/// On Unix, a buffer inherited across a fork is discarded before it is read, so parent and child
/// never serve the same random bytes.
fn global_pool() -> &'static RandomPool<OsRng> {
    static G: OnceLock<RandomPool<OsRng>> = OnceLock::new();
    let pool = G.get_or_init(|| RandomPool::new(OsRng));
    if unix_fork_safety::pid_changed() {
        pool.invalidate();
    }
    pool
}

/// Generates a UUIDv7 object from the current time.
///
/// This function employs a process-wide pool of random bytes shared by all threads. Identifiers
/// are ordered by their millisecond timestamp only; no order is guaranteed among identifiers
/// generated within the same millisecond.
///
/// # Errors
///
/// Returns [`Error::RandomSource`](crate::Error::RandomSource) if the operating system cannot
/// supply random bytes.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidv7::uuidv7()?;
/// println!("{uuid}"); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuidv7::uuidv7()?.to_string();
/// # Ok::<(), uuidv7::Error>(())
/// ```
pub fn uuidv7() -> Result<Uuid> {
    global_pool().generate()
}

/// Generates a UUIDv7 object from the `unix_ts_ms` passed, using the process-wide pool.
///
/// # Errors
///
/// Returns [`Error::RandomSource`](crate::Error::RandomSource) if the operating system cannot
/// supply random bytes.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidv7::uuidv7_with_time(0x0190_b6a3_8c21)?;
/// assert!(uuid.to_string().starts_with("0190b6a3-8c21-7"));
/// # Ok::<(), uuidv7::Error>(())
/// ```
pub fn uuidv7_with_time(unix_ts_ms: i64) -> Result<Uuid> {
    global_pool().generate_with_time(unix_ts_ms)
}

/// Replaces the buffer of the process-wide pool. The next generation refills it.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) if `buffer` is
/// shorter than 16 bytes, leaving the current buffer in place.
///
/// # Examples
///
/// ```rust
/// uuidv7::set_buffer(vec![0u8; 4096])?;
/// assert!(uuidv7::set_buffer(vec![0u8; 15]).is_err());
/// # Ok::<(), uuidv7::Error>(())
/// ```
pub fn set_buffer(buffer: Vec<u8>) -> Result<()> {
    global_pool().set_buffer(buffer)
}

/// Replaces the buffer of the process-wide pool with a fresh one of `len` bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) if `len` is less
/// than 16.
pub fn set_buffer_size(len: usize) -> Result<()> {
    global_pool().set_buffer_size(len)
}

#[cfg(unix)]
mod unix_fork_safety {
    use std::{
        process,
        sync::atomic::{AtomicU32, Ordering},
    };

    static PID: AtomicU32 = AtomicU32::new(0);

    /// Returns true on the first call in a process, including the first call after a fork.
    pub fn pid_changed() -> bool {
        swap_pid(&PID)
    }

    /// Records the current process ID in `last`, returning true if it differs from the one there.
    pub(super) fn swap_pid(last: &AtomicU32) -> bool {
        let pid = process::id();
        last.swap(pid, Ordering::Relaxed) != pid
    }

}

#[cfg(not(unix))]
mod unix_fork_safety {
    pub const fn pid_changed() -> bool {
        false
    }
}
