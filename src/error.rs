//! Error type shared by the pool, the builder and the formatter.

use crate::UUID_SIZE;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that this crate can emit.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A replacement random buffer was too small to hold a single UUID.
    ///
    /// The replacement is rejected as a whole; the previous buffer and cursor stay in place.
    #[error("minimum UUIDv7 buffer size is {} bytes", UUID_SIZE)]
    InvalidConfiguration {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// A byte sequence handed to the formatter was not exactly 16 bytes long.
    #[error("UUID must be exactly {} bytes, got {len}", UUID_SIZE)]
    InvalidLength {
        /// Length of the rejected input.
        len: usize,
    },

    /// The secure random source could not refill the pool.
    #[error("random source failure: {0}")]
    RandomSource(#[from] rand::Error),
}
