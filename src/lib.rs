//! UUID version 7 generation from a buffered pool of secure random bytes
//!
//! ```rust
//! let uuid = uuidv7::uuidv7()?;
//! println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! # Ok::<(), uuidv7::Error>(())
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562.html#name-uuid-version-7).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |         rand          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 74 `rand` bits are taken from a cryptographically strong
//!   random number generator.
//!
//! Identifiers sort by their millisecond timestamp. No order is kept among
//! identifiers generated within the same millisecond.
//!
//! # Random pool
//!
//! Random bytes are drawn from the operating system in batches into a
//! [`RandomPool`] and handed out as 16-byte windows, each starting 10 bytes
//! after the previous one. The six bytes two windows share are the ones the
//! later window overwrites with its timestamp, so no random bit ends up in two
//! identifiers. The process-wide pool behind [`uuidv7()`] holds 96 bytes by
//! default; [`set_buffer()`] swaps in a buffer of any size from 16 bytes up.
//!
//! ```rust
//! use rand::rngs::OsRng;
//! use uuidv7::{RandomPool, PAGE_BUFFER_SIZE};
//!
//! let pool = RandomPool::with_buffer(OsRng, vec![0; PAGE_BUFFER_SIZE])?;
//! let uuid = pool.generate_with_time(1_700_000_000_000)?;
//! assert_eq!(&uuid.encode()[..13], "018bcfe5-6800");
//! # Ok::<(), uuidv7::Error>(())
//! ```
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide pool and its entry point
//!   functions.
//! - `serde`: serializes [`Uuid`] as a string or as 16 bytes.
//! - `uuid`: conversions from and to `uuid::Uuid`.
//! - `tracing`: emits spans and events from pool operations.

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Size of a UUID in bytes.
pub const UUID_SIZE: usize = 16;

mod error;
pub use error::{Error, Result};

mod uuid;
pub use self::uuid::{format, Uuid};

pub mod pool;
#[doc(inline)]
pub use pool::{RandomPool, DEFAULT_BUFFER_SIZE, PAGE_BUFFER_SIZE, STRIDE};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{set_buffer, set_buffer_size, uuidv7, uuidv7_with_time};
