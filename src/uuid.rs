use std::fmt;

use fstr::FStr;

use crate::{Error, Result, UUID_SIZE};

/// Represents a UUIDv7 as a 16-byte big-endian array.
///
/// The derived ordering compares the bytes lexicographically, so identifiers built from
/// non-decreasing timestamps compare non-decreasing on their first six bytes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Stamps a millisecond timestamp and the version and variant bits onto a pre-randomized
    /// 16-byte window.
    ///
    /// Bytes 0-3 receive `unix_ts_ms >> 16` and bytes 4-5 receive the low 16 bits, both
    /// big-endian. The top nibble of byte 6 becomes `0111` and the top two bits of byte 8 become
    /// `10`. Every other bit of `random` is kept as is.
    ///
    /// Only the low 48 bits of `unix_ts_ms` are embedded; no value is rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7::Uuid;
    ///
    /// let uuid = Uuid::from_random_v7(0x0190_b6a3_8c21, [0u8; 16]);
    /// assert_eq!(uuid.to_string(), "0190b6a3-8c21-7000-8000-000000000000");
    /// ```
    pub const fn from_random_v7(unix_ts_ms: i64, random: [u8; 16]) -> Self {
        let time_high = ((unix_ts_ms >> 16) as i32).to_be_bytes();
        let time_low = ((unix_ts_ms & 0xffff) as i16).to_be_bytes();

        let mut bytes = random;
        bytes[0] = time_high[0];
        bytes[1] = time_high[1];
        bytes[2] = time_high[2];
        bytes[3] = time_high[3];
        bytes[4] = time_low[0];
        bytes[5] = time_low[1];
        bytes[6] = (bytes[6] & 0x0f) | 0x70;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(bytes)
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// [`FStr`] that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7::Uuid;
    ///
    /// let x = Uuid::from([0x01, 0x80, 0x94, 0x24, 0x3e, 0x59, 0x7c, 0x05, 0x92, 0x19, 0x56, 0x6f, 0x82, 0xff, 0xf6, 0x72]);
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "01809424-3e59-7c05-9219-566f82fff672");
    /// assert_eq!(format!("{}", y), "01809424-3e59-7c05-9219-566f82fff672");
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut i = 0;
        for (j, e) in self.0.iter().enumerate() {
            buffer[i] = DIGITS[(e >> 4) as usize];
            buffer[i + 1] = DIGITS[(e & 15) as usize];
            i += 2;
            if j == 3 || j == 5 || j == 7 || j == 9 {
                buffer[i] = b'-';
                i += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte written above is an ASCII hex digit or hyphen.
        unsafe { FStr::from_inner_unchecked(buffer) }
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Formats a 16-byte slice as the 8-4-4-4-12 canonical hexadecimal string.
///
/// The slice is neither padded nor truncated; any other length is rejected.
///
/// # Examples
///
/// ```rust
/// let mut bytes = [0u8; 16];
/// bytes[6] = 0x70;
/// bytes[8] = 0x80;
/// assert_eq!(uuidv7::format(&bytes)?, "00000000-0000-7000-8000-000000000000");
/// assert!(uuidv7::format(&bytes[..15]).is_err());
/// # Ok::<(), uuidv7::Error>(())
/// ```
pub fn format(bytes: &[u8]) -> Result<String> {
    Uuid::try_from(bytes).map(String::from)
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self> {
        <[u8; UUID_SIZE]>::try_from(src)
            .map(Self)
            .map_err(|_| Error::InvalidLength { len: src.len() })
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }

}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::Uuid;
    use serde::Serializer;

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Uuid;
        use serde_test::{assert_ser_tokens, Configure, Token};

        /// Serializes prepared cases correctly
        #[test]
        fn serializes_prepared_cases_correctly() {
            let cases: [(&'static str, &'static [u8; 16]); 3] = [
                ("00000000-0000-0000-0000-000000000000", &[0u8; 16]),
                (
                    "0180ae59-078c-7b80-b113-2fe14a615fb3",
                    &[
                        1, 128, 174, 89, 7, 140, 123, 128, 177, 19, 47, 225, 74, 97, 95, 179,
                    ],
                ),
                (
                    "0180ae59-0791-7e79-8804-02ce2b5bc8d2",
                    &[
                        1, 128, 174, 89, 7, 145, 126, 121, 136, 4, 2, 206, 43, 91, 200, 210,
                    ],
                ),
            ];

            for (text, bytes) in cases {
                let e = Uuid::from(*bytes);
                assert_ser_tokens(&e.readable(), &[Token::Str(text)]);
                assert_ser_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format, Uuid};
    use crate::Error;

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((i64, [u8; 16]), &'static str)] {
        const MAX_INT48: i64 = (1 << 48) - 1;

        &[
            ((0, [0x00; 16]), "00000000-0000-7000-8000-000000000000"),
            ((0, [0xff; 16]), "00000000-0000-7fff-bfff-ffffffffffff"),
            ((MAX_INT48, [0x00; 16]), "ffffffff-ffff-7000-8000-000000000000"),
            ((MAX_INT48, [0xff; 16]), "ffffffff-ffff-7fff-bfff-ffffffffffff"),
            (
                (
                    0x017f_22e2_79b0,
                    [
                        0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x1c, 0xc3, 0x58, 0xc4, 0xdc, 0x0c,
                        0x0c, 0x07, 0x39, 0x8f,
                    ],
                ),
                "017f22e2-79b0-7cc3-98c4-dc0c0c07398f",
            ),
        ]
    }

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        for ((ts, random), text) in prepare_cases() {
            let e = Uuid::from_random_v7(*ts, *random);
            assert_eq!(&e.encode() as &str, *text);
            assert_eq!(&e.to_string(), text);
            assert_eq!(&format(e.as_bytes()).unwrap(), text);
        }
    }

    /// Stamps timestamp into first six bytes and keeps other random bytes
    #[test]
    fn stamps_timestamp_and_keeps_random_bytes() {
        let random: [u8; 16] = core::array::from_fn(|i| (i as u8) * 17);
        let ts = 0x0123_4567_89abi64;
        let e = Uuid::from_random_v7(ts, random);
        let bytes = e.as_bytes();
        assert_eq!(bytes[..6], ts.to_be_bytes()[2..]);
        assert_eq!(bytes[6], 0x70 | (random[6] & 0x0f));
        assert_eq!(bytes[7], random[7]);
        assert_eq!(bytes[8], 0x80 | (random[8] & 0x3f));
        assert_eq!(bytes[9..], random[9..]);
    }

    /// Orders timestamp prefixes by timestamp
    #[test]
    fn orders_timestamp_prefixes_by_timestamp() {
        let timestamps = [
            0i64,
            1,
            0xffff,
            0x1_0000,
            0x7fff_ffff,
            0x8000_0000,
            0xffff_ffff,
            0x1_0000_0000,
            0x7fff_ffff_ffff,
            0x8000_0000_0000,
            (1 << 48) - 1,
        ];
        for pair in timestamps.windows(2) {
            let a = Uuid::from_random_v7(pair[0], [0xff; 16]);
            let b = Uuid::from_random_v7(pair[1], [0x00; 16]);
            assert!(a.as_bytes()[..6] < b.as_bytes()[..6], "{} < {}", a, b);
        }
    }

    /// Produces same string from same inputs
    #[test]
    fn produces_same_string_from_same_inputs() {
        let random = [0x3c; 16];
        let a = Uuid::from_random_v7(1_700_000_000_000, random);
        let b = Uuid::from_random_v7(1_700_000_000_000, random);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    /// Returns error to input of wrong length
    #[test]
    fn returns_error_to_input_of_wrong_length() {
        for len in [0, 1, 15, 17, 32] {
            let bytes = vec![0u8; len];
            assert!(matches!(
                format(&bytes),
                Err(Error::InvalidLength { len: l }) if l == len
            ));
            assert!(Uuid::try_from(&bytes[..]).is_err());
        }
    }

    /// Returns Nil and Max UUIDs
    #[test]
    fn returns_nil_and_max_uuids() {
        assert_eq!(
            &Uuid::NIL.encode() as &str,
            "00000000-0000-0000-0000-000000000000"
        );

        assert_eq!(
            &Uuid::MAX.encode() as &str,
            "ffffffff-ffff-ffff-ffff-ffffffffffff"
        );
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for ((ts, random), _) in prepare_cases() {
            let e = Uuid::from_random_v7(*ts, *random);
            assert_eq!(Uuid::from(<[u8; 16]>::from(e)), e);
            assert_eq!(Uuid::from(u128::from(e)), e);
            assert_eq!(Uuid::try_from(e.as_ref()).unwrap(), e);
        }
    }
}
