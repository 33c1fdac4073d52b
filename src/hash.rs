//! Hash functions and the [`HashKind`] discriminator.
//!
//! Two disciplines are provided:
//!
//! - [`hash_int`] treats the key as an opaque block: its bytes are summed as
//!   signed values and the sum is run through a multiplicative XOR-shift
//!   avalanche.
//! - [`hash_str`] is djb2 over a NUL-terminated string (`h = h * 33 + c`,
//!   seeded with 5381).
//!
//! [`HashKind`] selects one of them at runtime and plugs into any container
//! that takes a [`BuildHasher`].

use core::fmt;
use core::hash::BuildHasher;
use core::hash::Hasher;
use core::str::FromStr;

use alloc::string::ToString;

use crate::error::Error;

const AVALANCHE_MULTIPLIER: u32 = 0x045d_9f3b;
const DJB2_SEED: u32 = 5381;

/// Mixes a 32-bit value so that every input bit affects every output bit.
#[inline]
pub fn avalanche(mut x: u32) -> u32 {
    x = ((x >> 16) ^ x).wrapping_mul(AVALANCHE_MULTIPLIER);
    x = ((x >> 16) ^ x).wrapping_mul(AVALANCHE_MULTIPLIER);
    (x >> 16) ^ x
}

/// Hashes a fixed-width key block.
///
/// Each byte is sign-extended before being added to the running sum, so
/// `0xFF` contributes `-1`.
///
/// ```rust
/// # use basic_containers::hash::hash_int;
/// assert_eq!(hash_int(&0u32.to_le_bytes()), 0);
/// assert_ne!(hash_int(&1u32.to_le_bytes()), hash_int(&2u32.to_le_bytes()));
/// ```
#[inline]
pub fn hash_int(bytes: &[u8]) -> u32 {
    avalanche(byte_sum(0, bytes))
}

/// Hashes a NUL-terminated byte string with djb2. Bytes after the first NUL
/// are ignored; a slice without a NUL is hashed in full.
///
/// ```rust
/// # use basic_containers::hash::hash_str;
/// assert_eq!(hash_str(b""), 5381);
/// assert_eq!(hash_str(b"a\0ignored"), hash_str(b"a"));
/// ```
#[inline]
pub fn hash_str(bytes: &[u8]) -> u32 {
    crate::compare::until_nul(bytes)
        .iter()
        .fold(DJB2_SEED, |hash, &c| djb2_step(hash, c))
}

#[inline(always)]
fn byte_sum(start: u32, bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(start, |sum, &b| sum.wrapping_add(b as i8 as u32))
}

#[inline(always)]
fn djb2_step(hash: u32, c: u8) -> u32 {
    (hash << 5).wrapping_add(hash).wrapping_add(c as i8 as u32)
}

/// Runtime selector for the hash discipline used by a map.
///
/// `HashKind` is a [`BuildHasher`]; a map is bound to one kind for its whole
/// life, since a key hashed under one kind cannot be found under the other.
///
/// It parses from the discriminator strings `"int"` / `"integer"` and
/// `"string"` / `"str"`:
///
/// ```rust
/// # use basic_containers::HashKind;
/// let kind: HashKind = "string".parse().unwrap();
/// assert_eq!(kind, HashKind::String);
/// assert!("crc32".parse::<HashKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashKind {
    /// Sum-and-avalanche hashing of the key's bytes. Suits integers, tuples of
    /// integers, and other fixed-width keys.
    #[default]
    Integer,
    /// djb2 hashing of the key's bytes. Suits `str`-like keys: the
    /// terminator bytes `0x00` and `0xFF` (the latter is what `str`'s `Hash`
    /// impl appends) are skipped, so a `&str` key hashes to exactly
    /// [`hash_str`] of its UTF-8 bytes.
    String,
}

impl HashKind {
    /// Hashes a raw key block under this discipline.
    pub fn hash_bytes(self, bytes: &[u8]) -> u32 {
        match self {
            HashKind::Integer => hash_int(bytes),
            HashKind::String => hash_str(bytes),
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKind::Integer => f.write_str("int"),
            HashKind::String => f.write_str("string"),
        }
    }
}

impl FromStr for HashKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" | "integer" => Ok(HashKind::Integer),
            "string" | "str" => Ok(HashKind::String),
            other => Err(Error::UnknownHashKind(other.to_string())),
        }
    }
}

impl BuildHasher for HashKind {
    type Hasher = KeyHasher;

    fn build_hasher(&self) -> Self::Hasher {
        match self {
            HashKind::Integer => KeyHasher::Integer { sum: 0 },
            HashKind::String => KeyHasher::String { hash: DJB2_SEED },
        }
    }
}

/// Streaming state for the two [`HashKind`] disciplines.
#[derive(Clone, Copy, Debug)]
pub enum KeyHasher {
    /// Running signed byte sum; the avalanche is applied in `finish`.
    Integer {
        /// Sum of every byte written so far.
        sum: u32,
    },
    /// Running djb2 state.
    String {
        /// djb2 value of every non-terminator byte written so far.
        hash: u32,
    },
}

impl Hasher for KeyHasher {
    fn write(&mut self, bytes: &[u8]) {
        match self {
            KeyHasher::Integer { sum } => *sum = byte_sum(*sum, bytes),
            KeyHasher::String { hash } => {
                *hash = bytes
                    .iter()
                    .filter(|&&b| b != 0x00 && b != 0xFF)
                    .fold(*hash, |h, &c| djb2_step(h, c));
            }
        }
    }

    fn finish(&self) -> u64 {
        match *self {
            KeyHasher::Integer { sum } => u64::from(avalanche(sum)),
            KeyHasher::String { hash } => u64::from(hash),
        }
    }
}
