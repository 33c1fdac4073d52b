//! Comparison helpers shared by the containers.
//!
//! Every comparator in this crate has the shape `Fn(&T, &T) -> Ordering`,
//! where `Less` means the first argument sorts before the second.

use core::cmp::Ordering;

/// Comparator type used by containers constructed without an explicit
/// comparator.
pub type NaturalOrder<T> = fn(&T, &T) -> Ordering;

/// Orders two values by their `Ord` implementation.
#[inline]
pub fn natural<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

/// Orders two values by the reverse of their `Ord` implementation.
#[inline]
pub fn reverse<T: Ord>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}

/// Builds a comparator that orders values by a derived key.
///
/// ```rust
/// # use basic_containers::compare::by_key;
/// let by_len = by_key(|s: &&str| s.len());
/// assert!(by_len(&"ab", &"abc").is_lt());
/// ```
pub fn by_key<T, K, F>(key: F) -> impl Fn(&T, &T) -> Ordering
where
    K: Ord,
    F: Fn(&T) -> K,
{
    move |a, b| key(a).cmp(&key(b))
}

/// Compares two byte blocks the way `memcmp` does: byte by byte as unsigned
/// values, with a shorter block ordering first when it is a prefix of the
/// other.
#[inline]
pub fn data_compare(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Returns the prefix of `bytes` before the first NUL byte, or all of
/// `bytes` if it holds no NUL.
#[inline]
pub fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Compares two NUL-terminated byte strings. Bytes after the terminator are
/// ignored, so `b"ab\0x"` and `b"ab"` compare equal.
#[inline]
pub fn string_compare(a: &[u8], b: &[u8]) -> Ordering {
    until_nul(a).cmp(until_nul(b))
}
