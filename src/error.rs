use alloc::string::String;

/// Errors returned by the fallible constructors and parsers in this crate.
///
/// Lookups never produce an error: a missing key or element is reported as
/// `None` or `false` by the operation itself.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key type of a map occupies no memory.
    #[error("hash map key type must not be zero-sized")]
    ZeroSizedKey,
    /// The value type of a map occupies no memory.
    #[error("hash map value type must not be zero-sized")]
    ZeroSizedValue,
    /// The element type of a tree occupies no memory.
    #[error("tree element type must not be zero-sized")]
    ZeroSizedElement,
    /// A hash discriminator string did not name a known [`HashKind`].
    ///
    /// [`HashKind`]: crate::hash::HashKind
    #[error("unknown hash kind `{0}`, expected `int` or `string`")]
    UnknownHashKind(String),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_violation() {
        assert_eq!(
            Error::ZeroSizedKey.to_string(),
            "hash map key type must not be zero-sized"
        );
        assert_eq!(
            Error::UnknownHashKind("crc".to_string()).to_string(),
            "unknown hash kind `crc`, expected `int` or `string`"
        );
    }
}
