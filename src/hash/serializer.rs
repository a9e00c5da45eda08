//! Byte serialization of keys for hashing.
//!
//! The randomized perfect-hash search hashes keys through their serialized
//! form, so the serializer decides what the hash can distinguish. A
//! serializer that collapses two domain keys onto the same bytes makes
//! perfection impossible; [`PerfectDomain::is_injective`]
//! (crate::domain::PerfectDomain::is_injective) detects exactly that.
//!
//! Any `Fn(&T, &mut Vec<u8>)` closure is a serializer:
//!
//! ```
//! use perfectcraft::hash::KeySerializer;
//!
//! let utf8 = |s: &String, out: &mut Vec<u8>| out.extend_from_slice(s.as_bytes());
//! let mut buf = Vec::new();
//! utf8.serialize(&"hi".to_string(), &mut buf);
//! assert_eq!(buf, b"hi");
//! ```

/// Writes a key's distinguishing bytes into a sink.
///
/// Implementations must be deterministic: the same key always yields the
/// same byte sequence within a run.
pub trait KeySerializer<T: ?Sized> {
    /// Append the serialized form of `value` to `out`.
    fn serialize(&self, value: &T, out: &mut Vec<u8>);

    /// Serialize into a fresh buffer.
    fn to_bytes(&self, value: &T) -> Vec<u8> {
        let mut out = Vec::new();
        self.serialize(value, &mut out);
        out
    }
}

impl<T: ?Sized, F> KeySerializer<T> for F
where
    F: Fn(&T, &mut Vec<u8>),
{
    #[inline]
    fn serialize(&self, value: &T, out: &mut Vec<u8>) {
        self(value, out);
    }
}
