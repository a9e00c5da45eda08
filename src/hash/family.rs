//! Seedable hash families and serializer composition.

use std::rc::Rc;

use crate::hash::hasher::{HashRange, KeyHasher};
use crate::hash::serializer::KeySerializer;

/// A family of byte hashes indexed by a 64-bit seed.
///
/// Drawing fresh seeds from an RNG walks through the family; the
/// [`Perfectionist`](crate::perfectionist::Perfectionist) keeps drawing
/// until some member is perfect over the domain.
pub trait HashFamily {
    /// The range every member of the family hashes into.
    fn range(&self) -> HashRange;

    /// Hash `bytes` under the family member selected by `seed`.
    fn hash_bytes(&self, bytes: &[u8], seed: u64) -> u64;
}

/// A family member composed with a key serializer: a [`KeyHasher`].
///
/// `hash(key) = family(serialize(key), seed)`. The serializer is shared
/// (`Rc`) because one search produces many seeded hashers over the same
/// serialization.
pub struct SerializedHasher<T: ?Sized, F> {
    family: F,
    serializer: Rc<dyn KeySerializer<T>>,
    seed: u64,
}

impl<T: ?Sized, F: HashFamily> SerializedHasher<T, F> {
    /// The family member for `seed`, composed with `serializer`.
    #[must_use]
    pub fn new(family: F, serializer: Rc<dyn KeySerializer<T>>, seed: u64) -> Self {
        Self {
            family,
            serializer,
            seed,
        }
    }

    /// The unseeded member (seed 0).
    #[must_use]
    pub fn unseeded(family: F, serializer: Rc<dyn KeySerializer<T>>) -> Self {
        Self::new(family, serializer, 0)
    }

    /// The seed this member was drawn with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<T: ?Sized, F: HashFamily> KeyHasher<T> for SerializedHasher<T, F> {
    fn range(&self) -> HashRange {
        self.family.range()
    }

    fn hash(&self, key: &T) -> u64 {
        let mut buf = Vec::new();
        self.serializer.serialize(key, &mut buf);
        self.family.hash_bytes(&buf, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::murmur3::{murmur3_32, Murmur3};

    fn utf8() -> Rc<dyn KeySerializer<String>> {
        Rc::new(|s: &String, out: &mut Vec<u8>| out.extend_from_slice(s.as_bytes()))
    }

    #[test]
    fn test_serialized_hasher_matches_primitive() {
        let hasher = SerializedHasher::unseeded(Murmur3, utf8());
        assert_eq!(
            hasher.hash(&"dog".to_string()),
            u64::from(murmur3_32(b"dog", 0))
        );
    }

    #[test]
    fn test_seed_selects_distinct_members() {
        let ser = utf8();
        let h0 = SerializedHasher::new(Murmur3, Rc::clone(&ser), 1);
        let h1 = SerializedHasher::new(Murmur3, ser, 2);
        assert_eq!(h0.seed(), 1);
        assert_ne!(h0.hash(&"dog".to_string()), h1.hash(&"dog".to_string()));
    }
}
