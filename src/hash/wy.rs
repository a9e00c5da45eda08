//! WyHash hash family (optional, feature = "wyhash").
//!
//! A 64-bit alternative to [`Murmur3`](crate::hash::Murmur3) for the
//! randomized perfect-hash search. The wider range makes accidental
//! collisions between serialized keys rarer, at the cost of routing every
//! perfection check through the streaming uniqueness path (a 64-bit range
//! never qualifies for the compact bitmap check).

use crate::hash::family::HashFamily;
use crate::hash::hasher::HashRange;

/// The wyhash [`HashFamily`] (64-bit range).
#[derive(Debug, Default, Clone, Copy)]
pub struct WyHash;

impl HashFamily for WyHash {
    fn range(&self) -> HashRange {
        HashRange::FULL
    }

    #[inline]
    fn hash_bytes(&self, bytes: &[u8], seed: u64) -> u64 {
        wyhash::wyhash(bytes, seed)
    }
}
