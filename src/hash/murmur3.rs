//! MurmurHash3 x86_32: the default seedable hash family.
//!
//! The randomized perfect-hash search and the BMZ edge hashes both draw
//! from a family of functions indexed by a seed; murmur3's 32-bit variant
//! is that family. The finalizer gives full avalanche, so nearby seeds
//! yield effectively independent functions.

use crate::hash::family::HashFamily;
use crate::hash::hasher::HashRange;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// MurmurHash3 x86_32 of `bytes` under `seed`.
///
/// # Examples
///
/// ```
/// use perfectcraft::hash::murmur3_32;
///
/// assert_eq!(murmur3_32(b"", 0), 0);
/// assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
/// ```
#[must_use]
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut h = seed;

    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        let k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        h ^= mix(k);
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k |= u32::from(byte) << (8 * i);
        }
        h ^= mix(k);
    }

    h ^= bytes.len() as u32;
    fmix(h)
}

#[inline]
fn mix(mut k: u32) -> u32 {
    k = k.wrapping_mul(C1);
    k = k.rotate_left(15);
    k.wrapping_mul(C2)
}

#[inline]
fn fmix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// The murmur3 x86_32 [`HashFamily`].
///
/// 64-bit seeds are folded onto the 32-bit murmur seed by xoring the high
/// word into the low one.
#[derive(Debug, Default, Clone, Copy)]
pub struct Murmur3;

impl HashFamily for Murmur3 {
    fn range(&self) -> HashRange {
        HashRange::from_bits(32)
    }

    #[inline]
    fn hash_bytes(&self, bytes: &[u8], seed: u64) -> u64 {
        let folded = (seed ^ (seed >> 32)) as u32;
        u64::from(murmur3_32(bytes, folded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0x0000_0000);
        assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
        assert_eq!(murmur3_32(b"", 0xffff_ffff), 0x81f1_6f39);
        assert_eq!(murmur3_32(b"aaaa", 0x9747_b28c), 0x5a97_808a);
    }

    #[test]
    fn test_tail_lengths() {
        // Every tail length takes a distinct code path; all must be stable
        // and distinct for a fixed seed.
        let hashes: Vec<u32> = (0..8)
            .map(|n| murmur3_32(&b"abcdefgh"[..n], 7))
            .collect();
        for (i, &a) in hashes.iter().enumerate() {
            for &b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_seed_changes_hash() {
        assert_ne!(murmur3_32(b"key", 0), murmur3_32(b"key", 1));
    }

    #[test]
    fn test_family_folds_wide_seeds() {
        let family = Murmur3;
        assert_eq!(
            family.hash_bytes(b"key", 0x0000_0001_0000_0000),
            u64::from(murmur3_32(b"key", 1))
        );
        assert_eq!(family.range().bits(), 32);
    }
}
