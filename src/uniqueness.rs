//! Memory-efficient duplicate detection over twice-traversable inputs.
//!
//! [`UniquenessChecker`] answers "does this stream yield only distinct
//! items?" without holding the stream in memory. A Bloom filter screens
//! the first pass; only items the filter flags as *possibly seen before*
//! enter the candidate set, and the second pass verifies candidates
//! exactly. Near-unique inputs therefore pay a fixed filter plus a handful
//! of candidate entries rather than a hash set of everything.
//!
//! # Guarantees
//!
//! - **No false negatives**: a duplicate is always reported. A Bloom false
//!   positive only inflates the candidate set, never the answer.
//! - **Two full traversals** of the input are required, and both must
//!   yield the same multiset of items.
//!
//! # Sizing
//!
//! For `n` expected items averaging `B` bytes, the filter gets
//! `m = max(256, n·ln(8B·ln²2)/ln 2)` bits (about one bit per item byte)
//! and `k = max(1, round(ln 2 · m / n))` probes per item.
//!
//! # Examples
//!
//! ```
//! use perfectcraft::uniqueness::UniquenessChecker;
//!
//! let checker = UniquenessChecker::new(5, 8.0);
//! assert!(checker.check(|| (0u64..5).map(|i| i * 7)));
//! assert!(!checker.check(|| [1u64, 2, 3, 2].into_iter()));
//! ```

use std::collections::HashSet;
use std::f64::consts::LN_2;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::core::bitvec::BitVec;

/// Smallest filter allocated, preventing pathological small-`n` sizing.
const BLOOM_MIN_BITS: usize = 256;

/// Two-pass Bloom + candidate-set uniqueness check.
///
/// The checker itself is cheap and reusable; each [`check`](Self::check)
/// call allocates a fresh filter and candidate sets.
#[derive(Debug, Clone)]
pub struct UniquenessChecker<T> {
    bloom_bits: usize,
    hash_count: usize,
    _phantom: PhantomData<fn(&T)>,
}

impl<T: Hash + Eq> UniquenessChecker<T> {
    /// Size a checker for `expected_items` items averaging
    /// `average_item_bytes` bytes each.
    ///
    /// # Panics
    ///
    /// Panics if `average_item_bytes` is not positive.
    #[must_use]
    pub fn new(expected_items: usize, average_item_bytes: f64) -> Self {
        assert!(
            average_item_bytes > 0.0,
            "non-positive average_item_bytes: {}",
            average_item_bytes
        );
        let items = expected_items.max(1) as f64;
        let bits_per_item = 8.0 * average_item_bytes;
        let optimal = items * (bits_per_item * LN_2 * LN_2).ln() / LN_2;
        let bloom_bits = optimal
            .min(i32::MAX as f64)
            .max(BLOOM_MIN_BITS as f64) as usize;
        let hash_count = ((LN_2 * bloom_bits as f64 / items).round() as usize).max(1);
        Self {
            bloom_bits,
            hash_count,
            _phantom: PhantomData,
        }
    }

    /// Whether two passes over `make_iter`'s items observe no duplicate.
    ///
    /// `make_iter` is called twice and must yield the same multiset both
    /// times.
    pub fn check<I>(&self, make_iter: impl Fn() -> I) -> bool
    where
        I: Iterator<Item = T>,
    {
        let mut candidates: HashSet<T> = HashSet::new();
        {
            // First pass: items the filter has possibly seen before become
            // candidates; a candidate observed twice is a definite duplicate.
            let mut filter = Bloom::new(self.bloom_bits, self.hash_count);
            for value in make_iter() {
                if !filter.insert_new(&value) && !candidates.insert(value) {
                    return false;
                }
            }
        }
        if candidates.is_empty() {
            return true;
        }
        // Second pass: every occurrence of a candidate is witnessed; a
        // second witness of the same item is a duplicate.
        let mut witnesses: HashSet<T> = HashSet::new();
        for value in make_iter() {
            if candidates.contains(&value) && !witnesses.insert(value) {
                return false;
            }
        }
        true
    }
}

/// Minimal Bloom filter over [`BitVec`] with enhanced double hashing.
struct Bloom {
    bits: BitVec,
    hash_count: usize,
}

impl Bloom {
    fn new(num_bits: usize, hash_count: usize) -> Self {
        Self {
            bits: BitVec::new(num_bits.max(1)),
            hash_count,
        }
    }

    /// Insert an item; true when at least one probed bit was newly set,
    /// i.e. the item was definitely absent before.
    fn insert_new<T: Hash>(&mut self, item: &T) -> bool {
        let (h1, h2) = fnv64_pair(item);
        let m = self.bits.len() as u64;
        let mut newly_set = false;
        for i in 0..self.hash_count as u64 {
            let index = h1
                .wrapping_add(i.wrapping_mul(h2))
                .wrapping_add(i.wrapping_mul(i))
                % m;
            newly_set |= !self.bits.get_then_set(index as usize, true);
        }
        newly_set
    }
}

/// FNV-1a 64 as a [`std::hash::Hasher`], seeded.
struct Fnv64 {
    state: u64,
}

impl Fnv64 {
    fn with_seed(seed: u64) -> Self {
        let mut hasher = Self {
            state: 0xcbf2_9ce4_8422_2325,
        };
        hasher.write_u64(seed);
        hasher
    }
}

impl Hasher for Fnv64 {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// Two independent 64-bit hashes of one item.
fn fnv64_pair<T: Hash>(item: &T) -> (u64, u64) {
    let mut first = Fnv64::with_seed(0x517c_c1b7_2722_0a95);
    item.hash(&mut first);
    let mut second = Fnv64::with_seed(0x9e37_79b9_7f4a_7c15);
    item.hash(&mut second);
    (first.finish(), second.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_items_pass() {
        let checker = UniquenessChecker::new(100, 8.0);
        assert!(checker.check(|| (0u64..100).map(|i| i.wrapping_mul(0x9e37_79b9))));
    }

    #[test]
    fn test_duplicate_detected() {
        let checker = UniquenessChecker::new(4, 8.0);
        assert!(!checker.check(|| [5u64, 6, 7, 5].into_iter()));
    }

    #[test]
    fn test_adjacent_duplicate_detected() {
        let checker = UniquenessChecker::new(4, 8.0);
        assert!(!checker.check(|| [1u64, 1].into_iter()));
    }

    #[test]
    fn test_empty_input_is_unique() {
        let checker = UniquenessChecker::new(0, 8.0);
        assert!(checker.check(|| std::iter::empty::<u64>()));
    }

    #[test]
    fn test_single_item_is_unique() {
        let checker = UniquenessChecker::new(1, 8.0);
        assert!(checker.check(|| std::iter::once(42u64)));
    }

    #[test]
    fn test_byte_vector_items() {
        let checker = UniquenessChecker::new(3, 50.0);
        assert!(checker.check(|| ["ab", "cd", "ef"].iter().map(|s| s.as_bytes().to_vec())));
        assert!(!checker.check(|| ["ab", "cd", "ab"].iter().map(|s| s.as_bytes().to_vec())));
    }

    #[test]
    fn test_undersized_filter_still_exact() {
        // Sized for 2 items but fed 2000: false positives flood the
        // candidate set, the answer must stay exact.
        let checker = UniquenessChecker::new(2, 1.0);
        assert!(checker.check(|| 0u64..2000));
        assert!(!checker.check(|| (0u64..2000).chain(std::iter::once(1999))));
    }

    #[test]
    fn test_large_unique_stream() {
        let checker = UniquenessChecker::new(50_000, 8.0);
        assert!(checker.check(|| 0u64..50_000));
        assert!(!checker.check(|| (0u64..50_000).map(|i| i % 49_999)));
    }

    #[test]
    fn test_sizing_floor() {
        let checker: UniquenessChecker<u64> = UniquenessChecker::new(1, 1.0);
        assert!(checker.bloom_bits >= BLOOM_MIN_BITS);
        assert!(checker.hash_count >= 1);
    }
}
