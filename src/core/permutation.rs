//! Permutations over `0..n` and in-place slice reordering.
//!
//! A minimal perfect hash induces a permutation of its domain: key `i` in
//! iteration order moves to position `hash(key_i)`. [`Permutation`] captures
//! that mapping so callers can reorder key material between iteration order
//! and hash order in either direction.
//!
//! # Examples
//!
//! ```
//! use perfectcraft::core::Permutation;
//!
//! // Element 0 -> position 2, element 1 -> position 0, element 2 -> position 1.
//! let perm = Permutation::from_order(&[2, 0, 1]).unwrap();
//! let mut data = vec!["a", "b", "c"];
//! perm.apply(&mut data).unwrap();
//! assert_eq!(data, vec!["b", "c", "a"]);
//!
//! perm.inverse().apply(&mut data).unwrap();
//! assert_eq!(data, vec!["a", "b", "c"]);
//! ```

use crate::core::bitvec::BitVec;
use crate::error::{PerfectCraftError, Result};

/// A bijection of `0..n` onto itself.
///
/// `get(i)` is the target position of the element at source position `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    targets: Box<[usize]>,
}

impl Permutation {
    /// Build a permutation from target positions.
    ///
    /// `order[i]` is where the element at position `i` ends up.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectCraftError::InvalidParameters`] when `order` is not
    /// a bijection of `0..order.len()`.
    pub fn from_order(order: &[usize]) -> Result<Self> {
        let n = order.len();
        let mut seen = BitVec::new(n);
        for &target in order {
            if target >= n {
                return Err(PerfectCraftError::invalid_parameters(format!(
                    "permutation target {} out of range for length {}",
                    target, n
                )));
            }
            if seen.get_then_set(target, true) {
                return Err(PerfectCraftError::invalid_parameters(format!(
                    "duplicate permutation target {}",
                    target
                )));
            }
        }
        Ok(Self {
            targets: order.to_vec().into_boxed_slice(),
        })
    }

    /// The size of the permuted range.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the permutation is over an empty range.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target position of the element at source position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.targets[index]
    }

    /// The permutation mapping each target position back to its source.
    #[must_use]
    pub fn inverse(&self) -> Permutation {
        let mut targets = vec![0usize; self.targets.len()];
        for (source, &target) in self.targets.iter().enumerate() {
            targets[target] = source;
        }
        Permutation {
            targets: targets.into_boxed_slice(),
        }
    }

    /// Reorder `data` in place so that `data[get(i)]` afterwards holds what
    /// `data[i]` held before.
    ///
    /// Runs in O(n) time and O(n/8) transient bytes by walking cycles with
    /// a visited bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectCraftError::InvalidParameters`] when `data` and the
    /// permutation differ in length.
    pub fn apply<T>(&self, data: &mut [T]) -> Result<()> {
        if data.len() != self.targets.len() {
            return Err(PerfectCraftError::invalid_parameters(format!(
                "permutation length {} does not match data length {}",
                self.targets.len(),
                data.len()
            )));
        }
        let mut visited = BitVec::new(data.len());
        for start in 0..data.len() {
            if visited.get(start) {
                continue;
            }
            visited.set(start);
            let mut position = self.targets[start];
            while position != start {
                data.swap(start, position);
                visited.set(position);
                position = self.targets[position];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let perm = Permutation::from_order(&[0, 1, 2]).unwrap();
        let mut data = vec![10, 20, 30];
        perm.apply(&mut data).unwrap();
        assert_eq!(data, vec![10, 20, 30]);
    }

    #[test]
    fn test_apply_moves_sources_to_targets() {
        let perm = Permutation::from_order(&[3, 1, 0, 2]).unwrap();
        let mut data = vec!["a", "b", "c", "d"];
        perm.apply(&mut data).unwrap();
        // data[order[i]] == old data[i]
        assert_eq!(data, vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_inverse_round_trip() {
        let perm = Permutation::from_order(&[2, 4, 1, 0, 3]).unwrap();
        let original = vec![1, 2, 3, 4, 5];
        let mut data = original.clone();
        perm.apply(&mut data).unwrap();
        perm.inverse().apply(&mut data).unwrap();
        assert_eq!(data, original);
    }

    #[test]
    fn test_inverse_composition_is_identity() {
        let perm = Permutation::from_order(&[1, 3, 0, 2]).unwrap();
        let inv = perm.inverse();
        for i in 0..perm.len() {
            assert_eq!(inv.get(perm.get(i)), i);
        }
    }

    #[test]
    fn test_rejects_out_of_range_target() {
        assert!(Permutation::from_order(&[0, 3]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_target() {
        assert!(Permutation::from_order(&[0, 1, 1]).is_err());
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let perm = Permutation::from_order(&[1, 0]).unwrap();
        let mut data = vec![1, 2, 3];
        assert!(perm.apply(&mut data).is_err());
    }

    #[test]
    fn test_empty() {
        let perm = Permutation::from_order(&[]).unwrap();
        assert!(perm.is_empty());
        let mut data: Vec<u8> = vec![];
        perm.apply(&mut data).unwrap();
    }
}
