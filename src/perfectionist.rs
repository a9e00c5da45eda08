//! Randomized search for perfect hashes over a domain.
//!
//! A [`Perfectionist`] is created from a
//! [`PerfectDomain`](crate::domain::PerfectDomain) with a seed budget and
//! a randomness source. It offers three escalating routes to a
//! [`Perfect`] hash:
//!
//! 1. Trust: [`assumed_perfect`](Perfectionist::assumed_perfect) skips
//!    verification entirely.
//! 2. Check: [`maybe_perfect`](Perfectionist::maybe_perfect) verifies a
//!    cheap candidate (the keys' own codes) and reports the outcome.
//! 3. Search: [`perfect`](Perfectionist::perfect) draws seeded members
//!    of a hash family over the keys' serialized bytes until one is
//!    perfect or the budget runs out.
//!
//! # Examples
//!
//! ```
//! use perfectcraft::domain::PerfectDomain;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let domain = PerfectDomain::over(["Alice", "Bob", "Eve"].map(String::from));
//! let perfect = domain
//!     .using(3, StdRng::seed_from_u64(0))
//!     .perfect(|s: &String, out: &mut Vec<u8>| out.extend_from_slice(s.as_bytes()))
//!     .unwrap();
//! assert!(perfect.domain().is_perfect(perfect.hasher()));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use rand::RngCore;

use crate::domain::PerfectDomain;
use crate::error::{PerfectCraftError, Result};
use crate::hash::family::{HashFamily, SerializedHasher};
use crate::hash::hasher::{KeyCode, KeyHasher, ObjectHasher};
use crate::hash::murmur3::Murmur3;
use crate::hash::serializer::KeySerializer;
use crate::perfect::Perfect;

/// Searches a domain for perfect hashes.
///
/// Holds the domain, the seed budget, and the randomness source that both
/// this search and any later minimization draw from. Reusing one RNG keeps
/// a seeded run reproducible end to end.
pub struct Perfectionist<T> {
    domain: PerfectDomain<T>,
    max_seed_attempts: u32,
    rng: Rc<RefCell<Box<dyn RngCore>>>,
}

impl<T: 'static> Perfectionist<T> {
    pub(crate) fn new(
        domain: PerfectDomain<T>,
        max_seed_attempts: u32,
        rng: Box<dyn RngCore>,
    ) -> Self {
        Self {
            domain,
            max_seed_attempts,
            rng: Rc::new(RefCell::new(rng)),
        }
    }

    /// Wrap `hasher` as a [`Perfect`] without verifying it.
    ///
    /// Useful when reconstructing a domain with a hasher already confirmed
    /// perfect; calling it with anything else invites malfunction, since
    /// every downstream structure trusts the claim.
    #[must_use]
    pub fn assumed_perfect(&self, hasher: impl KeyHasher<T> + 'static) -> Perfect<T> {
        Perfect::new(Rc::new(hasher), self.domain.clone(), Rc::clone(&self.rng))
    }

    /// Try the keys' own [`KeyCode`]s as a perfect hash.
    ///
    /// Over many real domains the per-type code already distinguishes
    /// every key, and using it beats any serialized hash on lookup cost.
    /// Empty exactly when the codes collide somewhere in the domain.
    #[must_use]
    pub fn maybe_perfect(&self) -> Option<Perfect<T>>
    where
        T: KeyCode,
    {
        self.maybe_perfect_with(ObjectHasher::new())
    }

    /// Try an arbitrary hasher, verifying perfection over the domain.
    #[must_use]
    pub fn maybe_perfect_with(&self, hasher: impl KeyHasher<T> + 'static) -> Option<Perfect<T>> {
        self.domain
            .is_perfect(&hasher)
            .then(|| Perfect::new(Rc::new(hasher), self.domain.clone(), Rc::clone(&self.rng)))
    }

    /// Search for a perfect hash over the keys' serialized bytes with the
    /// default murmur3 family.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::PerfectionFailure`] when the serializer is
    /// proven non-injective or the seed budget is exhausted.
    pub fn perfect(&self, serializer: impl KeySerializer<T> + 'static) -> Result<Perfect<T>> {
        self.perfect_with(serializer, Murmur3)
    }

    /// Search with an explicit hash family.
    ///
    /// Attempt 0 uses the unseeded family member; each later attempt draws
    /// a fresh 64-bit seed. After two failed attempts the serializer
    /// itself falls under suspicion: if it maps two domain keys to the
    /// same bytes, no seed can ever win, and the search fails fast.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::PerfectionFailure`] as for
    /// [`perfect`](Self::perfect).
    pub fn perfect_with<F>(
        &self,
        serializer: impl KeySerializer<T> + 'static,
        family: F,
    ) -> Result<Perfect<T>>
    where
        F: HashFamily + Clone + 'static,
    {
        let serializer: Rc<dyn KeySerializer<T>> = Rc::new(serializer);
        for attempt in 0..self.max_seed_attempts {
            if attempt == 2 && !self.domain.is_injective(&*serializer) {
                return Err(PerfectCraftError::perfection_failure(
                    "serializer not injective",
                ));
            }
            let hasher: Rc<dyn KeyHasher<T>> = if attempt == 0 {
                Rc::new(SerializedHasher::unseeded(
                    family.clone(),
                    Rc::clone(&serializer),
                ))
            } else {
                let seed = self.rng.borrow_mut().next_u64();
                Rc::new(SerializedHasher::new(
                    family.clone(),
                    Rc::clone(&serializer),
                    seed,
                ))
            };
            if self.domain.is_perfect(&*hasher) {
                return Ok(Perfect::new(
                    hasher,
                    self.domain.clone(),
                    Rc::clone(&self.rng),
                ));
            }
        }
        Err(PerfectCraftError::perfection_failure(format!(
            "unable to find hash function after {}",
            self.max_seed_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn utf8(s: &String, out: &mut Vec<u8>) {
        out.extend_from_slice(s.as_bytes());
    }

    fn names() -> PerfectDomain<String> {
        PerfectDomain::over(["Alice", "Bob", "Eve"].map(String::from))
    }

    #[test]
    fn test_maybe_perfect_over_distinct_codes() {
        let perfect = names().using_defaults().maybe_perfect();
        assert!(perfect.is_some());
    }

    #[test]
    fn test_maybe_perfect_with_colliding_hasher() {
        struct Constant;
        impl KeyHasher<String> for Constant {
            fn range(&self) -> crate::hash::HashRange {
                crate::hash::HashRange::from_bits(32)
            }
            fn hash(&self, _key: &String) -> u64 {
                7
            }
        }
        let found = names().using_defaults().maybe_perfect_with(Constant);
        assert!(found.is_none());
    }

    #[test]
    fn test_perfect_with_deterministic_rng() {
        let perfect = names()
            .using(3, StdRng::seed_from_u64(0))
            .perfect(utf8)
            .unwrap();
        assert!(perfect.domain().is_perfect(perfect.hasher()));
    }

    #[test]
    fn test_perfect_rejects_non_injective_serializer() {
        let first_byte = |s: &String, out: &mut Vec<u8>| out.push(s.as_bytes()[0]);
        let domain = PerfectDomain::over(["Ant", "Bear", "Aardvark"].map(String::from));
        let err = domain
            .using(10, StdRng::seed_from_u64(0))
            .perfect(first_byte)
            .unwrap_err();
        assert_eq!(
            err,
            PerfectCraftError::perfection_failure("serializer not injective")
        );
    }

    #[test]
    fn test_exhaustion_message_carries_budget() {
        // Two keys, identical bytes, budget too small to reach the
        // injectivity doubt at attempt 2.
        let collapse = |_: &String, out: &mut Vec<u8>| out.push(0);
        let domain = PerfectDomain::over(["a", "b"].map(String::from));
        let err = domain
            .using(2, StdRng::seed_from_u64(0))
            .perfect(collapse)
            .unwrap_err();
        assert_eq!(
            err,
            PerfectCraftError::perfection_failure("unable to find hash function after 2")
        );
    }

    #[test]
    fn test_assumed_perfect_skips_verification() {
        struct Constant;
        impl KeyHasher<String> for Constant {
            fn range(&self) -> crate::hash::HashRange {
                crate::hash::HashRange::from_bits(32)
            }
            fn hash(&self, _key: &String) -> u64 {
                7
            }
        }
        // Not actually perfect; the call still succeeds by contract.
        let perfect = names().using_defaults().assumed_perfect(Constant);
        assert_eq!(perfect.hasher().hash(&"Alice".to_string()), 7);
    }
}
