//! Key domains: the frozen sets of values a perfect hash is defined over.
//!
//! A [`PerfectDomain`] wraps a collection of `n` distinct keys that can be
//! traversed at least twice, yielding the same multiset each time. It
//! answers the two questions construction needs (is a candidate hasher
//! perfect here, is a serializer injective here) and hands out a
//! [`Perfectionist`] to run the randomized search.
//!
//! Domains never copy large inputs eagerly: a streaming source built with
//! [`PerfectDomain::over_iterable`] is traversed on demand and only its
//! count is cached.
//!
//! # Examples
//!
//! ```
//! use perfectcraft::domain::PerfectDomain;
//! use perfectcraft::hash::ObjectHasher;
//!
//! let domain = PerfectDomain::over(["cat", "dog", "cow"].map(String::from));
//! assert_eq!(domain.len(), 3);
//! assert!(domain.is_perfect(&ObjectHasher::new()));
//! ```

use std::cell::Cell;
use std::rc::Rc;

use rand::RngCore;

use crate::core::bitvec::BitVec;
use crate::core::slots::SlotStore;
use crate::hash::hasher::KeyHasher;
use crate::hash::serializer::KeySerializer;
use crate::perfectionist::Perfectionist;
use crate::uniqueness::UniquenessChecker;

/// Hash ranges at most this many bits wide get the dense-bitmap
/// perfection check; wider ranges stream through a
/// [`UniquenessChecker`].
pub(crate) const COMPACT_BIT_CUTOFF: u32 = 16;

/// Default seed budget of [`PerfectDomain::using_defaults`].
pub(crate) const MAX_SEED_ATTEMPTS: u32 = 3;

/// A collection of keys that can be traversed repeatedly.
///
/// Every pass must yield the same multiset of items. Items are yielded by
/// value: collection-backed sources clone per pass, generated sources
/// (number ranges, decoded records) simply recompute.
pub trait KeySource<T> {
    /// A fresh pass over the keys.
    fn iter(&self) -> Box<dyn Iterator<Item = T> + '_>;

    /// The key count, when the source knows it without a pass.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

impl<T: Clone> KeySource<T> for Vec<T> {
    fn iter(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.as_slice().iter().cloned())
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: Clone> KeySource<T> for SlotStore<T> {
    /// Absent slots are skipped; they are not domain members.
    fn iter(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(self.iter_present().map(|(_, value)| value))
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.count())
    }
}

/// Adapter making a re-invocable closure a [`KeySource`].
///
/// Built by [`PerfectDomain::over_iterable`]; each pass calls the closure
/// for a fresh iterator.
pub struct Iterable<F>(F);

impl<T, F, I> KeySource<T> for Iterable<F>
where
    F: Fn() -> I,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static,
{
    fn iter(&self) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new((self.0)().into_iter())
    }
}

struct DomainInner<T> {
    source: Box<dyn KeySource<T>>,
    len: Cell<Option<usize>>,
}

/// The frozen set of keys a perfect hash is defined over.
///
/// Cheap to clone: clones share the underlying source and cached count.
/// The domain is immutable once created; hashes verified against it stay
/// verified.
pub struct PerfectDomain<T> {
    inner: Rc<DomainInner<T>>,
}

impl<T> Clone for PerfectDomain<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> PerfectDomain<T> {
    fn from_source(source: Box<dyn KeySource<T>>) -> Self {
        let len = Cell::new(source.len_hint());
        Self {
            inner: Rc::new(DomainInner { source, len }),
        }
    }

    /// Domain over a collection or array of keys.
    ///
    /// The values are gathered once into the domain; supply distinct keys.
    #[must_use]
    pub fn over(values: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone,
    {
        Self::from_source(Box::new(values.into_iter().collect::<Vec<T>>()))
    }

    /// Domain over a twice-traversable stream.
    ///
    /// `make_iter` is invoked once per pass and must yield the same
    /// multiset every time. Use this for domains too large to gather.
    ///
    /// ```
    /// use perfectcraft::domain::PerfectDomain;
    ///
    /// let domain = PerfectDomain::over_iterable(|| 0u64..1000);
    /// assert_eq!(domain.len(), 1000);
    /// ```
    #[must_use]
    pub fn over_iterable<F, I>(make_iter: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_source(Box::new(Iterable(make_iter)))
    }

    /// Domain over the present slots of a [`SlotStore`].
    #[must_use]
    pub fn over_store(store: SlotStore<T>) -> Self
    where
        T: Clone,
    {
        Self::from_source(Box::new(store))
    }

    /// A fresh pass over the domain keys.
    pub fn iter(&self) -> Box<dyn Iterator<Item = T> + '_> {
        self.inner.source.iter()
    }

    /// The number of keys, counted lazily on first use and cached.
    #[must_use]
    pub fn len(&self) -> usize {
        if let Some(len) = self.inner.len.get() {
            return len;
        }
        let len = self.inner.source.iter().count();
        self.inner.len.set(Some(len));
        len
    }

    /// Whether the domain has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `hasher` is perfect over this domain: every key yields a
    /// distinct hash value.
    ///
    /// Hash ranges up to 16 bits are checked against a dense bitmap of the
    /// whole range; wider ranges stream hash values through a
    /// [`UniquenessChecker`], so memory stays logarithmic in the domain
    /// size. Never errors.
    pub fn is_perfect<H>(&self, hasher: &H) -> bool
    where
        H: KeyHasher<T> + ?Sized,
    {
        let range = hasher.range();
        if range.is_empty() {
            return self.is_empty();
        }
        if range.bits() <= COMPACT_BIT_CUTOFF {
            let mut seen = BitVec::new(range.len() as usize);
            for value in self.iter() {
                if seen.get_then_set(hasher.hash(&value) as usize, true) {
                    return false;
                }
            }
            return true;
        }
        let word_bytes = ((11 + ((range.bits() + 31) >> 5)) << 2) as f64;
        let checker = UniquenessChecker::new(self.len(), word_bytes);
        checker.check(|| self.iter().map(|value| hasher.hash(&value)))
    }

    /// Whether `serializer` is injective over this domain: every key
    /// serializes to a distinct byte sequence.
    ///
    /// A serializer that collapses two keys cannot seed a perfect hash,
    /// no matter the seed. Never errors.
    pub fn is_injective<S>(&self, serializer: &S) -> bool
    where
        S: KeySerializer<T> + ?Sized,
    {
        let checker = UniquenessChecker::new(self.len(), 50.0);
        checker.check(|| self.iter().map(|value| serializer.to_bytes(&value)))
    }

    /// A [`Perfectionist`] over this domain with an explicit seed budget
    /// and randomness source.
    #[must_use]
    pub fn using(&self, max_seed_attempts: u32, rng: impl RngCore + 'static) -> Perfectionist<T> {
        Perfectionist::new(self.clone(), max_seed_attempts, Box::new(rng))
    }

    /// A [`Perfectionist`] with default parameters: 3 seed attempts and
    /// thread-local randomness.
    #[must_use]
    pub fn using_defaults(&self) -> Perfectionist<T> {
        Perfectionist::new(
            self.clone(),
            MAX_SEED_ATTEMPTS,
            Box::new(rand::thread_rng()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hasher::{KeyHasherExt, ObjectHasher};

    #[test]
    fn test_over_collection() {
        let domain = PerfectDomain::over(vec![1u32, 2, 3]);
        assert_eq!(domain.len(), 3);
        let mut values: Vec<u32> = domain.iter().collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_over_iterable_two_passes() {
        let domain = PerfectDomain::over_iterable(|| 0u64..10);
        assert_eq!(domain.iter().count(), 10);
        assert_eq!(domain.iter().count(), 10);
    }

    #[test]
    fn test_len_is_cached() {
        let domain = PerfectDomain::over_iterable(|| 0u64..100);
        assert_eq!(domain.len(), 100);
        assert_eq!(domain.inner.len.get(), Some(100));
        assert_eq!(domain.len(), 100);
    }

    #[test]
    fn test_over_store_skips_absent_slots() {
        let mut store = crate::core::SlotStorage::nullable().new_store(5);
        store.set(1, Some(10u32));
        store.set(3, Some(30u32));
        let domain = PerfectDomain::over_store(store);
        assert_eq!(domain.len(), 2);
        assert!(domain.is_perfect(&ObjectHasher::new()));
    }

    #[test]
    fn test_is_perfect_compact_path() {
        let hasher = ObjectHasher::new().sized(1 << 8);
        let ok = PerfectDomain::over((0u32..256).collect::<Vec<_>>());
        assert!(ok.is_perfect(&hasher));
        let clash = PerfectDomain::over((0u32..257).collect::<Vec<_>>());
        assert!(!clash.is_perfect(&hasher));
    }

    #[test]
    fn test_is_perfect_streaming_path() {
        let hasher = ObjectHasher::new();
        let ok = PerfectDomain::over_iterable(|| 0u32..10_000);
        assert!(ok.is_perfect(&hasher));
        let clash = PerfectDomain::over_iterable(|| (0u32..10_000).map(|i| i % 9_999));
        assert!(!clash.is_perfect(&hasher));
    }

    #[test]
    fn test_is_injective() {
        let full = |s: &String, out: &mut Vec<u8>| out.extend_from_slice(s.as_bytes());
        let first = |s: &String, out: &mut Vec<u8>| out.push(s.as_bytes()[0]);

        let pair = PerfectDomain::over(["FB", "Ea"].map(String::from));
        assert!(pair.is_injective(&full));
        assert!(pair.is_injective(&first));

        let animals = PerfectDomain::over(["Ant", "Bear", "Aardvark"].map(String::from));
        assert!(!animals.is_injective(&first));
    }

    #[test]
    fn test_empty_domain() {
        let domain = PerfectDomain::over(Vec::<u32>::new());
        assert!(domain.is_empty());
        assert!(domain.is_perfect(&ObjectHasher::new()));
    }
}
