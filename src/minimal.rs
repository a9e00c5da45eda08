//! Minimal perfect hashes and their materialized views of the domain.
//!
//! A [`Minimal`] pairs a [`MinimalHasher`] (range exactly `[0, n)`) with
//! its domain and two lazily built views:
//!
//! - the **permutation**: position `i` in domain-iteration order maps to
//!   hash value `permutation.get(i)`;
//! - the **store**: `store()[j]` is the unique domain key hashing to `j`,
//!   giving O(1) access to "the k-th key".
//!
//! Whichever view is requested first is built in a single pass over the
//! domain; the other reuses that work. Both are immutable once published.
//!
//! # Examples
//!
//! ```
//! use perfectcraft::domain::PerfectDomain;
//! use perfectcraft::hash::KeyHasher;
//!
//! let minimal = PerfectDomain::over(["Dog", "Cat", "Horse"].map(String::from))
//!     .using_defaults()
//!     .maybe_perfect()
//!     .unwrap()
//!     .minimized()
//!     .unwrap();
//!
//! for key in ["Dog", "Cat", "Horse"] {
//!     let j = minimal.hasher().hash(&key.to_string()) as usize;
//!     assert_eq!(minimal.store()[j], key);
//! }
//! ```

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::bmz::MinimalHasher;
use crate::containers::{MinimalMap, MinimalSet};
use crate::core::permutation::Permutation;
use crate::core::slots::SlotStorage;
use crate::domain::PerfectDomain;
use crate::hash::hasher::KeyHasher;

struct MinimalInner<T> {
    hasher: MinimalHasher<T>,
    domain: PerfectDomain<T>,
    permutation: OnceCell<Permutation>,
    store: OnceCell<Rc<[T]>>,
}

/// A minimal perfect hash over a domain, with lazy permutation and store.
///
/// Cheap to clone; clones share the hasher, domain, and any views already
/// materialized. Created by
/// [`Perfect::minimized`](crate::perfect::Perfect::minimized).
pub struct Minimal<T> {
    inner: Rc<MinimalInner<T>>,
}

impl<T> Clone for Minimal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Minimal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Minimal").finish_non_exhaustive()
    }
}

impl<T: 'static> Minimal<T> {
    pub(crate) fn new(hasher: MinimalHasher<T>, domain: PerfectDomain<T>) -> Self {
        Self {
            inner: Rc::new(MinimalInner {
                hasher,
                domain,
                permutation: OnceCell::new(),
                store: OnceCell::new(),
            }),
        }
    }

    /// The minimal hasher; its range is exactly `[0, n)`.
    #[must_use]
    pub fn hasher(&self) -> &MinimalHasher<T> {
        &self.inner.hasher
    }

    /// The domain the hash is minimal over.
    #[must_use]
    pub fn domain(&self) -> &PerfectDomain<T> {
        &self.inner.domain
    }

    /// The number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.domain.len()
    }

    /// Whether the domain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.domain.is_empty()
    }

    /// The permutation from domain-iteration order to hash order:
    /// `get(i)` is the hash of the i-th iterated key.
    ///
    /// Materialized on first call, in one domain pass unless the store
    /// already provided it.
    pub fn permutation(&self) -> &Permutation {
        self.inner.permutation.get_or_init(|| {
            let order: Vec<usize> = self
                .inner
                .domain
                .iter()
                .map(|key| self.inner.hasher.hash(&key) as usize)
                .collect();
            Permutation::from_order(&order)
                .expect("a minimal hash orders its domain bijectively")
        })
    }

    /// The domain keys ordered by hash value: `store()[j]` is the unique
    /// key with hash `j`.
    ///
    /// Materialized on first call and immutable afterwards.
    pub fn store(&self) -> &[T] {
        self.ensure_store()
    }

    pub(crate) fn store_rc(&self) -> Rc<[T]> {
        Rc::clone(self.ensure_store())
    }

    fn ensure_store(&self) -> &Rc<[T]> {
        self.inner.store.get_or_init(|| {
            if let Some(permutation) = self.inner.permutation.get() {
                // The hash order is already known; gather the keys in
                // iteration order and reorder in place.
                let mut values: Vec<T> = self.inner.domain.iter().collect();
                permutation
                    .apply(&mut values)
                    .expect("domain passes yield a stable key count");
                Rc::from(values)
            } else {
                // One pass fills the store and records the order for the
                // permutation at the same time.
                let n = self.inner.domain.len();
                let mut slots: Vec<Option<T>> = (0..n).map(|_| None).collect();
                let mut order = Vec::with_capacity(n);
                for key in self.inner.domain.iter() {
                    let index = self.inner.hasher.hash(&key) as usize;
                    assert!(
                        index < n,
                        "minimal hash value {} outside range [0, {})",
                        index,
                        n
                    );
                    order.push(index);
                    slots[index] = Some(key);
                }
                let permutation = Permutation::from_order(&order)
                    .expect("a minimal hash orders its domain bijectively");
                let _ = self.inner.permutation.set(permutation);
                let values: Vec<T> = slots
                    .into_iter()
                    .map(|slot| slot.expect("every slot receives exactly one key"))
                    .collect();
                Rc::from(values)
            }
        })
    }

    /// A fresh, empty [`MinimalSet`] over this hash.
    #[must_use]
    pub fn new_set(&self) -> MinimalSet<T>
    where
        T: PartialEq,
    {
        MinimalSet::new(self.clone())
    }

    /// Map factory over explicitly configured storage.
    #[must_use]
    pub fn with_storage<V: Clone>(&self, storage: SlotStorage<V>) -> Maps<T, V> {
        Maps {
            minimal: self.clone(),
            storage,
        }
    }

    /// Map factory over nullable storage: slots are occupied or absent.
    #[must_use]
    pub fn with_generic_storage<V: Clone>(&self) -> Maps<T, V> {
        self.with_storage(SlotStorage::nullable())
    }

    /// Map factory over default-valued storage: every key always reads as
    /// present with at least `default`.
    #[must_use]
    pub fn with_default_storage<V: Clone>(&self, default: V) -> Maps<T, V> {
        self.with_storage(SlotStorage::with_default(default))
    }
}

/// Factory for maps sharing one minimal hash and one storage
/// configuration.
///
/// Created by [`Minimal::with_storage`] and friends.
pub struct Maps<T, V> {
    minimal: Minimal<T>,
    storage: SlotStorage<V>,
}

impl<T: 'static, V: Clone> Maps<T, V> {
    /// A fresh, empty [`MinimalMap`].
    #[must_use]
    pub fn new_map(&self) -> MinimalMap<T, V>
    where
        T: PartialEq,
    {
        let slots = self.storage.new_store(self.minimal.len());
        MinimalMap::new(self.minimal.clone(), slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WORDS: [&str; 3] = ["Alice", "Bob", "Eve"];

    fn minimal_words() -> Minimal<String> {
        PerfectDomain::over(WORDS.map(String::from))
            .using(3, StdRng::seed_from_u64(0))
            .perfect(|s: &String, out: &mut Vec<u8>| out.extend_from_slice(s.as_bytes()))
            .unwrap()
            .minimized()
            .unwrap()
    }

    fn assert_consistent(minimal: &Minimal<String>) {
        let store = minimal.store();
        assert_eq!(store.len(), 3);
        for i in 0..store.len() {
            assert_eq!(minimal.hasher().hash(&store[i]) as usize, i);
        }
        let mut restored = store.to_vec();
        minimal.permutation().inverse().apply(&mut restored).unwrap();
        assert_eq!(restored, WORDS.map(String::from));
    }

    #[test]
    fn test_store_first_then_permutation() {
        let minimal = minimal_words();
        let _ = minimal.store();
        assert_consistent(&minimal);
    }

    #[test]
    fn test_permutation_first_then_store() {
        let minimal = minimal_words();
        let _ = minimal.permutation();
        assert_consistent(&minimal);
    }

    #[test]
    fn test_permutation_matches_iteration_order() {
        let minimal = minimal_words();
        let hashes: Vec<usize> = minimal
            .domain()
            .iter()
            .map(|key| minimal.hasher().hash(&key) as usize)
            .collect();
        let permutation = minimal.permutation();
        for (i, &hash) in hashes.iter().enumerate() {
            assert_eq!(permutation.get(i), hash);
        }
    }

    #[test]
    fn test_clones_share_materialized_store() {
        let minimal = minimal_words();
        let clone = minimal.clone();
        let first = minimal.store_rc();
        let second = clone.store_rc();
        assert!(Rc::ptr_eq(&first, &second));
    }
}
