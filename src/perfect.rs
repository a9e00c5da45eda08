//! A verified perfect hash over a domain.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rand::RngCore;

use crate::bmz::{Bmz, MinimalHasher};
use crate::domain::PerfectDomain;
use crate::error::{PerfectCraftError, Result};
use crate::hash::hasher::KeyHasher;
use crate::minimal::Minimal;

/// Default BMZ attempt budget of [`Perfect::minimized`].
const BMZ_DEFAULT_ATTEMPTS: u32 = 100;

/// Default BMZ slack factor; the value recommended by the algorithm's
/// original authors.
const BMZ_DEFAULT_C: f64 = 1.15;

/// A hash guaranteed injective over its domain.
///
/// Obtained from a [`Perfectionist`](crate::perfectionist::Perfectionist);
/// every key of [`domain`](Self::domain) maps to a distinct value of
/// [`hasher`](Self::hasher). Outside the domain the hash is defined but
/// carries no guarantees.
pub struct Perfect<T> {
    hasher: Rc<dyn KeyHasher<T>>,
    domain: PerfectDomain<T>,
    rng: Rc<RefCell<Box<dyn RngCore>>>,
}

impl<T> fmt::Debug for Perfect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Perfect").finish_non_exhaustive()
    }
}

impl<T: 'static> Perfect<T> {
    pub(crate) fn new(
        hasher: Rc<dyn KeyHasher<T>>,
        domain: PerfectDomain<T>,
        rng: Rc<RefCell<Box<dyn RngCore>>>,
    ) -> Self {
        Self {
            hasher,
            domain,
            rng,
        }
    }

    /// The hash, perfect over [`domain`](Self::domain).
    #[must_use]
    pub fn hasher(&self) -> &dyn KeyHasher<T> {
        &*self.hasher
    }

    /// The domain this hash is perfect over.
    #[must_use]
    pub fn domain(&self) -> &PerfectDomain<T> {
        &self.domain
    }

    /// The equivalence induced by the hash: two keys are equivalent iff
    /// their hash values agree.
    ///
    /// Over domain members this coincides with key equality, because the
    /// hash is injective there.
    #[must_use]
    pub fn equivalent(&self, first: &T, second: &T) -> bool {
        self.hasher.hash(first) == self.hasher.hash(second)
    }

    /// Derive a minimal perfect hash with default settings
    /// (100 attempts, c = 1.15).
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::PerfectionFailure`] when every attempt fails.
    pub fn minimized(&self) -> Result<Minimal<T>> {
        self.create_minimized(BMZ_DEFAULT_ATTEMPTS, BMZ_DEFAULT_C)
    }

    /// Derive a minimal perfect hash via BMZ with explicit parameters.
    ///
    /// Each attempt builds a randomized bipartite graph and may fail; a
    /// larger `c` enlarges the vertex set, raising the per-attempt success
    /// probability at a cost of `4c` bytes per key in the finished table.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::InvalidParameters`] when `max_attempts < 1` or
    /// `c < 1.0`; [`PerfectCraftError::PerfectionFailure`] when every
    /// attempt fails.
    pub fn minimized_with(&self, max_attempts: u32, c: f64) -> Result<Minimal<T>> {
        if max_attempts < 1 {
            return Err(PerfectCraftError::invalid_parameters(
                "maxAttempts not positive",
            ));
        }
        if c < 1.0 || c.is_nan() {
            return Err(PerfectCraftError::invalid_parameters("c less than 1.0"));
        }
        self.create_minimized(max_attempts, c)
    }

    fn create_minimized(&self, max_attempts: u32, c: f64) -> Result<Minimal<T>> {
        if self.domain.is_empty() {
            // Nothing to hash; skip construction entirely.
            let hasher = MinimalHasher::empty(Rc::clone(&self.hasher));
            return Ok(Minimal::new(hasher, self.domain.clone()));
        }
        let mut rng = self.rng.borrow_mut();
        let hasher = Bmz::new(max_attempts, c).build(
            Rc::clone(&self.hasher),
            &self.domain,
            &mut **rng,
        )?;
        Ok(Minimal::new(hasher, self.domain.clone()))
    }
}
