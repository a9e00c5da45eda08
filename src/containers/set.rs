//! Bitset-backed set over a minimal hash domain.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::bitvec::BitVec;
use crate::error::{PerfectCraftError, Result};
use crate::hash::hasher::KeyHasher;
use crate::minimal::Minimal;

/// A set that pre-allocates one membership bit per domain key.
///
/// Created by [`Minimal::new_set`]; only domain members can be inserted,
/// so the set never rehashes, never allocates past construction, and
/// answers membership with one hash and one bit probe.
///
/// # Mutability
///
/// Handles come in mutable and immutable flavors, coordinated through
/// [`mutable`](Self::mutable), [`mutable_copy`](Self::mutable_copy),
/// [`immutable`](Self::immutable), [`immutable_copy`](Self::immutable_copy)
/// and [`immutable_view`](Self::immutable_view). A view shares its
/// source's bits and observes later mutation; copies are independent.
/// Mutating through an immutable handle yields
/// [`PerfectCraftError::ImmutableContainer`].
///
/// # Examples
///
/// ```
/// use perfectcraft::domain::PerfectDomain;
///
/// let minimal = PerfectDomain::over(["cat", "dog", "cow"].map(String::from))
///     .using_defaults()
///     .maybe_perfect()
///     .unwrap()
///     .minimized()
///     .unwrap();
///
/// let mut mammals = minimal.new_set();
/// assert!(mammals.insert(&"dog".to_string()).unwrap());
/// assert!(mammals.contains(&"dog".to_string()));
/// assert!(mammals.insert(&"ant".to_string()).is_err());
/// ```
pub struct MinimalSet<T> {
    minimal: Minimal<T>,
    store: Rc<[T]>,
    bits: Rc<RefCell<BitVec>>,
    mutable: bool,
}

impl<T: PartialEq + 'static> MinimalSet<T> {
    pub(crate) fn new(minimal: Minimal<T>) -> Self {
        let store = minimal.store_rc();
        let bits = Rc::new(RefCell::new(BitVec::new(store.len())));
        Self {
            minimal,
            store,
            bits,
            mutable: true,
        }
    }

    /// The slot of `key`, when `key` is a domain member.
    fn index_of(&self, key: &T) -> Option<usize> {
        let index = self.minimal.hasher().hash(key) as usize;
        (index < self.store.len() && self.store[index] == *key).then_some(index)
    }

    fn check_mutable(&self, operation: &'static str) -> Result<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(PerfectCraftError::immutable_container(operation))
        }
    }

    /// The number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.borrow().count_ones()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.borrow().is_all_zeros()
    }

    /// Whether every domain key is a member.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.bits.borrow().is_all_ones()
    }

    /// Whether `key` is a member.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        match self.index_of(key) {
            Some(index) => self.bits.borrow().get(index),
            None => false,
        }
    }

    /// Add `key`; true when it was not already a member.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::InvalidKey`] when `key` is outside the domain;
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn insert(&mut self, key: &T) -> Result<bool> {
        self.check_mutable("insert")?;
        let index = self.index_of(key).ok_or_else(PerfectCraftError::invalid_key)?;
        Ok(!self.bits.borrow_mut().get_then_set(index, true))
    }

    /// Remove `key`; true when it was a member. Foreign keys are simply
    /// not members: the result is `false`, not an error.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn remove(&mut self, key: &T) -> Result<bool> {
        self.check_mutable("remove")?;
        match self.index_of(key) {
            Some(index) => Ok(self.bits.borrow_mut().get_then_set(index, false)),
            None => Ok(false),
        }
    }

    /// Make every domain key a member.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn fill(&mut self) -> Result<()> {
        self.check_mutable("fill")?;
        self.bits.borrow_mut().fill();
        Ok(())
    }

    /// Remove every member.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn clear(&mut self) -> Result<()> {
        self.check_mutable("clear")?;
        self.bits.borrow_mut().clear();
        Ok(())
    }

    /// Iterator over the members, in hash order.
    #[must_use]
    pub fn iter(&self) -> SetIter<'_, T> {
        SetIter {
            store: &self.store,
            bits: &self.bits,
            position: 0,
        }
    }

    /// Apply `action` to every member, in hash order.
    pub fn for_each(&self, mut action: impl FnMut(&T)) {
        for value in self.iter() {
            action(value);
        }
    }

    /// Keep only the members `predicate` accepts; true when anything was
    /// removed. The predicate must not touch this set's bits reentrantly.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn retain(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Result<bool> {
        self.check_mutable("retain")?;
        let mut bits = self.bits.borrow_mut();
        let mut modified = false;
        let mut position = 0;
        while let Some(index) = bits.next_one_from(position) {
            if !predicate(&self.store[index]) {
                bits.clear_bit(index);
                modified = true;
            }
            position = index + 1;
        }
        Ok(modified)
    }

    /// The members gathered into a vector, in hash order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    // mutability

    /// Whether this handle accepts mutation.
    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// This handle when mutable, otherwise an independent mutable copy.
    #[must_use]
    pub fn mutable(self) -> Self {
        if self.mutable {
            self
        } else {
            self.mutable_copy()
        }
    }

    /// An independent mutable copy of the current membership.
    #[must_use]
    pub fn mutable_copy(&self) -> Self {
        Self {
            minimal: self.minimal.clone(),
            store: Rc::clone(&self.store),
            bits: Rc::new(RefCell::new(self.bits.borrow().clone())),
            mutable: true,
        }
    }

    /// An immutable view of this handle when mutable, otherwise this
    /// handle itself.
    #[must_use]
    pub fn immutable(self) -> Self {
        if self.mutable {
            self.immutable_view()
        } else {
            self
        }
    }

    /// An independent immutable copy of the current membership.
    #[must_use]
    pub fn immutable_copy(&self) -> Self {
        Self {
            minimal: self.minimal.clone(),
            store: Rc::clone(&self.store),
            bits: Rc::new(RefCell::new(self.bits.borrow().clone())),
            mutable: false,
        }
    }

    /// An immutable handle sharing this set's bits: it observes later
    /// mutation of its source but rejects mutation itself.
    #[must_use]
    pub fn immutable_view(&self) -> Self {
        Self {
            minimal: self.minimal.clone(),
            store: Rc::clone(&self.store),
            bits: Rc::clone(&self.bits),
            mutable: false,
        }
    }
}

/// Iterator over set members; see [`MinimalSet::iter`].
pub struct SetIter<'a, T> {
    store: &'a [T],
    bits: &'a RefCell<BitVec>,
    position: usize,
}

impl<'a, T> Iterator for SetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let index = self.bits.borrow().next_one_from(self.position)?;
        self.position = index + 1;
        Some(&self.store[index])
    }
}
