//! Slot-array-backed map over a minimal hash domain.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::slots::SlotStore;
use crate::error::{PerfectCraftError, Result};
use crate::hash::hasher::KeyHasher;
use crate::minimal::Minimal;

/// A map that pre-allocates one value slot per domain key.
///
/// Created through [`Minimal::with_storage`] and its siblings; only domain
/// keys can be mapped, so lookups are one hash, one equality check, and
/// one slot read.
///
/// Two storage configurations change the semantics slightly:
///
/// - **Nullable** storage: a key is present only after an
///   [`insert`](Self::insert); [`len`](Self::len) counts occupied slots.
/// - **Default-valued** storage: every key is always present with at
///   least the default, [`len`](Self::len) is always the domain size, and
///   [`remove`](Self::remove) re-arms the default.
///
/// # Mutability
///
/// The same handle quadruple as
/// [`MinimalSet`](crate::containers::MinimalSet): views share slots and
/// observe later mutation, copies are independent, immutable handles
/// reject mutation with [`PerfectCraftError::ImmutableContainer`].
///
/// # Examples
///
/// ```
/// use perfectcraft::domain::PerfectDomain;
///
/// let minimal = PerfectDomain::over(["ostrich", "dog", "snail"].map(String::from))
///     .using_defaults()
///     .maybe_perfect()
///     .unwrap()
///     .minimized()
///     .unwrap();
///
/// let mut legs = minimal.with_generic_storage::<u32>().new_map();
/// legs.insert(&"ostrich".to_string(), 2).unwrap();
/// assert_eq!(legs.get(&"ostrich".to_string()), Some(2));
/// assert!(legs.insert(&"whippet".to_string(), 3).is_err());
/// ```
pub struct MinimalMap<K, V> {
    minimal: Minimal<K>,
    keys: Rc<[K]>,
    slots: Rc<RefCell<SlotStore<V>>>,
    mutable: bool,
}

impl<K: PartialEq + 'static, V: Clone> MinimalMap<K, V> {
    pub(crate) fn new(minimal: Minimal<K>, slots: SlotStore<V>) -> Self {
        let keys = minimal.store_rc();
        Self {
            minimal,
            keys,
            slots: Rc::new(RefCell::new(slots)),
            mutable: true,
        }
    }

    /// The slot of `key`, when `key` is a domain member.
    fn index_of(&self, key: &K) -> Option<usize> {
        let index = self.minimal.hasher().hash(key) as usize;
        (index < self.keys.len() && self.keys[index] == *key).then_some(index)
    }

    fn checked_index_of(&self, key: &K) -> Result<usize> {
        self.index_of(key).ok_or_else(PerfectCraftError::invalid_key)
    }

    fn check_mutable(&self, operation: &'static str) -> Result<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(PerfectCraftError::immutable_container(operation))
        }
    }

    /// The number of present keys; the domain size under default-valued
    /// storage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().count()
    }

    /// Whether no key is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value of `key`: the stored value, the storage default when one
    /// is configured, or `None` for absent or foreign keys.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let index = self.index_of(key)?;
        self.slots.borrow().get(index)
    }

    /// The value of `key`, or `fallback` when absent or foreign.
    #[must_use]
    pub fn get_or_default(&self, key: &K, fallback: V) -> V {
        self.get(key).unwrap_or(fallback)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        match self.index_of(key) {
            Some(index) => self.slots.borrow().is_present(index),
            None => false,
        }
    }

    /// Whether some present key maps to `value`. Linear scan over the
    /// slots.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.slots
            .borrow()
            .iter_present()
            .any(|(_, candidate)| candidate == *value)
    }

    /// Map `key` to `value`, returning what the slot previously read as.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::InvalidKey`] when `key` is outside the domain;
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn insert(&mut self, key: &K, value: V) -> Result<Option<V>> {
        self.check_mutable("insert")?;
        let index = self.checked_index_of(key)?;
        Ok(self.slots.borrow_mut().set(index, Some(value)))
    }

    /// Map `key` to `value` only when `key` reads as absent.
    ///
    /// Under default-valued storage every key reads as present, so this
    /// never writes there; the default comes back instead.
    ///
    /// # Errors
    ///
    /// As for [`insert`](Self::insert).
    pub fn insert_if_absent(&mut self, key: &K, value: V) -> Result<Option<V>> {
        self.check_mutable("insert")?;
        let index = self.checked_index_of(key)?;
        let mut slots = self.slots.borrow_mut();
        match slots.get(index) {
            Some(previous) => Ok(Some(previous)),
            None => {
                slots.set(index, Some(value));
                Ok(None)
            }
        }
    }

    /// Replace the value of a present `key`, returning the previous
    /// value; absent keys are left absent.
    ///
    /// # Errors
    ///
    /// As for [`insert`](Self::insert).
    pub fn replace(&mut self, key: &K, value: V) -> Result<Option<V>> {
        self.check_mutable("replace")?;
        let index = self.checked_index_of(key)?;
        let mut slots = self.slots.borrow_mut();
        match slots.get(index) {
            Some(_) => Ok(slots.set(index, Some(value))),
            None => Ok(None),
        }
    }

    /// Replace the value of `key` only when it currently equals `expected`;
    /// true when the swap happened.
    ///
    /// # Errors
    ///
    /// As for [`insert`](Self::insert).
    pub fn replace_if_equal(&mut self, key: &K, expected: &V, value: V) -> Result<bool>
    where
        V: PartialEq,
    {
        self.check_mutable("replace")?;
        let index = self.checked_index_of(key)?;
        let mut slots = self.slots.borrow_mut();
        match slots.get(index) {
            Some(previous) if previous == *expected => {
                slots.set(index, Some(value));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Unmap `key`, returning what the slot previously read as. Under
    /// default-valued storage the slot re-arms to the default. Foreign
    /// keys yield `None`, not an error.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        self.check_mutable("remove")?;
        match self.index_of(key) {
            Some(index) => Ok(self.slots.borrow_mut().set(index, None)),
            None => Ok(None),
        }
    }

    /// Unmap `key` only when its value equals `expected`; true when the
    /// removal happened.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn remove_if_equal(&mut self, key: &K, expected: &V) -> Result<bool>
    where
        V: PartialEq,
    {
        self.check_mutable("remove")?;
        let index = match self.index_of(key) {
            Some(index) => index,
            None => return Ok(false),
        };
        let mut slots = self.slots.borrow_mut();
        match slots.get(index) {
            Some(previous) if previous == *expected => {
                slots.set(index, None);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Reset every slot.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] through an immutable
    /// handle.
    pub fn clear(&mut self) -> Result<()> {
        self.check_mutable("clear")?;
        self.slots.borrow_mut().clear();
        Ok(())
    }

    /// Iterator over the present keys, in hash order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            keys: &self.keys,
            slots: &self.slots,
            position: 0,
        }
    }

    /// Iterator over the present values, in hash order.
    #[must_use]
    pub fn values(&self) -> Values<'_, V> {
        Values {
            slots: &self.slots,
            position: 0,
        }
    }

    /// Iterator over live [`Entry`] handles for the present keys, in hash
    /// order.
    ///
    /// Entries stay wired to the map, so
    /// [`Entry::set_value`] works mid-iteration:
    ///
    /// ```
    /// use perfectcraft::domain::PerfectDomain;
    ///
    /// let minimal = PerfectDomain::over(["dog", "cat"].map(String::from))
    ///     .using_defaults().maybe_perfect().unwrap().minimized().unwrap();
    /// let mut legs = minimal.with_generic_storage::<u32>().new_map();
    /// legs.insert(&"dog".to_string(), 3).unwrap();
    ///
    /// for entry in legs.entries() {
    ///     if entry.key() == "dog" {
    ///         entry.set_value(4).unwrap();
    ///     }
    /// }
    /// assert_eq!(legs.get(&"dog".to_string()), Some(4));
    /// ```
    #[must_use]
    pub fn entries(&self) -> Entries<K, V> {
        Entries {
            keys: Rc::clone(&self.keys),
            slots: Rc::clone(&self.slots),
            position: 0,
            mutable: self.mutable,
        }
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

    /// An independent mutable copy of the current contents.
    #[must_use]
    pub fn mutable_copy(&self) -> Self {
        Self {
            minimal: self.minimal.clone(),
            keys: Rc::clone(&self.keys),
            slots: Rc::new(RefCell::new(self.slots.borrow().clone())),
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

    /// An independent immutable copy of the current contents.
    #[must_use]
    pub fn immutable_copy(&self) -> Self {
        Self {
            minimal: self.minimal.clone(),
            keys: Rc::clone(&self.keys),
            slots: Rc::new(RefCell::new(self.slots.borrow().clone())),
            mutable: false,
        }
    }

    /// An immutable handle sharing this map's slots: it observes later
    /// mutation of its source but rejects mutation itself.
    #[must_use]
    pub fn immutable_view(&self) -> Self {
        Self {
            minimal: self.minimal.clone(),
            keys: Rc::clone(&self.keys),
            slots: Rc::clone(&self.slots),
            mutable: false,
        }
    }
}

fn next_present<V: Clone>(slots: &RefCell<SlotStore<V>>, from: usize) -> Option<usize> {
    let slots = slots.borrow();
    (from..slots.len()).find(|&index| slots.is_present(index))
}

/// Iterator over present keys; see [`MinimalMap::keys`].
pub struct Keys<'a, K, V> {
    keys: &'a [K],
    slots: &'a RefCell<SlotStore<V>>,
    position: usize,
}

impl<'a, K, V: Clone> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let index = next_present(self.slots, self.position)?;
        self.position = index + 1;
        Some(&self.keys[index])
    }
}

/// Iterator over present values; see [`MinimalMap::values`].
pub struct Values<'a, V> {
    slots: &'a RefCell<SlotStore<V>>,
    position: usize,
}

impl<V: Clone> Iterator for Values<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let index = next_present(self.slots, self.position)?;
        self.position = index + 1;
        self.slots.borrow().get(index)
    }
}

/// Iterator over live entries; see [`MinimalMap::entries`].
pub struct Entries<K, V> {
    keys: Rc<[K]>,
    slots: Rc<RefCell<SlotStore<V>>>,
    position: usize,
    mutable: bool,
}

impl<K, V: Clone> Iterator for Entries<K, V> {
    type Item = Entry<K, V>;

    fn next(&mut self) -> Option<Entry<K, V>> {
        let index = next_present(&self.slots, self.position)?;
        self.position = index + 1;
        Some(Entry {
            keys: Rc::clone(&self.keys),
            slots: Rc::clone(&self.slots),
            index,
            mutable: self.mutable,
        })
    }
}

/// A live handle onto one key's slot.
///
/// Yielded by [`MinimalMap::entries`]; reads and writes go straight to
/// the map's storage.
pub struct Entry<K, V> {
    keys: Rc<[K]>,
    slots: Rc<RefCell<SlotStore<V>>>,
    index: usize,
    mutable: bool,
}

impl<K, V: Clone> Entry<K, V> {
    /// The entry's key.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.keys[self.index]
    }

    /// The current value; `None` when the slot was cleared after this
    /// entry was yielded.
    #[must_use]
    pub fn value(&self) -> Option<V> {
        self.slots.borrow().get(self.index)
    }

    /// Write `value` into the slot, returning what it previously read as.
    ///
    /// # Errors
    ///
    /// [`PerfectCraftError::ImmutableContainer`] when the entry came from
    /// an immutable handle.
    pub fn set_value(&self, value: V) -> Result<Option<V>> {
        if !self.mutable {
            return Err(PerfectCraftError::immutable_container("set_value"));
        }
        Ok(self.slots.borrow_mut().set(self.index, Some(value)))
    }
}
