//! Preallocated slot arrays with optional default-value semantics.
//!
//! A [`SlotStore`] holds exactly one value slot per minimal-hash index.
//! Two configurations exist, chosen through [`SlotStorage`]:
//!
//! - **Nullable** (`SlotStorage::nullable()`): a slot is either occupied or
//!   absent; `count()` tracks the occupied slots.
//! - **Default-valued** (`SlotStorage::with_default(v)`): an unoccupied
//!   slot reads as the default, so every slot is always present and
//!   `count() == len()`. Clearing a slot re-arms the default. This is the
//!   configuration primitive-valued maps use to avoid per-entry boxing.
//!
//! # Examples
//!
//! ```
//! use perfectcraft::core::SlotStorage;
//!
//! let mut slots = SlotStorage::nullable().new_store(4);
//! assert_eq!(slots.count(), 0);
//! slots.set(2, Some("x"));
//! assert_eq!(slots.get(2), Some("x"));
//! assert_eq!(slots.count(), 1);
//!
//! let mut zeros = SlotStorage::with_default(0i32).new_store(4);
//! assert_eq!(zeros.get(1), Some(0));
//! assert_eq!(zeros.count(), 4);
//! zeros.set(1, Some(7));
//! assert_eq!(zeros.set(1, None), Some(7));
//! assert_eq!(zeros.get(1), Some(0));
//! ```

/// Factory for [`SlotStore`] instances of a fixed configuration.
///
/// Mirrors the two storage shapes a [`MinimalMap`](crate::containers::MinimalMap)
/// can be built over; see [`Minimal::with_storage`](crate::minimal::Minimal::with_storage).
#[derive(Debug, Clone)]
pub struct SlotStorage<V> {
    default: Option<V>,
}

impl<V: Clone> SlotStorage<V> {
    /// Storage whose slots distinguish occupied from absent.
    #[must_use]
    pub fn nullable() -> Self {
        Self { default: None }
    }

    /// Storage whose unoccupied slots read as `default`.
    #[must_use]
    pub fn with_default(default: V) -> Self {
        Self {
            default: Some(default),
        }
    }

    /// Allocate a store of `len` slots, all unoccupied.
    #[must_use]
    pub fn new_store(&self, len: usize) -> SlotStore<V> {
        SlotStore {
            slots: (0..len).map(|_| None).collect(),
            default: self.default.clone(),
            occupied: 0,
        }
    }
}

/// A fixed-length array of value slots.
///
/// Created through [`SlotStorage::new_store`]. Indexing past the length
/// panics, matching slice behavior.
#[derive(Debug, Clone)]
pub struct SlotStore<V> {
    slots: Box<[Option<V>]>,
    default: Option<V>,
    occupied: usize,
}

impl<V: Clone> SlotStore<V> {
    /// The number of slots.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store has zero slots.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether this store was configured with a default value.
    #[must_use]
    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The number of present slots.
    ///
    /// Always equal to [`len`](Self::len) for default-valued stores.
    #[must_use]
    pub fn count(&self) -> usize {
        if self.default.is_some() {
            self.slots.len()
        } else {
            self.occupied
        }
    }

    /// Read the value at `index`: the stored value, the default for an
    /// unoccupied slot of a default-valued store, or `None`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<V> {
        self.slots[index]
            .clone()
            .or_else(|| self.default.clone())
    }

    /// Whether the slot at `index` reads as present.
    #[must_use]
    #[inline]
    pub fn is_present(&self, index: usize) -> bool {
        self.slots[index].is_some() || self.default.is_some()
    }

    /// Whether the slot at `index` holds no explicit value.
    ///
    /// Unlike [`is_present`](Self::is_present) this ignores the default:
    /// it reports on the slot itself.
    #[must_use]
    #[inline]
    pub fn is_absent(&self, index: usize) -> bool {
        self.slots[index].is_none()
    }

    /// Write `value` at `index` (`None` clears the slot) and return what
    /// the slot previously read as, defaults included.
    pub fn set(&mut self, index: usize, value: Option<V>) -> Option<V> {
        let was_occupied = self.slots[index].is_some();
        let previous = if value.is_some() {
            if !was_occupied {
                self.occupied += 1;
            }
            std::mem::replace(&mut self.slots[index], value)
        } else {
            if was_occupied {
                self.occupied -= 1;
            }
            self.slots[index].take()
        };
        previous.or_else(|| self.default.clone())
    }

    /// Clear every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.occupied = 0;
    }

    /// Iterator over `(index, value)` for every present slot.
    pub fn iter_present(&self) -> impl Iterator<Item = (usize, V)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.clone()
                .or_else(|| self.default.clone())
                .map(|v| (i, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_basics() {
        let mut store = SlotStorage::nullable().new_store(3);
        assert_eq!(store.len(), 3);
        assert!(!store.has_default());
        assert_eq!(store.count(), 0);
        assert!(store.is_absent(0));
        assert!(!store.is_present(0));
        assert_eq!(store.get(0), None::<i32>);

        assert_eq!(store.set(0, Some(5)), None);
        assert!(store.is_present(0));
        assert_eq!(store.count(), 1);
        assert_eq!(store.set(0, Some(6)), Some(5));
        assert_eq!(store.count(), 1);
        assert_eq!(store.set(0, None), Some(6));
        assert_eq!(store.count(), 0);
        assert_eq!(store.set(0, None), None);
    }

    #[test]
    fn test_default_valued_store() {
        let mut store = SlotStorage::with_default(0i32).new_store(3);
        assert!(store.has_default());
        assert_eq!(store.count(), 3);
        assert!(store.is_present(1));
        assert!(store.is_absent(1));
        assert_eq!(store.get(1), Some(0));

        // Writing then clearing returns the written value and re-arms the default.
        assert_eq!(store.set(1, Some(9)), Some(0));
        assert_eq!(store.get(1), Some(9));
        assert_eq!(store.set(1, None), Some(9));
        assert_eq!(store.get(1), Some(0));
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_clear() {
        let mut store = SlotStorage::nullable().new_store(4);
        store.set(1, Some("a"));
        store.set(3, Some("b"));
        assert_eq!(store.count(), 2);
        store.clear();
        assert_eq!(store.count(), 0);
        assert_eq!(store.get(1), None);
    }

    #[test]
    fn test_iter_present_nullable() {
        let mut store = SlotStorage::nullable().new_store(4);
        store.set(2, Some(20));
        store.set(0, Some(10));
        let entries: Vec<_> = store.iter_present().collect();
        assert_eq!(entries, vec![(0, 10), (2, 20)]);
    }

    #[test]
    fn test_iter_present_with_default_covers_all_slots() {
        let mut store = SlotStorage::with_default(0).new_store(3);
        store.set(1, Some(5));
        let entries: Vec<_> = store.iter_present().collect();
        assert_eq!(entries, vec![(0, 0), (1, 5), (2, 0)]);
    }

    #[test]
    fn test_zero_length_store() {
        let store: SlotStore<u8> = SlotStorage::nullable().new_store(0);
        assert!(store.is_empty());
        assert_eq!(store.count(), 0);
        assert_eq!(store.iter_present().count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds() {
        let store: SlotStore<u8> = SlotStorage::nullable().new_store(2);
        let _ = store.get(2);
    }
}
