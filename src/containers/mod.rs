//! Containers keyed over a minimal hash domain.
//!
//! Both containers pre-allocate exactly one slot per domain key and pair
//! every lookup with a store equality check, so foreign keys can never
//! alias a member:
//!
//! - [`MinimalSet`]: membership bits over a [`BitVec`](crate::core::BitVec)
//! - [`MinimalMap`]: values in a [`SlotStore`](crate::core::SlotStore)
//!
//! Created from a [`Minimal`](crate::minimal::Minimal) via
//! [`new_set`](crate::minimal::Minimal::new_set) and the
//! [`Maps`](crate::minimal::Maps) factory.

pub mod map;
pub mod set;

pub use map::{Entries, Entry, Keys, MinimalMap, Values};
pub use set::{MinimalSet, SetIter};
