//! Core data structures: bit vectors, slot arrays, permutations.
//!
//! These are the storage collaborators the hashing layer builds on:
//!
//! - [`BitVec`]: fixed-length dense bit vector
//! - [`SlotStorage`] / [`SlotStore`]: preallocated value slots with
//!   optional default-value semantics
//! - [`Permutation`]: bijections of `0..n` with in-place reordering
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── bitvec.rs       - Bit vector implementation
//! ├── slots.rs        - Slot array storage
//! ├── permutation.rs  - Permutation type
//! └── mod.rs          - This file (public API)
//! ```

pub mod bitvec;
pub mod permutation;
pub mod slots;

pub use bitvec::BitVec;
pub use permutation::Permutation;
pub use slots::{SlotStorage, SlotStore};
