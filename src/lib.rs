//! PerfectCraft: perfect and minimal perfect hash functions for Rust.
//!
//! Given a finite set of `n` distinct keys, a *perfect* hash maps every
//! key to a distinct integer; a *minimal perfect* hash maps them onto
//! exactly `[0, n)`. PerfectCraft verifies, constructs, and exploits such
//! hashes:
//!
//! - **Verify**: [`PerfectDomain::is_perfect`] checks a candidate hasher
//!   against the whole domain, with memory sublinear in the hash range: a
//!   dense bitmap for ranges up to 16 bits, a two-pass Bloom-assisted
//!   uniqueness check above that.
//! - **Construct**: a [`Perfectionist`] searches a seeded murmur3-style
//!   family for a perfect hash, and [`Perfect::minimized`] runs the
//!   graph-based BMZ algorithm to compress the range to exactly `[0, n)`.
//! - **Exploit**: [`MinimalSet`] and [`MinimalMap`] allocate exactly one
//!   bit or value slot per key: O(1) membership and lookup with no
//!   buckets, no probing, no growth.
//!
//! # Quick Start
//!
//! ```
//! use perfectcraft::domain::PerfectDomain;
//! use perfectcraft::hash::KeyHasher;
//!
//! let words = ["Tom", "Astrid", "Joy", "Magnus"].map(String::from);
//! let minimal = PerfectDomain::over(words)
//!     .using_defaults()
//!     .maybe_perfect()         // the keys' own codes are already perfect
//!     .unwrap()
//!     .minimized()             // BMZ: range becomes exactly [0, 4)
//!     .unwrap();
//!
//! let mut set = minimal.new_set();
//! set.insert(&"Joy".to_string()).unwrap();
//! assert!(set.contains(&"Joy".to_string()));
//! assert!(set.insert(&"Loki".to_string()).is_err()); // outside the domain
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PerfectDomain ──using()──▶ Perfectionist ──perfect()/maybe_perfect()──▶ Perfect
//!                                                                          │
//!                                              minimized() / minimized_with()
//!                                                                          ▼
//!              MinimalSet ◀──new_set()── Minimal ──with_storage()──▶ Maps ──new_map()──▶ MinimalMap
//! ```
//!
//! The domain is frozen at construction: hashes stay valid because the key
//! set cannot change. Containers reject keys outside the domain instead of
//! growing.
//!
//! # Randomness
//!
//! The RNG handed to [`PerfectDomain::using`] is the sole source of
//! non-determinism; seed it (`StdRng::seed_from_u64`) and construction is
//! reproducible end to end. [`PerfectDomain::using_defaults`] uses
//! thread-local randomness and a budget of three seed attempts.
//!
//! # Single-Threaded Contract
//!
//! The whole library is single-threaded by design: construction is
//! synchronous, containers share state through `Rc`/`RefCell`, and no type
//! claims `Send` or `Sync`. Wrap at a higher level if you need to move
//! results across threads.
//!
//! [`PerfectDomain::is_perfect`]: domain::PerfectDomain::is_perfect
//! [`PerfectDomain::using`]: domain::PerfectDomain::using
//! [`PerfectDomain::using_defaults`]: domain::PerfectDomain::using_defaults
//! [`Perfectionist`]: perfectionist::Perfectionist
//! [`Perfect::minimized`]: perfect::Perfect::minimized
//! [`MinimalSet`]: containers::MinimalSet
//! [`MinimalMap`]: containers::MinimalMap

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::manual_range_contains)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Core data structures: bit vectors, slot arrays, permutations.
pub mod core;

/// Error types and result alias.
pub mod error;

/// Hasher traits, hash families, and key serialization.
pub mod hash;

/// Duplicate detection over twice-traversable inputs.
pub mod uniqueness;

/// Key domains and perfection/injectivity checks.
pub mod domain;

/// Randomized search for perfect hashes.
pub mod perfectionist;

/// Verified perfect hashes.
pub mod perfect;

mod bmz;

/// Minimal perfect hashes with lazy permutation and store.
pub mod minimal;

/// Set and map containers over a minimal hash domain.
pub mod containers;

pub use bmz::MinimalHasher;
pub use containers::{MinimalMap, MinimalSet};
pub use domain::PerfectDomain;
pub use error::{PerfectCraftError, Result};
pub use minimal::{Maps, Minimal};
pub use perfect::Perfect;
pub use perfectionist::Perfectionist;

/// Prelude module for convenient imports.
///
/// ```
/// use perfectcraft::prelude::*;
///
/// let domain = PerfectDomain::over(["a", "b"].map(String::from));
/// assert!(domain.using_defaults().maybe_perfect().is_some());
/// ```
pub mod prelude {
    pub use crate::containers::{MinimalMap, MinimalSet};
    pub use crate::core::{BitVec, Permutation, SlotStorage};
    pub use crate::domain::PerfectDomain;
    pub use crate::error::{PerfectCraftError, Result};
    pub use crate::hash::{
        KeyCode, KeyHasher, KeyHasherExt, KeySerializer, Murmur3, ObjectHasher,
    };
    pub use crate::minimal::Minimal;
    pub use crate::perfect::Perfect;
    pub use crate::perfectionist::Perfectionist;
}
