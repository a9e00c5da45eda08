//! Hashing: hasher traits, hash families, and key serialization.
//!
//! # Module Structure
//!
//! ```text
//! hash/
//! ├── hasher.rs      - HashRange, KeyHasher trait, KeyCode, ObjectHasher, SizedHasher
//! ├── family.rs      - HashFamily trait, SerializedHasher composition
//! ├── murmur3.rs     - MurmurHash3 x86_32 (default family)
//! ├── wy.rs          - WyHash family (optional, feature = "wyhash")
//! ├── serializer.rs  - KeySerializer trait
//! └── mod.rs         - This file (public API)
//! ```
//!
//! # Choosing a Hash Source
//!
//! | Source | Range | Use Case |
//! |--------|-------|----------|
//! | [`ObjectHasher`] | 32-bit | first candidate; integer keys often already perfect |
//! | [`Murmur3`] via serializer | 32-bit | the randomized search default |
//! | [`WyHash`] via serializer | 64-bit | larger domains (feature `wyhash`) |
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use perfectcraft::hash::{KeyHasher, Murmur3, SerializedHasher};
//!
//! let utf8 = Rc::new(|s: &String, out: &mut Vec<u8>| out.extend_from_slice(s.as_bytes()));
//! let hasher = SerializedHasher::new(Murmur3, utf8, 42);
//! assert_eq!(hasher.hash(&"a".to_string()), hasher.hash(&"a".to_string()));
//! ```

pub mod family;
pub mod hasher;
pub mod murmur3;
pub mod serializer;

#[cfg(feature = "wyhash")]
#[cfg_attr(docsrs, doc(cfg(feature = "wyhash")))]
pub mod wy;

pub use family::{HashFamily, SerializedHasher};
pub use hasher::{HashRange, KeyCode, KeyHasher, KeyHasherExt, ObjectHasher, SizedHasher};
pub use murmur3::{murmur3_32, Murmur3};
pub use serializer::KeySerializer;

#[cfg(feature = "wyhash")]
pub use wy::WyHash;
