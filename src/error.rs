//! Error types for perfectcraft operations.
//!
//! All fallible operations in this crate return [`Result<T>`] with the
//! crate-wide [`PerfectCraftError`]. Predicates such as
//! [`PerfectDomain::is_perfect`](crate::domain::PerfectDomain::is_perfect)
//! never error; they answer with a boolean.
//!
//! # Error Propagation
//!
//! ```
//! use perfectcraft::{PerfectCraftError, Result};
//!
//! fn validate_bmz_params(max_attempts: u32, c: f64) -> Result<()> {
//!     if max_attempts < 1 {
//!         return Err(PerfectCraftError::invalid_parameters("maxAttempts not positive"));
//!     }
//!     if c < 1.0 {
//!         return Err(PerfectCraftError::invalid_parameters("c less than 1.0"));
//!     }
//!     Ok(())
//! }
//! # assert!(validate_bmz_params(100, 1.15).is_ok());
//! # assert!(validate_bmz_params(0, 1.15).is_err());
//! ```

use std::fmt;

/// Result type alias for perfectcraft operations.
///
/// # Examples
/// ```
/// use perfectcraft::Result;
///
/// fn needs_positive(n: usize) -> Result<usize> {
///     if n == 0 {
///         return Err(perfectcraft::PerfectCraftError::invalid_parameters(
///             "count must be greater than 0",
///         ));
///     }
///     Ok(n)
/// }
/// # assert!(needs_positive(3).is_ok());
/// ```
pub type Result<T> = std::result::Result<T, PerfectCraftError>;

/// Errors that can occur while constructing perfect hashes or mutating the
/// derived containers.
///
/// # Design Notes
/// - `Clone` + `PartialEq` enable testing and error comparison
/// - Every variant carries enough context to diagnose the call site
/// - Out-of-bounds bit indexing is a programmer error and panics instead
///   (see [`BitVec`](crate::core::BitVec))
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerfectCraftError {
    /// A parameter fails its documented precondition.
    ///
    /// Raised for a non-positive attempt budget, a BMZ slack factor below
    /// 1.0, a domain too large for the 32-bit g-table, or a permutation
    /// order that is not a bijection.
    InvalidParameters {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// The randomized search failed to produce a perfect or minimal hash.
    ///
    /// Carries the short reason used by the construction loops: seed
    /// exhaustion, a serializer proven non-injective, or BMZ running out
    /// of attempts.
    PerfectionFailure {
        /// Why perfection could not be reached.
        reason: String,
    },

    /// A key outside the frozen domain was offered to a container.
    ///
    /// Containers allocate exactly one slot per domain key; inserting a
    /// foreign key has no slot to land in.
    InvalidKey,

    /// A mutating operation was invoked on an immutable container handle.
    ImmutableContainer {
        /// Name of the rejected operation.
        operation: &'static str,
    },
}

impl fmt::Display for PerfectCraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters { message } => {
                write!(f, "Invalid parameters: {}.", message)
            }
            Self::PerfectionFailure { reason } => {
                write!(f, "Perfection failure: {}.", reason)
            }
            Self::InvalidKey => {
                write!(f, "Key is not a member of the hash domain.")
            }
            Self::ImmutableContainer { operation } => {
                write!(
                    f,
                    "Operation '{}' is not permitted on an immutable container.",
                    operation
                )
            }
        }
    }
}

impl std::error::Error for PerfectCraftError {}

impl PerfectCraftError {
    /// Create an `InvalidParameters` error with a formatted message.
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create a `PerfectionFailure` error.
    #[must_use]
    pub fn perfection_failure(reason: impl Into<String>) -> Self {
        Self::PerfectionFailure {
            reason: reason.into(),
        }
    }

    /// Create an `InvalidKey` error.
    #[must_use]
    pub fn invalid_key() -> Self {
        Self::InvalidKey
    }

    /// Create an `ImmutableContainer` error for the named operation.
    #[must_use]
    pub fn immutable_container(operation: &'static str) -> Self {
        Self::ImmutableContainer { operation }
    }
}
