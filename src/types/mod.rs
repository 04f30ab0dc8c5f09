//! Error types and utilities.
//!
//! # Examples
//!
//! ```
//! use vault_rail::sentinels::{ENTITY_NOT_FOUND, RETRY_OPERATION_FAILED};
//!
//! let err = RETRY_OPERATION_FAILED.wrap(ENTITY_NOT_FOUND.wrap("kv/payments"));
//!
//! assert!(err.is(&ENTITY_NOT_FOUND));
//! println!("{:#}", err);
//! // Error: retry operation failed (code: retry_operation_failed)
//! // Caused by:
//! //   - entity not found (code: entity_not_found)
//! //   - kv/payments
//! ```
use smallvec::SmallVec;

pub mod chain;
pub mod error_code;
pub mod structured_error;

pub use chain::Chain;
pub use error_code::ErrorCode;
pub use structured_error::{SharedCause, StructuredError};

/// SmallVec-backed collection used for gathering codes along a cause chain.
///
/// Chains rarely nest more than a couple of structured errors deep, so two
/// entries are kept inline.
pub type ErrorVec<E> = SmallVec<[E; 2]>;

/// Type-erased error accepted wherever a foreign error enters the crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias whose failure is a [`StructuredError`].
pub type RailResult<T> = Result<T, StructuredError>;
