//! Structured error taxonomy and retry engine for secrets-management clients.
//!
//! The crate is organized into a few focused modules:
//!
//! - [`types`]: [`StructuredError`], [`ErrorCode`] and the cause-chain iterator
//! - [`sentinels`]: the built-in error kinds, declared as immutable statics
//! - [`registry`]: code-to-error lookup used when errors cross a wire boundary
//! - [`traits`]: transient classification and chain traversal for any `dyn Error`
//! - [`retry`]: exponential backoff, the retry loop and ready-made presets
//! - `tower` (feature `tower`): a retrying Tower layer
//!
//! Everything commonly needed is available through [`prelude`].
//!
//! # Examples
//!
//! ## Classifying Errors
//!
//! ```
//! use vault_rail::sentinels::{ENTITY_NOT_FOUND, READ_FAILURE};
//!
//! let err = READ_FAILURE.wrap(ENTITY_NOT_FOUND.wrap("secret/data/payments"));
//!
//! assert!(err.is(&READ_FAILURE));
//! assert!(err.is(&ENTITY_NOT_FOUND));
//! assert_eq!(err.to_string(), "read failure: entity not found: secret/data/payments");
//! ```
//!
//! ## Round-Tripping Through the Registry
//!
//! ```
//! use vault_rail::{registry, sentinels::TIMEOUT};
//!
//! let code = TIMEOUT.to_wire();
//! assert_eq!(code, "timeout");
//! assert_eq!(registry::from_code(code), TIMEOUT);
//!
//! // Unknown codes degrade to the general failure kind.
//! assert_eq!(registry::from_code("no_such_code").code(), "general_failure");
//! ```
//!
//! ## Retrying a Remote Call
//!
//! ```
//! use vault_rail::prelude::*;
//! use vault_rail::sentinels::PEER_CONNECTION;
//! use core::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut calls = 0;
//! let lease = retry::forever_value(
//!     &CancellationToken::new(),
//!     || {
//!         calls += 1;
//!         let up = calls > 1;
//!         async move {
//!             if !up {
//!                 return Err(Failure::transient(PEER_CONNECTION.clone()));
//!             }
//!             Ok("lease/abc")
//!         }
//!     },
//!     [RetryOption::InitialInterval(Duration::from_millis(1))],
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(lease, "lease/abc");
//! # }
//! ```

/// Sentinel declaration macro
pub mod macros;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Code-to-error lookup
pub mod registry;
/// Exponential backoff and the retry engine
pub mod retry;
/// Built-in sentinel errors
pub mod sentinels;
/// Classification and chain traversal traits
pub mod traits;
/// StructuredError, ErrorCode and chain iteration
pub mod types;

/// Tower integration - Layer and Service implementations (requires `tower` feature)
#[cfg(feature = "tower")]
pub mod tower;

pub use registry::ErrorRegistry;
pub use traits::{ErrorChainExt, TransientError};
pub use types::{BoxError, Chain, ErrorCode, ErrorVec, RailResult, SharedCause, StructuredError};
