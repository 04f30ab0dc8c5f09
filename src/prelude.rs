//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use vault_rail::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Types**: [`StructuredError`], [`ErrorCode`], [`RailResult`]
//! - **Retry**: the [`retry`] module, [`Retrier`], [`TypedRetrier`], [`Failure`], [`RetryConfig`], [`RetryOption`]
//! - **Traits**: [`TransientError`], [`ErrorChainExt`]
//! - [`CancellationToken`], which every retry entry point takes
//!
//! # Examples
//!
//! ```
//! use vault_rail::prelude::*;
//! use vault_rail::sentinels::UNAUTHORIZED;
//!
//! fn login(token: &str) -> RailResult<()> {
//!     if token.is_empty() {
//!         return Err(UNAUTHORIZED.with_message("empty token"));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(login("").unwrap_err().to_string(), "empty token");
//! ```

pub use crate::declare_errors;
pub use crate::retry::{self, Failure, Retrier, RetryConfig, RetryOption, TypedRetrier};
pub use crate::traits::{ErrorChainExt, TransientError};
pub use crate::types::{ErrorCode, RailResult, StructuredError};
pub use tokio_util::sync::CancellationToken;
