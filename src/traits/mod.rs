//! Traits shared by the error types and the retry engine.
//!
//! - [`TransientError`]: transient/permanent classification
//! - [`ErrorChainExt`]: `source()` chain traversal for any `dyn Error`

pub mod error_chain;
pub mod transient;

pub use error_chain::ErrorChainExt;
pub use transient::TransientError;
