//! Transient error classification.
//!
//! [`TransientError`] answers one question: might this failure go away if the
//! same call is made again? The retry engine itself never asks it; an attempt
//! closure does, through [`Failure::classify`](crate::retry::Failure::classify),
//! when it wants code-driven permanence instead of tagging each error by hand.
//!
//! # Examples
//!
//! ```
//! use vault_rail::traits::TransientError;
//! use vault_rail::sentinels::{PEER_CONNECTION, UNAUTHORIZED};
//!
//! assert!(PEER_CONNECTION.wrap("connection reset").is_transient());
//! assert!(UNAUTHORIZED.is_permanent());
//! ```

use crate::sentinels::{NOT_READY, PEER_CONNECTION, READ_FAILURE, TIMEOUT};
use crate::types::StructuredError;

/// Classification of errors as transient or permanent.
///
/// Transient errors are temporary failures that may succeed if retried,
/// such as a dropped connection or a backend that is still unsealing.
pub trait TransientError {
    /// Returns `true` if this error is transient and may succeed on retry.
    ///
    /// # Guidelines
    ///
    /// Return `true` for:
    /// - Connection refused/reset/aborted
    /// - Read failures and timeouts
    /// - A backend that is up but not ready yet
    ///
    /// Return `false` for:
    /// - Authentication/authorization failures
    /// - Invalid input or invalid entities
    /// - Entity not found / already exists
    fn is_transient(&self) -> bool;

    /// Returns `true` if this error is permanent and should not be retried.
    ///
    /// Default implementation returns `!self.is_transient()`.
    #[inline]
    fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

/// Transport kinds and `not_ready` are transient; everything else is permanent.
///
/// Only the outermost code is consulted: a retry-framework error wrapping a
/// transport failure is a final verdict, not a transient condition.
impl TransientError for StructuredError {
    fn is_transient(&self) -> bool {
        [&PEER_CONNECTION, &READ_FAILURE, &TIMEOUT, &NOT_READY].contains(&self)
    }
}

impl TransientError for std::io::Error {
    fn is_transient(&self) -> bool {
        use std::io::ErrorKind;
        matches!(
            self.kind(),
            ErrorKind::ConnectionRefused
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::TimedOut
                | ErrorKind::Interrupted
                | ErrorKind::WouldBlock
                | ErrorKind::UnexpectedEof
        )
    }
}
