//! Outcome of a single failed attempt.

use std::error::Error;

use crate::sentinels::{RETRY_MAX_ELAPSED_TIME_REACHED, RETRY_OPERATION_FAILED};
use crate::traits::TransientError;
use crate::types::{BoxError, StructuredError};

/// Why an attempt failed, and whether the engine may try again.
///
/// Any `E: Error + Send + Sync + 'static` converts into `Failure::Transient`,
/// so `?` inside an attempt closure retries by default. Return
/// [`Failure::permanent`] to stop the sequence immediately with a specific
/// cause.
///
/// # Examples
///
/// ```
/// use vault_rail::retry::Failure;
/// use vault_rail::sentinels::{ENTITY_NOT_FOUND, PEER_CONNECTION};
///
/// let transient: Failure = PEER_CONNECTION.wrap("connection reset").into();
/// assert!(!transient.is_permanent());
///
/// let permanent = Failure::permanent(ENTITY_NOT_FOUND.clone());
/// assert!(permanent.is_permanent());
/// ```
#[derive(Debug)]
pub enum Failure {
    /// The attempt may succeed if made again.
    Transient(BoxError),
    /// Retrying cannot help; surface the error now.
    Permanent(BoxError),
}

impl Failure {
    /// Marks `error` as retryable.
    #[inline]
    pub fn transient(error: impl Into<BoxError>) -> Self {
        Self::Transient(error.into())
    }

    /// Marks `error` as non-retryable.
    #[inline]
    pub fn permanent(error: impl Into<BoxError>) -> Self {
        Self::Permanent(error.into())
    }

    /// Tags `error` according to its own [`TransientError`] classification.
    pub fn classify<E>(error: E) -> Self
    where
        E: TransientError + Error + Send + Sync + 'static,
    {
        if error.is_transient() {
            Self::Transient(Box::new(error))
        } else {
            Self::Permanent(Box::new(error))
        }
    }

    /// Returns `true` for [`Failure::Permanent`].
    #[inline]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }

    /// Returns the underlying error.
    #[inline]
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        match self {
            Self::Transient(e) | Self::Permanent(e) => e.as_ref(),
        }
    }

    /// Discards the tag and returns the error as a [`StructuredError`].
    #[inline]
    pub fn into_structured(self) -> StructuredError {
        match self {
            Self::Transient(e) | Self::Permanent(e) => classify(e),
        }
    }
}

impl<E> From<E> for Failure
where
    E: Error + Send + Sync + 'static,
{
    #[inline]
    fn from(error: E) -> Self {
        Self::Transient(Box::new(error))
    }
}

/// Turns any error into a [`StructuredError`].
///
/// - A [`StructuredError`] is returned unchanged, code included.
/// - A timer expiry (`tokio::time::error::Elapsed`) becomes
///   [`RETRY_MAX_ELAPSED_TIME_REACHED`].
/// - Anything else is wrapped under [`RETRY_OPERATION_FAILED`].
pub fn classify(error: BoxError) -> StructuredError {
    let error = match error.downcast::<StructuredError>() {
        Ok(structured) => return *structured,
        Err(other) => other,
    };
    if error.is::<tokio::time::error::Elapsed>() {
        return RETRY_MAX_ELAPSED_TIME_REACHED.wrap(error);
    }
    RETRY_OPERATION_FAILED.wrap(error)
}
