//! Code-identified error with an optional wrapped cause.
//!
//! [`StructuredError`] is the unit every remote-call site reports. It carries:
//! - a stable [`ErrorCode`] that defines its identity,
//! - a human-readable message,
//! - an optional cause, shared behind an `Arc` so clones stay cheap.
//!
//! Sentinels are declared as `static` items (see
//! [`declare_errors!`](crate::declare_errors)) and can never be mutated in
//! place. Customising one always goes through a method that returns a fresh
//! value: [`StructuredError::wrap`], [`StructuredError::with_message`] or a
//! plain `clone()` followed by [`StructuredError::set_message`].

use std::borrow::Cow;
use std::error::Error;
use std::sync::Arc;

use crate::types::{BoxError, Chain, ErrorCode, ErrorVec};

mod traits;
#[cfg(feature = "serde")]
mod wire;

/// Shared, type-erased cause attached to a [`StructuredError`].
pub type SharedCause = Arc<dyn Error + Send + Sync + 'static>;

/// Error value identified by a stable code.
///
/// Equality and hashing look at the code only: two instances with the same
/// code are the same kind of error regardless of message or cause.
///
/// # Examples
///
/// ```
/// use vault_rail::StructuredError;
///
/// static NOT_FOUND: StructuredError = StructuredError::sentinel("entity_not_found", "entity not found");
///
/// let err = NOT_FOUND.wrap("secret `db/password` missing");
/// assert_eq!(err.code(), "entity_not_found");
/// assert!(err.is(&NOT_FOUND));
/// assert_eq!(err.to_string(), "entity not found: secret `db/password` missing");
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct StructuredError {
    pub(crate) code: ErrorCode,
    pub(crate) message: Cow<'static, str>,
    pub(crate) cause: Option<SharedCause>,
}

impl StructuredError {
    /// Creates a cause-less error from literals. Usable in `static` items.
    #[inline]
    pub const fn sentinel(code: &'static str, message: &'static str) -> Self {
        Self { code: ErrorCode::from_static(code), message: Cow::Borrowed(message), cause: None }
    }

    /// Creates an error with the given code, message and optional cause.
    pub fn new(
        code: impl Into<ErrorCode>,
        message: impl Into<Cow<'static, str>>,
        cause: Option<BoxError>,
    ) -> Self {
        Self { code: code.into(), message: message.into(), cause: cause.map(SharedCause::from) }
    }

    /// Returns the error code.
    #[inline]
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Returns the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the directly wrapped cause, if any.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Returns a new error with the same code and message and `cause` attached.
    ///
    /// `self` is never modified, so wrapping a shared sentinel is always safe.
    ///
    /// Accepts any error type as well as `&str`/`String` messages.
    #[inline]
    pub fn wrap(&self, cause: impl Into<BoxError>) -> Self {
        self.wrap_shared(SharedCause::from(cause.into()))
    }

    /// Like [`wrap`](Self::wrap) but reuses an already shared cause.
    #[inline]
    pub fn wrap_shared(&self, cause: SharedCause) -> Self {
        Self { code: self.code.clone(), message: self.message.clone(), cause: Some(cause) }
    }

    /// Returns a copy carrying a different message.
    #[inline]
    pub fn with_message(&self, message: impl Into<Cow<'static, str>>) -> Self {
        Self { code: self.code.clone(), message: message.into(), cause: self.cause.clone() }
    }

    /// Replaces the message of an owned instance.
    ///
    /// Sentinels are `static` and cannot reach this method; clone first.
    #[inline]
    pub fn set_message(&mut self, message: impl Into<Cow<'static, str>>) {
        self.message = message.into();
    }

    /// Replaces the cause of an owned instance.
    #[inline]
    pub fn set_cause(&mut self, cause: Option<BoxError>) {
        self.cause = cause.map(SharedCause::from);
    }

    /// Returns `true` if this error, or any [`StructuredError`] in its cause
    /// chain, has the same code as `target`.
    ///
    /// Matching is transitive through wrapping: `a.wrap(b).is(&c)` holds
    /// whenever `b` has the code of `c`.
    pub fn is(&self, target: &StructuredError) -> bool {
        self.has_code(target.code.as_str())
    }

    /// Returns `true` if any [`StructuredError`] in the chain carries `code`.
    pub fn has_code(&self, code: &str) -> bool {
        self.chain()
            .filter_map(|e| e.downcast_ref::<StructuredError>())
            .any(|e| e.code == *code)
    }

    /// Iterates over this error followed by every error in its cause chain.
    #[inline]
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Returns the innermost error of the chain.
    pub fn root_cause(&self) -> &(dyn Error + 'static) {
        self.chain().last().unwrap_or(self)
    }

    /// Collects the codes of every [`StructuredError`] in the chain, outermost first.
    pub fn codes(&self) -> ErrorVec<ErrorCode> {
        self.chain()
            .filter_map(|e| e.downcast_ref::<StructuredError>())
            .map(|e| e.code.clone())
            .collect()
    }

    /// Returns the bare code sent over the wire in a response envelope.
    #[inline]
    pub fn to_wire(&self) -> &str {
        self.code.as_str()
    }

    /// Rebuilds an error from a wire code through the global registry.
    ///
    /// Unknown codes resolve to
    /// [`GENERAL_FAILURE`](crate::sentinels::GENERAL_FAILURE).
    #[inline]
    pub fn from_wire(code: &str) -> Self {
        crate::registry::from_code(code)
    }
}
