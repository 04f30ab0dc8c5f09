//! Stable, serializable error identifiers.
//!
//! An [`ErrorCode`] is the only piece of error information that crosses the
//! network: a bare lowercase-with-underscores token such as
//! `entity_not_found`. Two errors with the same code are the same kind of
//! error, whatever their message or cause.

use core::borrow::Borrow;
use core::fmt;
use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque string identifier of an error kind.
///
/// Codes are compared, hashed and serialized as plain strings, so an
/// `ErrorCode` can be looked up in a map keyed by `&str`.
///
/// # Examples
///
/// ```
/// use vault_rail::ErrorCode;
///
/// const NOT_FOUND: ErrorCode = ErrorCode::from_static("entity_not_found");
///
/// assert_eq!(NOT_FOUND.as_str(), "entity_not_found");
/// assert_eq!(NOT_FOUND, ErrorCode::new(String::from("entity_not_found")));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(Cow<'static, str>);

impl ErrorCode {
    /// Creates a code from a string literal. Usable in `const` and `static` items.
    #[inline]
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Creates a code from any owned or borrowed string.
    #[inline]
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the code follows the wire convention:
    /// non-empty, lowercase ASCII letters, digits and underscores only.
    pub fn is_canonical(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    }
}

impl fmt::Display for ErrorCode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ErrorCode {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ErrorCode {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ErrorCode {
    #[inline]
    fn from(code: &'static str) -> Self {
        Self::from_static(code)
    }
}

impl From<String> for ErrorCode {
    #[inline]
    fn from(code: String) -> Self {
        Self(Cow::Owned(code))
    }
}

impl PartialEq<str> for ErrorCode {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ErrorCode {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
