//! Chain traversal for any error, not only [`StructuredError`].
//!
//! A transport layer may hand back its own error type whose `source()` leads
//! to a [`StructuredError`]. These helpers answer "does this chain contain X"
//! without special-casing either side.

use std::error::Error;

use crate::types::{Chain, StructuredError};

/// Extension methods walking an error's `source()` chain.
///
/// # Examples
///
/// ```
/// use std::error::Error;
/// use vault_rail::traits::ErrorChainExt;
/// use vault_rail::sentinels::{READ_FAILURE, TIMEOUT};
///
/// let err = READ_FAILURE.wrap(TIMEOUT.wrap("deadline of 5s exceeded"));
/// let dyn_err: &(dyn Error + 'static) = &err;
///
/// assert!(dyn_err.contains_code("timeout"));
/// assert_eq!(dyn_err.chain().count(), 3);
/// ```
pub trait ErrorChainExt {
    /// Iterates over the error and every `source()` below it.
    fn chain(&self) -> Chain<'_>;

    /// Returns the outermost [`StructuredError`] in the chain.
    fn find_structured(&self) -> Option<&StructuredError> {
        self.chain().find_map(|e| e.downcast_ref::<StructuredError>())
    }

    /// Returns `true` if any [`StructuredError`] in the chain carries `code`.
    fn contains_code(&self, code: &str) -> bool {
        self.chain()
            .filter_map(|e| e.downcast_ref::<StructuredError>())
            .any(|e| e.code() == code)
    }

    /// Returns `true` if the chain contains an error of the same kind as `target`.
    #[inline]
    fn contains(&self, target: &StructuredError) -> bool {
        self.contains_code(target.code().as_str())
    }
}

impl ErrorChainExt for dyn Error + 'static {
    #[inline]
    fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }
}

impl ErrorChainExt for dyn Error + Send + Sync + 'static {
    #[inline]
    fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }
}
