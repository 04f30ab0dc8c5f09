//! Lookup table from wire codes back to rich errors.
//!
//! A response envelope carries nothing but a bare code. The receiving side
//! calls [`from_code`] to turn it back into the canonical
//! [`StructuredError`], message included. A miss never fails: it yields
//! [`GENERAL_FAILURE`], so codes introduced by a newer server still classify.
//!
//! The process-wide registry returned by [`global`] is created on first use
//! and seeded with every [built-in sentinel](crate::sentinels::BUILTIN)
//! before anyone can read it. Call [`init`] early in `main` to make that
//! moment explicit, then register application sentinels.
//!
//! # Examples
//!
//! ```
//! use vault_rail::registry;
//! use vault_rail::sentinels::{ENTITY_NOT_FOUND, GENERAL_FAILURE};
//!
//! registry::init();
//!
//! assert_eq!(registry::from_code("entity_not_found"), ENTITY_NOT_FOUND);
//! assert_eq!(registry::from_code("brand_new_server_code"), GENERAL_FAILURE);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::sentinels::{BUILTIN, GENERAL_FAILURE};
use crate::types::{BoxError, ErrorCode, StructuredError};

/// Thread-safe map from [`ErrorCode`] to its canonical [`StructuredError`].
///
/// Writes go through [`register`](Self::register) and friends under the
/// exclusive lock; reads go through [`from_code`](Self::from_code) under the
/// shared lock. Registering a code twice overwrites the earlier entry.
#[derive(Debug, Default)]
pub struct ErrorRegistry {
    entries: RwLock<HashMap<ErrorCode, StructuredError>>,
}

impl ErrorRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in sentinels.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_all(BUILTIN);
        registry
    }

    /// Builds an error from its parts, stores it and returns it.
    pub fn register(
        &self,
        code: impl Into<ErrorCode>,
        message: impl Into<Cow<'static, str>>,
        cause: Option<BoxError>,
    ) -> StructuredError {
        let error = StructuredError::new(code, message, cause);
        self.insert(error.clone());
        error
    }

    /// Stores an already declared sentinel.
    #[inline]
    pub fn register_sentinel(&self, sentinel: &StructuredError) {
        self.insert(sentinel.clone());
    }

    /// Stores every sentinel of a group, in order, under a single lock acquisition.
    pub fn register_all<'a, I>(&self, sentinels: I)
    where
        I: IntoIterator<Item = &'a &'a StructuredError>,
    {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for sentinel in sentinels {
            if let Some(previous) = entries.insert(sentinel.code.clone(), (*sentinel).clone()) {
                warn!(code = %previous.code, "error code registered twice; keeping the later registration");
            }
        }
    }

    /// Resolves `code` to its registered error, or [`GENERAL_FAILURE`] on a miss.
    pub fn from_code(&self, code: &str) -> StructuredError {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(code) {
            Some(error) => error.clone(),
            None => {
                debug!(code, "unknown error code; falling back to general failure");
                GENERAL_FAILURE.clone()
            },
        }
    }

    /// Returns `true` if `code` has been registered.
    pub fn contains(&self, code: &str) -> bool {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).contains_key(code)
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, error: StructuredError) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = entries.insert(error.code.clone(), error) {
            warn!(code = %previous.code, "error code registered twice; keeping the later registration");
        }
    }
}

static GLOBAL: OnceLock<ErrorRegistry> = OnceLock::new();

/// Returns the process-wide registry, seeding it with the built-ins on first call.
pub fn global() -> &'static ErrorRegistry {
    GLOBAL.get_or_init(ErrorRegistry::with_builtins)
}

/// Forces creation of the process-wide registry.
///
/// Idempotent. Meant for the startup phase, before worker tasks begin
/// resolving codes.
#[inline]
pub fn init() {
    let _ = global();
}

/// Registers a new error in the process-wide registry.
#[inline]
pub fn register(
    code: impl Into<ErrorCode>,
    message: impl Into<Cow<'static, str>>,
    cause: Option<BoxError>,
) -> StructuredError {
    global().register(code, message, cause)
}

/// Resolves a wire code through the process-wide registry.
#[inline]
pub fn from_code(code: &str) -> StructuredError {
    global().from_code(code)
}
