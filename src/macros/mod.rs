//! Declaration macro for sentinel errors.
//!
//! - [`macro@crate::declare_errors`] - Declares a batch of `static`
//!   [`StructuredError`](crate::StructuredError) sentinels plus a slice
//!   listing all of them, ready to hand to
//!   [`ErrorRegistry::register_all`](crate::ErrorRegistry::register_all).
//!
//! Sentinels are immutable at compile time: a `static` can be read, cloned
//! or wrapped, never written. Registration is a separate, explicit step so
//! the registry is populated in a deterministic order during startup.
//!
//! # Examples
//!
//! ```
//! use vault_rail::{declare_errors, ErrorRegistry};
//!
//! declare_errors! {
//!     /// Everything the PKI engine can report.
//!     pub static PKI_ERRORS = [
//!         /// The requested role does not exist.
//!         ROLE_NOT_FOUND => ("pki_role_not_found", "pki role not found"),
//!         /// The CSR could not be parsed.
//!         BAD_CSR => ("pki_bad_csr", "certificate signing request is malformed"),
//!     ];
//! }
//!
//! let registry = ErrorRegistry::new();
//! registry.register_all(PKI_ERRORS);
//!
//! assert_eq!(registry.from_code("pki_bad_csr"), BAD_CSR);
//! ```

/// Declares `static` sentinel errors and a slice referencing every one of them.
///
/// # Syntax
///
/// ```text
/// declare_errors! {
///     $(#[attr])* $vis static GROUP = [
///         $(#[attr])* NAME => ("code", "message"),
///         ...
///     ];
/// }
/// ```
///
/// Each `NAME` becomes a `pub static NAME: StructuredError`. `GROUP` becomes a
/// `$vis static GROUP: &[&StructuredError]` in declaration order.
#[macro_export]
macro_rules! declare_errors {
    (
        $(#[$group_meta:meta])*
        $vis:vis static $group:ident = [
            $(
                $(#[$meta:meta])*
                $name:ident => ($code:literal, $message:literal)
            ),+ $(,)?
        ];
    ) => {
        $(
            $(#[$meta])*
            pub static $name: $crate::StructuredError =
                $crate::StructuredError::sentinel($code, $message);
        )+

        $(#[$group_meta])*
        $vis static $group: &[&$crate::StructuredError] = &[$(&$name),+];
    };
}
