//! Built-in sentinel errors.
//!
//! Every kind in the taxonomy has its own code; codes, not messages, are the
//! unit of comparison. All of them are registered in the
//! [global registry](crate::registry::global) on first use.

use crate::declare_errors;

declare_errors! {
    /// Every built-in sentinel, in declaration order.
    pub static BUILTIN = [
        // general
        /// Fallback for unknown or unclassifiable failures.
        GENERAL_FAILURE => ("general_failure", "general failure"),
        /// A caller supplied an argument outside its accepted range.
        INVALID_INPUT => ("invalid_input", "invalid input"),
        /// The backend does not support the requested operation.
        UNSUPPORTED => ("unsupported", "operation not supported"),

        // entity
        /// The requested entity does not exist.
        ENTITY_NOT_FOUND => ("entity_not_found", "entity not found"),
        /// The entity failed validation.
        ENTITY_INVALID => ("entity_invalid", "entity invalid"),
        /// An entity with the same identity already exists.
        ENTITY_EXISTS => ("entity_exists", "entity already exists"),

        // state
        /// A component was used before it was initialized.
        NOT_INITIALIZED => ("not_initialized", "not initialized"),
        /// The backend is reachable but not ready to serve (sealed, standby, booting).
        NOT_READY => ("not_ready", "not ready"),

        // access
        /// The caller could not be authenticated.
        UNAUTHORIZED => ("unauthorized", "unauthorized"),
        /// The caller is authenticated but lacks the required permission.
        INVALID_PERMISSION => ("invalid_permission", "invalid permission"),

        // transport
        /// The connection to the peer could not be established or was lost.
        PEER_CONNECTION => ("peer_connection", "peer connection failed"),
        /// Reading the response from the peer failed.
        READ_FAILURE => ("read_failure", "read failure"),
        /// The peer did not answer in time.
        TIMEOUT => ("timeout", "operation timed out"),

        // retry framework
        /// The cancellation signal fired before the operation succeeded.
        RETRY_CONTEXT_CANCELED => ("retry_context_canceled", "retry context canceled"),
        /// The backoff ran out of its total time budget.
        RETRY_MAX_ELAPSED_TIME_REACHED => ("retry_max_elapsed_time_reached", "retry max elapsed time reached"),
        /// An attempt failed with an error that carried no code of its own.
        RETRY_OPERATION_FAILED => ("retry_operation_failed", "retry operation failed"),
        /// The attempt budget was used up.
        RETRY_MAX_ATTEMPTS_REACHED => ("retry_max_attempts_reached", "retry max attempts reached"),

        // data
        /// Encoding a request payload failed.
        MARSHAL_FAILURE => ("marshal_failure", "marshal failure"),
        /// Decoding a response payload failed.
        UNMARSHAL_FAILURE => ("unmarshal_failure", "unmarshal failure"),
        /// A value could not be parsed.
        PARSE_FAILURE => ("parse_failure", "parse failure"),
    ];
}
