//! # Dispatch Errors

use thiserror::Error;
use uecall_core::DispatchKey;
use uecall_schema::{SchemaValidationError, ValidationViolations};

/// Failure of a dispatched call.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No route is registered under the key (or the key is malformed).
    #[error("Accessing a function that is not defined: '{key}'")]
    NotDefined {
        /// The key or accessor name as supplied by the caller.
        key: String,
    },

    /// The payload does not conform to the route's shape.
    #[error("validation failed for '{key}':\n{violations}")]
    Validation {
        /// The route that rejected the payload.
        key: DispatchKey,
        /// Every violated constraint.
        violations: ValidationViolations,
    },

    /// A handler variant was bound to a key it cannot serve.
    #[error("handler '{handler}' cannot serve '{key}'")]
    HandlerMismatch {
        /// The route key.
        key: DispatchKey,
        /// Name of the rejected handler variant.
        handler: &'static str,
    },

    /// The handler failed after validation succeeded.
    #[error("handler for '{key}' failed: {reason}")]
    Handler {
        /// The route key.
        key: String,
        /// Failure description.
        reason: String,
    },

    /// The shape registry could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}

impl DispatchError {
    /// The violations carried by a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Validation { violations, .. } => Some(violations),
            _ => None,
        }
    }

    /// True for lookup failures.
    pub fn is_not_defined(&self) -> bool {
        matches!(self, Self::NotDefined { .. })
    }
}
