//! # Error Types
//!
//! Errors raised by the foundational types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// A dispatch key or accessor name failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The input was empty.
    #[error("dispatch key must not be empty")]
    Empty,

    /// A segment between separators was empty (e.g. `"POI..Add"`).
    #[error("empty segment in '{input}'")]
    EmptySegment {
        /// The rejected input.
        input: String,
    },

    /// A segment contained a character outside `[A-Za-z0-9]`.
    #[error("invalid character {found:?} in '{input}'; segments must be ASCII alphanumeric")]
    InvalidCharacter {
        /// The rejected input.
        input: String,
        /// The first offending character.
        found: char,
    },
}
