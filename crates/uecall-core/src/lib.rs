//! # uecall-core — Foundational Types
//!
//! Leaf crate of the uecall workspace. Defines the dispatch key newtype
//! and its error type, shared by the schema and dispatch crates.
//!
//! ## Key Design Principles
//!
//! 1. **No bare strings for dispatch keys.** `DispatchKey` is validated at
//!    construction: one or more `.`-separated ASCII alphanumeric segments.
//!
//! 2. **Explicit accessor normalization.** The dotted key `POI.Add` and
//!    its accessor name `POI_Add` are converted by
//!    [`DispatchKey::accessor_name`] and [`DispatchKey::from_accessor`].
//!    Segments may not contain `_`, so the mapping is a bijection.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `uecall-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod key;

pub use error::KeyError;
pub use key::{DispatchKey, ACCESSOR_SEPARATOR, KEY_SEPARATOR};
