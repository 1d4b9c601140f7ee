//! # uecall-cli — Command-Line Interface
//!
//! Provides the `uecall` binary.
//!
//! ## Subcommands
//!
//! - `uecall demo` — invalid call, valid call, then type generation.
//!   Runs when no subcommand is given.
//! - `uecall call <KEY> [PAYLOAD] [--file PATH]` — one validated call.
//! - `uecall generate [--out PATH]` — write and print type declarations.
//! - `uecall keys` — list dispatch keys.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return an exit
//!   code and delegate to the library crates.

pub mod call;
pub mod config;
pub mod demo;
pub mod generate;
pub mod keys;
