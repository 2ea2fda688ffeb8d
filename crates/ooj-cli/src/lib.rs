//! # ooj-cli: Command-Line Interface
//!
//! Provides the `ooj` binary.
//!
//! ## Subcommands
//!
//! - `ooj validate <DOCUMENT> [--schema <PATH>]`: check a JSON document
//!   against a schema (its own `$schema` reference by default).
//! - `ooj schema show <PATH>`: summarize a schema document.
//! - `ooj schema fmt <PATH> [--output <PATH>]`: rewrite a schema document
//!   in canonical form.
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | success                                   |
//! | 1    | the document failed validation            |
//! | 2    | unreadable input or an invalid schema     |
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; behavior lives in the library crates.
//! - Handlers return `anyhow::Result<u8>`; the binary maps `Err` to exit 2.

pub mod schema;
pub mod validate;
