//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types shared by every ooj crate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Type resolution errors name the offending type or type expression.
//! - Construction errors name the type whose constructor rejected its
//!   arguments, and the argument involved. They are never re-wrapped by the
//!   engines, so the caller sees exactly which type failed to construct.
//! - File errors carry the path of the document being read or written.

use std::path::PathBuf;

use thiserror::Error;

/// Error while resolving or normalizing field types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The type cannot be introspected as a parametrized sequence.
    #[error("{type_name} not supported: expected a parametrized sequence type such as list[T]")]
    UnsupportedType {
        /// Display name of the rejected type (`none` when untyped).
        type_name: String,
    },

    /// A nested-type map was neither a mapping nor absent.
    #[error("the type map must be a mapping, found {found}")]
    InvalidTypeMap {
        /// JSON kind of the value supplied in place of the mapping.
        found: String,
    },

    /// A type expression named a type that is not registered.
    #[error("unknown type '{name}'")]
    UnknownType {
        /// The unresolved type name.
        name: String,
    },

    /// A short type name is shared by more than one registered type.
    #[error("type name '{name}' is ambiguous; use the full type path")]
    AmbiguousType {
        /// The ambiguous short name.
        name: String,
    },

    /// A type expression could not be parsed.
    #[error("malformed type expression '{expr}': {reason}")]
    MalformedTypeExpr {
        /// The expression as written.
        expr: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Error raised by a type's constructor when its arguments do not match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A required constructor argument was not provided.
    #[error("{type_name}() missing required argument '{name}'")]
    MissingArgument {
        /// Type being constructed.
        type_name: String,
        /// Name of the missing argument.
        name: String,
    },

    /// An argument was provided that the constructor does not accept.
    #[error("{type_name}() got an unexpected argument '{name}'")]
    UnexpectedArgument {
        /// Type being constructed.
        type_name: String,
        /// Name of the extra argument.
        name: String,
    },

    /// An argument was provided with a value of the wrong shape.
    #[error("{type_name}() argument '{name}' is invalid: {reason}")]
    InvalidArgument {
        /// Type being constructed.
        type_name: String,
        /// Name of the argument.
        name: String,
        /// Expected vs. actual description.
        reason: String,
    },
}

/// Error reading, writing, or navigating a JSON file.
#[derive(Error, Debug)]
pub enum FileError {
    /// The file could not be read or written.
    #[error("io error for '{}': {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid JSON, or the value could not be encoded.
    #[error("invalid JSON in '{}': {source}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A key along a key path does not exist.
    #[error("key '{key}' not found in '{}'", path.display())]
    KeyNotFound {
        /// Path of the file.
        path: PathBuf,
        /// The missing key.
        key: String,
    },

    /// A key along a key path exists but does not hold a mapping.
    #[error("key '{key}' in '{}' is not a mapping", path.display())]
    NotAMapping {
        /// Path of the file.
        path: PathBuf,
        /// The key holding a non-mapping value.
        key: String,
    },

    /// An empty key path was supplied.
    #[error("empty key path for '{}'", path.display())]
    EmptyKeyPath {
        /// Path of the file.
        path: PathBuf,
    },
}
