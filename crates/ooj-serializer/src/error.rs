//! # Engine Errors
//!
//! Every variant that points into the object graph carries a JSON-pointer
//! style `path` (`(root)` for the top level) so a failure deep inside a
//! nested structure can be located without logging.
//!
//! Constructor failures are carried unchanged in
//! [`DeserializeError::Construction`]: the error names the type whose
//! constructor rejected its arguments, at whatever depth that happened.

use std::path::PathBuf;

use ooj_core::{ConstructionError, TypeError};
use ooj_schema::SchemaError;
use thiserror::Error;

/// Error while turning an object into a serialized form.
#[derive(Error, Debug)]
pub enum SerializeError {
    /// A value has no JSON representation.
    #[error("value at {path} is not serializable: {reason}")]
    NotSerializable {
        /// Location of the value.
        path: String,
        /// Why it cannot be represented.
        reason: String,
    },

    /// An object was reached again while it was still being serialized.
    #[error("cyclic reference to {type_name} at {path}")]
    CyclicReference {
        /// Type of the object that closes the cycle.
        type_name: String,
        /// Location where the cycle was closed.
        path: String,
    },

    /// The object graph nests deeper than the configured limit.
    #[error("maximum nesting depth {max_depth} exceeded at {path}")]
    MaxDepthExceeded {
        /// The configured limit.
        max_depth: usize,
        /// Location of the first value beyond the limit.
        path: String,
    },

    /// Loading the schema or validating against it failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Error while rebuilding an object from a serialized form.
#[derive(Error, Debug)]
pub enum DeserializeError {
    /// A value does not have the shape the declared type requires.
    #[error("value at {path} cannot be deserialized: {reason}")]
    NotSerializable {
        /// Location of the value.
        path: String,
        /// Expected vs. actual shape.
        reason: String,
    },

    /// A sequence was found where the field type is not a parametrized
    /// sequence type.
    #[error("sequence at {path} cannot be deserialized: {source}")]
    UnsupportedType {
        /// Location of the sequence.
        path: String,
        /// The rejected field type.
        #[source]
        source: TypeError,
    },

    /// A constructor rejected its arguments.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// The serialized form nests deeper than the configured limit.
    #[error("maximum nesting depth {max_depth} exceeded at {path}")]
    MaxDepthExceeded {
        /// The configured limit.
        max_depth: usize,
        /// Location of the first value beyond the limit.
        path: String,
    },
}

/// Error loading engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid YAML or has unknown keys.
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `max_depth` was zero.
    #[error("max_depth must be at least 1")]
    ZeroDepth,
}
