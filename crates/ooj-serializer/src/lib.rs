//! # ooj-serializer: Object/JSON Engines
//!
//! The recursive engines that turn [`Serializable`](ooj_core::Serializable)
//! objects into serialized forms and rebuild
//! [`Deserializable`](ooj_core::Deserializable) types from them.
//!
//! ## Serializer (`serialize`)
//!
//! [`Serializer`] walks an object's fields in order, recursing into nested
//! objects and sequences. With a schema reference, the form is tagged with
//! `$schema` and validated before it is returned.
//!
//! ## Deserializer (`deserialize`)
//!
//! [`Deserializer`] resolves each key's effective field type from the
//! caller's [`FieldTypes`](ooj_core::FieldTypes) and the target type's
//! constructor hints, rebuilds nested records and sequences, and calls the
//! target type's constructor with the result.
//!
//! ## Crate Policy
//!
//! - Each call is a pure function of its inputs (plus the schema file it is
//!   told to read). No global state.
//! - Every recursion is bounded by [`SerializerConfig::max_depth`].

pub mod config;
pub mod deserialize;
pub mod error;
pub mod serialize;

pub use config::{SerializerConfig, DEFAULT_MAX_DEPTH};
pub use deserialize::{deserialize, Deserializer};
pub use error::{ConfigError, DeserializeError, SerializeError};
pub use serialize::{serialize, serialize_with_schema, Serializer};
