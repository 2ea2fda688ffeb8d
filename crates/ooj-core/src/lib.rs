//! # ooj-core: Foundational Types for Object/JSON Mapping
//!
//! Every other ooj crate depends on `ooj-core`; it depends on nothing
//! internal. It defines the vocabulary shared by the serializer, the
//! deserializer and the schema layer:
//!
//! - **Serialized forms.** [`SerializedForm`] is an insertion-ordered JSON
//!   mapping; [`SCHEMA_KEY`] is its single reserved key.
//! - **Capabilities.** Objects opt into serialization with [`Serializable`]
//!   and into reconstruction with [`Deserializable`]. Nothing is discovered
//!   by reflection.
//! - **Field types.** [`Field`], [`FieldTypes`] and [`Type`] tell the
//!   deserializer which concrete type to rebuild for each key, recursively.
//!   [`TypeRegistry`] resolves them from JSON descriptions.
//! - **Containers.** [`RootTree`]/[`Tree`]/[`Entry`] for nested key/value
//!   documents, and [`JsonFile`] for documents on disk.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ooj-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod file;
pub mod form;
pub mod params;
pub mod record;
pub mod registry;
pub mod tree;

// Re-export primary types for ergonomic imports.
pub use error::{ConstructionError, FileError, TypeError};
pub use field::{extract_element_type, wrap_all, Field, FieldTypes, RecordType, Type};
pub use file::{to_pretty_string, JsonFile, DEFAULT_INDENT};
pub use form::{display_path, strip_schema_key, value_kind, SerializedForm, SCHEMA_KEY};
pub use params::{Param, Parameters};
pub use record::{Deserializable, FieldValue, Fields, Serializable};
pub use registry::TypeRegistry;
pub use tree::{Entry, Node, RootTree, Tree};
