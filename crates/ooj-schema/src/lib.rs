//! # ooj-schema: Schema Documents & Validation
//!
//! Loads, builds and dumps JSON Schema documents, and validates serialized
//! forms against them.
//!
//! ## Schema Documents (`document`)
//!
//! [`SchemaDocument`] holds a schema's title, root type, properties,
//! required names and draft version. [`SchemaDocument::load`] refuses
//! anything that is not itself a structurally valid schema;
//! [`SchemaDocument::dump`] writes the canonical mapping with a 4-space
//! indent.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaValidator`] compiles a schema once for the draft named by its
//! `$schema` URL; [`validate`] is the one-shot form used by the serializer.
//! Failures are reported as [`SchemaError`], split into schema exceptions
//! and validation exceptions.
//!
//! ## Crate Policy
//!
//! - Depends only on `ooj-core` internally.
//! - No network access: `$ref`s resolve to local files only.

pub mod document;
pub mod validate;

pub use document::{
    draft_version_from_url, meta_schema_url, SchemaDocument, DEFAULT_DRAFT_VERSION, DEFAULT_KIND,
};
pub use validate::{
    draft_for_version, validate, SchemaError, SchemaValidator, ValidationViolations, Violation,
};
