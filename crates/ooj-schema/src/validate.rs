//! # Schema Validation
//!
//! Validation of serialized forms against JSON Schema documents, backed by
//! the `jsonschema` crate.
//!
//! ## Two Failure Categories
//!
//! - A schema that is not itself a structurally valid schema (or names a
//!   draft we cannot compile for) is a *schema exception*:
//!   [`SchemaError::InvalidSchema`], [`SchemaError::UnsupportedDraft`].
//! - A form that fails an otherwise valid schema is a *validation
//!   exception*: [`SchemaError::ValidationFailed`], carrying every
//!   violation with its instance path and schema path.
//!
//! ## Schema Resolution
//!
//! The schema's own `$schema` key selects the draft and is removed before
//! compilation. Relative `$ref`s resolve against the directory holding the
//! schema file and are read from disk by a local retriever. Remote
//! retrieval is disabled: an `http(s)` reference that is not one of the
//! bundled meta-schemas fails compilation instead of touching the network.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Draft, Retrieve, Uri, Validator};
use ooj_core::{FileError, JsonFile, SerializedForm, SCHEMA_KEY};
use serde_json::Value;
use thiserror::Error;

use crate::document::{draft_version_from_url, DEFAULT_DRAFT_VERSION};

/// Error loading a schema or validating a form against it.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema document is not a structurally valid schema.
    #[error("invalid schema '{schema}': {reason}")]
    InvalidSchema {
        /// Schema path or title.
        schema: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The schema's `$schema` URL names a draft that cannot be compiled.
    #[error("schema '{schema}' uses unsupported draft '{version}'")]
    UnsupportedDraft {
        /// Schema path or title.
        schema: String,
        /// The draft version token.
        version: String,
    },

    /// The form does not conform to the schema.
    #[error("validation failed against schema '{schema}':\n{violations}")]
    ValidationFailed {
        /// Schema path or title.
        schema: String,
        /// Every individual violation.
        violations: ValidationViolations,
    },

    /// The schema file could not be read or written.
    #[error(transparent)]
    File(#[from] FileError),
}

impl SchemaError {
    /// True for errors about the schema document itself.
    pub fn is_schema_exception(&self) -> bool {
        matches!(
            self,
            SchemaError::InvalidSchema { .. } | SchemaError::UnsupportedDraft { .. }
        )
    }

    /// True when a form failed an otherwise valid schema.
    pub fn is_validation_exception(&self) -> bool {
        matches!(self, SchemaError::ValidationFailed { .. })
    }
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the form.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Validator diagnostic.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Every violation found in one validation pass, in validator order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if there are none.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consume into the inner list.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// The `jsonschema` draft for a version token.
pub fn draft_for_version(version: &str) -> Option<Draft> {
    match version {
        "draft-04" => Some(Draft::Draft4),
        "draft-06" => Some(Draft::Draft6),
        "draft-07" => Some(Draft::Draft7),
        "2019-09" => Some(Draft::Draft201909),
        "2020-12" => Some(Draft::Draft202012),
        _ => None,
    }
}

/// Resolves relative `$ref`s to files next to the schema.
struct LocalFileRetriever {
    base_dir: Option<PathBuf>,
}

impl LocalFileRetriever {
    fn local_path(&self, uri: &str) -> Option<PathBuf> {
        let uri = uri.split('#').next().unwrap_or(uri);
        if let Some(path) = uri.strip_prefix("file://") {
            return Some(PathBuf::from(path));
        }
        // Relative references resolve against jsonschema's default base URI.
        let relative = uri.strip_prefix("json-schema:///")?;
        let base_dir = self.base_dir.as_ref()?;
        Some(base_dir.join(relative))
    }
}

impl Retrieve for LocalFileRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let path = self
            .local_path(uri_str)
            .ok_or_else(|| format!("cannot resolve '{uri_str}': remote retrieval is disabled"))?;
        tracing::trace!(uri = uri_str, path = %path.display(), "resolving $ref");
        Ok(JsonFile::new(&path).read()?)
    }
}

/// A compiled schema, reusable across any number of forms.
pub struct SchemaValidator {
    schema_name: String,
    draft_version: String,
    validator: Validator,
}

impl SchemaValidator {
    /// Compile an in-memory schema mapping. `$ref`s to files cannot be
    /// resolved without a base directory.
    pub fn from_mapping(schema: &SerializedForm) -> Result<Self, SchemaError> {
        let name = schema
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("(inline)")
            .to_string();
        Self::compile(name, schema, None)
    }

    /// Read and compile the schema file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let schema_name = path.display().to_string();
        let document = JsonFile::new(path).read()?;
        let schema = document.as_object().ok_or_else(|| SchemaError::InvalidSchema {
            schema: schema_name.clone(),
            reason: "a schema document must be a JSON object".to_string(),
        })?;
        Self::compile(schema_name, schema, path.parent())
    }

    pub(crate) fn compile(
        schema_name: String,
        schema: &SerializedForm,
        base_dir: Option<&Path>,
    ) -> Result<Self, SchemaError> {
        let draft_version = match schema.get(SCHEMA_KEY) {
            None => DEFAULT_DRAFT_VERSION.to_string(),
            Some(Value::String(url)) => draft_version_from_url(url)
                .ok_or_else(|| SchemaError::InvalidSchema {
                    schema: schema_name.clone(),
                    reason: format!("cannot extract a draft version from '{url}'"),
                })?
                .to_string(),
            Some(_) => {
                return Err(SchemaError::InvalidSchema {
                    schema: schema_name,
                    reason: format!("'{SCHEMA_KEY}' must be a string URL"),
                })
            }
        };
        let draft = draft_for_version(&draft_version).ok_or_else(|| {
            SchemaError::UnsupportedDraft {
                schema: schema_name.clone(),
                version: draft_version.clone(),
            }
        })?;

        // The draft is chosen explicitly; the meta-schema URL is not compiled.
        let mut body = schema.clone();
        body.shift_remove(SCHEMA_KEY);

        let retriever = LocalFileRetriever {
            base_dir: base_dir
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .or_else(|| Some(PathBuf::from("."))),
        };
        let validator = jsonschema::options()
            .with_draft(draft)
            .with_retriever(retriever)
            .build(&Value::Object(body))
            .map_err(|e| SchemaError::InvalidSchema {
                schema: schema_name.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(schema = %schema_name, draft = %draft_version, "compiled schema");
        Ok(Self {
            schema_name,
            draft_version,
            validator,
        })
    }

    /// Path or title of the schema.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Draft version the schema was compiled for.
    pub fn draft_version(&self) -> &str {
        &self.draft_version
    }

    /// Check a form, collecting every violation.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            tracing::trace!(schema = %self.schema_name, "form is valid");
            return Ok(());
        }
        tracing::debug!(
            schema = %self.schema_name,
            violations = violations.len(),
            "form failed validation"
        );
        Err(SchemaError::ValidationFailed {
            schema: self.schema_name.clone(),
            violations: ValidationViolations { violations },
        })
    }

    /// True if the form conforms.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_name", &self.schema_name)
            .field("draft_version", &self.draft_version)
            .finish_non_exhaustive()
    }
}

/// Validate a form against the schema file at `schema_path`.
///
/// The schema is read and checked for structural validity on every call;
/// compile a [`SchemaValidator`] once to validate many forms.
pub fn validate(form: &Value, schema_path: impl AsRef<Path>) -> Result<(), SchemaError> {
    SchemaValidator::from_path(schema_path)?.validate(form)
}
