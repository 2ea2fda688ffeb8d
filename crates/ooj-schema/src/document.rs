//! # Schema Document
//!
//! In-memory form of a JSON Schema document: title, root type, properties,
//! required names, and the draft version carried in the `$schema` URL.
//!
//! A loaded document writes its `$schema` URL back exactly as it was read.
//! A built document uses the published meta-schema URL for its draft
//! (see [`meta_schema_url`]).
//!
//! The canonical mapping lists `$schema`, `title`, `type`, `properties`
//! and `required` in that order, followed by any further top-level
//! keywords of a loaded document in their original order. Loading a
//! document in canonical order and dumping it again reproduces the file
//! byte for byte.

use std::path::Path;

use ooj_core::{JsonFile, SerializedForm, SCHEMA_KEY};
use serde_json::{Map, Value};

use crate::validate::{SchemaError, SchemaValidator};

/// Draft used when none is given.
pub const DEFAULT_DRAFT_VERSION: &str = "draft-07";

/// Root type used when none is given.
pub const DEFAULT_KIND: &str = "object";

const CANONICAL_KEYS: [&str; 5] = [SCHEMA_KEY, "title", "type", "properties", "required"];

/// Version token of a schema-identifier URL: the path segment immediately
/// before the final `schema#` segment.
///
/// ```
/// use ooj_schema::draft_version_from_url;
///
/// assert_eq!(
///     draft_version_from_url("http://json-schema.org/draft-07/schema#"),
///     Some("draft-07")
/// );
/// assert_eq!(
///     draft_version_from_url("https://json-schema.org/draft/2020-12/schema"),
///     Some("2020-12")
/// );
/// assert_eq!(draft_version_from_url("schema#"), None);
/// ```
pub fn draft_version_from_url(url: &str) -> Option<&str> {
    let mut segments = url.rsplit('/');
    segments.next()?;
    segments.next().filter(|version| !version.is_empty())
}

/// Meta-schema URL published for a draft version token.
///
/// Drafts 2019-09 and later live under `https://json-schema.org/draft/`;
/// earlier drafts use the `http://json-schema.org/<version>/schema#` form.
///
/// ```
/// use ooj_schema::meta_schema_url;
///
/// assert_eq!(meta_schema_url("draft-07"), "http://json-schema.org/draft-07/schema#");
/// assert_eq!(meta_schema_url("2020-12"), "https://json-schema.org/draft/2020-12/schema");
/// ```
pub fn meta_schema_url(version: &str) -> String {
    match version {
        "2019-09" | "2020-12" => format!("https://json-schema.org/draft/{version}/schema"),
        _ => format!("http://json-schema.org/{version}/schema#"),
    }
}

/// A JSON Schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    title: String,
    kind: Value,
    properties: Map<String, Value>,
    required: Vec<String>,
    draft_version: String,
    schema_url: String,
    keywords: Map<String, Value>,
}

impl SchemaDocument {
    /// A document with the given title, root type `object`, no properties,
    /// nothing required, and draft `draft-07`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: Value::String(DEFAULT_KIND.to_string()),
            properties: Map::new(),
            required: Vec::new(),
            draft_version: DEFAULT_DRAFT_VERSION.to_string(),
            schema_url: meta_schema_url(DEFAULT_DRAFT_VERSION),
            keywords: Map::new(),
        }
    }

    /// Set the root type: a type name, or an array of type names.
    pub fn with_kind(mut self, kind: impl Into<Value>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Add one property schema fragment.
    pub fn with_property(mut self, name: impl Into<String>, fragment: Value) -> Self {
        self.properties.insert(name.into(), fragment);
        self
    }

    /// Replace all property schema fragments.
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Set the required property names.
    pub fn with_required<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    /// Set the draft version token, e.g. `draft-07` or `2020-12`. The
    /// `$schema` URL becomes that draft's meta-schema URL.
    pub fn with_draft_version(mut self, version: impl Into<String>) -> Self {
        self.draft_version = version.into();
        self.schema_url = meta_schema_url(&self.draft_version);
        self
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Root type: a string, or an array of strings for a union type.
    pub fn kind(&self) -> &Value {
        &self.kind
    }

    /// Property schema fragments.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Required property names, in order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Draft version token.
    pub fn draft_version(&self) -> &str {
        &self.draft_version
    }

    /// Top-level keywords beyond the canonical five, in document order.
    pub fn keywords(&self) -> &Map<String, Value> {
        &self.keywords
    }

    /// The `$schema` URL embedding the draft version.
    pub fn schema_url(&self) -> &str {
        &self.schema_url
    }

    /// The canonical schema mapping.
    pub fn to_mapping(&self) -> SerializedForm {
        let mut map = SerializedForm::new();
        map.insert(SCHEMA_KEY.to_string(), Value::String(self.schema_url.clone()));
        map.insert("title".to_string(), Value::String(self.title.clone()));
        map.insert("type".to_string(), self.kind.clone());
        map.insert("properties".to_string(), Value::Object(self.properties.clone()));
        map.insert(
            "required".to_string(),
            Value::Array(self.required.iter().cloned().map(Value::String).collect()),
        );
        for (key, value) in &self.keywords {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Build a document from a schema mapping, checking that it is a
    /// structurally valid schema.
    pub fn from_mapping(schema: &SerializedForm) -> Result<Self, SchemaError> {
        let name = schema
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("(inline)")
            .to_string();
        Self::parse(name, schema, None)
    }

    /// Load a schema document from a file.
    ///
    /// # Errors
    ///
    /// [`SchemaError::File`] if the file cannot be read or parsed;
    /// [`SchemaError::InvalidSchema`] or [`SchemaError::UnsupportedDraft`]
    /// if its contents are not a valid schema. A schema without a string
    /// `title`, or whose `type` is neither a type name nor an array of
    /// type names, is an [`SchemaError::InvalidSchema`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let value = JsonFile::new(path).read()?;
        let schema = value.as_object().ok_or_else(|| SchemaError::InvalidSchema {
            schema: name.clone(),
            reason: "a schema document must be a JSON object".to_string(),
        })?;
        let document = Self::parse(name, schema, path.parent())?;
        tracing::debug!(
            path = %path.display(),
            title = %document.title,
            draft = %document.draft_version,
            "loaded schema document"
        );
        Ok(document)
    }

    /// Write the canonical mapping to a file with a 4-space indent.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        JsonFile::new(path).write(&Value::Object(self.to_mapping()))?;
        Ok(())
    }

    /// Compile the canonical mapping into a reusable validator.
    pub fn validator(&self) -> Result<SchemaValidator, SchemaError> {
        SchemaValidator::compile(self.title.clone(), &self.to_mapping(), None)
    }

    fn parse(
        name: String,
        schema: &SerializedForm,
        base_dir: Option<&Path>,
    ) -> Result<Self, SchemaError> {
        let invalid = |reason: &str| SchemaError::InvalidSchema {
            schema: name.clone(),
            reason: reason.to_string(),
        };

        // Compiling first catches a malformed `$schema` and unsupported drafts.
        let validator = SchemaValidator::compile(name.clone(), schema, base_dir)?;

        let title = match schema.get("title") {
            Some(Value::String(title)) => title.clone(),
            Some(_) => return Err(invalid("'title' must be a string")),
            None => return Err(invalid("missing 'title'")),
        };
        let kind = match schema.get("type") {
            None => Value::String(DEFAULT_KIND.to_string()),
            Some(kind) if is_type_name_or_union(kind) => kind.clone(),
            Some(_) => {
                return Err(invalid(
                    "'type' must be a type name or an array of type names",
                ))
            }
        };
        let properties = match schema.get("properties") {
            None => Map::new(),
            Some(Value::Object(properties)) => properties.clone(),
            Some(_) => return Err(invalid("'properties' must be an object")),
        };
        let required = match schema.get("required") {
            None => Vec::new(),
            Some(Value::Array(names)) => names
                .iter()
                .map(|name| name.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid("'required' must list property names"))?,
            Some(_) => return Err(invalid("'required' must be an array")),
        };
        let keywords = schema
            .iter()
            .filter(|(key, _)| !CANONICAL_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let draft_version = validator.draft_version().to_string();
        let schema_url = match schema.get(SCHEMA_KEY).and_then(Value::as_str) {
            Some(url) => url.to_string(),
            None => meta_schema_url(&draft_version),
        };

        Ok(Self {
            title,
            kind,
            properties,
            required,
            draft_version,
            schema_url,
            keywords,
        })
    }
}

fn is_type_name_or_union(kind: &Value) -> bool {
    match kind {
        Value::String(_) => true,
        Value::Array(names) => names.iter().all(Value::is_string),
        _ => false,
    }
}
