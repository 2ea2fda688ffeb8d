//! # Serializer Engine
//!
//! Walks a [`Serializable`] object's fields in order and builds its
//! [`SerializedForm`]:
//!
//! - array-like values serialize element by element into a JSON array,
//! - object-like values serialize recursively into a nested mapping,
//! - scalars (and ready-made JSON values) are copied as-is.
//!
//! ## Guards
//!
//! Each call tracks the identities of the objects on the current traversal
//! path. Reaching one of them again fails with
//! [`SerializeError::CyclicReference`]; an object shared by two siblings
//! is not a cycle and is serialized twice. Paths longer than
//! [`SerializerConfig::max_depth`] segments fail with
//! [`SerializeError::MaxDepthExceeded`].
//!
//! ## Schema Tagging
//!
//! [`Serializer::serialize_with_schema`] puts the schema reference first
//! under `$schema`, then validates the complete form (tag included) against
//! that schema before returning it.

use std::collections::HashSet;
use std::path::Path;

use ooj_core::{display_path, FieldValue, Serializable, SerializedForm, SCHEMA_KEY};
use serde_json::{Number, Value};

use crate::config::SerializerConfig;
use crate::error::SerializeError;

/// Object identity: data address plus concrete type name.
type Identity = (usize, &'static str);

fn identity(object: &dyn Serializable) -> Identity {
    (
        object as *const dyn Serializable as *const () as usize,
        object.type_name(),
    )
}

/// Turns objects into serialized forms.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    config: SerializerConfig,
}

impl Serializer {
    /// A serializer with the given settings.
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Serialize an object into a mapping.
    pub fn serialize(&self, object: &dyn Serializable) -> Result<SerializedForm, SerializeError> {
        tracing::debug!(type_name = object.type_name(), "serializing object");
        Walk::new(self.config.max_depth).object(object)
    }

    /// Serialize an object, tag the form with `schema_path` under
    /// `$schema`, and validate the form against that schema.
    ///
    /// # Errors
    ///
    /// Anything [`serialize`](Self::serialize) raises, plus
    /// [`SerializeError::Schema`] when the schema cannot be loaded, is not
    /// a valid schema, or rejects the form.
    pub fn serialize_with_schema(
        &self,
        object: &dyn Serializable,
        schema_path: impl AsRef<Path>,
    ) -> Result<SerializedForm, SerializeError> {
        let schema_path = schema_path.as_ref();
        let mut form = SerializedForm::new();
        form.insert(
            SCHEMA_KEY.to_string(),
            Value::String(schema_path.to_string_lossy().into_owned()),
        );
        form.extend(self.serialize(object)?);

        ooj_schema::validate(&Value::Object(form.clone()), schema_path)?;
        Ok(form)
    }
}

/// Serialize with default settings.
pub fn serialize(object: &dyn Serializable) -> Result<SerializedForm, SerializeError> {
    Serializer::default().serialize(object)
}

/// Serialize with default settings, tagging and validating against a schema.
pub fn serialize_with_schema(
    object: &dyn Serializable,
    schema_path: impl AsRef<Path>,
) -> Result<SerializedForm, SerializeError> {
    Serializer::default().serialize_with_schema(object, schema_path)
}

/// State of one serialize call.
struct Walk {
    max_depth: usize,
    path: Vec<String>,
    visiting: HashSet<Identity>,
}

impl Walk {
    fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            path: Vec::new(),
            visiting: HashSet::new(),
        }
    }

    fn location(&self) -> String {
        display_path(&self.path)
    }

    fn check_depth(&self) -> Result<(), SerializeError> {
        if self.path.len() > self.max_depth {
            return Err(SerializeError::MaxDepthExceeded {
                max_depth: self.max_depth,
                path: self.location(),
            });
        }
        Ok(())
    }

    fn object(&mut self, object: &dyn Serializable) -> Result<SerializedForm, SerializeError> {
        self.check_depth()?;
        let id = identity(object);
        if !self.visiting.insert(id) {
            return Err(SerializeError::CyclicReference {
                type_name: object.type_name().to_string(),
                path: self.location(),
            });
        }
        let result = self.fields(object);
        self.visiting.remove(&id);
        result
    }

    fn fields(&mut self, object: &dyn Serializable) -> Result<SerializedForm, SerializeError> {
        let mut form = SerializedForm::new();
        for (name, value) in object.fields() {
            self.path.push(name.to_string());
            let value = self.value(value);
            self.path.pop();
            form.insert(name.into_owned(), value?);
        }
        Ok(form)
    }

    fn value(&mut self, value: FieldValue<'_>) -> Result<Value, SerializeError> {
        match value {
            FieldValue::Scalar(value) => Ok(value),
            FieldValue::Float(f) => Number::from_f64(f).map(Value::Number).ok_or_else(|| {
                SerializeError::NotSerializable {
                    path: self.location(),
                    reason: format!("{f} has no JSON representation"),
                }
            }),
            FieldValue::Object(object) => self.object(object).map(Value::Object),
            FieldValue::Array(items) => {
                self.check_depth()?;
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    self.path.push(index.to_string());
                    let item = self.value(item);
                    self.path.pop();
                    out.push(item?);
                }
                Ok(Value::Array(out))
            }
        }
    }
}
