//! # Deserializer Engine
//!
//! Rebuilds typed objects from serialized forms. For each key of a form the
//! engine resolves an effective field type, converts the value accordingly,
//! and finally hands every converted value to the target type's
//! constructor as named [`Parameters`](ooj_core::Parameters).
//!
//! ## Field-Type Resolution
//!
//! For key `k` of a form being rebuilt as `R`, with caller-supplied field
//! types `F`:
//!
//! 1. The target type is `R`'s constructor hint for `k` when there is one,
//!    otherwise `F[k]`'s type, otherwise none.
//! 2. The nested field types used when recursing are `F[k]`'s nested map
//!    when there is one, otherwise the hint's.
//!
//! ## Value Conversion
//!
//! | Value    | Target                | Result                                   |
//! |----------|-----------------------|------------------------------------------|
//! | mapping  | none / `any`          | passed through as plain JSON             |
//! | mapping  | record `T`            | rebuilt as `T`, recursively              |
//! | mapping  | sequence              | error: not a sequence                    |
//! | sequence | `list[E]`             | each non-null element converted as `E`   |
//! | sequence | anything else         | error: unsupported type                  |
//! | scalar   | anything              | copied as-is                             |
//!
//! The reserved `$schema` key is removed from every mapping rebuilt as a
//! record before its keys are resolved.

use std::any::Any;

use ooj_core::{
    display_path, extract_element_type, strip_schema_key, value_kind, Deserializable, Field,
    FieldTypes, Param, RecordType, Type,
};
use serde_json::Value;

use crate::config::SerializerConfig;
use crate::error::DeserializeError;

/// Rebuilds objects from serialized forms.
#[derive(Debug, Clone, Default)]
pub struct Deserializer {
    config: SerializerConfig,
}

impl Deserializer {
    /// A deserializer with the given settings.
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Rebuild a `T` from a serialized form.
    ///
    /// `field_types` declares the types of `T`'s fields (and, recursively,
    /// of theirs); `None` is the same as an empty map.
    ///
    /// # Errors
    ///
    /// - [`DeserializeError::NotSerializable`] if the form (or a nested
    ///   value declared as a record) is not a mapping.
    /// - [`DeserializeError::UnsupportedType`] for a sequence whose field
    ///   type is not a parametrized sequence type.
    /// - [`DeserializeError::Construction`] as raised by any constructor.
    pub fn deserialize<T: Deserializable>(
        &self,
        form: impl Into<Value>,
        field_types: Option<FieldTypes>,
    ) -> Result<T, DeserializeError> {
        let record = RecordType::of::<T>();
        tracing::debug!(type_name = record.name(), "deserializing object");
        let instance =
            Walk::new(self.config.max_depth).record(form.into(), record, field_types.as_ref())?;
        instance
            .downcast::<T>()
            .map(|instance| *instance)
            .map_err(|_| DeserializeError::NotSerializable {
                path: display_path(&[]),
                reason: format!("constructor of {} returned another type", record.name()),
            })
    }

    /// Convert a value as `target` without knowing the type statically.
    ///
    /// A record target requires a mapping and yields [`Param::Object`];
    /// a sequence target yields [`Param::List`].
    pub fn deserialize_as(
        &self,
        value: Value,
        target: &Type,
        field_types: Option<FieldTypes>,
    ) -> Result<Param, DeserializeError> {
        tracing::debug!(target = %target, "deserializing value");
        let mut walk = Walk::new(self.config.max_depth);
        match target {
            Type::Record(record) => walk
                .record(value, *record, field_types.as_ref())
                .map(Param::Object),
            other => walk.value(value, Some(other), field_types.as_ref()),
        }
    }
}

/// Rebuild a `T` with default settings.
pub fn deserialize<T: Deserializable>(
    form: impl Into<Value>,
    field_types: Option<FieldTypes>,
) -> Result<T, DeserializeError> {
    Deserializer::default().deserialize(form, field_types)
}

/// State of one deserialize call.
struct Walk {
    max_depth: usize,
    path: Vec<String>,
}

impl Walk {
    fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            path: Vec::new(),
        }
    }

    fn location(&self) -> String {
        display_path(&self.path)
    }

    fn check_depth(&self) -> Result<(), DeserializeError> {
        if self.path.len() > self.max_depth {
            return Err(DeserializeError::MaxDepthExceeded {
                max_depth: self.max_depth,
                path: self.location(),
            });
        }
        Ok(())
    }

    fn record(
        &mut self,
        value: Value,
        record: RecordType,
        field_types: Option<&FieldTypes>,
    ) -> Result<Box<dyn Any>, DeserializeError> {
        self.check_depth()?;
        let mut form = match value {
            Value::Object(form) => form,
            other => {
                return Err(DeserializeError::NotSerializable {
                    path: self.location(),
                    reason: format!(
                        "expected an object to construct {}, found {}",
                        record.name(),
                        value_kind(&other)
                    ),
                })
            }
        };
        strip_schema_key(&mut form);

        let hints = record.type_hints();
        let mut params = record.parameters();
        for (key, value) in form {
            let declared = field_types.and_then(|types| types.get(&key));
            let hinted = hints.get(&key);
            let target = hinted
                .and_then(Field::target_type)
                .or_else(|| declared.and_then(Field::target_type));
            let nested = declared
                .and_then(Field::nested_types)
                .or_else(|| hinted.and_then(Field::nested_types));

            self.path.push(key.clone());
            let param = self.value(value, target, nested);
            self.path.pop();
            params.insert(key, param?);
        }

        tracing::trace!(type_name = record.name(), path = %self.location(), "constructing");
        Ok(record.construct(params)?)
    }

    fn value(
        &mut self,
        value: Value,
        target: Option<&Type>,
        nested: Option<&FieldTypes>,
    ) -> Result<Param, DeserializeError> {
        match value {
            Value::Object(map) => match target {
                None | Some(Type::Any) => Ok(Param::Value(Value::Object(map))),
                Some(Type::Record(record)) => self
                    .record(Value::Object(map), *record, nested)
                    .map(Param::Object),
                Some(sequence @ Type::Sequence(_)) => Err(DeserializeError::NotSerializable {
                    path: self.location(),
                    reason: format!("expected a sequence for {sequence}, found object"),
                }),
            },
            Value::Array(items) => {
                let element = extract_element_type(target).map_err(|source| {
                    DeserializeError::UnsupportedType {
                        path: self.location(),
                        source,
                    }
                })?;
                self.check_depth()?;
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    if item.is_null() {
                        continue;
                    }
                    self.path.push(index.to_string());
                    let param = self.value(item, Some(element), nested);
                    self.path.pop();
                    out.push(param?);
                }
                Ok(Param::List(out))
            }
            scalar => Ok(Param::Value(scalar)),
        }
    }
}
