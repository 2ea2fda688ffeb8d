//! # Serialization Capabilities
//!
//! Types opt into the engines explicitly instead of being discovered by
//! reflection:
//!
//! - [`Serializable`] lists an object's fields, in order, as [`FieldValue`]s.
//!   The serializer classifies each one as array-like, object-like, or scalar
//!   from the variant alone.
//! - [`Deserializable`] declares constructor-parameter type hints and a
//!   constructor taking named [`Parameters`].
//!
//! ```
//! use ooj_core::{
//!     ConstructionError, Deserializable, FieldTypes, FieldValue, Fields, Parameters,
//!     Serializable, Type,
//! };
//!
//! struct Pet {
//!     name: String,
//! }
//!
//! struct Person {
//!     name: String,
//!     pets: Vec<Pet>,
//! }
//!
//! impl Serializable for Person {
//!     fn fields(&self) -> Fields<'_> {
//!         Fields::new()
//!             .with("name", self.name.as_str())
//!             .with("pets", FieldValue::objects(&self.pets))
//!     }
//! }
//!
//! impl Serializable for Pet {
//!     fn fields(&self) -> Fields<'_> {
//!         Fields::new().with("name", self.name.as_str())
//!     }
//! }
//!
//! impl Deserializable for Person {
//!     fn type_hints() -> FieldTypes {
//!         FieldTypes::new().with("pets", Type::list_of::<Pet>())
//!     }
//!
//!     fn construct(params: &mut Parameters) -> Result<Self, ConstructionError> {
//!         Ok(Self {
//!             name: params.take("name")?,
//!             pets: params.take_list_or_default("pets")?,
//!         })
//!     }
//! }
//!
//! impl Deserializable for Pet {
//!     fn construct(params: &mut Parameters) -> Result<Self, ConstructionError> {
//!         Ok(Self { name: params.take("name")? })
//!     }
//! }
//! ```

use std::borrow::Cow;

use serde_json::Value;

use crate::error::ConstructionError;
use crate::field::FieldTypes;
use crate::params::Parameters;

/// An object whose fields can be walked by the serializer.
pub trait Serializable {
    /// The object's fields, in declaration order.
    fn fields(&self) -> Fields<'_>;

    /// Name used in diagnostics and for cycle detection.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A type the deserializer can rebuild from named arguments.
pub trait Deserializable: Sized + 'static {
    /// Declared types of the constructor's parameters.
    ///
    /// A hint for a key takes precedence over the type given for that key in
    /// a caller-supplied [`FieldTypes`] map.
    fn type_hints() -> FieldTypes {
        FieldTypes::new()
    }

    /// Build an instance from resolved arguments.
    fn construct(params: &mut Parameters) -> Result<Self, ConstructionError>;
}

/// One field value as seen by the serializer.
pub enum FieldValue<'a> {
    /// Already JSON-compatible, copied as-is.
    Scalar(Value),
    /// A float, checked for JSON compatibility when serialized.
    Float(f64),
    /// A nested object, serialized recursively.
    Object(&'a dyn Serializable),
    /// An ordered sequence, each element serialized recursively.
    Array(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    /// A nested object.
    pub fn object(object: &'a dyn Serializable) -> Self {
        FieldValue::Object(object)
    }

    /// A nested object, or `null` when absent.
    pub fn optional_object<T: Serializable>(object: Option<&'a T>) -> Self {
        match object {
            Some(object) => FieldValue::Object(object),
            None => FieldValue::Scalar(Value::Null),
        }
    }

    /// A sequence of nested objects.
    pub fn objects<T: Serializable>(objects: &'a [T]) -> Self {
        FieldValue::Array(
            objects
                .iter()
                .map(|object| FieldValue::Object(object as &dyn Serializable))
                .collect(),
        )
    }

    /// A sequence of arbitrary field values.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue<'a>>,
    {
        FieldValue::Array(items.into_iter().map(Into::into).collect())
    }

    /// Name of the value's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Scalar(_) | FieldValue::Float(_) => "scalar",
            FieldValue::Object(_) => "object",
            FieldValue::Array(_) => "array",
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue<'_> {
                fn from(value: $ty) -> Self {
                    FieldValue::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, String, &str);

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue<'_> {
    fn from(value: f32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}

impl From<Value> for FieldValue<'_> {
    fn from(value: Value) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<&Value> for FieldValue<'_> {
    fn from(value: &Value) -> Self {
        FieldValue::Scalar(value.clone())
    }
}

impl<'a> From<&'a dyn Serializable> for FieldValue<'a> {
    fn from(object: &'a dyn Serializable) -> Self {
        FieldValue::Object(object)
    }
}

impl<'a, T: Into<FieldValue<'a>>> From<Option<T>> for FieldValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Scalar(Value::Null), Into::into)
    }
}

/// Ordered `(name, value)` pairs describing an object.
#[derive(Default)]
pub struct Fields<'a> {
    entries: Vec<(Cow<'a, str>, FieldValue<'a>)>,
}

impl<'a> Fields<'a> {
    /// No fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push.
    pub fn with(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<FieldValue<'a>>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<Cow<'a, str>>, value: impl Into<FieldValue<'a>>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for Fields<'a> {
    type Item = (Cow<'a, str>, FieldValue<'a>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
