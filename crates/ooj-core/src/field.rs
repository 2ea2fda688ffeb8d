//! # Field Type Descriptors
//!
//! A [`Field`] declares what concrete type the deserializer should rebuild
//! for one key of a serialized form and, recursively, the field types of
//! that nested value. A [`FieldTypes`] map is what callers hand to the
//! deserializer alongside the target type.
//!
//! ## Types
//!
//! [`Type`] is the runtime stand-in for a declared field type:
//!
//! - [`Type::Any`]: a JSON-compatible value kept as-is. Not parametrized,
//!   so a sequence declared as `Any` cannot be deserialized element-wise.
//! - [`Type::Record`]: a reconstructible type, see [`RecordType`].
//! - [`Type::Sequence`]: a parametrized sequence, `list[T]`.
//!
//! ## Wrapping
//!
//! Anything convertible into a [`Field`] can be supplied where a descriptor
//! is expected. [`Field::wrap`] is idempotent: a `Field` passes through
//! unchanged, a bare [`Type`] becomes an un-nested descriptor.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ConstructionError, TypeError};
use crate::params::Parameters;
use crate::record::Deserializable;

/// Signature of a type-erased constructor.
type ConstructFn = fn(&mut Parameters) -> Result<Box<dyn Any>, ConstructionError>;

/// A type-erased handle to a [`Deserializable`] type.
///
/// Carries the type's constructor and its constructor-parameter type hints,
/// so the deserializer can rebuild instances without knowing the type
/// statically. Two handles are equal when they refer to the same Rust type.
#[derive(Clone, Copy)]
pub struct RecordType {
    name: &'static str,
    type_path: &'static str,
    type_id: TypeId,
    hints: fn() -> FieldTypes,
    construct: ConstructFn,
}

fn construct_erased<T: Deserializable>(
    params: &mut Parameters,
) -> Result<Box<dyn Any>, ConstructionError> {
    T::construct(params).map(|value| Box::new(value) as Box<dyn Any>)
}

/// Last path segment of a type path, without generic arguments.
fn short_type_name(type_path: &'static str) -> &'static str {
    let base = type_path.split('<').next().unwrap_or(type_path);
    base.rsplit("::").next().unwrap_or(base)
}

impl RecordType {
    /// Handle for the type `T`.
    pub fn of<T: Deserializable>() -> Self {
        let type_path = std::any::type_name::<T>();
        Self {
            name: short_type_name(type_path),
            type_path,
            type_id: TypeId::of::<T>(),
            hints: T::type_hints,
            construct: construct_erased::<T>,
        }
    }

    /// Short type name, e.g. `Person`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full type path, e.g. `my_app::model::Person`.
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The Rust `TypeId` of the type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Constructor-parameter type hints declared by the type.
    pub fn type_hints(&self) -> FieldTypes {
        (self.hints)()
    }

    /// An empty argument set addressed to this type's constructor.
    pub fn parameters(&self) -> Parameters {
        Parameters::new(self.name)
    }

    /// Invoke the constructor with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever [`ConstructionError`] the constructor raises, or
    /// [`ConstructionError::UnexpectedArgument`] if the constructor left any
    /// argument unconsumed.
    pub fn construct(&self, mut params: Parameters) -> Result<Box<dyn Any>, ConstructionError> {
        let instance = (self.construct)(&mut params)?;
        if let Some(name) = params.remaining().next() {
            return Err(ConstructionError::UnexpectedArgument {
                type_name: self.name.to_string(),
                name: name.to_string(),
            });
        }
        Ok(instance)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.type_path).finish()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for RecordType {}

/// A declared field type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// Any JSON-compatible value, kept as-is.
    Any,
    /// A reconstructible type.
    Record(RecordType),
    /// A parametrized sequence of the element type.
    Sequence(Box<Type>),
}

impl Type {
    /// The record type `T`.
    pub fn record<T: Deserializable>() -> Self {
        Type::Record(RecordType::of::<T>())
    }

    /// A sequence of `element`.
    pub fn sequence(element: impl Into<Type>) -> Self {
        Type::Sequence(Box::new(element.into()))
    }

    /// Shorthand for `Type::sequence(Type::record::<T>())`.
    pub fn list_of<T: Deserializable>() -> Self {
        Type::sequence(Type::record::<T>())
    }

    /// True for parametrized sequence types.
    pub fn is_parametrized(&self) -> bool {
        matches!(self, Type::Sequence(_))
    }

    /// Element type of a parametrized sequence.
    pub fn element_type(&self) -> Result<&Type, TypeError> {
        extract_element_type(Some(self))
    }
}

impl From<RecordType> for Type {
    fn from(record: RecordType) -> Self {
        Type::Record(record)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => f.write_str("any"),
            Type::Record(record) => f.write_str(record.name()),
            Type::Sequence(element) => write!(f, "list[{element}]"),
        }
    }
}

/// Element type of a parametrized sequence type.
///
/// # Errors
///
/// Returns [`TypeError::UnsupportedType`] when `target` is absent or is not
/// a [`Type::Sequence`].
pub fn extract_element_type(target: Option<&Type>) -> Result<&Type, TypeError> {
    match target {
        Some(Type::Sequence(element)) => Ok(element),
        Some(other) => Err(TypeError::UnsupportedType {
            type_name: other.to_string(),
        }),
        None => Err(TypeError::UnsupportedType {
            type_name: "none".to_string(),
        }),
    }
}

/// Type descriptor for one field: the type to rebuild, plus the field types
/// of that type's own fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    target_type: Option<Type>,
    nested_types: Option<FieldTypes>,
}

impl Field {
    /// Descriptor for `target_type` with no nested field types.
    pub fn new(target_type: impl Into<Type>) -> Self {
        Self {
            target_type: Some(target_type.into()),
            nested_types: None,
        }
    }

    /// Descriptor with no declared type.
    pub fn untyped() -> Self {
        Self::default()
    }

    /// Descriptor from an optional type and optional nested field types.
    pub fn from_parts(target_type: Option<Type>, nested_types: Option<FieldTypes>) -> Self {
        Self {
            target_type,
            nested_types,
        }
    }

    /// Attach the field types of the nested value.
    pub fn with_nested_types(mut self, nested_types: FieldTypes) -> Self {
        self.nested_types = Some(nested_types);
        self
    }

    /// Normalize a type or descriptor into a descriptor. Idempotent.
    pub fn wrap(value: impl Into<Field>) -> Field {
        value.into()
    }

    /// The declared type, if any.
    pub fn target_type(&self) -> Option<&Type> {
        self.target_type.as_ref()
    }

    /// Field types of the nested value, if declared.
    pub fn nested_types(&self) -> Option<&FieldTypes> {
        self.nested_types.as_ref()
    }

    /// Element type of the declared sequence type.
    pub fn element_type(&self) -> Result<&Type, TypeError> {
        extract_element_type(self.target_type.as_ref())
    }
}

impl From<Type> for Field {
    fn from(target_type: Type) -> Self {
        Field::new(target_type)
    }
}

impl From<RecordType> for Field {
    fn from(record: RecordType) -> Self {
        Field::new(record)
    }
}

/// Mapping from field name to [`Field`] descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldTypes {
    fields: HashMap<String, Field>,
}

impl FieldTypes {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.insert(name, field);
        self
    }

    /// Insert a descriptor, wrapping bare types.
    pub fn insert(&mut self, name: impl Into<String>, field: impl Into<Field>) -> Option<Field> {
        self.fields.insert(name.into(), Field::wrap(field))
    }

    /// Descriptor for `name`, if declared.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, descriptor)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldTypes
where
    K: Into<String>,
    V: Into<Field>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut types = FieldTypes::new();
        for (name, field) in iter {
            types.insert(name, field);
        }
        types
    }
}

/// Wrap every value of a type map into a [`Field`]. Absent is empty.
pub fn wrap_all<I, K, V>(types: Option<I>) -> FieldTypes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Field>,
{
    types.map(FieldTypes::from_iter).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;

    #[derive(Debug)]
    struct Person {
        name: String,
    }

    impl Deserializable for Person {
        fn construct(params: &mut Parameters) -> Result<Self, ConstructionError> {
            Ok(Self {
                name: params.take("name")?,
            })
        }
    }

    struct Pet;

    impl Deserializable for Pet {
        fn construct(_params: &mut Parameters) -> Result<Self, ConstructionError> {
            Ok(Pet)
        }
    }

    #[test]
    fn wrap_bare_type_has_no_nested_types() {
        let field = Field::wrap(Type::record::<Person>());
        assert_eq!(field.target_type(), Some(&Type::record::<Person>()));
        assert!(field.nested_types().is_none());
    }

    #[test]
    fn wrap_is_idempotent() {
        let once = Field::wrap(Type::list_of::<Person>());
        let twice = Field::wrap(once.clone());
        assert_eq!(once, twice);

        let nested = Field::new(Type::record::<Person>())
            .with_nested_types(FieldTypes::new().with("pet", Type::record::<Pet>()));
        assert_eq!(Field::wrap(nested.clone()), nested);
    }

    #[test]
    fn wrap_all_wraps_every_value() {
        let types = wrap_all(Some(vec![
            ("person", Field::new(Type::record::<Person>())),
            ("pets", Field::from(Type::list_of::<Pet>())),
        ]));
        assert_eq!(types.len(), 2);
        assert_eq!(
            types.get("pets").and_then(Field::target_type),
            Some(&Type::list_of::<Pet>())
        );
    }

    #[test]
    fn wrap_all_absent_is_empty() {
        let types = wrap_all::<Vec<(String, Type)>, _, _>(None);
        assert!(types.is_empty());
    }

    #[test]
    fn extract_element_type_of_sequence() {
        let field = Field::new(Type::list_of::<Person>());
        assert_eq!(field.element_type().unwrap(), &Type::record::<Person>());
    }

    #[test]
    fn extract_element_type_rejects_non_parametrized() {
        let err = Field::new(Type::record::<Person>()).element_type().unwrap_err();
        assert_eq!(
            err,
            TypeError::UnsupportedType {
                type_name: "Person".to_string()
            }
        );
        assert!(Field::new(Type::Any).element_type().is_err());
        assert!(Field::untyped().element_type().is_err());
    }

    #[test]
    fn record_type_identity_and_names() {
        let a = RecordType::of::<Person>();
        assert_eq!(a, RecordType::of::<Person>());
        assert_ne!(a, RecordType::of::<Pet>());
        assert_eq!(a.name(), "Person");
        assert!(a.type_path().ends_with("::Person"));
    }

    #[test]
    fn record_type_construct_rejects_leftover_arguments() {
        let record = RecordType::of::<Pet>();
        let mut params = record.parameters();
        params.insert_value("name", serde_json::json!("Rex"));
        let err = record.construct(params).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::UnexpectedArgument {
                type_name: "Pet".to_string(),
                name: "name".to_string()
            }
        );
    }

    #[test]
    fn record_type_construct_builds_instance() {
        let record = RecordType::of::<Person>();
        let mut params = record.parameters();
        params.insert_value("name", serde_json::json!("Mike"));
        let instance = record.construct(params).unwrap();
        let person = instance.downcast::<Person>().unwrap();
        assert_eq!(person.name, "Mike");
    }

    #[test]
    fn type_display() {
        assert_eq!(Type::Any.to_string(), "any");
        assert_eq!(
            Type::sequence(Type::list_of::<Person>()).to_string(),
            "list[list[Person]]"
        );
    }
}
