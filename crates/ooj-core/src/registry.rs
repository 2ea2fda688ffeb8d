//! # Type Registry
//!
//! Maps type names to [`RecordType`] handles so that field-type maps can be
//! written as data (configuration files, JSON documents) instead of Rust
//! code.
//!
//! ## Type Expressions
//!
//! | Expression                      | Type                       |
//! |---------------------------------|----------------------------|
//! | `any`, `Any`                    | [`Type::Any`]              |
//! | `Person`, `my_app::Person`      | [`Type::Record`]           |
//! | `list[E]`, `List[E]`, `Vec<E>`  | [`Type::Sequence`] of `E`  |
//! | `tuple[E]`, `Tuple[E]`          | [`Type::Sequence`] of `E`  |
//!
//! ## Type Maps as Data
//!
//! A type map is a JSON object from field name to either a type expression
//! or a descriptor object `{"type": expr, "types": {...}}` whose `types` is
//! itself a type map. Anything other than an object (or absent/`null`) in
//! place of a type map is rejected with [`TypeError::InvalidTypeMap`].

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::error::TypeError;
use crate::field::{Field, FieldTypes, RecordType, Type};
use crate::form::value_kind;
use crate::record::Deserializable;

/// Sequence type constructors, as `(opening, closing)` delimiters.
const SEQUENCE_FORMS: [(&str, char); 5] = [
    ("list[", ']'),
    ("List[", ']'),
    ("tuple[", ']'),
    ("Tuple[", ']'),
    ("Vec<", '>'),
];

/// Registry of record types addressable by name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_path: HashMap<&'static str, RecordType>,
    by_name: HashMap<&'static str, RecordType>,
    ambiguous_names: HashSet<&'static str>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its short name and its full type path.
    pub fn register<T: Deserializable>(&mut self) -> &mut Self {
        self.register_record(RecordType::of::<T>());
        self
    }

    /// Register a record type. Returns `false` if it was already registered.
    pub fn register_record(&mut self, record: RecordType) -> bool {
        if self.by_path.contains_key(record.type_path()) {
            return false;
        }
        self.by_path.insert(record.type_path(), record);

        let name = record.name();
        if !self.ambiguous_names.contains(name) {
            if self.by_name.remove(name).is_some() {
                self.ambiguous_names.insert(name);
            } else {
                self.by_name.insert(name, record);
            }
        }
        tracing::trace!(type_path = record.type_path(), "registered record type");
        true
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Look up a record type by full type path or short name.
    pub fn get(&self, name: &str) -> Result<RecordType, TypeError> {
        if let Some(record) = self.by_path.get(name).or_else(|| self.by_name.get(name)) {
            return Ok(*record);
        }
        if self.ambiguous_names.contains(name) {
            return Err(TypeError::AmbiguousType {
                name: name.to_string(),
            });
        }
        Err(TypeError::UnknownType {
            name: name.to_string(),
        })
    }

    /// Parse a type expression.
    pub fn resolve(&self, expr: &str) -> Result<Type, TypeError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(malformed(expr, "empty type expression"));
        }
        if trimmed == "any" || trimmed == "Any" {
            return Ok(Type::Any);
        }
        for (open, close) in SEQUENCE_FORMS {
            if let Some(rest) = trimmed.strip_prefix(open) {
                let inner = rest
                    .strip_suffix(close)
                    .ok_or_else(|| malformed(expr, &format!("missing closing '{close}'")))?;
                return Ok(Type::sequence(self.resolve(inner)?));
            }
        }
        if trimmed.contains(['[', ']', '<', '>']) {
            return Err(malformed(expr, "unsupported type constructor"));
        }
        self.get(trimmed).map(Type::Record)
    }

    /// Build a [`FieldTypes`] map from its JSON description.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidTypeMap`] if `value` (or a nested `types`) is
    /// present but not an object; resolution errors for bad type expressions.
    pub fn field_types_from_value(&self, value: Option<&Value>) -> Result<FieldTypes, TypeError> {
        match value {
            None | Some(Value::Null) => Ok(FieldTypes::new()),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, descriptor)| {
                    Ok((name.clone(), self.field_from_value(name, descriptor)?))
                })
                .collect(),
            Some(other) => Err(TypeError::InvalidTypeMap {
                found: value_kind(other).to_string(),
            }),
        }
    }

    fn field_from_value(&self, name: &str, descriptor: &Value) -> Result<Field, TypeError> {
        match descriptor {
            Value::Null => Ok(Field::untyped()),
            Value::String(expr) => Ok(Field::new(self.resolve(expr)?)),
            Value::Object(parts) => {
                let target_type = match parts.get("type") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(expr)) => Some(self.resolve(expr)?),
                    Some(other) => {
                        return Err(malformed(
                            &other.to_string(),
                            &format!("'type' of field '{name}' must be a string"),
                        ))
                    }
                };
                let nested_types = match parts.get("types") {
                    None | Some(Value::Null) => None,
                    Some(types) => Some(self.field_types_from_value(Some(types))?),
                };
                Ok(Field::from_parts(target_type, nested_types))
            }
            other => Err(malformed(
                &other.to_string(),
                &format!("field '{name}' must map to a type expression or a descriptor object"),
            )),
        }
    }
}

fn malformed(expr: &str, reason: &str) -> TypeError {
    TypeError::MalformedTypeExpr {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstructionError;
    use crate::params::Parameters;
    use serde_json::json;

    struct Person;
    struct Pet;

    impl Deserializable for Person {
        fn construct(_: &mut Parameters) -> Result<Self, ConstructionError> {
            Ok(Person)
        }
    }

    impl Deserializable for Pet {
        fn construct(_: &mut Parameters) -> Result<Self, ConstructionError> {
            Ok(Pet)
        }
    }

    mod other {
        use super::*;

        pub struct Person;

        impl Deserializable for Person {
            fn construct(_: &mut Parameters) -> Result<Self, ConstructionError> {
                Ok(Person)
            }
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Person>().register::<Pet>();
        registry
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = registry();
        assert!(!registry.register_record(RecordType::of::<Person>()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_by_short_name_and_path() {
        let registry = registry();
        let by_name = registry.get("Person").unwrap();
        let by_path = registry.get(by_name.type_path()).unwrap();
        assert_eq!(by_name, by_path);
        assert!(matches!(
            registry.get("Ghost").unwrap_err(),
            TypeError::UnknownType { .. }
        ));
    }

    #[test]
    fn duplicate_short_names_are_ambiguous() {
        let mut registry = registry();
        registry.register::<other::Person>();
        assert_eq!(
            registry.get("Person").unwrap_err(),
            TypeError::AmbiguousType {
                name: "Person".to_string()
            }
        );
        let path = RecordType::of::<other::Person>().type_path();
        assert_eq!(registry.get(path).unwrap(), RecordType::of::<other::Person>());
    }

    #[test]
    fn resolve_expressions() {
        let registry = registry();
        assert_eq!(registry.resolve("any").unwrap(), Type::Any);
        assert_eq!(registry.resolve(" Pet ").unwrap(), Type::record::<Pet>());
        assert_eq!(registry.resolve("list[Person]").unwrap(), Type::list_of::<Person>());
        assert_eq!(registry.resolve("Tuple[Person]").unwrap(), Type::list_of::<Person>());
        assert_eq!(
            registry.resolve("Vec<list[Pet]>").unwrap(),
            Type::sequence(Type::list_of::<Pet>())
        );
    }

    #[test]
    fn resolve_malformed_expressions() {
        let registry = registry();
        for expr in ["", "list[Person", "dict[str, Person]", "Vec<Pet"] {
            assert!(
                matches!(registry.resolve(expr), Err(TypeError::MalformedTypeExpr { .. })),
                "expected malformed for {expr:?}"
            );
        }
    }

    #[test]
    fn field_types_from_json() {
        let registry = registry();
        let types = registry
            .field_types_from_value(Some(&json!({
                "persons": {"type": "list[Person]", "types": {"pet": "Pet"}},
                "seat": null,
                "data": "any"
            })))
            .unwrap();
        let persons = types.get("persons").unwrap();
        assert_eq!(persons.target_type(), Some(&Type::list_of::<Person>()));
        assert_eq!(
            persons.nested_types().and_then(|t| t.get("pet")).and_then(Field::target_type),
            Some(&Type::record::<Pet>())
        );
        assert_eq!(types.get("seat"), Some(&Field::untyped()));
        assert_eq!(types.get("data").and_then(Field::target_type), Some(&Type::Any));
    }

    #[test]
    fn absent_type_map_is_empty() {
        let registry = registry();
        assert!(registry.field_types_from_value(None).unwrap().is_empty());
        assert!(registry.field_types_from_value(Some(&Value::Null)).unwrap().is_empty());
    }

    #[test]
    fn non_mapping_type_map_is_rejected() {
        let registry = registry();
        assert_eq!(
            registry.field_types_from_value(Some(&json!(["Person"]))).unwrap_err(),
            TypeError::InvalidTypeMap {
                found: "array".to_string()
            }
        );
        let nested = json!({"persons": {"type": "list[Person]", "types": "Pet"}});
        assert_eq!(
            registry.field_types_from_value(Some(&nested)).unwrap_err(),
            TypeError::InvalidTypeMap {
                found: "string".to_string()
            }
        );
    }

    #[test]
    fn unknown_type_in_map() {
        let registry = registry();
        let err = registry
            .field_types_from_value(Some(&json!({"pet": "Cat"})))
            .unwrap_err();
        assert_eq!(
            err,
            TypeError::UnknownType {
                name: "Cat".to_string()
            }
        );
    }
}
