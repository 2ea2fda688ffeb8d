//! # Constructor Parameters
//!
//! The deserializer resolves every key of a serialized form into a
//! [`Param`] and hands the full set to the target type's constructor as
//! [`Parameters`]. Constructors pull their arguments out by name with the
//! typed `take*` accessors; whatever they leave behind is reported as an
//! unexpected argument by [`RecordType::construct`](crate::RecordType::construct).

use std::any::Any;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ConstructionError;
use crate::form::value_kind;

/// One resolved constructor argument.
#[derive(Debug)]
pub enum Param {
    /// A scalar, or a mapping/sequence kept as plain JSON.
    Value(Value),
    /// A reconstructed instance of a record type.
    Object(Box<dyn Any>),
    /// A deserialized sequence.
    List(Vec<Param>),
}

impl Param {
    /// Collapse into plain JSON. `None` if any reconstructed object is inside.
    pub fn into_plain_value(self) -> Option<Value> {
        match self {
            Param::Value(value) => Some(value),
            Param::Object(_) => None,
            Param::List(items) => items
                .into_iter()
                .map(Param::into_plain_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, Param::Value(Value::Null))
    }

    fn describe(&self) -> String {
        match self {
            Param::Value(value) => format!("a plain {}", value_kind(value)),
            Param::Object(_) => "a reconstructed object".to_string(),
            Param::List(_) => "a list".to_string(),
        }
    }
}

/// Named arguments for one constructor call.
#[derive(Debug)]
pub struct Parameters {
    type_name: &'static str,
    params: BTreeMap<String, Param>,
}

impl Parameters {
    /// Empty argument set for the constructor of `type_name`.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            params: BTreeMap::new(),
        }
    }

    /// Name of the type being constructed.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Add an argument, returning any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, param: Param) -> Option<Param> {
        self.params.insert(name.into(), param)
    }

    /// Add a plain JSON argument.
    pub fn insert_value(&mut self, name: impl Into<String>, value: Value) -> Option<Param> {
        self.insert(name, Param::Value(value))
    }

    /// True if an argument named `name` has not been taken yet.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of arguments not yet taken.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True if every argument has been taken.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Names of the arguments not yet taken, in sorted order.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Take a required plain argument, converting it with serde.
    pub fn take<T: DeserializeOwned>(&mut self, name: &str) -> Result<T, ConstructionError> {
        let param = self.params.remove(name).ok_or_else(|| self.missing(name))?;
        self.convert(name, param)
    }

    /// Take an optional plain argument. Absent and `null` are `None`.
    pub fn take_opt<T: DeserializeOwned>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, ConstructionError> {
        match self.params.remove(name) {
            None => Ok(None),
            Some(param) if param.is_null() => Ok(None),
            Some(param) => self.convert(name, param).map(Some),
        }
    }

    /// Take a plain argument, falling back to `T::default()` when absent or `null`.
    pub fn take_or_default<T: DeserializeOwned + Default>(
        &mut self,
        name: &str,
    ) -> Result<T, ConstructionError> {
        self.take_opt(name).map(Option::unwrap_or_default)
    }

    /// Take a required reconstructed object of type `T`.
    pub fn take_object<T: 'static>(&mut self, name: &str) -> Result<T, ConstructionError> {
        let param = self.params.remove(name).ok_or_else(|| self.missing(name))?;
        self.downcast(name, param)
    }

    /// Take an optional reconstructed object. Absent and `null` are `None`.
    pub fn take_opt_object<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, ConstructionError> {
        match self.params.remove(name) {
            None => Ok(None),
            Some(param) if param.is_null() => Ok(None),
            Some(param) => self.downcast(name, param).map(Some),
        }
    }

    /// Take a required list of reconstructed objects of type `T`.
    pub fn take_list<T: 'static>(&mut self, name: &str) -> Result<Vec<T>, ConstructionError> {
        let param = self.params.remove(name).ok_or_else(|| self.missing(name))?;
        self.downcast_list(name, param)
    }

    /// Take a list of reconstructed objects; absent and `null` are empty.
    pub fn take_list_or_default<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<Vec<T>, ConstructionError> {
        match self.params.remove(name) {
            None => Ok(Vec::new()),
            Some(param) if param.is_null() => Ok(Vec::new()),
            Some(param) => self.downcast_list(name, param),
        }
    }

    fn convert<T: DeserializeOwned>(
        &self,
        name: &str,
        param: Param,
    ) -> Result<T, ConstructionError> {
        let value = param.into_plain_value().ok_or_else(|| {
            self.invalid(name, "expected a plain value, found a reconstructed object".to_string())
        })?;
        serde_json::from_value(value).map_err(|e| self.invalid(name, e.to_string()))
    }

    fn downcast<T: 'static>(&self, name: &str, param: Param) -> Result<T, ConstructionError> {
        let expected = std::any::type_name::<T>();
        match param {
            Param::Object(object) => object
                .downcast::<T>()
                .map(|object| *object)
                .map_err(|_| {
                    self.invalid(name, format!("expected {expected}, found another type"))
                }),
            other => Err(self.invalid(
                name,
                format!("expected {expected}, found {}", other.describe()),
            )),
        }
    }

    fn downcast_list<T: 'static>(
        &self,
        name: &str,
        param: Param,
    ) -> Result<Vec<T>, ConstructionError> {
        match param {
            Param::List(items) => items
                .into_iter()
                .map(|item| self.downcast(name, item))
                .collect(),
            other => Err(self.invalid(
                name,
                format!("expected a list, found {}", other.describe()),
            )),
        }
    }

    fn missing(&self, name: &str) -> ConstructionError {
        ConstructionError::MissingArgument {
            type_name: self.type_name.to_string(),
            name: name.to_string(),
        }
    }

    fn invalid(&self, name: &str, reason: String) -> ConstructionError {
        ConstructionError::InvalidArgument {
            type_name: self.type_name.to_string(),
            name: name.to_string(),
            reason,
        }
    }
}
