//! # Serialized Form
//!
//! The JSON-compatible mapping produced by the serializer and consumed by
//! the deserializer. Key order is insertion order (`serde_json` is built
//! with `preserve_order`), so a `$schema` tag inserted first stays first.
//!
//! ## Reserved Key
//!
//! [`SCHEMA_KEY`] holds a reference to the schema document a form was
//! validated against. It is data about the form, not a field of the
//! object, and is removed by [`strip_schema_key`] before reconstruction.
//! No other code path treats it specially.

use serde_json::{Map, Value};

/// A serialized object: string keys to JSON-compatible values.
pub type SerializedForm = Map<String, Value>;

/// Reserved key carrying the schema reference of a serialized form.
pub const SCHEMA_KEY: &str = "$schema";

/// Remove the reserved `$schema` key, returning its value if it was present.
pub fn strip_schema_key(form: &mut SerializedForm) -> Option<Value> {
    form.shift_remove(SCHEMA_KEY)
}

/// Name of a value's JSON kind, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Join JSON-pointer segments into a display path (`(root)` when empty).
pub fn display_path(segments: &[String]) -> String {
    if segments.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    }
    out
}
