//! # Validate Subcommand
//!
//! Reads a JSON document, walks it through the serializer as a tree, and
//! validates the resulting form against a schema file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use ooj_core::{strip_schema_key, JsonFile, RootTree};
use ooj_serializer::{SerializeError, Serializer, SerializerConfig};
use serde_json::Value;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON document to validate.
    pub document: PathBuf,

    /// Schema to validate against. Defaults to the document's `$schema`,
    /// resolved relative to the document.
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Execute the validate subcommand. Returns 0 when the document conforms,
/// 1 when it does not.
pub fn run_validate(args: &ValidateArgs, config: &SerializerConfig) -> Result<u8> {
    let document = JsonFile::new(&args.document)
        .read()
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let mut form = match document {
        Value::Object(form) => form,
        _ => bail!("{} is not a JSON object", args.document.display()),
    };

    let embedded = strip_schema_key(&mut form);
    let schema_path = match (&args.schema, embedded) {
        (Some(path), _) => path.clone(),
        (None, Some(Value::String(reference))) => resolve_reference(&args.document, &reference),
        (None, Some(_)) => bail!("'$schema' in {} is not a string", args.document.display()),
        (None, None) => bail!(
            "{} has no '$schema' reference; pass --schema",
            args.document.display()
        ),
    };
    tracing::info!(
        document = %args.document.display(),
        schema = %schema_path.display(),
        "validating document"
    );

    let tree = RootTree::from_mapping(&form);
    match Serializer::new(config.clone()).serialize_with_schema(&tree, &schema_path) {
        Ok(_) => {
            println!("OK: {}", args.document.display());
            Ok(0)
        }
        Err(SerializeError::Schema(e)) if e.is_validation_exception() => {
            println!("FAIL: {}\n{e}", args.document.display());
            Ok(1)
        }
        Err(e) => Err(e)
            .with_context(|| format!("cannot validate against {}", schema_path.display())),
    }
}

/// Resolve a `$schema` reference relative to the document holding it.
fn resolve_reference(document: &Path, reference: &str) -> PathBuf {
    let reference = Path::new(reference);
    if reference.is_absolute() {
        return reference.to_path_buf();
    }
    match document.parent() {
        Some(dir) => dir.join(reference),
        None => reference.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ooj_schema::SchemaDocument;
    use serde_json::json;

    fn setup(dir: &Path) -> PathBuf {
        let schema = dir.join("person.schema.json");
        SchemaDocument::new("Person")
            .with_property("name", json!({"type": "string"}))
            .with_property("age", json!({"type": "integer"}))
            .with_required(["name", "age"])
            .dump(&schema)
            .unwrap();
        schema
    }

    fn args(document: PathBuf, schema: Option<PathBuf>) -> ValidateArgs {
        ValidateArgs { document, schema }
    }

    #[test]
    fn test_valid_document_with_embedded_reference() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let doc = dir.path().join("mike.json");
        JsonFile::new(&doc)
            .write(&json!({"$schema": "person.schema.json", "name": "Mike", "age": 29}))
            .unwrap();
        let code = run_validate(&args(doc, None), &SerializerConfig::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_invalid_document_exits_1() {
        let dir = tempfile::tempdir().unwrap();
        let schema = setup(dir.path());
        let doc = dir.path().join("nameless.json");
        JsonFile::new(&doc).write(&json!({"age": 29})).unwrap();
        let code = run_validate(&args(doc, Some(schema)), &SerializerConfig::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_missing_schema_reference_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("plain.json");
        JsonFile::new(&doc).write(&json!({"age": 29})).unwrap();
        assert!(run_validate(&args(doc, None), &SerializerConfig::default()).is_err());
    }

    #[test]
    fn test_non_object_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("list.json");
        JsonFile::new(&doc).write(&json!([1, 2])).unwrap();
        assert!(run_validate(&args(doc, None), &SerializerConfig::default()).is_err());
    }

    #[test]
    fn test_depth_limit_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("any.schema.json");
        SchemaDocument::new("Any").dump(&schema).unwrap();
        let doc = dir.path().join("deep.json");
        JsonFile::new(&doc)
            .write(&json!({"a": {"b": {"c": 1}}}))
            .unwrap();
        let shallow = SerializerConfig::default().with_max_depth(1);
        assert!(run_validate(&args(doc.clone(), Some(schema.clone())), &shallow).is_err());
        assert_eq!(
            run_validate(&args(doc, Some(schema)), &SerializerConfig::default()).unwrap(),
            0
        );
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(
            resolve_reference(Path::new("docs/a.json"), "s.json"),
            PathBuf::from("docs/s.json")
        );
        assert_eq!(
            resolve_reference(Path::new("docs/a.json"), "/abs/s.json"),
            PathBuf::from("/abs/s.json")
        );
    }
}
