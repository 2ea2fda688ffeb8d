//! # JSON File Wrapper
//!
//! Whole-document reads and writes of JSON files, plus key-path access to
//! nested mappings. Every operation opens, reads or writes, and closes the
//! file within the call; nothing is held open between calls.
//!
//! Documents are written pretty-printed with a fixed indent (4 spaces by
//! default) so that dumps are byte-stable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::FileError;

/// Indent used for every document written by ooj.
pub const DEFAULT_INDENT: usize = 4;

/// Pretty-print a value with the given indent width.
pub fn to_pretty_string(value: &Value, indent: usize) -> Result<String, serde_json::Error> {
    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// A JSON document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFile {
    path: PathBuf,
    indent: usize,
}

impl JsonFile {
    /// A handle for the document at `path`. Does not touch the filesystem.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            indent: DEFAULT_INDENT,
        }
    }

    /// Use a different indent width when writing.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Indent width used when writing.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// True if the document exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the document as `{}`, creating parent directories as needed.
    pub fn create(&self) -> Result<(), FileError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        self.write(&Value::Object(Map::new()))
    }

    /// Create the document unless it already exists.
    pub fn create_if_not_exists(&self) -> Result<(), FileError> {
        if self.exists() {
            return Ok(());
        }
        self.create()
    }

    /// Read and parse the whole document.
    pub fn read(&self) -> Result<Value, FileError> {
        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&content).map_err(|source| FileError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the whole document.
    pub fn write(&self, value: &Value) -> Result<(), FileError> {
        let mut content =
            to_pretty_string(value, self.indent).map_err(|source| FileError::Parse {
                path: self.path.clone(),
                source,
            })?;
        content.push('\n');
        fs::write(&self.path, content).map_err(|source| self.io_error(source))?;
        tracing::trace!(path = %self.path.display(), "wrote JSON document");
        Ok(())
    }

    /// Reset the document to `{}`.
    pub fn clear(&self) -> Result<(), FileError> {
        self.write(&Value::Object(Map::new()))
    }

    /// Delete the document from disk.
    pub fn delete(&self) -> Result<(), FileError> {
        fs::remove_file(&self.path).map_err(|source| self.io_error(source))
    }

    /// Value at a key path such as `["owner", "name"]`.
    pub fn get_value(&self, key_path: &[&str]) -> Result<Value, FileError> {
        let (last, parents) = key_path
            .split_last()
            .ok_or_else(|| FileError::EmptyKeyPath {
                path: self.path.clone(),
            })?;
        let document = self.read()?;
        let mut current = self.as_mapping(&document, "(root)")?;
        for key in parents {
            let next = current.get(*key).ok_or_else(|| self.key_not_found(key))?;
            current = self.as_mapping(next, key)?;
        }
        current
            .get(*last)
            .cloned()
            .ok_or_else(|| self.key_not_found(last))
    }

    /// Set the value at a key path, creating intermediate mappings (and
    /// replacing non-mapping intermediates) as needed.
    pub fn set_value(&self, key_path: &[&str], value: Value) -> Result<(), FileError> {
        let (last, parents) = key_path
            .split_last()
            .ok_or_else(|| FileError::EmptyKeyPath {
                path: self.path.clone(),
            })?;
        let mut document = self.read()?;
        let mut current = match &mut document {
            Value::Object(map) => map,
            _ => return Err(self.not_a_mapping("(root)")),
        };
        for key in parents {
            let slot = current
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => return Err(self.not_a_mapping(key)),
            };
        }
        current.insert(last.to_string(), value);
        self.write(&document)
    }

    /// Remove the key at a key path.
    pub fn remove_key(&self, key_path: &[&str]) -> Result<Value, FileError> {
        let (last, parents) = key_path
            .split_last()
            .ok_or_else(|| FileError::EmptyKeyPath {
                path: self.path.clone(),
            })?;
        let mut document = self.read()?;
        let mut current = match &mut document {
            Value::Object(map) => map,
            _ => return Err(self.not_a_mapping("(root)")),
        };
        for key in parents {
            current = match current.get_mut(*key) {
                Some(Value::Object(map)) => map,
                Some(_) => return Err(self.not_a_mapping(key)),
                None => return Err(self.key_not_found(key)),
            };
        }
        let removed = current
            .shift_remove(*last)
            .ok_or_else(|| self.key_not_found(last))?;
        self.write(&document)?;
        Ok(removed)
    }

    fn as_mapping<'v>(
        &self,
        value: &'v Value,
        key: &str,
    ) -> Result<&'v Map<String, Value>, FileError> {
        value.as_object().ok_or_else(|| self.not_a_mapping(key))
    }

    fn io_error(&self, source: std::io::Error) -> FileError {
        FileError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn key_not_found(&self, key: &str) -> FileError {
        FileError::KeyNotFound {
            path: self.path.clone(),
            key: key.to_string(),
        }
    }

    fn not_a_mapping(&self, key: &str) -> FileError {
        FileError::NotAMapping {
            path: self.path.clone(),
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_file(dir: &tempfile::TempDir, name: &str) -> JsonFile {
        JsonFile::new(dir.path().join(name))
    }

    #[test]
    fn pretty_string_uses_requested_indent() {
        let s = to_pretty_string(&json!({"a": [1]}), 4).unwrap();
        assert_eq!(s, "{\n    \"a\": [\n        1\n    ]\n}");
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "nested/deeper/doc.json");
        assert!(!file.exists());
        file.create_if_not_exists().unwrap();
        assert!(file.exists());
        assert_eq!(file.read().unwrap(), json!({}));
    }

    #[test]
    fn create_if_not_exists_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "doc.json");
        file.write(&json!({"keep": true})).unwrap();
        file.create_if_not_exists().unwrap();
        assert_eq!(file.read().unwrap(), json!({"keep": true}));
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "doc.json");
        let doc = json!({"name": "Mike", "age": 29, "tags": ["a", "b"]});
        file.write(&doc).unwrap();
        assert_eq!(file.read().unwrap(), doc);
        let raw = std::fs::read_to_string(file.path()).unwrap();
        assert!(raw.starts_with("{\n    \"name\""));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = temp_file(&dir, "missing.json").read().unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }

    #[test]
    fn read_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "bad.json");
        std::fs::write(file.path(), "{not json").unwrap();
        assert!(matches!(file.read().unwrap_err(), FileError::Parse { .. }));
    }

    #[test]
    fn key_path_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "doc.json");
        file.create().unwrap();

        file.set_value(&["owner", "pet", "name"], json!("Dog")).unwrap();
        file.set_value(&["seat"], json!("a18")).unwrap();
        assert_eq!(file.get_value(&["owner", "pet", "name"]).unwrap(), json!("Dog"));
        assert_eq!(
            file.read().unwrap(),
            json!({"owner": {"pet": {"name": "Dog"}}, "seat": "a18"})
        );

        let removed = file.remove_key(&["owner", "pet"]).unwrap();
        assert_eq!(removed, json!({"name": "Dog"}));
        assert_eq!(file.read().unwrap(), json!({"owner": {}, "seat": "a18"}));
    }

    #[test]
    fn set_value_replaces_scalar_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "doc.json");
        file.write(&json!({"owner": "nobody"})).unwrap();
        file.set_value(&["owner", "name"], json!("Jo")).unwrap();
        assert_eq!(file.read().unwrap(), json!({"owner": {"name": "Jo"}}));
    }

    #[test]
    fn get_value_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "doc.json");
        file.write(&json!({"seat": "a18"})).unwrap();
        assert!(matches!(
            file.get_value(&["missing"]).unwrap_err(),
            FileError::KeyNotFound { ref key, .. } if key == "missing"
        ));
        assert!(matches!(
            file.get_value(&["seat", "row"]).unwrap_err(),
            FileError::NotAMapping { ref key, .. } if key == "seat"
        ));
        assert!(matches!(
            file.get_value(&[]).unwrap_err(),
            FileError::EmptyKeyPath { .. }
        ));
    }

    #[test]
    fn clear_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "doc.json");
        file.write(&json!({"a": 1})).unwrap();
        file.clear().unwrap();
        assert_eq!(file.read().unwrap(), json!({}));
        file.delete().unwrap();
        assert!(!file.exists());
    }
}
