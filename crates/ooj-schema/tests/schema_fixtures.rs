//! Integration test: every schema under `tests/fixtures/` loads, dumps back
//! byte for byte, and validates the forms it is meant to describe,
//! including forms that cross `$ref`s between sibling schema files.

use std::path::{Path, PathBuf};

use ooj_schema::{validate, SchemaDocument, SchemaError, SchemaValidator};
use serde_json::json;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn schema_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.to_string_lossy().ends_with(".schema.json"))
        .collect();
    files.sort();
    files
}

#[test]
fn test_all_fixtures_load_and_dump_identically() {
    let files = schema_files(&fixtures_dir());
    assert_eq!(files.len(), 3, "fixtures: {files:?}");

    let out = tempfile::tempdir().unwrap();
    for path in files {
        let doc = SchemaDocument::load(&path)
            .unwrap_or_else(|e| panic!("{} failed to load: {e}", path.display()));
        let dumped = out.path().join(path.file_name().unwrap());
        doc.dump(&dumped).unwrap();
        assert_eq!(
            std::fs::read_to_string(&dumped).unwrap(),
            std::fs::read_to_string(&path).unwrap(),
            "{} did not round-trip",
            path.display()
        );
    }
}

#[test]
fn test_draft_versions_from_fixtures() {
    let person = SchemaDocument::load(fixture("person.schema.json")).unwrap();
    assert_eq!(person.draft_version(), "draft-07");
    assert_eq!(person.required(), ["name", "age"]);

    let ticket = SchemaDocument::load(fixture("ticket.schema.json")).unwrap();
    assert_eq!(ticket.draft_version(), "2020-12");
}

#[test]
fn test_cross_file_refs_are_enforced() {
    let validator = SchemaValidator::from_path(fixture("ticket.schema.json")).unwrap();
    let good = json!({
        "seat": "a18",
        "persons": [
            {"name": "Mike", "age": 29, "pet": {"name": "Dog"}},
            {"name": "Kitty", "age": 13}
        ]
    });
    validator.validate(&good).unwrap();

    let bad_pet = json!({
        "seat": "a18",
        "persons": [{"name": "Mike", "age": 29, "pet": {}}]
    });
    match validator.validate(&bad_pet).unwrap_err() {
        SchemaError::ValidationFailed { violations, .. } => {
            assert!(violations
                .violations()
                .iter()
                .any(|v| v.instance_path == "/persons/0/pet"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_one_shot_validate() {
    let err = validate(&json!({"name": "Mike", "age": -1}), fixture("person.schema.json"))
        .unwrap_err();
    assert!(err.is_validation_exception());
    assert!(err.to_string().contains("Person") || err.to_string().contains("person.schema.json"));
}

#[test]
fn test_remote_ref_is_not_fetched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remote.schema.json");
    std::fs::write(
        &path,
        r#"{"title": "R", "properties": {"x": {"$ref": "https://example.invalid/x.json"}}}"#,
    )
    .unwrap();
    let err = SchemaValidator::from_path(&path).unwrap_err();
    assert!(err.is_schema_exception(), "{err}");
}
