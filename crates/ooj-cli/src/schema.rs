//! # Schema Subcommand
//!
//! Inspect and canonically format schema documents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use ooj_schema::SchemaDocument;
use serde_json::Value;

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

/// Schema operations.
#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// Print a summary of a schema document.
    Show {
        /// Schema file.
        path: PathBuf,
    },
    /// Rewrite a schema document in canonical form with a 4-space indent.
    Fmt {
        /// Schema file.
        path: PathBuf,
        /// Write here instead of overwriting the input.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    match &args.command {
        SchemaCommand::Show { path } => {
            let doc = load(path)?;
            print!("{}", summary(&doc));
            Ok(0)
        }
        SchemaCommand::Fmt { path, output } => {
            let doc = load(path)?;
            let target = output.as_ref().unwrap_or(path);
            doc.dump(target)
                .with_context(|| format!("failed to write {}", target.display()))?;
            println!("Formatted {} -> {}", path.display(), target.display());
            Ok(0)
        }
    }
}

fn load(path: &Path) -> Result<SchemaDocument> {
    SchemaDocument::load(path).with_context(|| format!("failed to load schema {}", path.display()))
}

/// Human-readable summary printed by `schema show`.
fn summary(doc: &SchemaDocument) -> String {
    let properties: Vec<&str> = doc.properties().keys().map(String::as_str).collect();
    let kind = match doc.kind() {
        Value::String(kind) => kind.clone(),
        Value::Array(kinds) => kinds
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" | "),
        other => other.to_string(),
    };
    format!(
        "title:      {}\ntype:       {}\ndraft:      {}\nproperties: {}\nrequired:   {}\n",
        doc.title(),
        kind,
        doc.draft_version(),
        properties.join(", "),
        doc.required().join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary() {
        let doc = SchemaDocument::new("P")
            .with_property("age", json!({"type": "integer"}))
            .with_required(["age"]);
        let text = summary(&doc);
        assert!(text.contains("title:      P\n"));
        assert!(text.contains("draft:      draft-07\n"));
        assert!(text.contains("required:   age\n"));
    }

    #[test]
    fn test_summary_of_union_type() {
        let doc = SchemaDocument::new("Maybe").with_kind(json!(["object", "null"]));
        assert!(summary(&doc).contains("type:       object | null\n"));
    }

    #[test]
    fn test_fmt_canonicalizes_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("p.json");
        std::fs::write(
            &src,
            r#"{"required":["age"],"title":"P","properties":{"age":{"type":"integer"}},"$schema":"http://json-schema.org/draft-07/schema#"}"#,
        )
        .unwrap();
        let out = dir.path().join("p.fmt.json");
        let args = SchemaArgs {
            command: SchemaCommand::Fmt {
                path: src.clone(),
                output: Some(out.clone()),
            },
        };
        assert_eq!(run_schema(&args).unwrap(), 0);
        let formatted = std::fs::read_to_string(&out).unwrap();
        assert!(formatted.starts_with(concat!(
            "{\n",
            "    \"$schema\": \"http://json-schema.org/draft-07/schema#\",\n",
            "    \"title\": \"P\",\n",
            "    \"type\": \"object\"",
        )));
        assert_eq!(
            SchemaDocument::load(&out).unwrap(),
            SchemaDocument::load(&src).unwrap()
        );
    }

    #[test]
    fn test_show_rejects_invalid_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"title": "P", "type": 5}"#).unwrap();
        let args = SchemaArgs {
            command: SchemaCommand::Show { path },
        };
        assert!(run_schema(&args).is_err());
    }
}
