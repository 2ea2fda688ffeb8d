//! # ooj CLI entry point
//!
//! Parses command-line arguments, sets up tracing, loads the engine
//! configuration, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ooj_cli::schema::{run_schema, SchemaArgs};
use ooj_cli::validate::{run_validate, ValidateArgs};
use ooj_serializer::SerializerConfig;

/// ooj: object/JSON mapping with schema validation.
#[derive(Parser, Debug)]
#[command(name = "ooj", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML engine configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON document against a schema.
    Validate(ValidateArgs),

    /// Inspect or format schema documents.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => match SerializerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::from(2);
            }
        },
        None => SerializerConfig::default(),
    };
    tracing::debug!(max_depth = config.max_depth, "engine configuration");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, &config),
        Commands::Schema(args) => run_schema(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ooj_cli::schema::SchemaCommand;

    #[test]
    fn cli_parse_validate_with_schema() {
        let cli =
            Cli::try_parse_from(["ooj", "validate", "doc.json", "--schema", "s.json"]).unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.document, PathBuf::from("doc.json"));
                assert_eq!(args.schema, Some(PathBuf::from("s.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "ooj",
            "-vv",
            "validate",
            "doc.json",
            "--config",
            "ooj.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("ooj.yaml")));
    }

    #[test]
    fn cli_parse_schema_fmt() {
        let cli = Cli::try_parse_from(["ooj", "schema", "fmt", "s.json", "--output", "o.json"])
            .unwrap();
        match cli.command {
            Commands::Schema(SchemaArgs {
                command: SchemaCommand::Fmt { path, output },
            }) => {
                assert_eq!(path, PathBuf::from("s.json"));
                assert_eq!(output, Some(PathBuf::from("o.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_schema_show() {
        let cli = Cli::try_parse_from(["ooj", "schema", "show", "s.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Schema(SchemaArgs {
                command: SchemaCommand::Show { .. }
            })
        ));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["ooj"]).is_err());
    }
}
