//! OpenRPC Build CLI
//!
//! Builds the assembled/flattened OpenRPC artifacts and validates the final
//! document.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use openrpc_build::{build, check, load_document, BuildConfig, ValidateError};

#[derive(Parser)]
#[command(name = "openrpc-build")]
#[command(about = "Assemble, flatten and validate the Ethereum OpenRPC document")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate fragments and write the intermediate and final documents
    Build {
        /// Directory of per-method fragment files (JSON or YAML)
        #[arg(long, default_value = "src/eth")]
        methods_dir: PathBuf,

        /// Directory of per-schema fragment files (JSON or YAML)
        #[arg(long, default_value = "src/schemas")]
        schemas_dir: PathBuf,

        /// Directory of plain-text description overlays
        #[arg(long)]
        descriptions_dir: Option<PathBuf>,

        /// Sort methods by name before assembling
        #[arg(long)]
        sort: bool,

        /// Intermediate document path (refs and allOf intact)
        #[arg(long, default_value = "openrpc.json")]
        intermediate: PathBuf,

        /// Final document path (dereferenced and flattened)
        #[arg(long, default_value = "refs-openrpc.json")]
        output: PathBuf,
    },

    /// Validate a final document against the OpenRPC meta-schema
    Validate {
        /// Document to check
        document: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            methods_dir,
            schemas_dir,
            descriptions_dir,
            sort,
            intermediate,
            output,
        } => run_build(BuildConfig {
            methods_dir,
            schemas_dir,
            descriptions_dir,
            sort,
            intermediate_path: intermediate,
            output_path: output,
        }),

        Commands::Validate { document } => run_validate(&document),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_build(config: BuildConfig) -> Result<(), u8> {
    let output = build(&config).map_err(|e| {
        eprintln!("Build failed: {}", e);
        e.exit_code() as u8
    })?;

    println!(
        "Assembled {} methods and {} schemas ({})",
        output.method_count,
        output.schema_count,
        if output.namespaces.is_empty() {
            "no namespaces".to_string()
        } else {
            format!("namespaces: {}", output.namespaces.join(", "))
        }
    );
    println!("Wrote {}", config.intermediate_path.display());
    println!("Wrote {}", config.output_path.display());
    Ok(())
}

fn run_validate(path: &std::path::Path) -> Result<(), u8> {
    let doc = load_document(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let failures = check(&doc);
    if failures.is_empty() {
        println!("OpenRPC spec validated successfully.");
        return Ok(());
    }

    let mut exit = 1u8;
    for failure in &failures {
        eprintln!("{}", error_kind(failure));
        match failure {
            ValidateError::MetaSchema { errors } | ValidateError::DanglingRefs { errors } => {
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            other => eprintln!("  {}", other),
        }
        exit = exit.max(failure.exit_code() as u8);
    }
    Err(exit)
}

/// Error kind name for the diagnostic header.
fn error_kind(error: &ValidateError) -> &'static str {
    match error {
        ValidateError::Build(_) => "BuildError",
        ValidateError::MetaSchema { .. } => "MetaSchemaError",
        ValidateError::DanglingRefs { .. } => "DanglingRefError",
        ValidateError::Parse { .. } => "ParseError",
        ValidateError::InvalidMetaSchema { .. } => "InvalidMetaSchemaError",
    }
}
