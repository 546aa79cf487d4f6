//! # zodcast
//!
//! Generate TypeScript Zod schemas from Go type manifests.
//!
//! ## Usage
//!
//! ```bash
//! # Generate schemas from manifests under ./types
//! zodcast generate --input ./types
//!
//! # Generate into a specific directory with prefixed names
//! zodcast generate --output ./web/src/generated --prefix Api
//!
//! # Preview without writing
//! zodcast generate --dry-run
//!
//! # Initialize configuration
//! zodcast init
//!
//! # Check that generated schemas are current (exit code 2 when stale)
//! zodcast validate --path ./generated/schemas.ts
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use zodcast::FieldNaming;
use zodcast_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::{CliError, CliResult},
    generator::{GeneratedOutput, SchemaGenerator},
    load_manifests, logging,
    scanner::ManifestScanner,
    writer::{is_up_to_date, FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "zodcast")]
#[command(author, version, about = "Generate TypeScript Zod schemas from Go type manifests", long_about = None)]
struct Cli {
    /// Show debug logs on stderr (overridden by ZODCAST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript Zod schemas from manifest files
    Generate {
        /// Directory containing JSON / TOML manifests
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for the generated TypeScript file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview output without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only load manifests whose relative path matches this glob
        #[arg(long)]
        filter: Option<String>,

        /// Prefix for every schema and type name
        #[arg(long)]
        prefix: Option<String>,

        /// Naming convention for fields without a JSON name
        #[arg(long)]
        field_naming: Option<FieldNaming>,

        /// Fail on custom-marshalling types without a schema override
        #[arg(long)]
        strict: bool,

        /// Omit the `import { z } from "zod"` header
        #[arg(long)]
        no_import: bool,
    },

    /// Initialize a new zodcast configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "zodcast.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated schemas are up-to-date
    Validate {
        /// Path to generated schemas file
        #[arg(short, long)]
        path: PathBuf,

        /// Directory containing JSON / TOML manifests
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only load manifests whose relative path matches this glob
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            dry_run,
            config,
            filter,
            prefix,
            field_naming,
            strict,
            no_import,
        } => {
            let args = CliArgs {
                output,
                prefix,
                field_naming,
                strict_custom_schemas: strict.then_some(true),
                include_import: no_import.then_some(false),
                ..Default::default()
            };
            cmd_generate(&input, config.as_deref(), filter.as_deref(), &args, dry_run)
        }

        Commands::Init { output, force } => cmd_init(&output, force),

        Commands::Validate {
            path,
            input,
            config,
            filter,
        } => cmd_validate(&path, &input, config.as_deref(), filter.as_deref()),
    }
}

/// Scan, load and convert. `None` when there is nothing to generate.
fn build(input: &Path, config: &Config, filter: Option<&str>) -> CliResult<Option<GeneratedOutput>> {
    println!("{}", "Scanning for manifests...".cyan());

    let mut scanner = ManifestScanner::new(input);
    if let Some(pattern) = filter {
        scanner = scanner.with_filter(pattern)?;
    }

    let files = scanner.scan_allow_empty()?;
    if files.is_empty() {
        println!("{}", "No manifest files found.".yellow());
        return Ok(None);
    }
    println!("  Found {} manifest(s)", files.len().to_string().green());

    let loaded = load_manifests(&files)?;
    if loaded.roots.is_empty() {
        println!("{}", "No root types declared.".yellow());
        return Ok(None);
    }
    println!(
        "  Loaded {} type(s), {} root(s)",
        loaded.types.len().to_string().green(),
        loaded.roots.len().to_string().green()
    );

    println!("{}", "Generating Zod schemas...".cyan());
    let output = SchemaGenerator::new(config.clone()).generate(&loaded)?;
    println!(
        "  Generated {} schema(s)",
        output.schemas.len().to_string().green()
    );

    Ok(Some(output))
}

fn cmd_generate(
    input: &Path,
    config_path: Option<&Path>,
    filter: Option<&str>,
    args: &CliArgs,
    dry_run: bool,
) -> CliResult<()> {
    let config = ConfigManager::merge_cli_args(ConfigManager::load(config_path)?, args);

    let Some(output) = build(input, &config, filter)? else {
        return Ok(());
    };

    let writer = FileWriter::new(dry_run);
    match writer.write(&config.output_path(), &output.content)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::Unchanged { path } => {
            println!("{} {} is up to date", "✓".green(), path.display());
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

fn cmd_init(output: &Path, force: bool) -> CliResult<()> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

fn cmd_validate(
    schema_path: &Path,
    input: &Path,
    config_path: Option<&Path>,
    filter: Option<&str>,
) -> CliResult<()> {
    println!("{}", "Validating schemas...".cyan());

    if !schema_path.exists() {
        return Err(CliError::Validation(format!(
            "Schema file not found: {}",
            schema_path.display()
        )));
    }
    let existing = std::fs::read_to_string(schema_path)?;

    let config = ConfigManager::load(config_path)?;
    let generated = build(input, &config, filter)?
        .map(|output| output.content)
        .unwrap_or_default();

    if is_up_to_date(&existing, &generated) {
        println!("{} Schemas are up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Schemas are out of date", "✗".red());
        println!("  Run 'zodcast generate' to update");
        Err(CliError::Validation("Schemas are out of date".to_string()))
    }
}

fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
