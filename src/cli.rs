use crate::error::ProcessorError;
use crate::openapi::Document;
use crate::parser::AstParser;
use crate::processor::Processor;
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;

/// Generate an OpenAPI 3.0 document from `@` annotations in Rust doc comments
#[derive(Parser, Debug)]
#[command(name = "openapi-from-comments")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Project directory (or single source file) to scan
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Emit the document even when some annotations failed
    #[arg(long = "allow-errors")]
    pub allow_errors: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// The annotation errors of a failed run.
#[derive(Debug)]
pub struct RunError {
    pub errors: Vec<ProcessorError>,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failed to process {} annotation(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for RunError {}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Scans, parses and processes every source file below `project_path`.
///
/// Files that fail to parse are skipped with a warning. The returned document is
/// complete even when annotation errors were found.
pub fn generate(project_path: &std::path::Path) -> Result<(Document, Vec<ProcessorError>)> {
    info!("Scanning project directory...");
    let scan_result = FileScanner::new(project_path.to_path_buf()).scan()?;
    info!("Found {} Rust files", scan_result.rust_files.len());

    if scan_result.rust_files.is_empty() {
        warn!("No Rust files found in {}", project_path.display());
    }

    info!("Parsing Rust files...");
    let mut processor = Processor::new();
    let mut parsed_count = 0;
    for parsed in AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .flatten()
    {
        parsed_count += 1;
        processor.process_declarations(&parsed.declarations);
    }
    info!("Processed {} files", parsed_count);

    Ok(processor.finish())
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    let (document, errors) = generate(&args.project_path)?;

    if !errors.is_empty() {
        if !args.allow_errors {
            return Err(RunError { errors }.into());
        }
        warn!(
            "Emitting document despite {} annotation error(s)",
            errors.len()
        );
    }

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("  - Paths: {}", document.paths.len());
    info!("  - Annotation errors: {}", errors.len());

    Ok(())
}
