//! openapi-from-comments - generate an OpenAPI document from annotated doc comments.
//!
//! Every documented item in the scanned sources may carry `@` annotations in its
//! doc comment (`@API`, `@Operation`, `@Parameter`, `@Response`, ...). The tool
//! assembles them into one OpenAPI 3.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-comments [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-comments ./my-api-project -o openapi.yaml
//! ```
//!
//! Generate JSON, keeping the output even if some annotations are invalid:
//! ```bash
//! openapi-from-comments ./my-api-project -f json --allow-errors
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_comments::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("openapi-from-comments starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
