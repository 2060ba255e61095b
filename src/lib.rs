//! openapi-from-comments - OpenAPI 3.0 documents from annotated Rust doc comments.
//!
//! API descriptions are written next to the code they describe, as `@` annotations
//! inside ordinary doc comments:
//!
//! ```text
//! /// @Operation GET /user/{id} - Get User
//! ///     Return user with specific ID.
//! ///
//! ///     @Parameter {UserID}
//! ///     @Response 200 {UserResponse}
//! pub async fn get_user() {}
//! ```
//!
//! # Architecture
//!
//! 1. [`scanner`] - Finds the Rust files of a project, in a stable order
//! 2. [`parser`] - Extracts documented declarations with `syn`
//! 3. [`annotation`] - Splits doc text into annotation records
//! 4. [`processor`] - Applies annotations to the document, one declaration at a time
//! 5. [`openapi`] - The document model
//! 6. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_comments::{
//!     parser::AstParser, processor::Processor, scanner::FileScanner,
//!     serializer::serialize_yaml,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./my-project")).scan().unwrap();
//!
//! let mut processor = Processor::new();
//! for parsed in AstParser::parse_files(&scan_result.rust_files).into_iter().flatten() {
//!     processor.process_declarations(&parsed.declarations);
//! }
//!
//! let (document, errors) = processor.finish();
//! for error in &errors {
//!     eprintln!("{}", error);
//! }
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotation;
pub mod cli;
pub mod error;
pub mod openapi;
pub mod parser;
pub mod processor;
pub mod scanner;
pub mod serializer;
