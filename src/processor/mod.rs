//! Turns annotated declarations into an OpenAPI [`Document`].
//!
//! The [`Processor`] owns the document being built and the list of errors seen so
//! far. Each declaration's doc comment is split into annotations, which are then
//! applied in order by a fresh [`Context`]. A failing annotation is recorded and
//! skipped; the rest of the declaration is still processed.
//!
//! # Example
//!
//! ```
//! use openapi_from_comments::processor::{Declaration, Processor};
//!
//! let mut processor = Processor::new();
//! processor.process_declaration(&Declaration::new(
//!     "main",
//!     "@API Pet Store\n@Version 1.0.0",
//! ));
//!
//! let (document, errors) = processor.finish();
//! assert!(errors.is_empty());
//! assert_eq!(document.info.title, "Pet Store");
//! ```

pub mod context;
mod handlers;
pub mod schema;

use crate::annotation::parse_annotations;
use crate::error::{ProcessorError, SourceLocation};
use crate::openapi::Document;
use context::Context;
use log::{debug, warn};

/// A documented source declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Declaration {
    /// Declared identifier; the default component ID
    pub name: String,
    /// Literal value when the declaration is a string constant
    pub value: Option<String>,
    /// Doc comment text, one comment line per line
    pub doc: String,
    pub location: SourceLocation,
}

impl Declaration {
    pub fn new(name: &str, doc: &str) -> Self {
        Self {
            name: name.to_string(),
            doc: doc.to_string(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// Accumulates declarations into a single document.
#[derive(Debug, Default)]
pub struct Processor {
    document: Document,
    errors: Vec<ProcessorError>,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every annotation in the declaration's doc comment.
    ///
    /// Errors are collected rather than returned; see [`Processor::errors`].
    pub fn process_declaration(&mut self, declaration: &Declaration) {
        let annotations = parse_annotations(&declaration.doc);
        if annotations.is_empty() {
            return;
        }
        debug!(
            "Processing {} annotations of {} at {}",
            annotations.len(),
            declaration.name,
            declaration.location
        );

        let mut ctx = Context::new(
            &mut self.document,
            &declaration.name,
            declaration.value.as_deref(),
        );
        for (annotation, cause) in ctx.consume_all(&annotations) {
            let error = ProcessorError {
                location: declaration.location.clone(),
                declaration: declaration.name.clone(),
                annotation,
                cause,
            };
            warn!("{}", error);
            self.errors.push(error);
        }
    }

    pub fn process_declarations<'d>(&mut self, declarations: impl IntoIterator<Item = &'d Declaration>) {
        for declaration in declarations {
            self.process_declaration(declaration);
        }
    }

    /// Ends the run, returning the document together with every error seen.
    pub fn finish(self) -> (Document, Vec<ProcessorError>) {
        (self.document, self.errors)
    }
}
