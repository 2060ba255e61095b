use crate::annotation::AnnotationKind;
use std::fmt;
use std::path::PathBuf;

/// Failure of a single annotation.
///
/// None of these abort processing: the driver records the error and moves on
/// to the next annotation of the same declaration.
#[derive(Debug)]
pub enum AnnotationError {
    /// The annotation needs an enclosing object that is not active.
    MissingScope(&'static str),
    /// The argument does not match the annotation's grammar.
    InvalidArgument(&'static str),
    /// A token is outside its enumerated set of values.
    InvalidValue { what: &'static str, value: String },
    /// A JSON body could not be decoded.
    InvalidJson {
        what: &'static str,
        source: serde_json::Error,
    },
    /// A component would be registered but no component ID is available.
    MissingComponentId,
    /// A standalone schema lacks a usable top-level `$id`.
    MissingSchemaId,
    /// A schema `$id` does not start with `#`.
    InvalidSchemaId(String),
    /// The annotation form is not allowed where it appears.
    InvalidUsage,
    /// The active scope points at an object that is no longer in the document.
    DanglingScope,
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnnotationError::MissingScope(scope) => write!(f, "must be used with {}", scope),
            AnnotationError::InvalidArgument(msg) => write!(f, "{}", msg),
            AnnotationError::InvalidValue { what, value } => {
                write!(f, "invalid {}: {}", what, value)
            }
            AnnotationError::InvalidJson { what, source } => {
                write!(f, "invalid json {}: {}", what, source)
            }
            AnnotationError::MissingComponentId => write!(f, "must provide component ID"),
            AnnotationError::MissingSchemaId => {
                write!(f, "schema must contain non-empty top-level '$id' property")
            }
            AnnotationError::InvalidSchemaId(id) => {
                write!(f, "json schema ID must start with #: {}", id)
            }
            AnnotationError::InvalidUsage => write!(f, "invalid annotation usage"),
            AnnotationError::DanglingScope => {
                write!(f, "active object no longer exists in the document")
            }
        }
    }
}

impl std::error::Error for AnnotationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnnotationError::InvalidJson { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Source position of a documented declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// An annotation error tagged with the declaration it came from.
#[derive(Debug)]
pub struct ProcessorError {
    pub location: SourceLocation,
    pub declaration: String,
    pub annotation: AnnotationKind,
    pub cause: AnnotationError,
}

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", self.location)?;
        if !self.declaration.is_empty() {
            write!(f, "{}: ", self.declaration)?;
        }
        write!(f, "@{}: {}", self.annotation, self.cause)
    }
}

impl std::error::Error for ProcessorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_error_display() {
        let err = ProcessorError {
            location: SourceLocation {
                file: PathBuf::from("src/api.rs"),
                line: 12,
            },
            declaration: "get_user".to_string(),
            annotation: AnnotationKind::Variable,
            cause: AnnotationError::MissingScope("Server"),
        };
        assert_eq!(
            err.to_string(),
            "src/api.rs:12: get_user: @Variable: must be used with Server"
        );
    }

    #[test]
    fn test_processor_error_display_for_file_docs() {
        let err = ProcessorError {
            location: SourceLocation {
                file: PathBuf::from("src/lib.rs"),
                line: 1,
            },
            declaration: String::new(),
            annotation: AnnotationKind::Tag,
            cause: AnnotationError::MissingScope("Operation"),
        };
        assert_eq!(
            err.to_string(),
            "src/lib.rs:1: @Tag: must be used with Operation"
        );
    }

    #[test]
    fn test_json_error_exposes_source() {
        use std::error::Error;

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AnnotationError::InvalidJson {
            what: "schema",
            source,
        };
        assert!(err.to_string().starts_with("invalid json schema: "));
        assert!(err.source().is_some());
    }
}
