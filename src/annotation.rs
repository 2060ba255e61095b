//! Annotation grammar: splits doc comment text into `@Tag argument` records.
//!
//! A record starts at any line of the form `@<tag>[ <argument>]` whose tag is one
//! of the known [`AnnotationKind`]s (compared case-insensitively). Every following
//! line that does not start a new record becomes part of its body. Lines before
//! the first record, and lines starting with an unknown tag before it, are dropped;
//! an unknown tag after a record is plain body text.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(\S+)(?:\s+(.*))?$").unwrap());

/// The closed set of recognized annotation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Id,
    Api,
    Version,
    Server,
    Variable,
    Tag,
    SecurityRequirement,
    SecuritySchemeApiKey,
    SecuritySchemeHttp,
    Operation,
    Parameter,
    RequestBody,
    Response,
    JsonSchema,
    JsonExample,
    Callback,
}

impl AnnotationKind {
    /// Looks up a tag name, ignoring case. Short aliases are accepted for the
    /// security annotations.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag.to_ascii_lowercase().as_str() {
            "id" => AnnotationKind::Id,
            "api" => AnnotationKind::Api,
            "version" => AnnotationKind::Version,
            "server" => AnnotationKind::Server,
            "variable" => AnnotationKind::Variable,
            "tag" => AnnotationKind::Tag,
            "securityrequirement" | "security" => AnnotationKind::SecurityRequirement,
            "securityschemeapikey" | "securityapikey" => AnnotationKind::SecuritySchemeApiKey,
            "securityschemehttp" | "securityhttp" => AnnotationKind::SecuritySchemeHttp,
            "operation" => AnnotationKind::Operation,
            "parameter" => AnnotationKind::Parameter,
            "requestbody" => AnnotationKind::RequestBody,
            "response" => AnnotationKind::Response,
            "jsonschema" => AnnotationKind::JsonSchema,
            "jsonexample" => AnnotationKind::JsonExample,
            "callback" => AnnotationKind::Callback,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical spelling of the tag.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Id => "ID",
            AnnotationKind::Api => "API",
            AnnotationKind::Version => "Version",
            AnnotationKind::Server => "Server",
            AnnotationKind::Variable => "Variable",
            AnnotationKind::Tag => "Tag",
            AnnotationKind::SecurityRequirement => "SecurityRequirement",
            AnnotationKind::SecuritySchemeApiKey => "SecuritySchemeAPIKey",
            AnnotationKind::SecuritySchemeHttp => "SecuritySchemeHTTP",
            AnnotationKind::Operation => "Operation",
            AnnotationKind::Parameter => "Parameter",
            AnnotationKind::RequestBody => "RequestBody",
            AnnotationKind::Response => "Response",
            AnnotationKind::JsonSchema => "JSONSchema",
            AnnotationKind::JsonExample => "JSONExample",
            AnnotationKind::Callback => "Callback",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `@Tag argument` directive with the body lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Text after the tag, empty when absent
    pub argument: String,
    /// Following plain lines, with leading and trailing blank lines removed
    pub body: Vec<String>,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, argument: &str) -> Self {
        Self {
            kind,
            argument: argument.to_string(),
            body: Vec::new(),
        }
    }

    /// The body as a single newline-joined string.
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }

    fn try_parse(line: &str) -> Option<Self> {
        let caps = RE_ANNOTATION.captures(line)?;
        let kind = AnnotationKind::from_tag(caps.get(1)?.as_str())?;
        let argument = caps.get(2).map_or("", |m| m.as_str());
        Some(Self::new(kind, argument))
    }

    fn finish(mut self) -> Self {
        let start = self
            .body
            .iter()
            .position(|line| !line.is_empty())
            .unwrap_or(self.body.len());
        let end = self
            .body
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(start, |i| i + 1);
        self.body = self.body[start..end].to_vec();
        self
    }
}

/// Splits comment text into trimmed lines.
pub fn lex_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim().to_string()).collect()
}

/// Groups lines into annotation records, preserving their order.
pub fn split_annotations<S: AsRef<str>>(lines: &[S]) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    let mut current: Option<Annotation> = None;

    for line in lines {
        let line = line.as_ref().trim();
        if let Some(annotation) = Annotation::try_parse(line) {
            if let Some(done) = current.replace(annotation) {
                annotations.push(done.finish());
            }
        } else if let Some(annotation) = current.as_mut() {
            annotation.body.push(line.to_string());
        }
    }
    if let Some(done) = current {
        annotations.push(done.finish());
    }

    annotations
}

/// Lexes and splits a raw comment block in one step.
pub fn parse_annotations(text: &str) -> Vec<Annotation> {
    split_annotations(&lex_lines(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn annotation(kind: AnnotationKind, argument: &str, body: &[&str]) -> Annotation {
        Annotation {
            kind,
            argument: argument.to_string(),
            body: body.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_annotation_with_argument() {
        assert_eq!(
            split_annotations(&["   @api   "]),
            vec![annotation(AnnotationKind::Api, "", &[])]
        );
        assert_eq!(
            split_annotations(&["   @API  test arguments "]),
            vec![annotation(AnnotationKind::Api, "test arguments", &[])]
        );
    }

    #[test]
    fn test_parse_annotation_with_body() {
        assert_eq!(
            split_annotations(&["   @API  argument ", " test  ", "   example"]),
            vec![annotation(AnnotationKind::Api, "argument", &["test", "example"])]
        );
    }

    #[test]
    fn test_parse_multiple_annotations() {
        assert_eq!(
            split_annotations(&["   @API  argument ", "@Version v0.1"]),
            vec![
                annotation(AnnotationKind::Api, "argument", &[]),
                annotation(AnnotationKind::Version, "v0.1", &[]),
            ]
        );
        assert_eq!(
            split_annotations(&["   @API  argument ", "test", "@tag example", "  some example"]),
            vec![
                annotation(AnnotationKind::Api, "argument", &["test"]),
                annotation(AnnotationKind::Tag, "example", &["some example"]),
            ]
        );
    }

    #[test]
    fn test_ignore_unknown_text() {
        let empty: [&str; 0] = [];
        assert!(split_annotations(&empty).is_empty());
        assert!(split_annotations(&["test"]).is_empty());
        assert!(split_annotations(&["@unknown"]).is_empty());
        assert!(split_annotations(&["plain", "", "more plain text"]).is_empty());
        assert_eq!(
            split_annotations(&["  test", "   @API  argument "]),
            vec![annotation(AnnotationKind::Api, "argument", &[])]
        );
    }

    #[test]
    fn test_unknown_tag_after_record_is_body_text() {
        assert_eq!(
            split_annotations(&["@API Title", "@Bogus thing", "text"]),
            vec![annotation(AnnotationKind::Api, "Title", &["@Bogus thing", "text"])]
        );
    }

    #[test]
    fn test_body_trims_boundary_blank_lines_only() {
        assert_eq!(
            split_annotations(&["@API Title", "", "", "first", "", "second", "", ""]),
            vec![annotation(AnnotationKind::Api, "Title", &["first", "", "second"])]
        );
        assert_eq!(
            split_annotations(&["@API Title", "", "  ", ""]),
            vec![annotation(AnnotationKind::Api, "Title", &[])]
        );
    }

    #[test]
    fn test_tag_aliases() {
        assert_eq!(
            AnnotationKind::from_tag("Security"),
            Some(AnnotationKind::SecurityRequirement)
        );
        assert_eq!(
            AnnotationKind::from_tag("SECURITYAPIKEY"),
            Some(AnnotationKind::SecuritySchemeApiKey)
        );
        assert_eq!(
            AnnotationKind::from_tag("securityHttp"),
            Some(AnnotationKind::SecuritySchemeHttp)
        );
        assert_eq!(AnnotationKind::from_tag("Bogus"), None);
    }

    #[test]
    fn test_parse_annotations_from_comment_text() {
        let text = "\n @Operation GET /user/{id} - Get User\n     Return the user.\n\n @Tag User\n";
        assert_eq!(
            parse_annotations(text),
            vec![
                annotation(
                    AnnotationKind::Operation,
                    "GET /user/{id} - Get User",
                    &["Return the user."]
                ),
                annotation(AnnotationKind::Tag, "User", &[]),
            ]
        );
        assert_eq!(parse_annotations(text)[0].body_text(), "Return the user.");
    }
}
