use crate::error::SourceLocation;
use crate::processor::Declaration;
use anyhow::{Context, Result};
use log::{debug, warn};
use proc_macro2::Span;
use std::fs;
use std::path::{Path, PathBuf};
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{Attribute, Expr, ExprLit, Ident, Lit, Meta};

/// Parser extracting documented declarations from Rust source files.
///
/// The `AstParser` uses the `syn` crate to parse a source file and walks the whole
/// syntax tree, nested modules and function bodies included. Every item carrying
/// doc comments becomes a [`Declaration`] with its name, doc text and position.
/// The file's own inner doc comments (`//!`) form an unnamed declaration.
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
/// println!("Found {} documented declarations", parsed.declarations.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its documented declarations.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Documented declarations in source order
    pub declarations: Vec<Declaration>,
}

impl AstParser {
    /// Parses a single Rust source file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the Rust source file to parse
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Rust syntax
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path, &content)
    }

    /// Parses Rust source text, attributing declarations to `path`.
    pub fn parse_source(path: &Path, source: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(source)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        let mut collector = DeclarationCollector::new(path);
        collector.visit_file(&syntax_tree);

        debug!(
            "Found {} documented declarations in {}",
            collector.declarations.len(),
            path.display()
        );

        Ok(ParsedFile {
            path: path.to_path_buf(),
            declarations: collector.declarations,
        })
    }

    /// Parses multiple Rust source files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings. The returned vector holds
    /// one result per input path, in the same order.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).inspect_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// Joins the `#[doc]` attributes of an item into one newline-separated text.
fn doc_text(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Value of a constant initialized with a string literal.
fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) => Some(text.value()),
        Expr::Group(group) => string_literal(&group.expr),
        Expr::Paren(paren) => string_literal(&paren.expr),
        _ => None,
    }
}

/// Visitor collecting documented declarations
struct DeclarationCollector<'p> {
    path: &'p Path,
    declarations: Vec<Declaration>,
}

impl<'p> DeclarationCollector<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            path,
            declarations: Vec::new(),
        }
    }

    fn add(&mut self, name: String, span: Span, attrs: &[Attribute], value: Option<String>) {
        let doc = doc_text(attrs);
        if doc.trim().is_empty() {
            return;
        }
        self.declarations.push(Declaration {
            name,
            value,
            doc,
            location: SourceLocation {
                file: self.path.to_path_buf(),
                line: span.start().line,
            },
        });
    }

    fn add_item(&mut self, ident: &Ident, attrs: &[Attribute]) {
        self.add(ident.to_string(), ident.span(), attrs, None);
    }
}

impl<'ast, 'p> Visit<'ast> for DeclarationCollector<'p> {
    fn visit_file(&mut self, node: &'ast syn::File) {
        if let Some(first) = node.attrs.iter().find(|attr| attr.path().is_ident("doc")) {
            self.add(String::new(), first.span(), &node.attrs, None);
        }
        syn::visit::visit_file(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.add_item(&node.sig.ident, &node.attrs);
        syn::visit::visit_item_fn(self, node);
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.add_item(&node.ident, &node.attrs);
        syn::visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.add_item(&node.ident, &node.attrs);
        syn::visit::visit_item_enum(self, node);
    }

    fn visit_item_union(&mut self, node: &'ast syn::ItemUnion) {
        self.add_item(&node.ident, &node.attrs);
        syn::visit::visit_item_union(self, node);
    }

    fn visit_item_type(&mut self, node: &'ast syn::ItemType) {
        self.add_item(&node.ident, &node.attrs);
        syn::visit::visit_item_type(self, node);
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        self.add_item(&node.ident, &node.attrs);
        syn::visit::visit_item_trait(self, node);
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        self.add_item(&node.ident, &node.attrs);
        syn::visit::visit_item_mod(self, node);
    }

    fn visit_item_const(&mut self, node: &'ast syn::ItemConst) {
        let value = string_literal(&node.expr);
        self.add(node.ident.to_string(), node.ident.span(), &node.attrs, value);
        syn::visit::visit_item_const(self, node);
    }

    fn visit_item_static(&mut self, node: &'ast syn::ItemStatic) {
        let value = string_literal(&node.expr);
        self.add(node.ident.to_string(), node.ident.span(), &node.attrs, value);
        syn::visit::visit_item_static(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.add_item(&node.sig.ident, &node.attrs);
        syn::visit::visit_impl_item_fn(self, node);
    }

    fn visit_impl_item_const(&mut self, node: &'ast syn::ImplItemConst) {
        let value = string_literal(&node.expr);
        self.add(node.ident.to_string(), node.ident.span(), &node.attrs, value);
        syn::visit::visit_impl_item_const(self, node);
    }

    fn visit_trait_item_fn(&mut self, node: &'ast syn::TraitItemFn) {
        self.add_item(&node.sig.ident, &node.attrs);
        syn::visit::visit_trait_item_fn(self, node);
    }
}
