//! Scoped builder state for one declaration.
//!
//! Objects created by annotations live inside the [`Document`]; the context only
//! remembers *where* they are (a locator) and resolves the locator against the
//! document whenever an annotation needs to modify the object.

use super::handlers;
use crate::annotation::{Annotation, AnnotationKind};
use crate::error::AnnotationError;
use crate::openapi::{
    Callback, Document, Method, Operation, Parameter, PathContainer, RefOr, RequestBody, Response,
};
use log::debug;

/// Location of a callback's path map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackLoc {
    /// `components.callbacks[id]`
    Component(String),
    /// Inline callback `key` of an operation
    Operation(Box<OperationLoc>, String),
}

/// Location of an operation: its path container, path and method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationLoc {
    /// `None` for the document's top-level paths
    pub callback: Option<CallbackLoc>,
    pub path: String,
    pub method: Method,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterLoc {
    Component(String),
    Operation(OperationLoc, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBodyLoc {
    Component(String),
    Operation(OperationLoc),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseLoc {
    Component(String),
    /// Operation response by status code
    Operation(OperationLoc, String),
}

/// The single-content objects that schema and example annotations attach to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLoc {
    Parameter(ParameterLoc),
    RequestBody(RequestBodyLoc),
    Response(ResponseLoc),
}

/// The object subsequent annotations implicitly attach to.
///
/// Parameter, request body and response scopes exclude each other; entering
/// one leaves the previous one. They keep the enclosing operation (if any) so
/// sibling annotations can still reach it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    None,
    Server(usize),
    Operation(OperationLoc),
    Content {
        operation: Option<OperationLoc>,
        content: ContentLoc,
    },
}

impl Scope {
    pub fn server(&self) -> Option<usize> {
        match self {
            Scope::Server(index) => Some(*index),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<&OperationLoc> {
        match self {
            Scope::Operation(operation) => Some(operation),
            Scope::Content { operation, .. } => operation.as_ref(),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&ContentLoc> {
        match self {
            Scope::Content { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// What the annotation loop does after a handler succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The remaining annotations form the body of this inline callback.
    EnterCallback(CallbackLoc),
}

/// Annotation consumer bound to one declaration (or one callback body).
pub struct Context<'a> {
    pub(crate) doc: &'a mut Document,
    /// String literal of the owning declaration, if it is a string constant
    pub(crate) declaration_value: Option<&'a str>,
    /// Key used when an annotation registers a component
    pub(crate) component_id: Option<String>,
    /// Callback whose path map receives operations in this pass
    pub(crate) callback: Option<CallbackLoc>,
    pub(crate) scope: Scope,
}

impl<'a> Context<'a> {
    /// Creates the context for a declaration named `name`; the name is the
    /// default component ID.
    pub fn new(doc: &'a mut Document, name: &str, declaration_value: Option<&'a str>) -> Self {
        Self {
            doc,
            declaration_value,
            component_id: Some(name.to_string()).filter(|id| !id.is_empty()),
            callback: None,
            scope: Scope::None,
        }
    }

    /// Consumes annotations in order, collecting the failures.
    ///
    /// An inline callback takes every annotation after it as its body; those are
    /// consumed by a nested context bound to the callback. Until the body's first
    /// `@Operation`, annotations still reach the operation owning the callback.
    pub fn consume_all(&mut self, annotations: &[Annotation]) -> Vec<(AnnotationKind, AnnotationError)> {
        let mut errors = Vec::new();

        for (index, annotation) in annotations.iter().enumerate() {
            match self.consume(annotation) {
                Ok(Flow::Continue) => {}
                Ok(Flow::EnterCallback(callback)) => {
                    debug!("Entering callback body: {:?}", callback);
                    // The owning operation stays in scope until the body declares its own.
                    let scope = match &callback {
                        CallbackLoc::Operation(operation, _) => Scope::Operation((**operation).clone()),
                        CallbackLoc::Component(_) => Scope::None,
                    };
                    let mut nested = Context {
                        doc: &mut *self.doc,
                        declaration_value: self.declaration_value,
                        component_id: None,
                        callback: Some(callback),
                        scope,
                    };
                    errors.extend(nested.consume_all(&annotations[index + 1..]));
                    break;
                }
                Err(err) => {
                    debug!("@{} failed: {}", annotation.kind, err);
                    errors.push((annotation.kind, err));
                }
            }
        }

        errors
    }

    /// Applies a single annotation.
    pub fn consume(&mut self, annotation: &Annotation) -> Result<Flow, AnnotationError> {
        let arg = annotation.argument.as_str();
        let body = annotation.body_text();

        match annotation.kind {
            AnnotationKind::Id => handlers::id(self, arg),
            AnnotationKind::Api => handlers::api(self, arg, &body),
            AnnotationKind::Version => handlers::version(self, arg),
            AnnotationKind::Server => handlers::server(self, arg, &body),
            AnnotationKind::Variable => handlers::variable(self, arg, &body),
            AnnotationKind::Tag => handlers::tag(self, arg, &body),
            AnnotationKind::SecurityRequirement => handlers::security_requirement(self, arg),
            AnnotationKind::SecuritySchemeApiKey => handlers::security_scheme_api_key(self, arg, &body),
            AnnotationKind::SecuritySchemeHttp => handlers::security_scheme_http(self, arg, &body),
            AnnotationKind::Operation => handlers::operation(self, arg, &body),
            AnnotationKind::Parameter => handlers::parameter(self, arg, &body),
            AnnotationKind::RequestBody => handlers::request_body(self, arg, &body),
            AnnotationKind::Response => handlers::response(self, arg, &body),
            AnnotationKind::JsonSchema => handlers::json_schema(self, arg, &body),
            AnnotationKind::JsonExample => handlers::json_example(self, arg, &body),
            AnnotationKind::Callback => handlers::callback(self, arg),
        }
    }

    /// Takes the component ID for a registration; each ID registers one component.
    pub(crate) fn take_component_id(&mut self) -> Result<String, AnnotationError> {
        self.component_id
            .take()
            .filter(|id| !id.is_empty())
            .ok_or(AnnotationError::MissingComponentId)
    }

    pub(crate) fn enter_server(&mut self, index: usize) {
        self.scope = Scope::Server(index);
    }

    pub(crate) fn enter_operation(&mut self, operation: OperationLoc) {
        self.scope = Scope::Operation(operation);
    }

    /// Enters a content scope, leaving any previous one but keeping the operation.
    pub(crate) fn enter_content(&mut self, content: ContentLoc) {
        let operation = self.scope.operation().cloned();
        self.scope = Scope::Content { operation, content };
    }

    /// The operation in scope, if any.
    pub(crate) fn current_operation(&mut self) -> Result<Option<&mut Operation>, AnnotationError> {
        match self.scope.operation() {
            Some(loc) => operation_mut(self.doc, loc)
                .map(Some)
                .ok_or(AnnotationError::DanglingScope),
            None => Ok(None),
        }
    }

    /// Path container receiving new operations in this pass.
    pub(crate) fn path_container(&mut self) -> Result<&mut dyn PathContainer, AnnotationError> {
        container_mut(self.doc, self.callback.as_ref()).ok_or(AnnotationError::DanglingScope)
    }
}

fn container_mut<'d>(
    doc: &'d mut Document,
    callback: Option<&CallbackLoc>,
) -> Option<&'d mut dyn PathContainer> {
    match callback {
        None => Some(&mut doc.paths),
        Some(loc) => callback_mut(doc, loc).map(|callback| callback as &mut dyn PathContainer),
    }
}

pub(crate) fn callback_mut<'d>(doc: &'d mut Document, loc: &CallbackLoc) -> Option<&'d mut Callback> {
    match loc {
        CallbackLoc::Component(id) => doc.components.callbacks.get_mut(id),
        CallbackLoc::Operation(operation, key) => operation_mut(doc, operation)?
            .callbacks
            .get_mut(key)?
            .as_item_mut(),
    }
}

pub(crate) fn operation_mut<'d>(doc: &'d mut Document, loc: &OperationLoc) -> Option<&'d mut Operation> {
    container_mut(doc, loc.callback.as_ref())?.operation_mut(&loc.path, loc.method)
}

pub(crate) fn parameter_mut<'d>(doc: &'d mut Document, loc: &ParameterLoc) -> Option<&'d mut Parameter> {
    match loc {
        ParameterLoc::Component(id) => doc.components.parameters.get_mut(id),
        ParameterLoc::Operation(operation, index) => operation_mut(doc, operation)?
            .parameters
            .get_mut(*index)?
            .as_item_mut(),
    }
}

pub(crate) fn request_body_mut<'d>(
    doc: &'d mut Document,
    loc: &RequestBodyLoc,
) -> Option<&'d mut RequestBody> {
    match loc {
        RequestBodyLoc::Component(id) => doc.components.request_bodies.get_mut(id),
        RequestBodyLoc::Operation(operation) => operation_mut(doc, operation)?
            .request_body
            .as_mut()
            .and_then(RefOr::as_item_mut),
    }
}

pub(crate) fn response_mut<'d>(doc: &'d mut Document, loc: &ResponseLoc) -> Option<&'d mut Response> {
    match loc {
        ResponseLoc::Component(id) => doc.components.responses.get_mut(id),
        ResponseLoc::Operation(operation, status) => operation_mut(doc, operation)?
            .responses
            .get_mut(status)?
            .as_item_mut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_user() -> OperationLoc {
        OperationLoc {
            callback: None,
            path: "/user".to_string(),
            method: Method::Get,
        }
    }

    #[test]
    fn test_content_scopes_exclude_each_other() {
        let mut doc = Document::new();
        let mut ctx = Context::new(&mut doc, "Decl", None);

        ctx.enter_operation(get_user());
        ctx.enter_content(ContentLoc::Parameter(ParameterLoc::Operation(get_user(), 0)));
        ctx.enter_content(ContentLoc::RequestBody(RequestBodyLoc::Operation(get_user())));

        assert_eq!(
            ctx.scope,
            Scope::Content {
                operation: Some(get_user()),
                content: ContentLoc::RequestBody(RequestBodyLoc::Operation(get_user())),
            }
        );
        assert_eq!(ctx.scope.operation(), Some(&get_user()));
    }

    #[test]
    fn test_server_scope_is_left_by_operation() {
        let mut doc = Document::new();
        let mut ctx = Context::new(&mut doc, "Decl", None);

        ctx.enter_server(0);
        assert_eq!(ctx.scope.server(), Some(0));
        ctx.enter_operation(get_user());
        assert_eq!(ctx.scope.server(), None);
    }

    #[test]
    fn test_component_id_is_consumed_once() {
        let mut doc = Document::new();
        let mut ctx = Context::new(&mut doc, "Decl", None);

        assert_eq!(ctx.take_component_id().unwrap(), "Decl");
        assert!(matches!(
            ctx.take_component_id(),
            Err(AnnotationError::MissingComponentId)
        ));
    }

    #[test]
    fn test_resolves_operation_inside_operation_callback() {
        let mut doc = Document::new();
        let mut op = Operation::default();
        op.callbacks
            .insert("created".to_string(), RefOr::Item(Callback::new()));
        doc.paths.set_operation("/user", Method::Get, op);

        let callback = CallbackLoc::Operation(Box::new(get_user()), "created".to_string());
        callback_mut(&mut doc, &callback)
            .unwrap()
            .set_operation("/hook", Method::Post, Operation::default());

        let nested = OperationLoc {
            callback: Some(callback),
            path: "/hook".to_string(),
            method: Method::Post,
        };
        operation_mut(&mut doc, &nested).unwrap().summary = "Hook".to_string();

        let outer = doc.paths.operation("/user", Method::Get).unwrap();
        let hook = outer.callbacks["created"].as_item().unwrap();
        assert_eq!(hook.operation("/hook", Method::Post).unwrap().summary, "Hook");
    }

    #[test]
    fn test_missing_locations_resolve_to_none() {
        let mut doc = Document::new();
        assert!(operation_mut(&mut doc, &get_user()).is_none());
        assert!(parameter_mut(&mut doc, &ParameterLoc::Component("P".to_string())).is_none());
        assert!(callback_mut(&mut doc, &CallbackLoc::Component("C".to_string())).is_none());
    }
}
