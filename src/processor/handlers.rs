//! One handler per annotation kind.
//!
//! Every handler validates its own argument, writes into the document and
//! updates the context scope. Failures leave the document untouched apart from
//! what was already applied by earlier annotations.

use super::context::{
    operation_mut, parameter_mut, request_body_mut, response_mut, CallbackLoc, ContentLoc, Context,
    Flow, OperationLoc, ParameterLoc, RequestBodyLoc, ResponseLoc,
};
use super::schema::translate_schema_object;
use crate::error::AnnotationError;
use crate::openapi::{
    ApiKeyLocation, Callback, Document, Example, HasContent, Method, Operation, Parameter,
    ParameterLocation, RefOr, Reference, RequestBody, Response, Schema, SecurityRequirement,
    SecurityScheme, Server, ServerVariable, Tag,
};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

// e.g. {EmptyResponse}
static RE_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{(\S+)\}$").unwrap());

// e.g. GET /me - Get current user
static RE_OPERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+-\s+(.+)$").unwrap());

// e.g. id path, or id path as UserID
static RE_PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S+)(?:\s+as\s+(\S+))?$").unwrap());

// e.g. DisableUserExpiring - Disable a user with expiry
static RE_EXAMPLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(.+)$").unwrap());

// e.g. api_key: X-API-Key in header
static RE_API_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+):\s+(\S+)\s+in\s+(\S+)$").unwrap());

/// Extracts `ComponentID` from a `{ComponentID}` argument.
fn parse_ref(arg: &str) -> Option<&str> {
    RE_REF.captures(arg)?.get(1).map(|m| m.as_str())
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| field.to_string()).collect()
}

pub(super) fn id(ctx: &mut Context, arg: &str) -> Result<Flow, AnnotationError> {
    ctx.component_id = Some(arg.to_string());
    Ok(Flow::Continue)
}

pub(super) fn api(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    ctx.doc.info.title = arg.to_string();
    ctx.doc.info.description = body.to_string();
    Ok(Flow::Continue)
}

pub(super) fn version(ctx: &mut Context, arg: &str) -> Result<Flow, AnnotationError> {
    ctx.doc.info.version = arg.to_string();
    Ok(Flow::Continue)
}

pub(super) fn server(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    ctx.doc.servers.push(Server {
        url: arg.to_string(),
        description: body.to_string(),
        variables: IndexMap::new(),
    });
    let index = ctx.doc.servers.len() - 1;
    ctx.enter_server(index);
    Ok(Flow::Continue)
}

pub(super) fn variable(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    let index = ctx
        .scope
        .server()
        .ok_or(AnnotationError::MissingScope("Server"))?;

    let fields: Vec<&str> = arg.split_whitespace().collect();
    let [name, default, allowed @ ..] = fields.as_slice() else {
        return Err(AnnotationError::InvalidArgument(
            "must provide name and at least one value",
        ));
    };

    let server = ctx
        .doc
        .servers
        .get_mut(index)
        .ok_or(AnnotationError::DanglingScope)?;
    server.variables.insert(
        name.to_string(),
        ServerVariable {
            allowed: owned(allowed),
            default: default.to_string(),
            description: body.to_string(),
        },
    );
    Ok(Flow::Continue)
}

pub(super) fn tag(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    if body.is_empty() {
        let operation = ctx
            .current_operation()?
            .ok_or(AnnotationError::MissingScope("Operation"))?;
        operation.tags.push(arg.to_string());
    } else {
        ctx.doc.tags.push(Tag {
            name: arg.to_string(),
            description: body.to_string(),
        });
    }
    Ok(Flow::Continue)
}

pub(super) fn security_requirement(ctx: &mut Context, arg: &str) -> Result<Flow, AnnotationError> {
    let fields: Vec<&str> = arg.split_whitespace().collect();
    let [name, scopes @ ..] = fields.as_slice() else {
        return Err(AnnotationError::InvalidArgument(
            "must provide security scheme name",
        ));
    };

    let mut requirement = SecurityRequirement::new();
    requirement.insert(name.to_string(), owned(scopes));

    match ctx.current_operation()? {
        Some(operation) => operation.security.push(requirement),
        None => ctx.doc.security.push(requirement),
    }
    Ok(Flow::Continue)
}

pub(super) fn security_scheme_api_key(
    ctx: &mut Context,
    arg: &str,
    body: &str,
) -> Result<Flow, AnnotationError> {
    let (name, field, location) = match RE_API_KEY.captures(arg) {
        Some(caps) => (
            caps[1].to_string(),
            caps[2].to_string(),
            caps[3].to_string(),
        ),
        None => match arg.split_whitespace().collect::<Vec<_>>().as_slice() {
            [name, location, field] => (name.to_string(), field.to_string(), location.to_string()),
            _ => {
                return Err(AnnotationError::InvalidArgument(
                    "must provide scheme name, location and field name",
                ))
            }
        },
    };

    let location: ApiKeyLocation = location
        .parse()
        .map_err(|value| AnnotationError::InvalidValue {
            what: "API key location",
            value,
        })?;

    debug!("Registering API key security scheme: {} ({} in {})", name, field, location);
    ctx.doc.components.security_schemes.insert(
        name,
        SecurityScheme::ApiKey {
            description: body.to_string(),
            name: field,
            location,
        },
    );
    Ok(Flow::Continue)
}

pub(super) fn security_scheme_http(
    ctx: &mut Context,
    arg: &str,
    body: &str,
) -> Result<Flow, AnnotationError> {
    let fields: Vec<&str> = arg.split_whitespace().collect();
    let [name, scheme, rest @ ..] = fields.as_slice() else {
        return Err(AnnotationError::InvalidArgument(
            "must provide scheme name and HTTP auth scheme",
        ));
    };

    let scheme = scheme.to_ascii_lowercase();
    let bearer_format = if scheme == "bearer" {
        let format = rest.first().ok_or(AnnotationError::InvalidArgument(
            "must provide bearer token format",
        ))?;
        Some(format.to_string())
    } else {
        None
    };

    debug!("Registering HTTP security scheme: {}", name);
    ctx.doc.components.security_schemes.insert(
        name.to_string(),
        SecurityScheme::Http {
            description: body.to_string(),
            scheme,
            bearer_format,
        },
    );
    Ok(Flow::Continue)
}

pub(super) fn operation(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    let caps = RE_OPERATION
        .captures(arg)
        .ok_or(AnnotationError::InvalidArgument(
            "must provide HTTP method, path and summary",
        ))?;
    let method: Method = caps[1]
        .parse()
        .map_err(|value| AnnotationError::InvalidValue {
            what: "HTTP method",
            value,
        })?;
    let path = caps[2].to_string();

    let operation = Operation {
        summary: caps[3].to_string(),
        description: body.to_string(),
        ..Operation::default()
    };

    debug!("Adding operation: {} {}", method, path);
    ctx.path_container()?.set_operation(&path, method, operation);

    let loc = OperationLoc {
        callback: ctx.callback.clone(),
        path,
        method,
    };
    ctx.enter_operation(loc);
    Ok(Flow::Continue)
}

pub(super) fn parameter(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    if let Some(id) = parse_ref(arg) {
        let operation = ctx
            .current_operation()?
            .ok_or(AnnotationError::MissingScope("Operation"))?;
        operation.parameters.push(Reference::parameter(id).into());
        return Ok(Flow::Continue);
    }

    let caps = RE_PARAMETER
        .captures(arg)
        .ok_or(AnnotationError::InvalidArgument(
            "must provide parameter name and location",
        ))?;
    let location: ParameterLocation =
        caps[2]
            .parse()
            .map_err(|value| AnnotationError::InvalidValue {
                what: "parameter location",
                value,
            })?;
    let parameter = Parameter::new(&caps[1], location, body);

    let loc = if let Some(alias) = caps.get(3) {
        let id = alias.as_str().to_string();
        debug!("Registering parameter component: {} ({} in {})", id, parameter.name, parameter.location);
        ctx.doc.components.parameters.insert(id.clone(), parameter);
        if let Some(operation) = ctx.current_operation()? {
            operation.parameters.push(Reference::parameter(&id).into());
        }
        ParameterLoc::Component(id)
    } else if let Some(operation_loc) = ctx.scope.operation().cloned() {
        let operation =
            operation_mut(ctx.doc, &operation_loc).ok_or(AnnotationError::DanglingScope)?;
        operation.parameters.push(RefOr::Item(parameter));
        let index = operation.parameters.len() - 1;
        ParameterLoc::Operation(operation_loc, index)
    } else {
        let id = ctx.take_component_id()?;
        debug!("Registering parameter component: {} ({} in {})", id, parameter.name, parameter.location);
        ctx.doc.components.parameters.insert(id.clone(), parameter);
        ParameterLoc::Component(id)
    };

    ctx.enter_content(ContentLoc::Parameter(loc));
    Ok(Flow::Continue)
}

pub(super) fn request_body(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    if let Some(id) = parse_ref(arg) {
        let operation = ctx
            .current_operation()?
            .ok_or(AnnotationError::MissingScope("Operation"))?;
        operation.request_body = Some(Reference::request_body(id).into());
        return Ok(Flow::Continue);
    }

    let request_body = RequestBody {
        description: body.to_string(),
        ..RequestBody::default()
    };

    let loc = match ctx.scope.operation().cloned() {
        Some(operation_loc) => {
            let operation =
                operation_mut(ctx.doc, &operation_loc).ok_or(AnnotationError::DanglingScope)?;
            operation.request_body = Some(RefOr::Item(request_body));
            RequestBodyLoc::Operation(operation_loc)
        }
        None => {
            let id = ctx.take_component_id()?;
            debug!("Registering request body component: {}", id);
            ctx.doc.components.request_bodies.insert(id.clone(), request_body);
            RequestBodyLoc::Component(id)
        }
    };

    ctx.enter_content(ContentLoc::RequestBody(loc));
    Ok(Flow::Continue)
}

pub(super) fn response(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    let response = Response {
        description: body.to_string(),
        ..Response::default()
    };

    let Some(operation_loc) = ctx.scope.operation().cloned() else {
        let id = ctx.take_component_id()?;
        debug!("Registering response component: {}", id);
        ctx.doc.components.responses.insert(id.clone(), response);
        ctx.enter_content(ContentLoc::Response(ResponseLoc::Component(id)));
        return Ok(Flow::Continue);
    };

    let fields: Vec<&str> = arg.split_whitespace().collect();
    let (status, entry) = match fields.as_slice() {
        [status] => (status.to_string(), RefOr::Item(response)),
        [status, reference] => {
            let id = parse_ref(reference).ok_or(AnnotationError::InvalidArgument(
                "invalid object reference format",
            ))?;
            (status.to_string(), Reference::response(id).into())
        }
        _ => {
            return Err(AnnotationError::InvalidArgument(
                "invalid response annotation format",
            ))
        }
    };

    let inline = matches!(entry, RefOr::Item(_));
    let operation = operation_mut(ctx.doc, &operation_loc).ok_or(AnnotationError::DanglingScope)?;
    operation.responses.insert(status.clone(), entry);
    if inline {
        ctx.enter_content(ContentLoc::Response(ResponseLoc::Operation(
            operation_loc,
            status,
        )));
    }
    Ok(Flow::Continue)
}

/// Decodes a schema literal, rewriting `#Name` references and stripping `$id`.
///
/// Returns the schema and its `$id` without the leading `#`, if it had one.
fn decode_schema(text: &str) -> Result<(Map<String, Value>, Option<String>), AnnotationError> {
    let map: Map<String, Value> =
        serde_json::from_str(text).map_err(|source| AnnotationError::InvalidJson {
            what: "schema",
            source,
        })?;
    let map = translate_schema_object(map);

    let id = match map.get("$id") {
        Some(Value::String(id)) => Some(
            id.strip_prefix('#')
                .ok_or_else(|| AnnotationError::InvalidSchemaId(id.clone()))?
                .to_string(),
        ),
        _ => None,
    };
    let map = map.into_iter().filter(|(key, _)| key != "$id").collect();

    Ok((map, id))
}

pub(super) fn json_schema(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    let (schema, id) = match parse_ref(arg) {
        Some(id) => (Schema::Ref(Reference::schema(id)), None),
        None => {
            let text = if body.is_empty() {
                ctx.declaration_value.unwrap_or_default()
            } else {
                body
            };
            if text.trim().is_empty() {
                return Err(AnnotationError::InvalidArgument(
                    "invalid json schema declaration",
                ));
            }
            let (map, id) = decode_schema(text)?;
            (Schema::Item(Value::Object(map)), id)
        }
    };

    if let Some(content) = ctx.scope.content().cloned() {
        return attach_schema(ctx.doc, &content, schema).map(|_| Flow::Continue);
    }

    let value = match schema {
        RefOr::Item(value) => value,
        RefOr::Ref(_) => return Err(AnnotationError::InvalidUsage),
    };
    let id = id
        .filter(|id| !id.is_empty())
        .ok_or(AnnotationError::MissingSchemaId)?;
    debug!("Registering schema component: {}", id);
    ctx.doc.components.schemas.insert(id, value);
    Ok(Flow::Continue)
}

fn attach_schema(doc: &mut Document, content: &ContentLoc, schema: Schema) -> Result<(), AnnotationError> {
    let slot = match content {
        ContentLoc::Parameter(loc) => {
            &mut parameter_mut(doc, loc)
                .ok_or(AnnotationError::DanglingScope)?
                .schema
        }
        ContentLoc::RequestBody(loc) => {
            &mut request_body_mut(doc, loc)
                .ok_or(AnnotationError::DanglingScope)?
                .json_media_type_mut()
                .schema
        }
        ContentLoc::Response(loc) => {
            &mut response_mut(doc, loc)
                .ok_or(AnnotationError::DanglingScope)?
                .json_media_type_mut()
                .schema
        }
    };
    *slot = Some(schema);
    Ok(())
}

pub(super) fn json_example(ctx: &mut Context, arg: &str, body: &str) -> Result<Flow, AnnotationError> {
    let value: Value = serde_json::from_str(body).map_err(|source| AnnotationError::InvalidJson {
        what: "example",
        source,
    })?;

    let caps = RE_EXAMPLE
        .captures(arg)
        .ok_or(AnnotationError::InvalidArgument(
            "must provide example name and summary",
        ))?;
    let name = caps[1].to_string();
    let example = Example {
        summary: caps[2].to_string(),
        value,
        ..Example::default()
    };

    let content = ctx
        .scope
        .content()
        .cloned()
        .ok_or(AnnotationError::InvalidUsage)?;
    let examples = match &content {
        ContentLoc::Parameter(loc) => {
            &mut parameter_mut(ctx.doc, loc)
                .ok_or(AnnotationError::DanglingScope)?
                .examples
        }
        ContentLoc::RequestBody(loc) => {
            &mut request_body_mut(ctx.doc, loc)
                .ok_or(AnnotationError::DanglingScope)?
                .json_media_type_mut()
                .examples
        }
        ContentLoc::Response(loc) => {
            &mut response_mut(ctx.doc, loc)
                .ok_or(AnnotationError::DanglingScope)?
                .json_media_type_mut()
                .examples
        }
    };
    examples.insert(name, example);
    Ok(Flow::Continue)
}

pub(super) fn callback(ctx: &mut Context, arg: &str) -> Result<Flow, AnnotationError> {
    let Some(operation_loc) = ctx.scope.operation().cloned() else {
        let id = ctx.take_component_id()?;
        debug!("Registering callback component: {}", id);
        ctx.doc.components.callbacks.insert(id.clone(), Callback::new());
        return Ok(Flow::EnterCallback(CallbackLoc::Component(id)));
    };

    let fields: Vec<&str> = arg.split_whitespace().collect();
    let (key, entry) = match fields.as_slice() {
        [key] => (key.to_string(), RefOr::Item(Callback::new())),
        [key, reference] => {
            let id = parse_ref(reference).ok_or(AnnotationError::InvalidArgument(
                "invalid object reference format",
            ))?;
            (key.to_string(), Reference::callback(id).into())
        }
        _ => {
            return Err(AnnotationError::InvalidArgument(
                "invalid callback annotation format",
            ))
        }
    };

    let inline = matches!(entry, RefOr::Item(_));
    let operation = operation_mut(ctx.doc, &operation_loc).ok_or(AnnotationError::DanglingScope)?;
    operation.callbacks.insert(key.clone(), entry);

    if inline {
        Ok(Flow::EnterCallback(CallbackLoc::Operation(
            Box::new(operation_loc),
            key,
        )))
    } else {
        Ok(Flow::Continue)
    }
}
