use super::input::ValidatedInput;
use crate::config::{UnknownFieldPolicy, ValidationConfig};
use crate::error::{ErrorKind, FieldError, FieldPath, ValidationError};
use crate::schema::{validate, Schema, ValidationContext, ValueSource};
use crate::server::RequestView;
use crate::spec::{is_json_media_type, normalize_media_type, Location, RouteSpec};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Validate a matched request against its route.
///
/// Checks path parameters, query, headers, cookies and body in that order. Every
/// location is checked even after an earlier one fails, and all violations are
/// returned together. Locations the route does not declare are skipped.
pub fn validate_request(
    spec: &RouteSpec,
    request: &dyn RequestView,
    config: &ValidationConfig,
) -> Result<ValidatedInput, ValidationError> {
    let mut input = ValidatedInput::default();
    let mut errors: Vec<FieldError> = Vec::new();

    for location in [
        Location::PathParams,
        Location::Query,
        Location::Headers,
        Location::Cookies,
    ] {
        let Some(schema) = spec.request.parameters(location) else {
            continue;
        };
        let raw = raw_parameters(location, schema, request);
        let ctx = ValidationContext::new(location, ValueSource::Text)
            .with_unknown_fields(parameter_policy(location, config));
        let before = errors.len();
        match validate(schema, &raw, &ctx) {
            Ok(value) => {
                input.insert(location, value);
            }
            Err(found) => errors.extend(found),
        }
        debug!(
            route = %spec.route_id(),
            location = %location,
            error_count = errors.len() - before,
            "Location validated"
        );
    }

    if spec.accepts_body() {
        let before = errors.len();
        validate_body(spec, request, config, &mut input, &mut errors);
        debug!(
            route = %spec.route_id(),
            location = %Location::Body,
            error_count = errors.len() - before,
            "Location validated"
        );
    }

    match ValidationError::from_errors(errors) {
        None => Ok(input),
        Some(err) => {
            warn!(
                route = %spec.route_id(),
                error_count = err.len(),
                locations = ?err.locations(),
                "Request validation failed"
            );
            Err(err)
        }
    }
}

/// Headers and cookies only ever present declared names, so the policy never fires there.
fn parameter_policy(location: Location, config: &ValidationConfig) -> UnknownFieldPolicy {
    match location {
        Location::Headers | Location::Cookies => UnknownFieldPolicy::Allow,
        _ => config.unknown_fields,
    }
}

/// Assemble the raw text object a parameter location is validated against
fn raw_parameters(location: Location, schema: &Schema, request: &dyn RequestView) -> Value {
    match location {
        Location::PathParams => Value::Object(
            request
                .path_params()
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                .collect(),
        ),
        Location::Query => group_pairs(request.query().iter().map(|(k, v)| (k.as_str(), v))),
        Location::Headers => declared_only(schema, request.headers(), true),
        Location::Cookies => declared_only(schema, request.cookies(), false),
        Location::Body => Value::Null,
    }
}

/// Collect pairs into an object; a key seen more than once becomes an array of strings
fn group_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a String)>) -> Value {
    let mut out = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value.clone());
        match out.get_mut(key) {
            None => {
                out.insert(key.to_string(), value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    Value::Object(out)
}

/// Present only the names an object schema declares, keyed by the declared spelling
fn declared_only(schema: &Schema, pairs: &[(String, String)], ignore_case: bool) -> Value {
    let Some(obj) = schema.as_object() else {
        return group_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v)));
    };
    let matches = |declared: &str, actual: &str| {
        if ignore_case {
            declared.eq_ignore_ascii_case(actual)
        } else {
            declared == actual
        }
    };
    group_pairs(obj.field_names().into_iter().flat_map(|declared| {
        pairs
            .iter()
            .filter(move |(k, _)| matches(declared, k.as_str()))
            .map(move |(_, v)| (declared, v))
    }))
}

fn validate_body(
    spec: &RouteSpec,
    request: &dyn RequestView,
    config: &ValidationConfig,
    input: &mut ValidatedInput,
    errors: &mut Vec<FieldError>,
) {
    let body_error = |kind: ErrorKind, message: String| {
        FieldError::new(Location::Body, FieldPath::root(), kind, message)
    };

    let raw = request.body();
    if raw.is_empty() {
        if spec.request.body_required {
            errors.push(body_error(
                ErrorKind::Missing,
                "request body required".to_string(),
            ));
        }
        return;
    }

    if raw.len() > config.max_body_bytes {
        errors.push(body_error(
            ErrorKind::Constraint,
            format!(
                "body of {} bytes exceeds the limit of {} bytes",
                raw.len(),
                config.max_body_bytes
            ),
        ));
        return;
    }

    let accepted: Vec<&str> = spec.request.body.keys().map(String::as_str).collect();
    let content_type = request
        .content_type()
        .map(normalize_media_type)
        .filter(|ct| !ct.is_empty());
    let Some((content_type, schema)) = content_type
        .as_deref()
        .and_then(|ct| spec.request.body.get_key_value(ct))
    else {
        let message = match &content_type {
            Some(ct) => format!("unsupported content type '{ct}', expected one of {accepted:?}"),
            None => format!("missing content type, expected one of {accepted:?}"),
        };
        errors.push(body_error(ErrorKind::UnsupportedMediaType, message));
        return;
    };

    let (decoded, source) = match decode_body(content_type, raw) {
        Ok(decoded) => decoded,
        Err(reason) => {
            errors.push(body_error(ErrorKind::Malformed, reason));
            return;
        }
    };

    let ctx = ValidationContext::new(Location::Body, source)
        .with_unknown_fields(config.unknown_fields);
    match validate(schema, &decoded, &ctx) {
        Ok(value) => {
            input.insert(Location::Body, value);
            input.set_body_content_type(content_type.clone());
        }
        Err(found) => errors.extend(found),
    }
}

/// Decode body bytes for a declared content type
fn decode_body(content_type: &str, raw: &[u8]) -> Result<(Value, ValueSource), String> {
    if is_json_media_type(content_type) {
        return serde_json::from_slice(raw)
            .map(|v| (v, ValueSource::Json))
            .map_err(|e| format!("malformed JSON body: {e}"));
    }
    if content_type == "application/x-www-form-urlencoded" {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(raw)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        return Ok((
            group_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v))),
            ValueSource::Text,
        ));
    }
    std::str::from_utf8(raw)
        .map(|s| (Value::String(s.to_string()), ValueSource::Text))
        .map_err(|e| format!("body is not valid UTF-8 text: {e}"))
}
