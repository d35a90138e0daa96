use super::types::RouteSpec;
use crate::error::SpecConfigurationError;
use http::StatusCode;
use regex::Regex;

/// Parameter names of a path template, in order of appearance.
///
/// A template must start with `/`. Each parameter occupies a whole segment
/// (`/articles/{slug}`), has a non-empty name and appears once.
pub fn template_params(path: &str) -> Result<Vec<String>, SpecConfigurationError> {
    let invalid = |reason: String| SpecConfigurationError::InvalidPathTemplate {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(invalid("must start with '/'".to_string()));
    }

    let mut names: Vec<String> = Vec::with_capacity(path.matches('{').count());
    for segment in path.split('/').skip(1) {
        if !segment.contains(['{', '}']) {
            continue;
        }
        let name = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .filter(|n| !n.is_empty() && !n.contains(['{', '}']))
            .ok_or_else(|| invalid(format!("malformed parameter segment '{segment}'")))?;
        if names.iter().any(|n| n == name) {
            return Err(invalid(format!("parameter '{name}' appears more than once")));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// Check that the template's parameter segments and the path-param schema members agree,
/// and that every declared response status is a valid HTTP status.
pub fn check_consistency(spec: &RouteSpec) -> Result<(), SpecConfigurationError> {
    if let Some(status) = spec
        .declared_statuses()
        .into_iter()
        .find(|s| StatusCode::from_u16(*s).is_err())
    {
        return Err(SpecConfigurationError::InvalidStatus {
            method: spec.method.clone(),
            path: spec.path.clone(),
            status,
        });
    }

    let in_path = template_params(&spec.path)?;

    let in_schema: Vec<String> = match &spec.request.path_params {
        None => Vec::new(),
        Some(schema) => match schema.as_object() {
            Some(obj) => {
                if let Some((name, _)) = obj.fields().find(|(_, field)| !field.required) {
                    return Err(SpecConfigurationError::OptionalPathParam {
                        method: spec.method.clone(),
                        path: spec.path.clone(),
                        name: name.to_string(),
                    });
                }
                obj.field_names().into_iter().map(str::to_string).collect()
            }
            None => {
                return Err(SpecConfigurationError::PathParamsNotObject {
                    method: spec.method.clone(),
                    path: spec.path.clone(),
                })
            }
        },
    };

    let missing_in_schema: Vec<String> = in_path
        .iter()
        .filter(|n| !in_schema.contains(n))
        .cloned()
        .collect();
    let missing_in_path: Vec<String> = in_schema
        .iter()
        .filter(|n| !in_path.contains(n))
        .cloned()
        .collect();

    if missing_in_schema.is_empty() && missing_in_path.is_empty() {
        Ok(())
    } else {
        Err(SpecConfigurationError::PathParamMismatch {
            method: spec.method.clone(),
            path: spec.path.clone(),
            missing_in_schema,
            missing_in_path,
        })
    }
}

/// Template with parameter names erased, so `/a/{x}` and `/a/{y}` compare equal.
/// A trailing slash is significant.
#[must_use]
pub fn normalized_template(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Compile a path template into an anchored regex plus its parameter names.
///
/// Parameter segments match `[^/]*`, so an empty segment still selects the
/// route and surfaces as a missing path parameter during validation.
pub fn template_regex(path: &str) -> Result<(Regex, Vec<String>), SpecConfigurationError> {
    let names = template_params(path)?;

    let mut pattern = String::with_capacity(path.len() + 8);
    pattern.push('^');
    for segment in path.split('/').skip(1) {
        pattern.push('/');
        if segment.starts_with('{') && segment.ends_with('}') {
            pattern.push_str("([^/]*)");
        } else {
            pattern.push_str(&regex::escape(segment));
        }
    }
    pattern.push('$');

    let regex = Regex::new(&pattern).map_err(|e| SpecConfigurationError::InvalidPathTemplate {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok((regex, names))
}
