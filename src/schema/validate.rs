use super::types::{ArraySchema, NumberRules, ObjectSchema, Schema, SchemaKind, StringRules};
use crate::config::UnknownFieldPolicy;
use crate::error::{ErrorKind, FieldError, FieldPath};
use crate::spec::Location;
use serde_json::{Map, Value};

static NULL: Value = Value::Null;

/// Where a raw value came from, which decides whether it may be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Text-only sources (path, query, headers, cookies, form bodies):
    /// strings are coerced to the declared primitive type
    Text,
    /// Already-parsed JSON: only structurally checked
    Json,
}

/// Per-call settings for [`validate`]
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub location: Location,
    pub source: ValueSource,
    pub unknown_fields: UnknownFieldPolicy,
}

impl ValidationContext {
    #[must_use]
    pub fn new(location: Location, source: ValueSource) -> Self {
        Self {
            location,
            source,
            unknown_fields: UnknownFieldPolicy::Reject,
        }
    }

    #[must_use]
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }
}

/// Validate `raw` against `schema`.
///
/// Returns the coerced value (text coerced to primitives, defaults applied) or every
/// violation found. Siblings are always all checked; one failing member never hides
/// another.
pub fn validate(
    schema: &Schema,
    raw: &Value,
    ctx: &ValidationContext,
) -> Result<Value, Vec<FieldError>> {
    let mut errors = Vec::new();
    let value = check(schema, raw, &FieldPath::root(), ctx, &mut errors);
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

fn check(
    schema: &Schema,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    if raw.is_null() {
        if schema.nullable || matches!(schema.kind, SchemaKind::Any) {
            return Value::Null;
        }
        if !matches!(schema.kind, SchemaKind::Union(_)) {
            errors.push(type_error(schema, raw, path, ctx));
            return Value::Null;
        }
    }

    // A repeated text key arrives as an array; a scalar schema keeps the last value.
    let raw = match (&schema.kind, ctx.source, raw) {
        (
            SchemaKind::String(_)
            | SchemaKind::Number(_)
            | SchemaKind::Integer(_)
            | SchemaKind::Boolean,
            ValueSource::Text,
            Value::Array(items),
        ) => items.last().unwrap_or(&NULL),
        _ => raw,
    };

    match &schema.kind {
        SchemaKind::Any => raw.clone(),
        SchemaKind::String(rules) => check_string(schema, rules, raw, path, ctx, errors),
        SchemaKind::Number(rules) => check_number(schema, rules, raw, path, ctx, errors),
        SchemaKind::Integer(rules) => check_integer(schema, rules, raw, path, ctx, errors),
        SchemaKind::Boolean => check_boolean(schema, raw, path, ctx, errors),
        SchemaKind::Object(obj) => check_object(schema, obj, raw, path, ctx, errors),
        SchemaKind::Array(arr) => check_array(schema, arr, raw, path, ctx, errors),
        SchemaKind::Union(alts) => check_union(schema, alts, raw, path, ctx, errors),
    }
}

fn check_string(
    schema: &Schema,
    rules: &StringRules,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    let Some(s) = raw.as_str() else {
        errors.push(type_error(schema, raw, path, ctx));
        return raw.clone();
    };

    let len = s.chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            errors.push(constraint(
                path,
                ctx,
                format!("must be at least {min} character(s) long"),
            ));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            errors.push(constraint(
                path,
                ctx,
                format!("must be at most {max} character(s) long"),
            ));
        }
    }
    if let Some(re) = &rules.pattern {
        if !re.is_match(s) {
            errors.push(constraint(
                path,
                ctx,
                format!("does not match pattern '{}'", re.as_str()),
            ));
        }
    }
    if !rules.enum_values.is_empty() && !rules.enum_values.iter().any(|v| v == s) {
        errors.push(constraint(
            path,
            ctx,
            format!("must be one of {:?}", rules.enum_values),
        ));
    }
    Value::String(s.to_string())
}

fn check_number(
    schema: &Schema,
    rules: &NumberRules,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    let value = match (raw, ctx.source) {
        (Value::Number(_), _) => Some(raw.clone()),
        (Value::String(s), ValueSource::Text) => parse_number(s.trim()),
        _ => None,
    };
    let Some(value) = value else {
        errors.push(type_error(schema, raw, path, ctx));
        return raw.clone();
    };
    check_bounds(rules, &value, path, ctx, errors);
    value
}

fn check_integer(
    schema: &Schema,
    rules: &NumberRules,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    let value = match (raw, ctx.source) {
        (Value::Number(n), _) => {
            if n.is_i64() || n.is_u64() {
                Some(raw.clone())
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| Value::from(f as i64))
            }
        }
        (Value::String(s), ValueSource::Text) => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    };
    let Some(value) = value else {
        errors.push(type_error(schema, raw, path, ctx));
        return raw.clone();
    };
    check_bounds(rules, &value, path, ctx, errors);
    value
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

fn check_bounds(
    rules: &NumberRules,
    value: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) {
    let Some(n) = value.as_f64() else {
        return;
    };
    if let Some(min) = rules.minimum {
        if n < min {
            errors.push(constraint(
                path,
                ctx,
                format!("must be greater than or equal to {min}"),
            ));
        }
    }
    if let Some(max) = rules.maximum {
        if n > max {
            errors.push(constraint(
                path,
                ctx,
                format!("must be less than or equal to {max}"),
            ));
        }
    }
}

fn check_boolean(
    schema: &Schema,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    let value = match (raw, ctx.source) {
        (Value::Bool(b), _) => Some(*b),
        (Value::String(s), ValueSource::Text) => match s.trim() {
            t if t.eq_ignore_ascii_case("true") || t == "1" => Some(true),
            t if t.eq_ignore_ascii_case("false") || t == "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    match value {
        Some(b) => Value::Bool(b),
        None => {
            errors.push(type_error(schema, raw, path, ctx));
            raw.clone()
        }
    }
}

fn check_object(
    schema: &Schema,
    obj: &ObjectSchema,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    // Text sources may carry a JSON-encoded object in a single parameter.
    let parsed;
    let raw = match (raw, ctx.source) {
        (Value::String(s), ValueSource::Text) => match serde_json::from_str::<Value>(s) {
            Ok(v @ Value::Object(_)) => {
                parsed = v;
                &parsed
            }
            _ => raw,
        },
        _ => raw,
    };
    let Some(members) = raw.as_object() else {
        errors.push(type_error(schema, raw, path, ctx));
        return raw.clone();
    };

    let mut out = Map::new();
    for (name, field) in &obj.fields {
        match members.get(name) {
            Some(value) => {
                let checked = check(&field.schema, value, &path.field(name), ctx, errors);
                out.insert(name.clone(), checked);
            }
            None => {
                if let Some(default) = &field.schema.default {
                    out.insert(name.clone(), default.clone());
                } else if field.required {
                    errors.push(FieldError::new(
                        ctx.location,
                        path.field(name),
                        ErrorKind::Missing,
                        "field required",
                    ));
                }
            }
        }
    }

    let pass_through = obj.allow_unknown || ctx.unknown_fields == UnknownFieldPolicy::Allow;
    for (name, value) in members {
        if obj.field(name).is_some() {
            continue;
        }
        if pass_through {
            out.insert(name.clone(), value.clone());
        } else {
            errors.push(FieldError::new(
                ctx.location,
                path.field(name),
                ErrorKind::Unknown,
                "unknown field",
            ));
        }
    }
    Value::Object(out)
}

fn check_array(
    schema: &Schema,
    arr: &ArraySchema,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    let split;
    let items: &[Value] = match (raw, ctx.source) {
        (Value::Array(items), _) => items,
        (Value::String(s), ValueSource::Text) => {
            split = s
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| Value::String(p.to_string()))
                .collect::<Vec<_>>();
            &split
        }
        _ => {
            errors.push(type_error(schema, raw, path, ctx));
            return raw.clone();
        }
    };

    if let Some(min) = arr.min_items {
        if items.len() < min {
            errors.push(constraint(
                path,
                ctx,
                format!("must contain at least {min} item(s)"),
            ));
        }
    }
    if let Some(max) = arr.max_items {
        if items.len() > max {
            errors.push(constraint(
                path,
                ctx,
                format!("must contain at most {max} item(s)"),
            ));
        }
    }

    Value::Array(
        items
            .iter()
            .enumerate()
            .map(|(i, item)| check(&arr.items, item, &path.index(i), ctx, errors))
            .collect(),
    )
}

fn check_union(
    schema: &Schema,
    alternatives: &[Schema],
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
    errors: &mut Vec<FieldError>,
) -> Value {
    if alternatives.is_empty() {
        errors.push(type_error(schema, raw, path, ctx));
        return raw.clone();
    }

    let mut collected = Vec::new();
    for (i, alt) in alternatives.iter().enumerate() {
        let mut alt_errors = Vec::new();
        let value = check(alt, raw, path, ctx, &mut alt_errors);
        if alt_errors.is_empty() {
            return value;
        }
        collected.extend(alt_errors.into_iter().map(|mut e| {
            e.message = format!("variant {i}: {}", e.message);
            e
        }));
    }
    errors.extend(collected);
    raw.clone()
}

fn type_error(
    schema: &Schema,
    raw: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
) -> FieldError {
    FieldError::new(
        ctx.location,
        path.clone(),
        ErrorKind::Type,
        format!("expected {}, found {}", schema.type_label(), value_type(raw)),
    )
}

fn constraint(path: &FieldPath, ctx: &ValidationContext, message: String) -> FieldError {
    FieldError::new(ctx.location, path.clone(), ErrorKind::Constraint, message)
}

/// JSON type name of a raw value
pub(crate) fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
