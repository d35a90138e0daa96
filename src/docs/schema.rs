use crate::schema::{Schema, SchemaKind};
use serde_json::{json, Map, Number, Value};
use std::collections::BTreeMap;

const COMPONENT_PREFIX: &str = "#/components/schemas/";

/// Converts schema trees to JSON Schema, lifting named schemas into shared components.
///
/// Identical definitions published under one name share a component; a different
/// definition under a taken name gets the next free `Name_2`, `Name_3`, ... id.
#[derive(Debug, Default)]
pub(crate) struct SchemaCollector {
    components: BTreeMap<String, Value>,
}

impl SchemaCollector {
    pub(crate) fn convert(&mut self, schema: &Schema) -> Value {
        let rendered = self.render(schema);
        match schema.name() {
            Some(name) => {
                let id = self.register(name, rendered);
                json!({ "$ref": format!("{COMPONENT_PREFIX}{id}") })
            }
            None => rendered,
        }
    }

    pub(crate) fn into_components(self) -> BTreeMap<String, Value> {
        self.components
    }

    fn register(&mut self, name: &str, definition: Value) -> String {
        let mut suffix = 1usize;
        loop {
            let id = if suffix == 1 {
                name.to_string()
            } else {
                format!("{name}_{suffix}")
            };
            match self.components.get(&id) {
                Some(existing) if *existing == definition => return id,
                Some(_) => suffix += 1,
                None => {
                    self.components.insert(id.clone(), definition);
                    return id;
                }
            }
        }
    }

    fn render(&mut self, schema: &Schema) -> Value {
        let mut out = Map::new();
        match schema.kind() {
            SchemaKind::Any => {}
            SchemaKind::String(rules) => {
                out.insert("type".into(), json!("string"));
                if let Some(min) = rules.min_length {
                    out.insert("minLength".into(), json!(min));
                }
                if let Some(max) = rules.max_length {
                    out.insert("maxLength".into(), json!(max));
                }
                if let Some(re) = &rules.pattern {
                    out.insert("pattern".into(), json!(re.as_str()));
                }
                if !rules.enum_values.is_empty() {
                    out.insert("enum".into(), json!(rules.enum_values));
                }
            }
            SchemaKind::Number(rules) | SchemaKind::Integer(rules) => {
                let integer = matches!(schema.kind(), SchemaKind::Integer(_));
                out.insert(
                    "type".into(),
                    json!(if integer { "integer" } else { "number" }),
                );
                if let Some(min) = rules.minimum {
                    out.insert("minimum".into(), bound(min));
                }
                if let Some(max) = rules.maximum {
                    out.insert("maximum".into(), bound(max));
                }
            }
            SchemaKind::Boolean => {
                out.insert("type".into(), json!("boolean"));
            }
            SchemaKind::Object(obj) => {
                out.insert("type".into(), json!("object"));
                let mut properties = Map::new();
                let mut required = Vec::new();
                for (name, field) in obj.fields() {
                    properties.insert(name.to_string(), self.convert(&field.schema));
                    if field.required {
                        required.push(json!(name));
                    }
                }
                out.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    out.insert("required".into(), Value::Array(required));
                }
                if !obj.allows_unknown() {
                    out.insert("additionalProperties".into(), json!(false));
                }
            }
            SchemaKind::Array(arr) => {
                out.insert("type".into(), json!("array"));
                out.insert("items".into(), self.convert(&arr.items));
                if let Some(min) = arr.min_items {
                    out.insert("minItems".into(), json!(min));
                }
                if let Some(max) = arr.max_items {
                    out.insert("maxItems".into(), json!(max));
                }
            }
            SchemaKind::Union(alternatives) => {
                let any_of: Vec<Value> = alternatives.iter().map(|alt| self.convert(alt)).collect();
                out.insert("anyOf".into(), Value::Array(any_of));
            }
        }

        if schema.is_nullable() {
            if let Some(Value::String(ty)) = out.get("type").cloned() {
                out.insert("type".into(), json!([ty, "null"]));
            } else if let Some(Value::Array(any_of)) = out.get_mut("anyOf") {
                any_of.push(json!({"type": "null"}));
            }
        }
        if let Some(default) = schema.default_ref() {
            out.insert("default".into(), default.clone());
        }
        if let Some(description) = schema.description() {
            out.insert("description".into(), json!(description));
        }
        if let Some(example) = schema.example_value() {
            out.insert("examples".into(), json!([example]));
        }
        Value::Object(out)
    }
}

/// Whole-valued bounds render as integers
fn bound(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}
