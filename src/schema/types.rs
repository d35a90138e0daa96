use regex::Regex;
use serde_json::Value;

/// Declarative description of an expected value shape.
///
/// Built once at startup with the constructor and builder methods below, then
/// shared immutably. Refinement methods that do not apply to a schema's kind
/// (for example [`Schema::pattern`] on an integer schema) leave it unchanged.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) kind: SchemaKind,
    pub(crate) nullable: bool,
    pub(crate) default: Option<Value>,
    pub(crate) description: Option<String>,
    pub(crate) example: Option<Value>,
    pub(crate) name: Option<String>,
}

/// Shape-specific part of a [`Schema`]
#[derive(Debug, Clone)]
pub enum SchemaKind {
    /// Accepts any value unchanged
    Any,
    String(StringRules),
    /// Integer or floating point number
    Number(NumberRules),
    /// Whole number
    Integer(NumberRules),
    Boolean,
    Object(ObjectSchema),
    Array(ArraySchema),
    /// Valid when at least one alternative matches
    Union(Vec<Schema>),
}

/// Refinements for string schemas
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub enum_values: Vec<String>,
}

/// Inclusive bounds for number and integer schemas
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRules {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// Member of an object schema
#[derive(Debug, Clone)]
pub struct Field {
    pub schema: Schema,
    pub required: bool,
}

/// Object schema with members kept in declaration order
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub(crate) fields: Vec<(String, Field)>,
    pub(crate) allow_unknown: bool,
}

impl ObjectSchema {
    /// Members in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    /// Member names in declaration order
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether undeclared members pass through instead of failing validation
    #[must_use]
    pub fn allows_unknown(&self) -> bool {
        self.allow_unknown
    }

    fn upsert(&mut self, name: String, field: Field) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = field;
        } else {
            self.fields.push((name, field));
        }
    }
}

/// Array schema
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl Schema {
    fn with_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            nullable: false,
            default: None,
            description: None,
            example: None,
            name: None,
        }
    }

    #[must_use]
    pub fn any() -> Self {
        Self::with_kind(SchemaKind::Any)
    }

    #[must_use]
    pub fn string() -> Self {
        Self::with_kind(SchemaKind::String(StringRules::default()))
    }

    #[must_use]
    pub fn number() -> Self {
        Self::with_kind(SchemaKind::Number(NumberRules::default()))
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::with_kind(SchemaKind::Integer(NumberRules::default()))
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::with_kind(SchemaKind::Boolean)
    }

    /// An object schema with no members yet; add them with [`Schema::field`] and
    /// [`Schema::optional`].
    #[must_use]
    pub fn object() -> Self {
        Self::with_kind(SchemaKind::Object(ObjectSchema::default()))
    }

    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self::with_kind(SchemaKind::Array(ArraySchema {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }))
    }

    #[must_use]
    pub fn union(alternatives: impl IntoIterator<Item = Schema>) -> Self {
        Self::with_kind(SchemaKind::Union(alternatives.into_iter().collect()))
    }

    /// Add a required member to an object schema
    #[must_use]
    pub fn field(self, name: impl Into<String>, schema: Schema) -> Self {
        self.member(name.into(), schema, true)
    }

    /// Add an optional member to an object schema
    #[must_use]
    pub fn optional(self, name: impl Into<String>, schema: Schema) -> Self {
        self.member(name.into(), schema, false)
    }

    fn member(mut self, name: String, schema: Schema, required: bool) -> Self {
        if let SchemaKind::Object(obj) = &mut self.kind {
            obj.upsert(name, Field { schema, required });
        }
        self
    }

    /// Let undeclared object members pass through unchanged
    #[must_use]
    pub fn allow_unknown(mut self) -> Self {
        if let SchemaKind::Object(obj) = &mut self.kind {
            obj.allow_unknown = true;
        }
        self
    }

    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        if let SchemaKind::String(rules) = &mut self.kind {
            rules.min_length = Some(len);
        }
        self
    }

    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        if let SchemaKind::String(rules) = &mut self.kind {
            rules.max_length = Some(len);
        }
        self
    }

    /// Require strings to match `pattern` (unanchored, as in JSON Schema)
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        if let SchemaKind::String(rules) = &mut self.kind {
            rules.pattern = Some(pattern);
        }
        self
    }

    /// Restrict strings to a fixed set of values
    #[must_use]
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let SchemaKind::String(rules) = &mut self.kind {
            rules.enum_values = values.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Inclusive lower bound for numbers and integers
    #[must_use]
    pub fn minimum(mut self, min: f64) -> Self {
        if let SchemaKind::Number(rules) | SchemaKind::Integer(rules) = &mut self.kind {
            rules.minimum = Some(min);
        }
        self
    }

    /// Inclusive upper bound for numbers and integers
    #[must_use]
    pub fn maximum(mut self, max: f64) -> Self {
        if let SchemaKind::Number(rules) | SchemaKind::Integer(rules) = &mut self.kind {
            rules.maximum = Some(max);
        }
        self
    }

    #[must_use]
    pub fn min_items(mut self, n: usize) -> Self {
        if let SchemaKind::Array(arr) = &mut self.kind {
            arr.min_items = Some(n);
        }
        self
    }

    #[must_use]
    pub fn max_items(mut self, n: usize) -> Self {
        if let SchemaKind::Array(arr) = &mut self.kind {
            arr.max_items = Some(n);
        }
        self
    }

    /// Accept `null` in addition to the schema's own type
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value used when an optional member is absent
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Documentation only
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Documentation only
    #[must_use]
    pub fn example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Publish this schema as a shared component in generated API documents
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn default_ref(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn example_value(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Short type label used in error messages, e.g. `integer` or `one of [string, integer]`
    #[must_use]
    pub fn type_label(&self) -> String {
        match &self.kind {
            SchemaKind::Any => "any".to_string(),
            SchemaKind::String(_) => "string".to_string(),
            SchemaKind::Number(_) => "number".to_string(),
            SchemaKind::Integer(_) => "integer".to_string(),
            SchemaKind::Boolean => "boolean".to_string(),
            SchemaKind::Object(_) => "object".to_string(),
            SchemaKind::Array(_) => "array".to_string(),
            SchemaKind::Union(alts) => format!(
                "one of [{}]",
                alts.iter()
                    .map(Schema::type_label)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}
