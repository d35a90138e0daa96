//! # Schema Module
//!
//! Declarative value schemas and the engine that validates raw request values against
//! them.
//!
//! ## Overview
//!
//! A [`Schema`] is a recursive, immutable description of an expected shape:
//! primitives (`string`, `number`, `integer`, `boolean`), objects, arrays, unions and
//! `any`, with optional refinements (length, pattern, enum, bounds, item counts),
//! defaults and documentation annotations.
//!
//! [`validate`] checks a raw [`serde_json::Value`] against a schema and returns either
//! the coerced value or every [`FieldError`](crate::error::FieldError) found:
//!
//! - **Text coercion** - values from text-only sources ([`ValueSource::Text`]) are
//!   converted to the declared primitive first (`"42"` becomes `42`)
//! - **Full aggregation** - every object member is checked even after a sibling fails
//! - **Unions** - the first matching alternative wins; when none match, every
//!   alternative's errors are reported, prefixed with `variant {i}: `
//! - **Located errors** - each error carries the field path of the offending value
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use typedroute::schema::{validate, Schema, ValidationContext, ValueSource};
//! use typedroute::spec::Location;
//!
//! let schema = Schema::object()
//!     .optional("title", Schema::string())
//!     .field("body", Schema::string());
//!
//! let ctx = ValidationContext::new(Location::Body, ValueSource::Json);
//! let errors = validate(&schema, &json!({"title": 5, "extra": true}), &ctx).unwrap_err();
//! assert_eq!(errors.len(), 3);
//! ```

mod types;
mod validate;

pub use types::{
    ArraySchema, Field, NumberRules, ObjectSchema, Schema, SchemaKind, StringRules,
};
pub use validate::{validate, ValidationContext, ValueSource};
