//! # Validation Pipeline
//!
//! Turns a matched request into a [`ValidatedInput`] or one aggregated
//! [`ValidationError`](crate::error::ValidationError).
//!
//! ## Order
//!
//! 1. **pathParams** - values extracted by the runtime; an empty segment counts as absent
//! 2. **query** - repeated keys become arrays
//! 3. **headers** - only declared names are read, matched case-insensitively
//! 4. **cookies** - only declared names are read
//! 5. **body** - selected by content type; JSON (`application/json`, `*+json`) is parsed
//!    structurally, `application/x-www-form-urlencoded` and `text/*` are coerced like
//!    parameters
//!
//! Every location is checked on every request. A request with a bad query parameter
//! and an unsupported body content type reports both.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use typedroute::config::ValidationConfig;
//! use typedroute::schema::Schema;
//! use typedroute::server::ParsedRequest;
//! use typedroute::spec::RouteSpec;
//! use typedroute::validator::validate_request;
//!
//! let spec = RouteSpec::get("/articles")
//!     .query(Schema::object().optional("limit", Schema::integer()));
//! let req = ParsedRequest::new(Method::GET, "/articles?limit=5");
//!
//! let input = validate_request(&spec, &req, &ValidationConfig::default()).unwrap();
//! assert_eq!(input.into_value(), serde_json::json!({"query": {"limit": 5}}));
//! ```

mod core;
mod input;

pub use core::validate_request;
pub use input::ValidatedInput;
