//! Route specifications: method, path template, input schemas and declared responses.
//!
//! A [`RouteSpec`] is assembled with consuming builder methods and is immutable once
//! registered:
//!
//! ```rust
//! use typedroute::schema::Schema;
//! use typedroute::spec::RouteSpec;
//!
//! let spec = RouteSpec::get("/articles/{slug}")
//!     .path_params(Schema::object().field("slug", Schema::string()))
//!     .response(200, "The article", "application/json", Schema::object().allow_unknown());
//!
//! assert_eq!(spec.operation_name(), "get_articles_slug");
//! ```

mod build;
mod path;
mod types;

pub use path::{check_consistency, normalized_template, template_params, template_regex};
pub use types::*;
