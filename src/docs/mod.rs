//! # Docs Module
//!
//! OpenAPI 3.1 document generation from the route registry.
//!
//! [`generate`] walks the registry in registration order and emits one operation per
//! route: parameters from the four parameter schemas, a request body per accepted
//! content type, and every declared response. Schemas given a name with
//! [`Schema::named`](crate::schema::Schema::named) become shared entries under
//! `components.schemas` and are referenced with `$ref`.
//!
//! The document is a pure projection and is never cached here. Serve
//! [`ApiDocument::to_json`] with [`ApiDocument::etag`] as the `ETag`, or let the
//! reference runtime do it (see [`HttpRuntime::serve_docs`](crate::server::HttpRuntime::serve_docs)).

mod generate;
mod schema;
mod types;

pub use generate::generate;
pub use types::{
    ApiDocument, ApiInfo, Components, MediaType, Operation, Parameter, PathItem, RequestBody,
    Response, Tag, OPENAPI_VERSION,
};
