//! # typedroute
//!
//! **typedroute** validates HTTP requests against declarative route descriptions,
//! dispatches only fully validated input to typed handlers, constrains what those
//! handlers may answer, and derives an [OpenAPI 3.1.0](https://spec.openapis.org/oas/v3.1.0)
//! document from the same descriptions.
//!
//! ## Overview
//!
//! A route is described once, as a [`RouteSpec`]: method, path template, one optional
//! schema per request location (path parameters, query, headers, cookies, body) and the
//! responses it may produce. That one description drives three things:
//!
//! 1. **Validation** - every request location is checked, all failures are collected and
//!    reported together, and the handler never runs on invalid input.
//! 2. **Typed dispatch** - handlers receive [`ValidatedInput`] plus a [`ResponseBuilder`]
//!    that refuses any status, content type or payload the route did not declare.
//! 3. **Documentation** - [`docs::generate`] renders every registered route as an
//!    OpenAPI 3.1 document.
//!
//! The crate does not own an HTTP server. Runtimes plug in through
//! [`RuntimeAdapter`] and expose requests through [`server::RequestView`];
//! [`server::HttpRuntime`] is a small reference runtime built on the `http` crate.
//!
//! ## Architecture
//!
//! - **[`schema`]** - schema model and the aggregating validator
//! - **[`spec`]** - route descriptions and path template checks
//! - **[`validator`]** - per-request validation pipeline producing [`ValidatedInput`]
//! - **[`typed`]** - handler trait, [`Next`] continuation and the [`ResponseBuilder`]
//! - **[`registry`]** - [`RouteFactory`], the route [`Registry`] and dispatch
//! - **[`docs`]** - OpenAPI 3.1 generation
//! - **[`server`]** - runtime capability set and the reference [`server::HttpRuntime`]
//! - **[`config`]** - validation and logging settings from YAML and environment
//! - **[`telemetry`]** - `tracing` subscriber installation
//! - **[`error`]** - validation, configuration, contract and dispatch errors
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Runtime
//!     participant Endpoint
//!     participant Validator
//!     participant Handler
//!     participant Builder as ResponseBuilder
//!
//!     Runtime->>Endpoint: dispatch(&dyn RequestView)
//!     Endpoint->>Validator: validate_request(spec, request, config)
//!     alt any location invalid
//!         Validator-->>Endpoint: ValidationError (all field errors)
//!         Endpoint-->>Runtime: Err(DispatchError::Validation)
//!     else all locations valid
//!         Validator-->>Endpoint: ValidatedInput
//!         Endpoint->>Handler: handle(input, builder, next)
//!         Handler->>Builder: json(status, payload)
//!         Builder-->>Handler: TypedResponse or contract violation
//!         Handler-->>Endpoint: Reply::Response / Reply::Next / Err
//!         Endpoint-->>Runtime: Result<Reply, DispatchError>
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use typedroute::config::ValidationConfig;
//! use typedroute::schema::Schema;
//! use typedroute::server::HttpRuntime;
//! use typedroute::spec::{Location, RouteSpec};
//! use typedroute::RouteFactory;
//!
//! let mut factory = RouteFactory::new(HttpRuntime::new(), ValidationConfig::default());
//!
//! factory
//!     .register(
//!         RouteSpec::get("/articles/{slug}")
//!             .path_params(Schema::object().field("slug", Schema::string()))
//!             .response(
//!                 200,
//!                 "The article",
//!                 "application/json",
//!                 Schema::object().field("slug", Schema::string()),
//!             ),
//!         |input, res, _next| {
//!             let slug = input.field(Location::PathParams, "slug").cloned();
//!             Ok(res.ok(&serde_json::json!({ "slug": slug }))?.into())
//!         },
//!     )
//!     .unwrap();
//!
//! let runtime = factory.runtime().clone();
//! let res = runtime.handle(http::Request::get("/articles/hello").body(Vec::new()).unwrap());
//! assert_eq!(res.status(), 200);
//!
//! let bad = runtime.handle(http::Request::get("/articles/").body(Vec::new()).unwrap());
//! assert_eq!(bad.status(), 400);
//! ```
//!
//! ## Configuration
//!
//! [`config::Config`] loads from YAML and can be overridden by `TYPEDROUTE_*`
//! environment variables:
//!
//! ```yaml
//! validation:
//!   unknown_fields: reject      # or "allow"
//!   max_body_bytes: 0x100000    # decimal or 0x hex
//!   validate_responses: true
//! logging:
//!   level: info
//!   format: pretty              # or "json"
//! ```

pub mod config;
pub mod docs;
pub mod error;
pub mod ids;
pub mod registry;
pub mod schema;
pub mod server;
pub mod spec;
pub mod telemetry;
pub mod typed;
pub mod validator;

pub use config::{Config, UnknownFieldPolicy, ValidationConfig};
pub use error::{
    DispatchError, FieldError, HandlerError, ResponseContractViolation, SpecConfigurationError,
    ValidationError,
};
pub use registry::{Endpoint, Registry, RouteFactory, RuntimeAdapter};
pub use schema::Schema;
pub use spec::{Location, RouteSpec};
pub use typed::{Handler, HandlerResult, Next, Reply, ResponseBuilder, TypedResponse};
pub use validator::{validate_request, ValidatedInput};
