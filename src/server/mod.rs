//! # Server Module
//!
//! The capability set the core needs from an HTTP runtime, plus one reference
//! runtime built on the `http` crate.
//!
//! - [`RequestView`] - read access to a matched request (method, path, path
//!   parameters, query, headers, cookies, body)
//! - [`RuntimeAdapter`](crate::registry::RuntimeAdapter) - the registration hook
//! - [`DispatchError`](crate::error::DispatchError) - the error channel, mapped to HTTP
//!   by [`error_response`] unless a custom handler is installed
//!
//! [`HttpRuntime`] is deliberately simple: a linear scan over compiled path
//! templates. It exists so the capability set can be exercised end to end, not as a
//! production router.
//!
//! ## Example
//!
//! ```rust
//! use typedroute::config::ValidationConfig;
//! use typedroute::registry::RouteFactory;
//! use typedroute::schema::Schema;
//! use typedroute::server::HttpRuntime;
//! use typedroute::spec::RouteSpec;
//!
//! let mut factory = RouteFactory::new(HttpRuntime::new(), ValidationConfig::default());
//! factory
//!     .register(
//!         RouteSpec::get("/ping").response(200, "Pong", "text/plain", Schema::string()),
//!         |_input, res, _next| Ok(res.text(200, "pong")?.into()),
//!     )
//!     .unwrap();
//!
//! let runtime = factory.runtime().clone();
//! let req = http::Request::get("/ping").body(Vec::new()).unwrap();
//! let res = runtime.handle(req);
//! assert_eq!(res.status(), 200);
//! assert_eq!(res.body(), b"pong");
//! ```

mod request;
mod response;
mod runtime;

pub use request::{
    parse_cookies, parse_query_params, ParamVec, ParsedRequest, RequestView, MAX_INLINE_PARAMS,
};
pub use response::{error_response, into_http_response, not_found, problem_response, PROBLEM_JSON};
pub use runtime::{ErrorHandler, HttpRuntime};
