//! # Registry Module
//!
//! Route registration and dispatch.
//!
//! [`RouteFactory`] is the entry point. For each route it:
//!
//! 1. checks the `RouteSpec` (path template syntax, template segments against the
//!    path-parameter schema, duplicates)
//! 2. builds an [`Endpoint`] and hands it to the [`RuntimeAdapter`]
//! 3. appends the route to the [`Registry`]
//!
//! At request time the runtime calls [`Endpoint::dispatch`], which runs the validation
//! pipeline and then the handler. Validation failures never reach the handler.
//!
//! ## Example
//!
//! ```rust
//! use typedroute::config::ValidationConfig;
//! use typedroute::registry::{Endpoint, RouteFactory, RuntimeAdapter};
//! use typedroute::schema::Schema;
//! use typedroute::spec::RouteSpec;
//!
//! #[derive(Default)]
//! struct Mounted(Vec<Endpoint>);
//!
//! impl RuntimeAdapter for Mounted {
//!     fn mount(&mut self, endpoint: Endpoint) -> anyhow::Result<()> {
//!         self.0.push(endpoint);
//!         Ok(())
//!     }
//! }
//!
//! let mut factory = RouteFactory::new(Mounted::default(), ValidationConfig::default());
//! let spec = RouteSpec::get("/health").response(200, "Healthy", "text/plain", Schema::string());
//! factory
//!     .register(spec, |_input, res, _next| Ok(res.text(200, "ok")?.into()))
//!     .unwrap();
//!
//! let duplicate = RouteSpec::get("/health");
//! assert!(factory.register(duplicate, |_i, _r, next| next.pass()).is_err());
//! assert_eq!(factory.runtime().0.len(), 1);
//! ```

mod core;
mod endpoint;
mod factory;

pub use core::{RegisteredRoute, Registry};
pub use endpoint::{Endpoint, RuntimeAdapter};
pub use factory::RouteFactory;
