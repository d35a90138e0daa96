use super::core::Registry;
use super::endpoint::{Endpoint, RuntimeAdapter};
use crate::config::ValidationConfig;
use crate::docs::{self, ApiDocument, ApiInfo};
use crate::error::{DispatchError, SpecConfigurationError};
use crate::server::RequestView;
use crate::spec::RouteSpec;
use crate::typed::{Handler, HandlerResult, Next, Reply, ResponseBuilder};
use crate::validator::ValidatedInput;
use http::Method;
use std::sync::Arc;
use tracing::{error, info};

/// Registers routes with a runtime and keeps the registry they are documented from.
///
/// Registration takes `&mut self`; dispatch and document generation take `&self`.
pub struct RouteFactory<R: RuntimeAdapter> {
    registry: Registry,
    runtime: R,
    config: Arc<ValidationConfig>,
}

impl<R: RuntimeAdapter> RouteFactory<R> {
    pub fn new(runtime: R, config: ValidationConfig) -> Self {
        Self {
            registry: Registry::new(),
            runtime,
            config: Arc::new(config),
        }
    }

    /// Register a closure handler
    pub fn register<F>(&mut self, spec: RouteSpec, handler: F) -> Result<Endpoint, SpecConfigurationError>
    where
        F: Fn(ValidatedInput, ResponseBuilder, Next) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(spec, handler)
    }

    /// Register any [`Handler`].
    ///
    /// The spec is checked first, then the endpoint is mounted on the runtime, then
    /// the route is stored. Nothing is stored when mounting fails.
    pub fn register_handler<H: Handler>(
        &mut self,
        spec: RouteSpec,
        handler: H,
    ) -> Result<Endpoint, SpecConfigurationError> {
        if let Err(err) = self.registry.check(&spec) {
            error!(route = %spec.route_id(), error = %err, "Route rejected");
            return Err(err);
        }

        let spec = Arc::new(spec);
        let handler: Arc<dyn Handler> = Arc::new(handler);
        let endpoint = Endpoint::new(
            Arc::clone(&spec),
            Arc::clone(&handler),
            Arc::clone(&self.config),
        );

        self.runtime.mount(endpoint.clone()).map_err(|e| {
            error!(route = %spec.route_id(), error = %format!("{e:#}"), "Runtime refused route");
            SpecConfigurationError::Mount {
                method: spec.method.clone(),
                path: spec.path.clone(),
                reason: format!("{e:#}"),
            }
        })?;

        info!(
            route = %spec.route_id(),
            operation_id = %spec.operation_name(),
            routes_count = self.registry.len() + 1,
            "Route registered"
        );
        self.registry.push(spec, handler);
        Ok(endpoint)
    }

    /// Endpoint registered under `method` and `template`
    #[must_use]
    pub fn endpoint(&self, method: &Method, template: &str) -> Option<Endpoint> {
        self.registry.get(method, template).map(|route| {
            Endpoint::new(
                Arc::clone(route.spec()),
                Arc::clone(route.handler()),
                Arc::clone(&self.config),
            )
        })
    }

    /// Dispatch directly to the route registered under `method` and `template`;
    /// `None` when no such route exists
    pub fn dispatch(
        &self,
        method: &Method,
        template: &str,
        request: &dyn RequestView,
    ) -> Option<Result<Reply, DispatchError>> {
        self.endpoint(method, template)
            .map(|endpoint| endpoint.dispatch(request))
    }

    /// Generate the API document for every registered route
    #[must_use]
    pub fn api_document(&self, info: ApiInfo) -> ApiDocument {
        docs::generate(&self.registry, info)
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Hand the runtime over for serving
    pub fn into_runtime(self) -> R {
        self.runtime
    }
}
