use crate::error::SpecConfigurationError;
use crate::spec::{check_consistency, normalized_template, RouteSpec};
use crate::typed::Handler;
use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// A route and the handler serving it
#[derive(Clone)]
pub struct RegisteredRoute {
    spec: Arc<RouteSpec>,
    handler: Arc<dyn Handler>,
}

impl RegisteredRoute {
    #[must_use]
    pub fn spec(&self) -> &Arc<RouteSpec> {
        &self.spec
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl fmt::Debug for RegisteredRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredRoute")
            .field("route", &self.spec.route_id())
            .finish_non_exhaustive()
    }
}

/// Append-only collection of registered routes, in registration order.
///
/// Routes are keyed by method plus path template with parameter names erased, so
/// `GET /a/{x}` and `GET /a/{y}` collide.
#[derive(Default)]
pub struct Registry {
    routes: Vec<RegisteredRoute>,
    index: HashMap<(Method, String), usize>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a spec for internal consistency and for collisions with registered routes
    pub fn check(&self, spec: &RouteSpec) -> Result<(), SpecConfigurationError> {
        check_consistency(spec)?;
        let key = (spec.method.clone(), normalized_template(&spec.path));
        if let Some(&idx) = self.index.get(&key) {
            return Err(SpecConfigurationError::DuplicateRoute {
                method: spec.method.clone(),
                path: spec.path.clone(),
                existing: self.routes[idx].spec.route_id(),
            });
        }
        Ok(())
    }

    /// Validate and store a route
    pub fn insert(
        &mut self,
        spec: RouteSpec,
        handler: Arc<dyn Handler>,
    ) -> Result<&RegisteredRoute, SpecConfigurationError> {
        self.check(&spec)?;
        Ok(self.push(Arc::new(spec), handler))
    }

    /// Store a route already accepted by [`Registry::check`]
    pub(crate) fn push(
        &mut self,
        spec: Arc<RouteSpec>,
        handler: Arc<dyn Handler>,
    ) -> &RegisteredRoute {
        let key = (spec.method.clone(), normalized_template(&spec.path));
        let idx = self.routes.len();
        debug!(route = %spec.route_id(), index = idx, "Route stored");
        self.index.insert(key, idx);
        self.routes.push(RegisteredRoute { spec, handler });
        &self.routes[idx]
    }

    /// Look a route up by method and template (parameter names are ignored)
    #[must_use]
    pub fn get(&self, method: &Method, template: &str) -> Option<&RegisteredRoute> {
        self.index
            .get(&(method.clone(), normalized_template(template)))
            .map(|&idx| &self.routes[idx])
    }

    /// Routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[RegisteredRoute] {
        &self.routes
    }

    pub fn specs(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.iter().map(|r| r.spec.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log every registered route at info level
    pub fn log_routes(&self) {
        let routes: Vec<String> = self.routes.iter().map(|r| r.spec.route_id()).collect();
        info!(routes_count = routes.len(), routes = ?routes, "Registered routes");
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}
