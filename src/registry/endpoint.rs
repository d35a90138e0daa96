use crate::config::ValidationConfig;
use crate::error::{DispatchError, HandlerError};
use crate::ids::RequestId;
use crate::server::RequestView;
use crate::spec::RouteSpec;
use crate::typed::{Handler, Next, Reply, ResponseBuilder};
use crate::validator::validate_request;
use anyhow::anyhow;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn};

/// The registration hook of an HTTP runtime.
///
/// [`RouteFactory`](super::RouteFactory) calls `mount` once per route before storing
/// it. The runtime keeps the endpoint and invokes [`Endpoint::dispatch`] for every
/// request it matches to the endpoint's path template.
pub trait RuntimeAdapter {
    fn mount(&mut self, endpoint: Endpoint) -> anyhow::Result<()>;
}

/// Invocation callback handed to a runtime for one route
#[derive(Clone)]
pub struct Endpoint {
    spec: Arc<RouteSpec>,
    handler: Arc<dyn Handler>,
    config: Arc<ValidationConfig>,
}

impl Endpoint {
    #[must_use]
    pub fn new(
        spec: Arc<RouteSpec>,
        handler: Arc<dyn Handler>,
        config: Arc<ValidationConfig>,
    ) -> Self {
        Self {
            spec,
            handler,
            config,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &Arc<RouteSpec> {
        &self.spec
    }

    /// Validate the request and, if it passes, run the handler.
    ///
    /// The handler is never invoked for an invalid request. A panicking handler is
    /// reported as [`DispatchError::Handler`].
    pub fn dispatch(&self, request: &dyn RequestView) -> Result<Reply, DispatchError> {
        let request_id = RequestId::for_request(request);
        let route = self.spec.route_id();
        let span = info_span!("dispatch", request_id = %request_id, route = %route);
        let _entered = span.enter();

        let input = validate_request(&self.spec, request, &self.config)?;
        let res = ResponseBuilder::new(Arc::clone(&self.spec), &self.config);

        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.handler.handle(input, res, Next::new())
        }));
        let elapsed_us = started.elapsed().as_micros() as u64;

        match outcome {
            Ok(Ok(reply)) => {
                match &reply {
                    Reply::Response(response) => info!(
                        status = response.status.as_u16(),
                        elapsed_us = elapsed_us,
                        "Handler completed"
                    ),
                    Reply::Next => info!(elapsed_us = elapsed_us, "Handler passed to next"),
                }
                Ok(reply)
            }
            Ok(Err(HandlerError::Contract(violation))) => {
                error!(error = %violation, "Handler emitted an undeclared response");
                Err(DispatchError::Contract(violation))
            }
            Ok(Err(HandlerError::Failed(source))) => {
                warn!(error = %format!("{source:#}"), elapsed_us = elapsed_us, "Handler failed");
                Err(DispatchError::Handler(source))
            }
            Err(panic) => {
                let panic_message = panic_message(panic.as_ref());
                error!(panic_message = %panic_message, "Handler panicked");
                Err(DispatchError::Handler(anyhow!(
                    "handler for {route} panicked: {panic_message}"
                )))
            }
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("route", &self.spec.route_id())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
