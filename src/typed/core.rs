use crate::config::{UnknownFieldPolicy, ValidationConfig};
use crate::error::{HandlerError, ResponseContractViolation};
use crate::schema::{validate, ValidationContext, ValueSource};
use crate::spec::{is_json_media_type, normalize_media_type, Location, ResponseContract, RouteSpec};
use crate::validator::ValidatedInput;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// What a handler returns
pub type HandlerResult = Result<Reply, HandlerError>;

/// Successful handler outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Send this response
    Response(TypedResponse),
    /// Pass the request on to the next matching endpoint
    Next,
}

impl From<TypedResponse> for Reply {
    fn from(response: TypedResponse) -> Self {
        Reply::Response(response)
    }
}

/// Continuation handed to every handler; calling [`Next::pass`] declines the request
#[derive(Debug)]
pub struct Next {
    _private: (),
}

impl Next {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    /// Let the runtime try the next matching endpoint
    pub fn pass(self) -> HandlerResult {
        Ok(Reply::Next)
    }
}

/// Application code invoked with a request's validated input.
///
/// Implemented for every `Fn(ValidatedInput, ResponseBuilder, Next) -> HandlerResult`
/// closure, so most routes register a closure directly.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, input: ValidatedInput, res: ResponseBuilder, next: Next) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(ValidatedInput, ResponseBuilder, Next) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, input: ValidatedInput, res: ResponseBuilder, next: Next) -> HandlerResult {
        self(input, res, next)
    }
}

/// A response that matches one of its route's declared contracts
#[derive(Debug, Clone, PartialEq)]
pub struct TypedResponse {
    pub status: StatusCode,
    /// `None` for bodiless responses
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    /// Payload as built by the handler
    pub payload: Option<Value>,
    /// Serialized payload
    pub body: Vec<u8>,
}

impl TypedResponse {
    /// Attach a response header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Builds responses for one route, refusing any status, content type or payload the
/// route does not declare.
///
/// Handlers receive a fresh builder with every request.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    route: Arc<RouteSpec>,
    validate_payloads: bool,
}

impl ResponseBuilder {
    #[must_use]
    pub fn new(route: Arc<RouteSpec>, config: &ValidationConfig) -> Self {
        Self {
            route,
            validate_payloads: config.validate_responses,
        }
    }

    #[must_use]
    pub fn route(&self) -> &RouteSpec {
        &self.route
    }

    /// Build a response with an explicit content type
    pub fn build(
        &self,
        status: u16,
        content_type: &str,
        payload: Value,
    ) -> Result<TypedResponse, ResponseContractViolation> {
        let contract = self.contract(status)?;
        let content_type = normalize_media_type(content_type);
        let Some(schema) = contract.content.get(&content_type) else {
            return Err(ResponseContractViolation::UndeclaredContentType {
                route: self.route.route_id(),
                status,
                content_type,
                declared: contract.content.keys().cloned().collect(),
            });
        };

        if self.validate_payloads {
            let ctx = ValidationContext::new(Location::Body, ValueSource::Json)
                .with_unknown_fields(UnknownFieldPolicy::Reject);
            if let Err(errors) = validate(schema, &payload, &ctx) {
                return Err(ResponseContractViolation::PayloadMismatch {
                    route: self.route.route_id(),
                    status,
                    content_type,
                    errors,
                });
            }
        }

        let body = match (&payload, is_json_media_type(&content_type)) {
            (Value::String(text), false) => text.clone().into_bytes(),
            (other, false) => other.to_string().into_bytes(),
            (other, true) => serde_json::to_vec(other).map_err(|e| {
                ResponseContractViolation::Serialization {
                    route: self.route.route_id(),
                    status,
                    reason: e.to_string(),
                }
            })?,
        };

        Ok(TypedResponse {
            status: self.status_code(status)?,
            content_type: Some(content_type),
            headers: Vec::new(),
            payload: Some(payload),
            body,
        })
    }

    /// Serialize `payload` as the status's JSON content type
    pub fn json<T: Serialize + ?Sized>(
        &self,
        status: u16,
        payload: &T,
    ) -> Result<TypedResponse, ResponseContractViolation> {
        let value =
            serde_json::to_value(payload).map_err(|e| ResponseContractViolation::Serialization {
                route: self.route.route_id(),
                status,
                reason: e.to_string(),
            })?;
        let content_type = self
            .route
            .response_for(status)
            .and_then(|c| c.content.keys().find(|ct| is_json_media_type(ct)))
            .map_or("application/json", String::as_str);
        self.build(status, content_type, value)
    }

    /// `200` with a JSON payload
    pub fn ok<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<TypedResponse, ResponseContractViolation> {
        self.json(200, payload)
    }

    /// Plain text payload, using the status's declared `text/*` type
    pub fn text(
        &self,
        status: u16,
        text: impl Into<String>,
    ) -> Result<TypedResponse, ResponseContractViolation> {
        let content_type = self
            .route
            .response_for(status)
            .and_then(|c| c.content.keys().find(|ct| ct.starts_with("text/")))
            .map_or("text/plain", String::as_str);
        self.build(status, content_type, Value::String(text.into()))
    }

    /// Bodiless response; the status must be declared without content
    pub fn empty(&self, status: u16) -> Result<TypedResponse, ResponseContractViolation> {
        let contract = self.contract(status)?;
        if !contract.content.is_empty() {
            return Err(ResponseContractViolation::MissingPayload {
                route: self.route.route_id(),
                status,
                declared: contract.content.keys().cloned().collect(),
            });
        }
        Ok(TypedResponse {
            status: self.status_code(status)?,
            content_type: None,
            headers: Vec::new(),
            payload: None,
            body: Vec::new(),
        })
    }

    fn contract(&self, status: u16) -> Result<&ResponseContract, ResponseContractViolation> {
        self.route
            .response_for(status)
            .ok_or_else(|| ResponseContractViolation::UndeclaredStatus {
                route: self.route.route_id(),
                status,
                declared: self.route.declared_statuses(),
            })
    }

    fn status_code(&self, status: u16) -> Result<StatusCode, ResponseContractViolation> {
        StatusCode::from_u16(status).map_err(|_| ResponseContractViolation::UndeclaredStatus {
            route: self.route.route_id(),
            status,
            declared: self.route.declared_statuses(),
        })
    }
}
