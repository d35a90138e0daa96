//! # Error Module
//!
//! Error taxonomy for route registration, request validation, response building
//! and dispatch.
//!
//! | Error | Raised | Meaning |
//! |---|---|---|
//! | [`SpecConfigurationError`] | registration | the route spec is inconsistent or duplicated |
//! | [`ValidationError`] | request time | the client sent input that violates the route's schemas |
//! | [`ResponseContractViolation`] | handler | the handler tried to emit an undeclared response |
//! | [`DispatchError`] | dispatch | what an endpoint hands to the runtime's error channel |
//!
//! Validation errors are fully aggregated: every [`FieldError`] found across all
//! request locations is reported in one [`ValidationError`].

use crate::spec::Location;
use http::{Method, StatusCode};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use smallvec::SmallVec;
use std::fmt;

/// One step in a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member name
    Field(String),
    /// Array element index
    Index(usize),
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathSegment::Field(name) => serializer.serialize_str(name),
            PathSegment::Index(idx) => serializer.serialize_u64(*idx as u64),
        }
    }
}

/// Ordered sequence of field names and array indices locating a value inside a
/// request location.
///
/// Most violations sit a few levels deep, so the segments are stack-allocated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(SmallVec<[PathSegment; 4]>);

impl FieldPath {
    /// The empty path, addressing the location root
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path with an object member
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.0.push(PathSegment::Field(name.to_string()));
        next
    }

    /// Extend the path with an array index
    #[must_use]
    pub fn index(&self, idx: usize) -> Self {
        let mut next = self.clone();
        next.0.push(PathSegment::Index(idx));
        next
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        FieldPath(iter.into_iter().map(|s| PathSegment::Field(s.into())).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for seg in &self.0 {
            seq.serialize_element(seg)?;
        }
        seq.end()
    }
}

/// Category of a [`FieldError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required value is absent
    Missing,
    /// A value is present but has the wrong type
    Type,
    /// A member not declared by an object schema
    Unknown,
    /// A refinement (length, pattern, range, enum, item count, size) failed
    Constraint,
    /// The request content type is not declared for the body
    UnsupportedMediaType,
    /// The body could not be decoded for its content type
    Malformed,
}

/// A single located validation violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Request location the violation was found in
    pub location: Location,
    /// Path of the offending value inside the location
    pub path: FieldPath,
    /// Violation category
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
}

impl FieldError {
    pub fn new(
        location: Location,
        path: FieldPath,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location,
            path,
            kind,
            message: message.into(),
        }
    }

    /// Dotted address of the violation, e.g. `pathParams.slug` or `body.items[2].name`
    #[must_use]
    pub fn pointer(&self) -> String {
        if self.path.is_root() {
            self.location.to_string()
        } else if matches!(self.path.segments().first(), Some(PathSegment::Index(_))) {
            format!("{}{}", self.location, self.path)
        } else {
            format!("{}.{}", self.location, self.path)
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pointer(), self.message)
    }
}

/// Aggregated request validation failure.
///
/// Always holds at least one [`FieldError`]. A request either produces a complete
/// `ValidationError` or a complete [`ValidatedInput`](crate::validator::ValidatedInput).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("request validation failed with {} error(s)", .errors.len())]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Wrap a list of field errors; returns `None` for an empty list
    #[must_use]
    pub fn from_errors(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors found in one location
    pub fn for_location(&self, location: Location) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.location == location)
    }

    /// Distinct locations that failed, in pipeline order
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        Location::ALL
            .into_iter()
            .filter(|loc| self.errors.iter().any(|e| e.location == *loc))
            .collect()
    }

    /// HTTP status a runtime should answer with
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Render as an RFC 7807 problem document
    #[must_use]
    pub fn to_problem_json(&self) -> Value {
        let errors: Vec<Value> = self
            .errors
            .iter()
            .map(|e| {
                json!({
                    "location": e.location,
                    "field": e.path,
                    "pointer": e.pointer(),
                    "kind": e.kind,
                    "message": e.message,
                })
            })
            .collect();
        json!({
            "type": "about:blank",
            "title": "Request validation failed",
            "status": self.status().as_u16(),
            "detail": format!("{} validation error(s)", self.errors.len()),
            "errors": errors,
        })
    }
}

/// Route specification rejected at registration time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecConfigurationError {
    /// Another route already occupies this method and path
    #[error("duplicate route {method} {path} (conflicts with {existing})")]
    DuplicateRoute {
        method: Method,
        path: String,
        existing: String,
    },
    /// Template segments and declared path parameters disagree
    #[error(
        "path parameters of {method} {path} do not match its schema \
         (missing in schema: {missing_in_schema:?}, missing in path: {missing_in_path:?})"
    )]
    PathParamMismatch {
        method: Method,
        path: String,
        missing_in_schema: Vec<String>,
        missing_in_path: Vec<String>,
    },
    /// The path template itself is malformed
    #[error("invalid path template '{path}': {reason}")]
    InvalidPathTemplate { path: String, reason: String },
    /// The path parameter schema must be an object schema
    #[error("path parameter schema of {method} {path} must be an object schema")]
    PathParamsNotObject { method: Method, path: String },
    /// Every template parameter is always present, so it must be declared required
    #[error("path parameter '{name}' of {method} {path} must be required")]
    OptionalPathParam {
        method: Method,
        path: String,
        name: String,
    },
    /// A declared response status lies outside 100..=999
    #[error("invalid response status {status} declared for {method} {path}")]
    InvalidStatus {
        method: Method,
        path: String,
        status: u16,
    },
    /// The runtime's registration hook refused the endpoint
    #[error("runtime refused to mount {method} {path}: {reason}")]
    Mount {
        method: Method,
        path: String,
        reason: String,
    },
}

/// A handler attempted to build a response its route does not declare.
///
/// This is a server-side authoring defect, never a client error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseContractViolation {
    #[error("status {status} is not declared for {route} (declared: {declared:?})")]
    UndeclaredStatus {
        route: String,
        status: u16,
        declared: Vec<u16>,
    },
    #[error(
        "content type '{content_type}' is not declared for status {status} of {route} \
         (declared: {declared:?})"
    )]
    UndeclaredContentType {
        route: String,
        status: u16,
        content_type: String,
        declared: Vec<String>,
    },
    #[error("status {status} of {route} requires a payload (declared: {declared:?})")]
    MissingPayload {
        route: String,
        status: u16,
        declared: Vec<String>,
    },
    #[error("payload for status {status} ({content_type}) of {route} violates its schema: {}", summarize(.errors))]
    PayloadMismatch {
        route: String,
        status: u16,
        content_type: String,
        errors: Vec<FieldError>,
    },
    #[error("payload for status {status} of {route} could not be serialized: {reason}")]
    Serialization {
        route: String,
        status: u16,
        reason: String,
    },
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A typed accessor on [`ValidatedInput`](crate::validator::ValidatedInput) failed
#[derive(Debug, thiserror::Error)]
pub enum InputAccessError {
    #[error("location {0} was not part of the validated input")]
    Absent(Location),
    #[error("location {location} could not be read as the requested type: {source}")]
    Deserialize {
        location: Location,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure returned by a handler
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The handler tried to emit an undeclared response
    #[error(transparent)]
    Contract(#[from] ResponseContractViolation),
    /// Anything else the handler could not cope with
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl From<InputAccessError> for HandlerError {
    fn from(err: InputAccessError) -> Self {
        HandlerError::Failed(err.into())
    }
}

/// Outcome an endpoint hands to the runtime's error channel instead of a reply
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The request did not pass validation; the handler was not invoked
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The handler tried to emit an undeclared response
    #[error(transparent)]
    Contract(#[from] ResponseContractViolation),
    /// The handler failed or panicked
    #[error("handler failed: {0:#}")]
    Handler(anyhow::Error),
}

impl From<HandlerError> for DispatchError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Contract(violation) => DispatchError::Contract(violation),
            HandlerError::Failed(source) => DispatchError::Handler(source),
        }
    }
}

impl DispatchError {
    /// HTTP status a runtime should answer with
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::Validation(err) => err.status(),
            DispatchError::Contract(_) | DispatchError::Handler(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
