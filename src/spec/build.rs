use super::types::{normalize_media_type, RequestSchemas, ResponseContract, RouteSpec};
use crate::schema::Schema;
use http::Method;
use std::collections::BTreeMap;

impl RouteSpec {
    /// Start a route with no inputs and no declared responses
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            operation_id: None,
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            request: RequestSchemas::default(),
            responses: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Object schema whose members match the `{name}` segments of the path template
    #[must_use]
    pub fn path_params(mut self, schema: Schema) -> Self {
        self.request.path_params = Some(schema);
        self
    }

    #[must_use]
    pub fn query(mut self, schema: Schema) -> Self {
        self.request.query = Some(schema);
        self
    }

    /// Object schema of the headers the route reads; names match case-insensitively
    #[must_use]
    pub fn headers(mut self, schema: Schema) -> Self {
        self.request.headers = Some(schema);
        self
    }

    #[must_use]
    pub fn cookies(mut self, schema: Schema) -> Self {
        self.request.cookies = Some(schema);
        self
    }

    /// Accept a body of `content_type` described by `schema`. Call once per accepted type.
    #[must_use]
    pub fn body(mut self, content_type: &str, schema: Schema) -> Self {
        self.request
            .body
            .insert(normalize_media_type(content_type), schema);
        self
    }

    /// Reject requests that carry no body
    #[must_use]
    pub fn body_required(mut self) -> Self {
        self.request.body_required = true;
        self
    }

    /// Declare a response with a payload. Repeat with another content type to offer
    /// several representations of the same status.
    #[must_use]
    pub fn response(
        mut self,
        status: u16,
        description: impl Into<String>,
        content_type: &str,
        schema: Schema,
    ) -> Self {
        let contract = self.responses.entry(status).or_default();
        contract.description = description.into();
        contract
            .content
            .insert(normalize_media_type(content_type), schema);
        self
    }

    /// Declare a response without a payload (e.g. `204`)
    #[must_use]
    pub fn response_empty(mut self, status: u16, description: impl Into<String>) -> Self {
        self.responses.insert(
            status,
            ResponseContract {
                description: description.into(),
                content: BTreeMap::new(),
            },
        );
        self
    }
}
