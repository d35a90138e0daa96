use crate::schema::Schema;
use http::Method;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Part of a request a value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    PathParams,
    Query,
    Headers,
    Cookies,
    Body,
}

impl Location {
    /// Every location in validation order
    pub const ALL: [Location; 5] = [
        Location::PathParams,
        Location::Query,
        Location::Headers,
        Location::Cookies,
        Location::Body,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Location::PathParams => "pathParams",
            Location::Query => "query",
            Location::Headers => "headers",
            Location::Cookies => "cookies",
            Location::Body => "body",
        }
    }

    /// Value of the OpenAPI parameter `in` field; `None` for the body
    #[must_use]
    pub fn openapi_in(self) -> Option<&'static str> {
        match self {
            Location::PathParams => Some("path"),
            Location::Query => Some("query"),
            Location::Headers => Some("header"),
            Location::Cookies => Some("cookie"),
            Location::Body => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schemas describing the inputs of one route
#[derive(Debug, Clone, Default)]
pub struct RequestSchemas {
    pub path_params: Option<Schema>,
    pub query: Option<Schema>,
    pub headers: Option<Schema>,
    pub cookies: Option<Schema>,
    /// Body schemas keyed by normalized content type
    pub body: BTreeMap<String, Schema>,
    pub body_required: bool,
}

impl RequestSchemas {
    /// Schema of a parameter location; the body is keyed by content type and returns `None`
    #[must_use]
    pub fn parameters(&self, location: Location) -> Option<&Schema> {
        match location {
            Location::PathParams => self.path_params.as_ref(),
            Location::Query => self.query.as_ref(),
            Location::Headers => self.headers.as_ref(),
            Location::Cookies => self.cookies.as_ref(),
            Location::Body => None,
        }
    }
}

/// One declared response of a route
#[derive(Debug, Clone, Default)]
pub struct ResponseContract {
    pub description: String,
    /// Payload schemas keyed by normalized content type; empty for bodiless responses
    pub content: BTreeMap<String, Schema>,
}

/// Full description of one endpoint.
///
/// Built once with the constructors in this module, then shared as
/// `Arc<RouteSpec>` for the life of the process. The documentation fields
/// (`summary`, `description`, `tags`, `deprecated`) only affect generated API
/// documents.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub method: Method,
    /// Path template, e.g. `/articles/{slug}`
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub request: RequestSchemas,
    pub responses: BTreeMap<u16, ResponseContract>,
}

impl RouteSpec {
    /// `METHOD /path` label used in logs and error messages
    #[must_use]
    pub fn route_id(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Declared operation id, or one derived from method and path
    /// (`GET /articles/{slug}` becomes `get_articles_slug`)
    #[must_use]
    pub fn operation_name(&self) -> Cow<'_, str> {
        if let Some(id) = &self.operation_id {
            return Cow::Borrowed(id);
        }
        let mut name = self.method.as_str().to_ascii_lowercase();
        let mut any_segment = false;
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            any_segment = true;
            name.push('_');
            name.extend(
                segment
                    .trim_start_matches('{')
                    .trim_end_matches('}')
                    .chars()
                    .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }),
            );
        }
        if !any_segment {
            name.push_str("_root");
        }
        Cow::Owned(name)
    }

    /// Declared statuses in ascending order
    #[must_use]
    pub fn declared_statuses(&self) -> Vec<u16> {
        self.responses.keys().copied().collect()
    }

    #[must_use]
    pub fn response_for(&self, status: u16) -> Option<&ResponseContract> {
        self.responses.get(&status)
    }

    /// Whether the route declares any request body
    #[must_use]
    pub fn accepts_body(&self) -> bool {
        !self.request.body.is_empty()
    }
}

/// Lower-case a media type and strip its parameters
/// (`Application/JSON; charset=utf-8` becomes `application/json`)
#[must_use]
pub fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a normalized media type carries JSON (`application/json` or `*+json`)
#[must_use]
pub fn is_json_media_type(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}
