use crate::ids::REQUEST_ID_HEADER;
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

/// Maximum number of path parameters before heap allocation.
/// Most REST routes have at most four (`/users/{id}/posts/{post_id}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path parameters as extracted by the runtime.
///
/// Names come from the mounted route template and are shared as `Arc<str>`;
/// values are per-request text.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Read access to a request that the runtime has already matched to a route.
///
/// This is the only view of a request the validation pipeline needs. Header names
/// are expected in lower case; [`RequestView::header`] matches case-insensitively
/// either way. Repeated query keys and headers appear as repeated pairs.
pub trait RequestView {
    fn method(&self) -> &Method;

    /// Request path without the query string
    fn path(&self) -> &str;

    fn path_params(&self) -> &[(Arc<str>, String)];

    /// Decoded query pairs in arrival order
    fn query(&self) -> &[(String, String)];

    fn headers(&self) -> &[(String, String)];

    fn cookies(&self) -> &[(String, String)];

    /// Raw body bytes; empty when the request carries none
    fn body(&self) -> &[u8];

    /// First value of a header, matched case-insensitively
    fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    fn request_id_header(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
    }
}

/// Owned request data implementing [`RequestView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: Method,
    pub path: String,
    pub path_params: ParamVec,
    pub query: Vec<(String, String)>,
    /// Lower-case names
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ParsedRequest {
    /// Request with no parameters, headers or body. `path` may carry a query string.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        let (path, query) = split_path_and_query(path);
        Self {
            method,
            path: path.to_string(),
            path_params: ParamVec::new(),
            query: query.map(parse_query_params).unwrap_or_default(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Build from an `http::Request` plus the path parameters the runtime extracted
    #[must_use]
    pub fn from_http(req: http::Request<Vec<u8>>, path_params: ParamVec) -> Self {
        let (parts, body) = req.into_parts();

        let headers: Vec<(String, String)> = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let cookies = headers
            .iter()
            .filter(|(k, _)| k == "cookie")
            .flat_map(|(_, v)| parse_cookies(v))
            .collect::<Vec<_>>();

        let query = parts
            .uri
            .query()
            .map(parse_query_params)
            .unwrap_or_default();

        debug!(
            method = %parts.method,
            path = %parts.uri.path(),
            header_count = headers.len(),
            cookie_count = cookies.len(),
            query_count = query.len(),
            body_bytes = body.len(),
            "Request parsed"
        );

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            path_params,
            query,
            headers,
            cookies,
            body,
        }
    }

    #[must_use]
    pub fn with_path_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.path_params.push((Arc::from(name), value.into()));
        self
    }

    /// Add a header. A `cookie` header is also parsed into cookies.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if name == "cookie" {
            self.cookies.extend(parse_cookies(&value));
        }
        self.headers.push((name, value));
        self
    }

    /// Set the body and its `content-type` header
    #[must_use]
    pub fn with_body(self, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        let mut req = self.with_header("content-type", content_type);
        req.body = body.into();
        req
    }
}

impl RequestView for ParsedRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn path_params(&self) -> &[(Arc<str>, String)] {
        &self.path_params
    }

    fn query(&self) -> &[(String, String)] {
        &self.query
    }

    fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Parse a `Cookie` header value into name/value pairs
#[must_use]
pub fn parse_cookies(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim().trim_matches('"');
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Decode a query string (without the leading `?`), keeping repeated keys
#[must_use]
pub fn parse_query_params(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn split_path_and_query(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}
