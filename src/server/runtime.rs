use super::request::{ParamVec, ParsedRequest};
use super::response::{error_response, into_http_response, not_found, set_header};
use crate::docs::ApiDocument;
use crate::error::DispatchError;
use crate::registry::{Endpoint, RuntimeAdapter};
use crate::spec::template_regex;
use crate::typed::Reply;
use anyhow::Context;
use arc_swap::ArcSwap;
use http::header::{CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use http::{Method, Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Maps a dispatch failure to the response sent to the client
pub type ErrorHandler = Arc<dyn Fn(&DispatchError) -> Response<Vec<u8>> + Send + Sync>;

struct MountedRoute {
    method: Method,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    endpoint: Endpoint,
}

impl MountedRoute {
    fn match_path(&self, method: &Method, path: &str) -> Option<ParamVec> {
        if self.method != *method {
            return None;
        }
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = caps.get(i + 1).map_or("", |m| m.as_str());
                    (Arc::clone(name), percent_decode(value))
                })
                .collect(),
        )
    }
}

struct DocsRoute {
    path: String,
    json: Vec<u8>,
    etag: String,
}

/// Reference runtime built on `http` types.
///
/// Selects mounted endpoints by method and path template, in mount order. An endpoint
/// whose handler returns [`Reply::Next`] passes the request to the next match; when
/// nothing accepts it the answer is `404`.
///
/// Clones share one route table. Registration publishes a new table atomically, so
/// serving threads read without locking.
#[derive(Clone)]
pub struct HttpRuntime {
    routes: Arc<ArcSwap<Vec<Arc<MountedRoute>>>>,
    docs: Arc<ArcSwap<Option<DocsRoute>>>,
    error_handler: ErrorHandler,
}

impl Default for HttpRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HttpRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRuntime")
            .field("routes", &self.route_count())
            .finish_non_exhaustive()
    }
}

impl HttpRuntime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Arc::new(ArcSwap::from_pointee(Vec::new())),
            docs: Arc::new(ArcSwap::from_pointee(None)),
            error_handler: Arc::new(error_response),
        }
    }

    /// Replace the default error mapping
    #[must_use]
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&DispatchError) -> Response<Vec<u8>> + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Serve `doc` as JSON at `path` with an `ETag`; a matching `If-None-Match` gets `304`.
    /// Call again after registering more routes to publish a fresh document.
    pub fn serve_docs(&self, path: &str, doc: &ApiDocument) -> anyhow::Result<()> {
        let json = doc
            .to_json()
            .context("failed to serialize API document")?
            .into_bytes();
        let etag = format!("\"{}\"", doc.etag().context("failed to hash API document")?);
        info!(path = %path, etag = %etag, bytes = json.len(), "Serving API document");
        self.docs.store(Arc::new(Some(DocsRoute {
            path: path.to_string(),
            json,
            etag,
        })));
        Ok(())
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.load().len()
    }

    /// Route, validate and dispatch one request
    pub fn handle(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        if let Some(res) = self.docs_response(&req) {
            return res;
        }

        let path = req.uri().path().to_string();
        let method = req.method().clone();
        let routes = self.routes.load();
        let mut candidates = routes
            .iter()
            .filter_map(|route| route.match_path(&method, &path).map(|params| (route, params)))
            .peekable();

        if candidates.peek().is_none() {
            debug!(method = %method, path = %path, "No route matched");
            return not_found(&path);
        }

        let request = ParsedRequest::from_http(req, ParamVec::new());
        for (route, params) in candidates {
            let mut request = request.clone();
            request.path_params = params;
            match route.endpoint.dispatch(&request) {
                Ok(Reply::Response(typed)) => return into_http_response(typed),
                Ok(Reply::Next) => {
                    debug!(route = %route.endpoint.spec().route_id(), "Passed to next route");
                }
                Err(err) => return (self.error_handler)(&err),
            }
        }
        not_found(&path)
    }

    fn docs_response(&self, req: &Request<Vec<u8>>) -> Option<Response<Vec<u8>>> {
        let guard = self.docs.load();
        let docs = (**guard).as_ref()?;
        if req.method() != Method::GET || req.uri().path() != docs.path {
            return None;
        }

        let cached = req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == docs.etag);
        let mut res = if cached {
            let mut res = Response::new(Vec::new());
            *res.status_mut() = StatusCode::NOT_MODIFIED;
            res
        } else {
            let mut res = Response::new(docs.json.clone());
            set_header(&mut res, CONTENT_TYPE.as_str(), "application/json");
            res
        };
        set_header(&mut res, ETAG.as_str(), &docs.etag);
        Some(res)
    }
}

impl RuntimeAdapter for HttpRuntime {
    fn mount(&mut self, endpoint: Endpoint) -> anyhow::Result<()> {
        let spec = Arc::clone(endpoint.spec());
        let (regex, names) = template_regex(&spec.path)
            .with_context(|| format!("cannot route {}", spec.route_id()))?;
        let route = Arc::new(MountedRoute {
            method: spec.method.clone(),
            regex,
            param_names: names.into_iter().map(Arc::from).collect(),
            endpoint,
        });

        self.routes.rcu(|table| {
            let mut next = Vec::clone(table);
            next.push(Arc::clone(&route));
            next
        });
        info!(route = %spec.route_id(), routes_count = self.route_count(), "Route mounted");
        Ok(())
    }
}

/// Decode `%XX` escapes in a path segment; invalid UTF-8 is kept lossily
fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
