use crate::server::RequestView;
use std::fmt;
use ulid::Ulid;

/// Header carrying a caller-supplied correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id recorded on the dispatch span of every request
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(Ulid);

impl RequestId {
    /// The caller's `x-request-id` when it holds a ULID, otherwise a fresh one
    #[must_use]
    pub fn for_request(request: &dyn RequestView) -> Self {
        let id = request
            .request_id_header()
            .and_then(|s| Ulid::from_string(s.trim()).ok())
            .unwrap_or_else(Ulid::new);
        Self(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ParsedRequest;
    use http::Method;

    #[test]
    fn test_caller_ulid_is_reused() {
        let req = ParsedRequest::new(Method::GET, "/ping")
            .with_header(REQUEST_ID_HEADER, " 01ARZ3NDEKTSV4RRFFQ69G5FAV ");
        assert_eq!(
            RequestId::for_request(&req).to_string(),
            "01ARZ3NDEKTSV4RRFFQ69G5FAV"
        );
    }

    #[test]
    fn test_other_values_get_a_fresh_id() {
        let req = ParsedRequest::new(Method::GET, "/ping").with_header(REQUEST_ID_HEADER, "abc");
        let id = RequestId::for_request(&req);
        assert_eq!(id.to_string().len(), 26);
        assert_ne!(id.to_string(), "abc");

        let bare = ParsedRequest::new(Method::GET, "/ping");
        assert_ne!(RequestId::for_request(&bare), id);
    }
}
