use crate::error::DispatchError;
use crate::typed::TypedResponse;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use serde_json::{json, Value};
use tracing::warn;

/// Media type of error bodies
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Serialize a typed response. Headers with invalid names or values are dropped.
#[must_use]
pub fn into_http_response(typed: TypedResponse) -> Response<Vec<u8>> {
    let mut res = Response::new(typed.body);
    *res.status_mut() = typed.status;
    if let Some(content_type) = typed.content_type {
        set_header(&mut res, CONTENT_TYPE.as_str(), &content_type);
    }
    for (name, value) in &typed.headers {
        set_header(&mut res, name, value);
    }
    res
}

/// Default error channel mapping: validation failures become `400` problem documents
/// listing every field error; contract violations and handler failures become `500`
/// without internal detail.
#[must_use]
pub fn error_response(err: &DispatchError) -> Response<Vec<u8>> {
    match err {
        DispatchError::Validation(validation) => {
            problem_response(validation.status(), &validation.to_problem_json())
        }
        DispatchError::Contract(_) | DispatchError::Handler(_) => problem_response(
            err.status(),
            &json!({
                "type": "about:blank",
                "title": "Internal Server Error",
                "status": err.status().as_u16(),
            }),
        ),
    }
}

/// `404` problem document for requests no endpoint accepted
#[must_use]
pub fn not_found(path: &str) -> Response<Vec<u8>> {
    problem_response(
        StatusCode::NOT_FOUND,
        &json!({
            "type": "about:blank",
            "title": "Not Found",
            "status": 404,
            "detail": format!("no route accepted {path}"),
        }),
    )
}

pub fn problem_response(status: StatusCode, body: &Value) -> Response<Vec<u8>> {
    let mut res = Response::new(body.to_string().into_bytes());
    *res.status_mut() = status;
    set_header(&mut res, CONTENT_TYPE.as_str(), PROBLEM_JSON);
    res
}

pub(crate) fn set_header(res: &mut Response<Vec<u8>>, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            res.headers_mut().append(name, value);
        }
        _ => warn!(header = %name, "Dropping invalid response header"),
    }
}
