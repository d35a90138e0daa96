#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{app, store};
use http::header::{CONTENT_TYPE, LOCATION};
use http::{Request, Response, StatusCode};
use serde_json::Value;
use typedroute::config::ValidationConfig;
use typedroute::docs::ApiInfo;
use typedroute::server::{HttpRuntime, PROBLEM_JSON};

fn runtime() -> HttpRuntime {
    let factory = app::articles(HttpRuntime::new(), ValidationConfig::default(), &store::seeded());
    let runtime = factory.runtime().clone();
    runtime
        .serve_docs("/openapi.json", &factory.api_document(ApiInfo::new("Articles", "1.0.0")))
        .unwrap();
    runtime
}

fn json(res: &Response<Vec<u8>>) -> Value {
    serde_json::from_slice(res.body()).expect("json body")
}

fn content_type(res: &Response<Vec<u8>>) -> &str {
    res.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[test]
fn test_get_and_list() {
    let runtime = runtime();

    let res = runtime.handle(Request::get("/articles/hello").body(Vec::new()).unwrap());
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(&res)["title"], "hello");

    let res = runtime.handle(Request::get("/articles?tag=rust&limit=1").body(Vec::new()).unwrap());
    assert_eq!(res.status(), StatusCode::OK);
    let listed = json(&res);
    assert_eq!(listed["articles"].as_array().map(Vec::len), Some(1));
    assert_eq!(listed["articles"][0]["slug"], "rust-tips");
}

#[test]
fn test_listing_is_not_shadowed_by_template() {
    let runtime = runtime();
    let res = runtime.handle(Request::get("/articles").body(Vec::new()).unwrap());
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn test_create_round_trip() {
    let runtime = runtime();
    let res = runtime.handle(
        Request::post("/articles")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("x-author", "ada")
            .body(b"title=Form+Post&body=hello".to_vec())
            .unwrap(),
    );
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.headers().get(LOCATION).map(|v| v.as_bytes()),
        Some(&b"/articles/form-post"[..])
    );

    let res = runtime.handle(Request::get("/articles/form-post").body(Vec::new()).unwrap());
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(&res)["body"], "hello");
}

#[test]
fn test_validation_failure_is_problem_json() {
    let runtime = runtime();
    let res = runtime.handle(
        Request::post("/articles")
            .header("content-type", "application/json")
            .body(br#"{"title": 5, "extra": true}"#.to_vec())
            .unwrap(),
    );
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&res), PROBLEM_JSON);
    let problem = json(&res);
    let errors = problem["errors"].as_array().expect("errors");
    // x-author header plus three body violations
    assert_eq!(errors.len(), 4);
    assert_eq!(errors[0]["pointer"], "headers.x-author");
}

#[test]
fn test_delete_and_fallthrough() {
    let runtime = runtime();
    let delete = |slug: &str| {
        runtime.handle(
            Request::delete(format!("/articles/{slug}"))
                .header("cookie", "session=0123456789")
                .body(Vec::new())
                .unwrap(),
        )
    };
    let res = delete("hello");
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.body().is_empty());
    assert_eq!(delete("hello").status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_request_id_is_accepted() {
    let runtime = runtime();
    let res = runtime.handle(
        Request::get("/articles/hello")
            .header("x-request-id", "01ARZ3NDEKTSV4RRFFQ69G5FAV")
            .body(Vec::new())
            .unwrap(),
    );
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn test_docs_are_served() {
    let runtime = runtime();
    let res = runtime.handle(Request::get("/openapi.json").body(Vec::new()).unwrap());
    assert_eq!(res.status(), StatusCode::OK);
    let doc = json(&res);
    assert_eq!(doc["info"]["title"], "Articles");
    assert!(doc["paths"]["/articles"]["post"].is_object());
}
