use super::*;
use crate::config::ValidationConfig;
use crate::error::ResponseContractViolation;
use crate::schema::Schema;
use crate::spec::RouteSpec;
use http::StatusCode;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

fn article_schema() -> Schema {
    Schema::object()
        .field("slug", Schema::string())
        .field("title", Schema::string())
}

fn builder_with(config: &ValidationConfig) -> ResponseBuilder {
    let spec = RouteSpec::get("/articles/{slug}")
        .path_params(Schema::object().field("slug", Schema::string()))
        .response(200, "The article", "application/json", article_schema())
        .response(404, "Not found", "text/plain", Schema::string())
        .response_empty(304, "Not modified");
    ResponseBuilder::new(Arc::new(spec), config)
}

fn builder() -> ResponseBuilder {
    builder_with(&ValidationConfig::default())
}

#[derive(Serialize)]
struct Article<'a> {
    slug: &'a str,
    title: &'a str,
}

#[test]
fn test_ok_serializes_declared_payload() {
    let res = builder()
        .ok(&Article {
            slug: "foo-bar",
            title: "Foo",
        })
        .expect("declared");
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&res.body).expect("json"),
        json!({"slug": "foo-bar", "title": "Foo"})
    );
}

#[test]
fn test_undeclared_status_is_refused() {
    let err = builder().json(201, &json!({})).expect_err("201 undeclared");
    match err {
        ResponseContractViolation::UndeclaredStatus { status, declared, .. } => {
            assert_eq!(status, 201);
            assert_eq!(declared, vec![200, 304, 404]);
        }
        other => panic!("unexpected violation: {other}"),
    }
}

#[test]
fn test_undeclared_content_type_is_refused() {
    let err = builder()
        .build(200, "text/html", json!("<p>hi</p>"))
        .expect_err("html undeclared");
    assert!(matches!(
        err,
        ResponseContractViolation::UndeclaredContentType { .. }
    ));
}

#[test]
fn test_payload_must_match_schema() {
    let err = builder().ok(&json!({"slug": "x"})).expect_err("missing title");
    match err {
        ResponseContractViolation::PayloadMismatch { errors, .. } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].path.to_string(), "title");
        }
        other => panic!("unexpected violation: {other}"),
    }
}

#[test]
fn test_payload_check_can_be_disabled() {
    let config = ValidationConfig {
        validate_responses: false,
        ..ValidationConfig::default()
    };
    assert!(builder_with(&config).ok(&json!({"slug": "x"})).is_ok());
    assert!(builder_with(&config).json(201, &json!({})).is_err());
}

#[test]
fn test_text_and_empty_responses() {
    let res = builder().text(404, "no such article").expect("declared text");
    assert_eq!(res.body, b"no such article");
    assert_eq!(res.content_type.as_deref(), Some("text/plain"));

    let res = builder()
        .empty(304)
        .expect("bodiless")
        .with_header("etag", "\"abc\"");
    assert!(res.body.is_empty());
    assert_eq!(res.headers, vec![("etag".to_string(), "\"abc\"".to_string())]);

    assert!(matches!(
        builder().empty(200),
        Err(ResponseContractViolation::MissingPayload { .. })
    ));
}

#[test]
fn test_next_pass_yields_next_reply() {
    assert!(matches!(Next::new().pass(), Ok(Reply::Next)));
}
