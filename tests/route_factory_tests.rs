#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{app, fixtures, store};
use http::{Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use typedroute::config::ValidationConfig;
use typedroute::error::{DispatchError, ResponseContractViolation, SpecConfigurationError};
use typedroute::registry::{Endpoint, RouteFactory, RuntimeAdapter};
use typedroute::schema::Schema;
use typedroute::server::ParsedRequest;
use typedroute::spec::RouteSpec;
use typedroute::typed::Reply;

/// Collects endpoints the way a framework binding would
#[derive(Default)]
struct Collected {
    endpoints: Vec<Endpoint>,
}

impl RuntimeAdapter for Collected {
    fn mount(&mut self, endpoint: Endpoint) -> anyhow::Result<()> {
        self.endpoints.push(endpoint);
        Ok(())
    }
}

fn payload(reply: Reply) -> (StatusCode, Value) {
    match reply {
        Reply::Response(res) => (res.status, res.payload.unwrap_or(Value::Null)),
        Reply::Next => panic!("handler passed the request on"),
    }
}

#[test]
fn test_all_routes_reach_the_runtime() {
    let factory = app::articles(Collected::default(), ValidationConfig::default(), &store::seeded());
    let mounted: Vec<String> = factory
        .runtime()
        .endpoints
        .iter()
        .map(|e| e.spec().route_id())
        .collect();
    assert_eq!(
        mounted,
        vec![
            "GET /articles/{slug}",
            "GET /articles",
            "POST /articles",
            "DELETE /articles/{slug}",
        ]
    );
    assert_eq!(factory.registry().len(), 4);
}

#[test]
fn test_get_article_builds_declared_responses() {
    let factory = app::articles(Collected::default(), ValidationConfig::default(), &store::seeded());

    let req = ParsedRequest::new(Method::GET, "/articles/hello").with_path_param("slug", "hello");
    let (status, body) = payload(
        factory
            .dispatch(&Method::GET, "/articles/{slug}", &req)
            .expect("route")
            .expect("dispatch"),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "hello");

    let req = ParsedRequest::new(Method::GET, "/articles/nope").with_path_param("slug", "nope");
    let (status, body) = payload(
        factory
            .dispatch(&Method::GET, "/articles/{slug}", &req)
            .expect("route")
            .expect("dispatch"),
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"title": "Not Found", "detail": "nope"}));
}

#[test]
fn test_invalid_request_never_reaches_handler() {
    let store = store::seeded();
    let factory = app::articles(Collected::default(), ValidationConfig::default(), &store);
    let req = ParsedRequest::new(Method::POST, "/articles")
        .with_header("x-author", "ada")
        .with_body("application/json", r#"{"title": "Nope"}"#);

    let err = factory
        .dispatch(&Method::POST, "/articles", &req)
        .expect("route")
        .unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.lock().unwrap().len(), 2);
}

#[test]
fn test_create_article_sets_location() {
    let store = store::seeded();
    let factory = app::articles(Collected::default(), ValidationConfig::default(), &store);
    let req = ParsedRequest::new(Method::POST, "/articles")
        .with_header("x-author", "ada")
        .with_body("application/json", r#"{"title": "New Post", "body": "text"}"#);

    match factory.dispatch(&Method::POST, "/articles", &req).expect("route") {
        Ok(Reply::Response(res)) => {
            assert_eq!(res.status, StatusCode::CREATED);
            assert_eq!(
                res.headers,
                vec![("location".to_string(), "/articles/new-post".to_string())]
            );
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(store.lock().unwrap().contains_key("new-post"));
}

#[test]
fn test_delete_passes_on_unknown_article() {
    let factory = app::articles(Collected::default(), ValidationConfig::default(), &store::seeded());
    let req = ParsedRequest::new(Method::DELETE, "/articles/ghost")
        .with_path_param("slug", "ghost")
        .with_header("cookie", "session=0123456789");
    let reply = factory
        .dispatch(&Method::DELETE, "/articles/{slug}", &req)
        .expect("route")
        .expect("dispatch");
    assert_eq!(reply, Reply::Next);
}

#[test]
fn test_undeclared_status_is_a_contract_violation() {
    let mut factory = RouteFactory::new(Collected::default(), ValidationConfig::default());
    factory
        .register(fixtures::get_article(), |_input, res, _next| {
            Ok(res.json(500, &json!({"title": "boom"}))?.into())
        })
        .unwrap();

    let req = ParsedRequest::new(Method::GET, "/articles/x").with_path_param("slug", "x");
    let err = factory
        .dispatch(&Method::GET, "/articles/{slug}", &req)
        .expect("route")
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Contract(ResponseContractViolation::UndeclaredStatus { status: 500, .. })
    ));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_payload_outside_schema_is_a_contract_violation() {
    let mut factory = RouteFactory::new(Collected::default(), ValidationConfig::default());
    factory
        .register(fixtures::get_article(), |_input, res, _next| {
            Ok(res.ok(&json!({"slug": "x"}))?.into())
        })
        .unwrap();

    let req = ParsedRequest::new(Method::GET, "/articles/x").with_path_param("slug", "x");
    let err = factory
        .dispatch(&Method::GET, "/articles/{slug}", &req)
        .expect("route")
        .unwrap_err();
    match err {
        DispatchError::Contract(ResponseContractViolation::PayloadMismatch { errors, .. }) => {
            assert_eq!(errors.len(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_response_checks_can_be_disabled() {
    let config = ValidationConfig {
        validate_responses: false,
        ..ValidationConfig::default()
    };
    let mut factory = RouteFactory::new(Collected::default(), config);
    factory
        .register(fixtures::get_article(), |_input, res, _next| {
            Ok(res.ok(&json!({"slug": "x"}))?.into())
        })
        .unwrap();

    let req = ParsedRequest::new(Method::GET, "/articles/x").with_path_param("slug", "x");
    let reply = factory
        .dispatch(&Method::GET, "/articles/{slug}", &req)
        .expect("route")
        .expect("dispatch");
    assert_eq!(payload(reply).1, json!({"slug": "x"}));
}

#[test]
fn test_registration_rejects_bad_specs() {
    let mut factory = app::articles(Collected::default(), ValidationConfig::default(), &store::seeded());

    let duplicate = factory.register(fixtures::get_article(), |_i, _r, next| next.pass());
    assert!(matches!(
        duplicate,
        Err(SpecConfigurationError::DuplicateRoute { .. })
    ));

    let mismatch = factory.register(
        RouteSpec::get("/authors/{id}").path_params(Schema::object().field("name", Schema::string())),
        |_i, _r, next| next.pass(),
    );
    match mismatch {
        Err(SpecConfigurationError::PathParamMismatch {
            missing_in_schema,
            missing_in_path,
            ..
        }) => {
            assert_eq!(missing_in_schema, vec!["id".to_string()]);
            assert_eq!(missing_in_path, vec!["name".to_string()]);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert_eq!(factory.registry().len(), 4);
    assert_eq!(factory.runtime().endpoints.len(), 4);
}

#[test]
fn test_endpoint_is_shareable_across_threads() {
    let factory = app::articles(Collected::default(), ValidationConfig::default(), &store::seeded());
    let endpoint = Arc::new(
        factory
            .endpoint(&Method::GET, "/articles/{slug}")
            .expect("endpoint"),
    );

    let handles: Vec<_> = ["hello", "rust-tips", "missing"]
        .into_iter()
        .map(|slug| {
            let endpoint = Arc::clone(&endpoint);
            std::thread::spawn(move || {
                let req = ParsedRequest::new(Method::GET, &format!("/articles/{slug}"))
                    .with_path_param("slug", slug);
                payload(endpoint.dispatch(&req).expect("dispatch")).0
            })
        })
        .collect();

    let statuses: Vec<StatusCode> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::NOT_FOUND]
    );
}
