#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{app, store};
use serde_json::json;
use typedroute::config::ValidationConfig;
use typedroute::docs::{generate, ApiInfo};
use typedroute::server::HttpRuntime;

fn document() -> serde_json::Value {
    let factory = app::articles(HttpRuntime::new(), ValidationConfig::default(), &store::seeded());
    factory
        .api_document(ApiInfo::new("Articles", "1.0.0").describe("Blog API"))
        .to_value()
        .unwrap()
}

#[test]
fn test_every_route_is_documented() {
    let doc = document();
    assert_eq!(doc["info"]["description"], "Blog API");
    assert_eq!(doc["tags"], json!([{"name": "articles"}]));
    assert_eq!(
        doc["paths"]["/articles"].as_object().map(|p| p.len()),
        Some(2)
    );
    assert_eq!(
        doc["paths"]["/articles/{slug}"].as_object().map(|p| p.len()),
        Some(2)
    );
    assert_eq!(
        doc["paths"]["/articles/{slug}"]["delete"]["operationId"],
        "delete_articles_slug"
    );
}

#[test]
fn test_shared_schemas_are_components() {
    let doc = document();
    let schemas = doc["components"]["schemas"].as_object().expect("components");
    let mut names: Vec<&String> = schemas.keys().collect();
    names.sort();
    assert_eq!(names, vec!["Article", "Problem"]);
    assert_eq!(
        schemas["Article"]["examples"],
        json!([{"slug": "hello", "title": "Hello", "body": "First post"}])
    );

    let list = &doc["paths"]["/articles"]["get"]["responses"]["200"]["content"]["application/json"]
        ["schema"];
    assert_eq!(
        list["properties"]["articles"]["items"],
        json!({"$ref": "#/components/schemas/Article"})
    );
}

#[test]
fn test_parameters_and_bodies() {
    let doc = document();
    let list = &doc["paths"]["/articles"]["get"];
    assert_eq!(list["parameters"][0]["name"], "limit");
    assert_eq!(list["parameters"][0]["schema"]["default"], 20);
    assert_eq!(list["parameters"][1]["schema"]["type"], "array");

    let create = &doc["paths"]["/articles"]["post"];
    assert_eq!(create["parameters"][0]["in"], "header");
    assert_eq!(create["requestBody"]["required"], true);
    let content = create["requestBody"]["content"].as_object().expect("content");
    assert!(content.contains_key("application/json"));
    assert!(content.contains_key("application/x-www-form-urlencoded"));

    let delete = &doc["paths"]["/articles/{slug}"]["delete"];
    assert_eq!(delete["parameters"][1]["in"], "cookie");
    assert_eq!(delete["responses"]["204"], json!({"description": "Deleted"}));
}

#[test]
fn test_document_is_stable() {
    let factory = app::articles(HttpRuntime::new(), ValidationConfig::default(), &store::seeded());
    let first = generate(factory.registry(), ApiInfo::new("Articles", "1.0.0"));
    let second = generate(factory.registry(), ApiInfo::new("Articles", "1.0.0"));
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.etag().unwrap(), second.etag().unwrap());
    assert!(first.to_yaml().unwrap().contains("/articles/{slug}"));
}
