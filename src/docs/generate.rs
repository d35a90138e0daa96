use super::schema::SchemaCollector;
use super::types::{
    ApiDocument, ApiInfo, Components, MediaType, Operation, Parameter, RequestBody, Response, Tag,
    OPENAPI_VERSION,
};
use crate::registry::Registry;
use crate::spec::{Location, RouteSpec};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Project every registered route into an OpenAPI 3.1 document.
///
/// Pure function of the registry: calling it twice without registering anything in
/// between produces equal documents.
#[must_use]
pub fn generate(registry: &Registry, info: ApiInfo) -> ApiDocument {
    let mut collector = SchemaCollector::default();
    let mut paths: BTreeMap<String, BTreeMap<String, Operation>> = BTreeMap::new();
    let mut tags = BTreeSet::new();

    for spec in registry.specs() {
        tags.extend(spec.tags.iter().cloned());
        let operation = operation(spec, &mut collector);
        paths
            .entry(spec.path.clone())
            .or_default()
            .insert(spec.method.as_str().to_ascii_lowercase(), operation);
    }

    let schemas = collector.into_components();
    info!(
        routes_count = registry.len(),
        paths_count = paths.len(),
        components_count = schemas.len(),
        "API document generated"
    );

    ApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info,
        paths,
        components: (!schemas.is_empty()).then_some(Components { schemas }),
        tags: tags.into_iter().map(|name| Tag { name }).collect(),
    }
}

fn operation(spec: &RouteSpec, collector: &mut SchemaCollector) -> Operation {
    let mut parameters = Vec::new();
    for location in [
        Location::PathParams,
        Location::Query,
        Location::Headers,
        Location::Cookies,
    ] {
        let Some(schema) = spec.request.parameters(location) else {
            continue;
        };
        let (Some(obj), Some(param_in)) = (schema.as_object(), location.openapi_in()) else {
            debug!(route = %spec.route_id(), location = %location, "Non-object parameter schema skipped");
            continue;
        };
        for (name, field) in obj.fields() {
            parameters.push(Parameter {
                name: name.to_string(),
                location: param_in.to_string(),
                required: location == Location::PathParams || field.required,
                description: field.schema.description().map(str::to_string),
                schema: collector.convert(&field.schema),
            });
        }
    }

    let request_body = spec.accepts_body().then(|| RequestBody {
        required: spec.request.body_required,
        content: spec
            .request
            .body
            .iter()
            .map(|(ct, schema)| {
                (
                    ct.clone(),
                    MediaType {
                        schema: collector.convert(schema),
                    },
                )
            })
            .collect(),
    });

    let responses = spec
        .responses
        .iter()
        .map(|(status, contract)| {
            (
                status.to_string(),
                Response {
                    description: contract.description.clone(),
                    content: contract
                        .content
                        .iter()
                        .map(|(ct, schema)| {
                            (
                                ct.clone(),
                                MediaType {
                                    schema: collector.convert(schema),
                                },
                            )
                        })
                        .collect(),
                },
            )
        })
        .collect();

    Operation {
        operation_id: spec.operation_name().into_owned(),
        summary: spec.summary.clone(),
        description: spec.description.clone(),
        tags: spec.tags.clone(),
        deprecated: spec.deprecated,
        parameters,
        request_body,
        responses,
    }
}
