//! # Document Envelope
//!
//! Wraps the synthesized schema graph into an OpenAPI 3.0 document: `info`,
//! the `{instance}` server variable, OAuth2 + Bearer security schemes,
//! `paths` assembled from parsed operations, and `components.schemas` with
//! the entity schemas followed by the shared enum components. Everything is
//! insertion-ordered so repeated runs over identical input serialize to
//! byte-identical output.

use crate::error::AppResult;
use crate::oas::models::{ParsedEntity, ParsedOperation, SchemaFragment};
use crate::oas::schemas::map_type_text;
use crate::parser::models::{ParamLocation, ParameterNode};
use indexmap::IndexMap;
use serde::Serialize;

/// A complete OpenAPI document, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct OpenApiDocument {
    /// OpenAPI version string.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Server list.
    pub servers: Vec<Server>,
    /// Path → method → operation, insertion order.
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
    /// Shared schemas and security schemes.
    pub components: Components,
}

/// The `info` object.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// Document description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The supported API version the document was generated against.
    pub version: String,
}

/// One server entry.
#[derive(Debug, Clone, Serialize)]
pub struct Server {
    /// Server URL template.
    pub url: String,
    /// URL template variables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

/// A server URL template variable.
#[derive(Debug, Clone, Serialize)]
pub struct ServerVariable {
    /// Default value substituted into the URL template.
    pub default: String,
    /// Variable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `components` object.
#[derive(Debug, Clone, Serialize)]
pub struct Components {
    /// Entity schemas first, shared enum components after.
    pub schemas: IndexMap<String, SchemaFragment>,
    /// Security scheme definitions.
    #[serde(rename = "securitySchemes")]
    pub security_schemes: IndexMap<String, serde_json::Value>,
}

/// One operation under a path item.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    /// Section title.
    pub summary: String,
    /// Operation description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Derived operation id.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// API group tags.
    pub tags: Vec<String>,
    /// Query / path / header parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterObject>,
    /// Form-data request body, when documented.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status code → response.
    pub responses: IndexMap<String, Response>,
    /// Security requirements; absent on public operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
    /// Vendor flag for operations added after the supported version.
    #[serde(rename = "x-unreleased", skip_serializing_if = "Option::is_none")]
    pub unreleased: Option<bool>,
}

/// A non-body parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterObject {
    /// Parameter name.
    pub name: String,
    /// Parameter location (`query`, `path`, `header`).
    #[serde(rename = "in")]
    pub location: String,
    /// Parameter description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Present and true only for required parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Parameter schema.
    pub schema: SchemaFragment,
}

/// A request body with one media type.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Media type → schema wrapper.
    pub content: IndexMap<String, MediaType>,
    /// Present and true when any body parameter is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A media type wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// The payload schema.
    pub schema: SchemaFragment,
}

/// One response entry.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Response description.
    pub description: String,
    /// Media type → schema wrapper, when the payload shape is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Assembles [`OpenApiDocument`]s from parsed entities and operations.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    title: String,
    supported_version: String,
}

impl DocumentBuilder {
    /// Creates a builder targeting the given supported API version.
    pub fn new(supported_version: &str) -> Self {
        DocumentBuilder {
            title: "Mastodon API".to_string(),
            supported_version: supported_version.to_string(),
        }
    }

    /// Assembles the document. `shared_components` follow the entity
    /// schemas in `components.schemas`.
    pub fn build(
        &self,
        entities: &[ParsedEntity],
        operations: &[ParsedOperation],
        shared_components: &IndexMap<String, SchemaFragment>,
    ) -> OpenApiDocument {
        let mut schemas = IndexMap::new();
        for entity in entities {
            schemas.insert(entity.name.clone(), entity.schema.clone());
        }
        for (name, schema) in shared_components {
            schemas.insert(name.clone(), schema.clone());
        }

        let mut paths: IndexMap<String, IndexMap<String, Operation>> = IndexMap::new();
        for op in operations {
            paths
                .entry(op.path.clone())
                .or_default()
                .insert(op.method.clone(), build_operation(op));
        }

        OpenApiDocument {
            openapi: "3.0.4".to_string(),
            info: Info {
                title: self.title.clone(),
                description: Some(
                    "Generated from the Mastodon API documentation.".to_string(),
                ),
                version: self.supported_version.clone(),
            },
            servers: vec![Server {
                url: "https://{instance}".to_string(),
                variables: indexmap::indexmap! {
                    "instance".to_string() => ServerVariable {
                        default: "mastodon.social".to_string(),
                        description: Some("Domain of your Mastodon instance".to_string()),
                    },
                },
            }],
            paths,
            components: Components {
                schemas,
                security_schemes: security_schemes(),
            },
        }
    }
}

impl OpenApiDocument {
    /// Serializes the document as YAML.
    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> AppResult<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

fn build_operation(op: &ParsedOperation) -> Operation {
    let parameters = op.parameters.iter().map(parameter_object).collect();

    let request_body = if op.body_parameters.is_empty() {
        None
    } else {
        Some(body_from_parameters(&op.body_parameters))
    };

    let mut responses = IndexMap::new();
    responses.insert("200".to_string(), success_response(op.returns_text.as_deref()));
    if op.requires_auth {
        responses.insert(
            "401".to_string(),
            Response {
                description: "Unauthorized".to_string(),
                content: None,
            },
        );
    }
    responses.insert(
        "404".to_string(),
        Response {
            description: "Not found".to_string(),
            content: None,
        },
    );
    responses.insert(
        "422".to_string(),
        Response {
            description: "Unprocessable entity".to_string(),
            content: None,
        },
    );

    let security = if op.requires_auth {
        Some(vec![indexmap::indexmap! {
            "OAuth2".to_string() => Vec::new(),
        }])
    } else {
        None
    };

    Operation {
        summary: op.summary.clone(),
        description: if op.description.is_empty() {
            None
        } else {
            Some(op.description.clone())
        },
        operation_id: op.operation_id.clone(),
        tags: vec![op.tag.clone()],
        parameters,
        request_body,
        responses,
        security,
        unreleased: op.unreleased.then_some(true),
    }
}

fn parameter_object(node: &ParameterNode) -> ParameterObject {
    ParameterObject {
        name: node.name.clone(),
        location: location_name(node.location).to_string(),
        description: if node.description.is_empty() {
            None
        } else {
            Some(node.description.clone())
        },
        required: node.required.then_some(true),
        schema: node.schema.clone(),
    }
}

fn body_from_parameters(nodes: &[ParameterNode]) -> RequestBody {
    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    for node in nodes {
        if node.required {
            required.push(node.name.clone());
        }
        let mut schema = node.schema.clone();
        if !node.description.is_empty() && schema.reference.is_none() {
            schema.description = Some(node.description.clone());
        }
        properties.insert(node.name.clone(), schema);
    }

    let mut schema = SchemaFragment::object(properties);
    if !required.is_empty() {
        schema.required = Some(required.clone());
    }

    RequestBody {
        content: indexmap::indexmap! {
            "application/json".to_string() => MediaType { schema },
        },
        required: (!required.is_empty()).then_some(true),
    }
}

fn success_response(returns_text: Option<&str>) -> Response {
    match returns_text {
        Some(text) => Response {
            description: text.to_string(),
            content: Some(indexmap::indexmap! {
                "application/json".to_string() => MediaType {
                    schema: map_type_text(text, None),
                },
            }),
        },
        None => Response {
            description: "Success".to_string(),
            content: None,
        },
    }
}

fn location_name(location: ParamLocation) -> &'static str {
    match location {
        ParamLocation::Query => "query",
        ParamLocation::Path => "path",
        ParamLocation::Header => "header",
        // Body parameters never serialize as parameter objects.
        ParamLocation::Body => "body",
    }
}

fn security_schemes() -> IndexMap<String, serde_json::Value> {
    indexmap::indexmap! {
        "OAuth2".to_string() => serde_json::json!({
            "type": "oauth2",
            "flows": {
                "authorizationCode": {
                    "authorizationUrl": "https://{instance}/oauth/authorize",
                    "tokenUrl": "https://{instance}/oauth/token",
                    "scopes": {
                        "read": "Read account information and content",
                        "write": "Create and modify content",
                        "follow": "Manage relationships",
                        "push": "Receive push notifications",
                    },
                },
            },
        }),
        "BearerAuth".to_string() => serde_json::json!({
            "type": "http",
            "scheme": "bearer",
        }),
    }
}
