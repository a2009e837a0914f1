//! # Schema Models
//!
//! The property-shaped schema tree (`type` / `items` / `properties` / `enum`
//! / `$ref`) plus the per-entity and per-operation IR the synthesizer
//! consumes. Fragments are owned by the entity or operation that declared
//! them until the deduplication pass rewrites duplicates into references.

use crate::parser::models::ParameterNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Any property-shaped schema subtree.
///
/// Serializes with the conventional OpenAPI field names; absent fields are
/// omitted so inline fragments and `$ref` nodes share one representation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaFragment {
    /// Reference to a shared component (`#/components/schemas/Name`).
    /// When set, every other field is left empty.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// The schema type: `string`, `integer`, `number`, `boolean`,
    /// `array`, `object`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format refinement (`uri`, `date-time`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Human description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// OpenAPI 3.0 nullability flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Literal values, original source order.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Item schema when `type` is `array`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaFragment>>,
    /// Property map when `type` is `object`, insertion order preserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaFragment>>,
    /// Names of required properties, declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Deprecation flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

impl SchemaFragment {
    /// A plain typed leaf.
    pub fn typed(schema_type: &str) -> Self {
        SchemaFragment {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    /// A `string` leaf.
    pub fn string() -> Self {
        Self::typed("string")
    }

    /// An `array` schema with the given item schema.
    pub fn array(items: SchemaFragment) -> Self {
        SchemaFragment {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// An `object` schema with the given properties.
    pub fn object(properties: IndexMap<String, SchemaFragment>) -> Self {
        SchemaFragment {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            ..Default::default()
        }
    }

    /// A reference to a shared component by name.
    pub fn reference(name: &str) -> Self {
        SchemaFragment {
            reference: Some(format!("#/components/schemas/{}", name)),
            ..Default::default()
        }
    }
}

/// A parsed entity page: one schema fragment per documented entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntity {
    /// Entity name (from the file stem, e.g. `Account`).
    pub name: String,
    /// Front-matter description.
    pub description: String,
    /// The synthesized object schema for this entity.
    pub schema: SchemaFragment,
}

/// A parsed operation section from a method page.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOperation {
    /// HTTP method, lowercase.
    pub method: String,
    /// Request path (`/api/v1/timelines/public`).
    pub path: String,
    /// Section title, used as the operation summary.
    pub summary: String,
    /// Operation description.
    pub description: String,
    /// The API group (method-page directory name), used as the tag.
    pub tag: String,
    /// Derived operation id, unique per method + path.
    pub operation_id: String,
    /// Query / path / header parameters, documentation order.
    pub parameters: Vec<ParameterNode>,
    /// Form-data body parameters, documentation order.
    pub body_parameters: Vec<ParameterNode>,
    /// The raw `**Returns:**` text, mapped to a response schema by the
    /// envelope assembler.
    pub returns_text: Option<String>,
    /// Whether the operation requires an OAuth token (`**OAuth:** Public`
    /// operations do not).
    pub requires_auth: bool,
    /// Whether the operation's own "added" version exceeds the supported
    /// baseline.
    pub unreleased: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    #[test]
    fn test_fragment_serializes_conventional_keys_only() {
        let fragment = SchemaFragment::array(SchemaFragment {
            schema_type: Some("string".to_string()),
            enum_values: Some(vec!["home".to_string(), "notifications".to_string()]),
            ..Default::default()
        });
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "array",
                "items": { "type": "string", "enum": ["home", "notifications"] }
            })
        );
    }

    #[test]
    fn test_reference_serializes_as_dollar_ref() {
        let fragment = SchemaFragment::reference("FilterContext");
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "$ref": "#/components/schemas/FilterContext" })
        );
    }

    #[test]
    fn test_object_preserves_property_order() {
        let fragment = SchemaFragment::object(indexmap! {
            "endpoint".to_string() => SchemaFragment::string(),
            "keys".to_string() => SchemaFragment::object(indexmap! {
                "p256dh".to_string() => SchemaFragment::string(),
                "auth".to_string() => SchemaFragment::string(),
            }),
        });
        let json = serde_json::to_string(&fragment).unwrap();
        let endpoint = json.find("endpoint").unwrap();
        let keys = json.find("keys").unwrap();
        assert!(endpoint < keys);
    }
}
