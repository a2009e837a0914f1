//! # Entity Schema Building
//!
//! Maps extracted [`AttributeRecord`]s onto [`SchemaFragment`] trees: the
//! declared type text (still prose at this point) becomes `type` / `format` /
//! `items` / `$ref`, enumerable attributes carry their literal values, and
//! non-optional attributes make up the entity's `required` list.

use crate::oas::models::SchemaFragment;
use crate::parser::models::AttributeRecord;
use regex::Regex;
use std::sync::OnceLock;

fn entity_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `[Account]({{< relref "entities/Account" >}})` or a bare `[Account]`.
    RE.get_or_init(|| Regex::new(r"\[([A-Za-z][A-Za-z0-9_]*)\]").expect("Invalid regex"))
}

/// Builds the object schema for one entity from its attribute records.
pub fn build_entity_schema(description: &str, attributes: &[AttributeRecord]) -> SchemaFragment {
    let mut properties = indexmap::IndexMap::new();
    let mut required = Vec::new();

    for attr in attributes {
        if !attr.optional {
            required.push(attr.name.clone());
        }
        properties.insert(attr.name.clone(), schema_for_attribute(attr));
    }

    let mut schema = SchemaFragment::object(properties);
    if !description.is_empty() {
        schema.description = Some(description.to_string());
    }
    if !required.is_empty() {
        schema.required = Some(required);
    }
    schema
}

/// Builds the property schema for a single attribute.
pub fn schema_for_attribute(attr: &AttributeRecord) -> SchemaFragment {
    let mut schema = map_type_text(&attr.type_text, attr.enum_values.as_deref());

    if !attr.description.is_empty() && schema.reference.is_none() {
        schema.description = Some(attr.description.clone());
    }
    if attr.nullable && schema.reference.is_none() {
        schema.nullable = Some(true);
    }
    if attr.deprecated && schema.reference.is_none() {
        schema.deprecated = Some(true);
    }

    schema
}

/// Maps a declared type text onto a schema fragment.
///
/// Also used for `**Returns:**` response prose, which shares the grammar.
/// Unrecognized type prose degrades to `string`; it never fails.
pub(crate) fn map_type_text(type_text: &str, enum_values: Option<&[String]>) -> SchemaFragment {
    let lower = type_text.to_lowercase();

    if let Some(rest) = strip_prefix_ci(type_text, "array of") {
        let mut schema = SchemaFragment::array(map_type_text(rest.trim(), enum_values));
        // The enum, when present, belongs to the item type; nothing else
        // carries values at the array level.
        schema.enum_values = None;
        return schema;
    }

    if let Some(caps) = entity_link_re().captures(type_text) {
        return SchemaFragment::reference(&caps[1]);
    }

    if lower.starts_with("hash") || lower.starts_with("object") {
        return SchemaFragment::typed("object");
    }
    if lower.starts_with("boolean") {
        return SchemaFragment::typed("boolean");
    }
    if lower.starts_with("integer") {
        return SchemaFragment::typed("integer");
    }
    if lower.starts_with("number") || lower.starts_with("float") {
        return SchemaFragment::typed("number");
    }

    let mut schema = SchemaFragment::string();
    schema.format = detect_format(&lower);
    if let Some(values) = enum_values {
        schema.enum_values = Some(values.to_vec());
    }
    schema
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if text.len() >= prefix.len() && text[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

fn detect_format(lower_type_text: &str) -> Option<String> {
    if lower_type_text.contains("datetime") {
        Some("date-time".to_string())
    } else if lower_type_text.contains("iso 8601 date") {
        Some("date".to_string())
    } else if lower_type_text.contains("url") {
        Some("uri".to_string())
    } else if lower_type_text.contains("email") {
        Some("email".to_string())
    } else {
        None
    }
}
