//! # Parameter Tree Builder
//!
//! Reconstructs nested schema trees from flat, bracket-notation parameter
//! names: `a[b]` is an object property, `a[]` an array, `a[][b]` an array of
//! objects. Arbitrary nesting depth is supported by re-applying the grouping
//! to each tail.

use crate::oas::models::SchemaFragment;
use crate::parser::models::{ParamLocation, ParameterNode, RawParameter};
use crate::scanner::{classify_lines, Line};
use indexmap::IndexMap;

const REQUIRED_SHORTCODE: &str = "{{<required>}}";

/// Scans a definition-list section (`name` line, `: description` line) into
/// raw parameters. Lines that do not pair up are skipped.
pub fn parse_parameter_list(body: &str, location: ParamLocation) -> Vec<RawParameter> {
    let lines = classify_lines(body);
    let mut params = Vec::new();
    let mut pending_name: Option<&str> = None;

    for line in &lines {
        match line {
            Line::Text(name) if is_parameter_name(name) => {
                pending_name = Some(name);
            }
            Line::Definition(desc) => {
                if let Some(name) = pending_name.take() {
                    let (required, description) = detect_required(desc);
                    params.push(RawParameter {
                        // Path parameters are documented as `:id`.
                        name: name.trim_start_matches(':').to_string(),
                        description,
                        required,
                        location,
                    });
                }
            }
            Line::Blank => {}
            _ => {
                pending_name = None;
            }
        }
    }

    params
}

fn is_parameter_name(text: &str) -> bool {
    !text.is_empty()
        && !text.contains(' ')
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']' | ':' | '-'))
}

/// Splits the required decision from the description text.
///
/// The explicit `{{<required>}}` marker always wins. Without it, only an
/// unambiguous declarative statement counts; "required if ..." conditional
/// prose never sets the flag.
pub fn detect_required(description: &str) -> (bool, String) {
    if description.contains(REQUIRED_SHORTCODE) {
        let cleaned = description.replace(REQUIRED_SHORTCODE, "");
        return (true, cleaned.trim().to_string());
    }

    for sentence in description.split('.') {
        let lower = sentence.trim().to_lowercase();
        if lower.contains("required if") {
            continue;
        }
        if lower.starts_with("required") || lower.ends_with("is required") {
            return (true, description.trim().to_string());
        }
    }
    (false, description.trim().to_string())
}

/// One bracket segment of a raw parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Seg {
    /// `[]`
    Array,
    /// `[key]`
    Key(String),
}

/// Splits `a[b][]` into its base name and bracket segments.
///
/// A malformed name (unbalanced brackets) is treated as a simple name.
fn decompose(name: &str) -> (String, Vec<Seg>) {
    let Some(open) = name.find('[') else {
        return (name.to_string(), Vec::new());
    };
    let base = &name[..open];
    let mut segs = Vec::new();
    let mut rest = &name[open..];

    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return (name.to_string(), Vec::new());
        }
        let Some(close) = rest.find(']') else {
            return (name.to_string(), Vec::new());
        };
        let inner = &rest[1..close];
        if inner.is_empty() {
            segs.push(Seg::Array);
        } else {
            segs.push(Seg::Key(inner.to_string()));
        }
        rest = &rest[close + 1..];
    }

    (base.to_string(), segs)
}

/// A group member: the remaining bracket segments plus the source parameter.
struct Member<'a> {
    segs: Vec<Seg>,
    raw: &'a RawParameter,
}

/// Reconstructs top-level [`ParameterNode`]s from a flat documented list.
///
/// Sibling bracket-keys are grouped under their shared base name; a group is
/// required as soon as any member leaf is required.
pub fn build_parameter_nodes(raw: &[RawParameter]) -> Vec<ParameterNode> {
    let mut groups: IndexMap<String, Vec<Member<'_>>> = IndexMap::new();
    for param in raw {
        let (base, segs) = decompose(&param.name);
        groups.entry(base).or_default().push(Member { segs, raw: param });
    }

    let mut nodes = Vec::new();
    for (base, members) in groups {
        let required = members.iter().any(|m| m.raw.required);
        let location = members[0].raw.location;
        let description = members
            .iter()
            .find(|m| m.segs.is_empty())
            .map(|m| m.raw.description.clone())
            .unwrap_or_default();
        let schema = build_schema(&members);
        nodes.push(ParameterNode {
            name: base,
            description,
            required,
            location,
            schema,
        });
    }

    nodes
}

/// Builds the schema tree for one group of members sharing a base name.
fn build_schema(members: &[Member<'_>]) -> SchemaFragment {
    // A plain name with no bracket members is a leaf.
    let structured: Vec<&Member<'_>> = members.iter().filter(|m| !m.segs.is_empty()).collect();
    if structured.is_empty() {
        return leaf_schema(&members[0].raw.description);
    }

    let has_array = structured.iter().any(|m| m.segs[0] == Seg::Array);
    if has_array {
        let mut tails: Vec<Member<'_>> = structured
            .iter()
            .filter(|m| m.segs[0] == Seg::Array)
            .map(|m| Member {
                segs: m.segs[1..].to_vec(),
                raw: m.raw,
            })
            .collect();
        // A key member alongside `base[]` siblings (`a[b]` next to `a[]`)
        // is merged into the item object rather than dropped.
        tails.extend(
            structured
                .iter()
                .filter(|m| m.segs[0] != Seg::Array)
                .map(|m| Member {
                    segs: m.segs.clone(),
                    raw: m.raw,
                }),
        );

        // A lone `base[]` with no nested keys is a scalar array.
        if tails.iter().all(|m| m.segs.is_empty()) {
            return SchemaFragment::array(array_item_schema(&tails[0].raw.description));
        }
        return SchemaFragment::array(build_object(&tails));
    }

    build_object(&structured.iter().map(|m| Member {
        segs: m.segs.clone(),
        raw: m.raw,
    }).collect::<Vec<_>>())
}

/// Builds an object schema from members whose first segment is a key.
fn build_object(members: &[Member<'_>]) -> SchemaFragment {
    let mut by_key: IndexMap<String, Vec<Member<'_>>> = IndexMap::new();
    for member in members {
        match member.segs.first() {
            Some(Seg::Key(key)) => {
                by_key.entry(key.clone()).or_default().push(Member {
                    segs: member.segs[1..].to_vec(),
                    raw: member.raw,
                });
            }
            // An empty tail at object level carries only the description;
            // a stray `[]` here has no defined meaning and is dropped.
            _ => {}
        }
    }

    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    for (key, tails) in by_key {
        if tails.iter().any(|m| m.raw.required) {
            required.push(key.clone());
        }
        let child = if tails.iter().all(|m| m.segs.is_empty()) {
            let mut leaf = leaf_schema(&tails[0].raw.description);
            leaf.description = none_if_empty(&tails[0].raw.description);
            leaf
        } else {
            build_schema_from_tails(&tails)
        };
        properties.insert(key, child);
    }

    let mut object = SchemaFragment::object(properties);
    if !required.is_empty() {
        object.required = Some(required);
    }
    object
}

/// Re-applies the grouping to the tails of one key, supporting arbitrary
/// nesting depth (`a[b][c]`, `a[b][]`, ...).
fn build_schema_from_tails(tails: &[Member<'_>]) -> SchemaFragment {
    build_schema(tails)
}

/// Infers the item leaf for a `base[]` member.
///
/// The documented description describes the whole array ("Array of String.
/// Attachment ids."), so the leading array phrase is stripped before the
/// item type is inferred; otherwise the item would come back as an array
/// itself.
fn array_item_schema(description: &str) -> SchemaFragment {
    let trimmed = description.trim_start();
    const PREFIX: &str = "array of";
    match trimmed.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => {
            leaf_schema(trimmed[PREFIX.len()..].trim_start())
        }
        _ => leaf_schema(trimmed),
    }
}

fn none_if_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Primitive type inference from descriptive keywords.
///
/// The earliest structural keyword by position wins: "Hash of values where
/// the key is an integer cast to a string" is an object, not an integer.
/// Without any recognizable keyword the type defaults to string.
pub fn leaf_schema(description: &str) -> SchemaFragment {
    let lower = description.to_lowercase();

    // Priority order breaks ties at equal positions, so "array of string"
    // beats its own "array" prefix.
    const KEYWORDS: &[(&str, LeafKind)] = &[
        ("boolean", LeafKind::Boolean),
        ("integer", LeafKind::Integer),
        ("number", LeafKind::Number),
        ("array of string", LeafKind::ArrayOfString),
        ("array of id", LeafKind::ArrayOfString),
        ("array", LeafKind::Array),
        ("hash", LeafKind::Object),
        ("object", LeafKind::Object),
        ("string", LeafKind::String),
    ];

    let mut best: Option<(usize, LeafKind)> = None;
    for (keyword, kind) in KEYWORDS {
        if let Some(pos) = lower.find(keyword) {
            if best.map_or(true, |(best_pos, _)| pos < best_pos) {
                best = Some((pos, *kind));
            }
        }
    }

    match best.map(|(_, kind)| kind) {
        Some(LeafKind::Boolean) => SchemaFragment::typed("boolean"),
        Some(LeafKind::Integer) => SchemaFragment::typed("integer"),
        Some(LeafKind::Number) => SchemaFragment::typed("number"),
        Some(LeafKind::ArrayOfString) | Some(LeafKind::Array) => {
            SchemaFragment::array(SchemaFragment::string())
        }
        Some(LeafKind::Object) => SchemaFragment::typed("object"),
        Some(LeafKind::String) | None => SchemaFragment::string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafKind {
    Boolean,
    Integer,
    Number,
    ArrayOfString,
    Array,
    Object,
    String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, description: &str, required: bool) -> RawParameter {
        RawParameter {
            name: name.to_string(),
            description: description.to_string(),
            required,
            location: ParamLocation::Body,
        }
    }

    /// Collects `a.b.c` / `a[].b` style leaf paths from a built node.
    fn leaf_paths(node: &ParameterNode) -> Vec<String> {
        let mut paths = Vec::new();
        collect_paths(&node.schema, &node.name, &mut paths);
        paths.sort();
        paths
    }

    fn collect_paths(schema: &SchemaFragment, prefix: &str, out: &mut Vec<String>) {
        if let Some(items) = &schema.items {
            collect_paths(items, &format!("{}[]", prefix), out);
        } else if let Some(props) = &schema.properties {
            for (key, child) in props {
                collect_paths(child, &format!("{}.{}", prefix, key), out);
            }
        } else {
            out.push(prefix.to_string());
        }
    }

    #[test]
    fn test_object_property_nesting() {
        let raws = vec![
            raw("subscription[endpoint]", "{{<required>}} String. The endpoint URL.", false),
            raw("subscription[keys][p256dh]", "{{<required>}} String. User agent public key.", false),
            raw("subscription[keys][auth]", "{{<required>}} String. Auth secret.", false),
        ];
        let nodes = build_parameter_nodes(&raws);
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.name, "subscription");
        assert!(node.required);
        assert_eq!(
            leaf_paths(node),
            vec![
                "subscription.endpoint",
                "subscription.keys.auth",
                "subscription.keys.p256dh",
            ]
        );
    }

    #[test]
    fn test_decomposition_is_input_order_independent() {
        let forward = vec![
            raw("subscription[endpoint]", "String.", false),
            raw("subscription[keys][p256dh]", "String.", false),
            raw("subscription[keys][auth]", "String.", false),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        let a = build_parameter_nodes(&forward);
        let b = build_parameter_nodes(&reversed);
        assert_eq!(leaf_paths(&a[0]), leaf_paths(&b[0]));
    }

    #[test]
    fn test_array_of_objects() {
        let raws = vec![
            raw("keywords_attributes[][keyword]", "String. A keyword to be added.", false),
            raw("keywords_attributes[][whole_word]", "Boolean. Whether the keyword should consider word boundaries.", false),
            raw("keywords_attributes[][id]", "String. Provide the ID of an existing keyword.", false),
            raw("keywords_attributes[][_destroy]", "Boolean. If true, the keyword will be removed.", false),
        ];
        let nodes = build_parameter_nodes(&raws);
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.name, "keywords_attributes");
        assert_eq!(node.schema.schema_type.as_deref(), Some("array"));

        let items = node.schema.items.as_ref().unwrap();
        let props = items.properties.as_ref().unwrap();
        assert_eq!(
            props.keys().collect::<Vec<_>>(),
            vec!["keyword", "whole_word", "id", "_destroy"]
        );
        assert_eq!(props["keyword"].schema_type.as_deref(), Some("string"));
        assert_eq!(props["whole_word"].schema_type.as_deref(), Some("boolean"));
        assert_eq!(props["_destroy"].schema_type.as_deref(), Some("boolean"));
        assert!(!node.name.contains('['));
    }

    #[test]
    fn test_lone_simple_array_is_scalar_array() {
        let raws = vec![raw("media_ids[]", "Array of String. Attachment ids.", false)];
        let nodes = build_parameter_nodes(&raws);
        assert_eq!(nodes[0].name, "media_ids");
        assert_eq!(nodes[0].schema.schema_type.as_deref(), Some("array"));
        // The "Array of" prose describes the whole parameter; the item must
        // be the scalar, not a second array level.
        let items = nodes[0].schema.items.as_ref().unwrap();
        assert_eq!(items.schema_type.as_deref(), Some("string"));
        assert!(items.items.is_none());
        assert!(items.properties.is_none());
    }

    #[test]
    fn test_array_item_type_follows_the_prose() {
        let raws = vec![raw("ids[]", "Array of Integer. Record ids.", false)];
        let nodes = build_parameter_nodes(&raws);
        let items = nodes[0].schema.items.as_ref().unwrap();
        assert_eq!(items.schema_type.as_deref(), Some("integer"));

        // Without the array phrase the description still types the item.
        let raws = vec![raw("flags[]", "Boolean. One flag per entry.", false)];
        let nodes = build_parameter_nodes(&raws);
        let items = nodes[0].schema.items.as_ref().unwrap();
        assert_eq!(items.schema_type.as_deref(), Some("boolean"));
    }

    #[test]
    fn test_mixed_array_and_key_members_are_merged() {
        let raws = vec![
            raw("a[]", "Array of String. Loose values.", false),
            raw("a[b]", "String. A named value.", true),
        ];
        let nodes = build_parameter_nodes(&raws);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].required);
        assert_eq!(nodes[0].schema.schema_type.as_deref(), Some("array"));
        let items = nodes[0].schema.items.as_ref().unwrap();
        let props = items.properties.as_ref().unwrap();
        assert_eq!(props["b"].schema_type.as_deref(), Some("string"));
        assert_eq!(items.required.as_deref(), Some(&["b".to_string()][..]));
    }

    #[test]
    fn test_deep_bracket_nesting() {
        let raws = vec![raw("a[b][c]", "String. Deep leaf.", true)];
        let nodes = build_parameter_nodes(&raws);
        assert_eq!(leaf_paths(&nodes[0]), vec!["a.b.c"]);
        assert!(nodes[0].required);
    }

    #[test]
    fn test_required_propagates_from_any_leaf() {
        let raws = vec![
            raw("poll[options][]", "Array of String. Possible answers.", true),
            raw("poll[expires_in]", "Integer. Duration in seconds.", false),
        ];
        let nodes = build_parameter_nodes(&raws);
        assert!(nodes[0].required);
        let props = nodes[0].schema.properties.as_ref().unwrap();
        assert_eq!(props["options"].schema_type.as_deref(), Some("array"));
        assert_eq!(
            props["options"].items.as_ref().unwrap().schema_type.as_deref(),
            Some("string")
        );
        assert_eq!(props["expires_in"].schema_type.as_deref(), Some("integer"));
        assert_eq!(
            nodes[0].schema.required.as_deref(),
            Some(&["options".to_string()][..])
        );
    }

    #[test]
    fn test_conditional_required_prose_is_not_required() {
        let (required, _) =
            detect_required("String. Required if the server has a minimum age requirement.");
        assert!(!required);
    }

    #[test]
    fn test_explicit_marker_wins() {
        let (required, cleaned) = detect_required("{{<required>}} String. The status text.");
        assert!(required);
        assert!(!cleaned.contains("{{<"));
    }

    #[test]
    fn test_declarative_is_required_counts() {
        let (required, _) = detect_required("String. This value is required.");
        assert!(required);
        let (required, _) = detect_required("The status text is required");
        assert!(required);
    }

    #[test]
    fn test_first_structural_keyword_wins() {
        let schema = leaf_schema("Hash of usage data, where the key is an integer cast to a string.");
        assert_eq!(schema.schema_type.as_deref(), Some("object"));
    }

    #[test]
    fn test_type_defaults_to_string() {
        let schema = leaf_schema("An opaque value with no recognizable kind.");
        assert_eq!(schema.schema_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_parse_parameter_list_pairs_names_with_definitions() {
        let body = "##### Query parameters\n\nmax_id\n: String. Return results older than this ID.\n\nlimit\n: Integer. Maximum number of results. Defaults to 20.\n";
        let params = parse_parameter_list(body, ParamLocation::Query);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "max_id");
        assert_eq!(params[1].name, "limit");
        assert!(!params[0].required);
    }
}
