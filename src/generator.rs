//! # Generation Pipeline
//!
//! Wires the whole transformation together: loaded documentation pages →
//! attribute/operation extraction → version-based nullability pass → global
//! enum deduplication → document envelope. The pipeline itself never prints;
//! counts and non-fatal notes come back in the [`Generated`] report.

use crate::loader::DocSet;
use crate::oas::dedup::SynthesisContext;
use crate::oas::document::{DocumentBuilder, OpenApiDocument};
use crate::oas::models::{ParsedEntity, ParsedOperation};
use crate::oas::naming::NamingPolicy;
use crate::oas::schemas::build_entity_schema;
use crate::parser::attributes::extract_attributes;
use crate::parser::methods::extract_operations;
use crate::versions::remove_nullable_if_same_version;

/// The result of one generation run.
#[derive(Debug)]
pub struct Generated {
    /// The assembled document.
    pub document: OpenApiDocument,
    /// Non-fatal synthesis notes (naming collisions).
    pub notes: Vec<String>,
    /// Number of entity schemas generated.
    pub entity_count: usize,
    /// Number of operations generated.
    pub operation_count: usize,
    /// Number of shared enum components generated.
    pub shared_component_count: usize,
}

/// Runs the documentation → OpenAPI transformation.
#[derive(Debug, Clone)]
pub struct Generator {
    supported_version: String,
    policy: NamingPolicy,
}

impl Generator {
    /// Creates a generator targeting the given supported API version.
    pub fn new(supported_version: &str) -> Self {
        Generator {
            supported_version: supported_version.to_string(),
            policy: NamingPolicy::default(),
        }
    }

    /// Replaces the shared-component naming policy.
    pub fn with_policy(mut self, policy: NamingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Generates the document from a loaded documentation set.
    pub fn generate(&self, docs: &DocSet) -> Generated {
        let mut entities = Vec::new();
        for page in &docs.entities {
            let mut attributes = extract_attributes(&page.body);
            if attributes.is_empty() {
                // Index pages and prose-only pages carry no attributes.
                continue;
            }
            remove_nullable_if_same_version(&mut attributes);
            entities.push(ParsedEntity {
                name: page.name.clone(),
                description: page.description.clone(),
                schema: build_entity_schema(&page.description, &attributes),
            });
        }

        let mut operations: Vec<ParsedOperation> = Vec::new();
        for page in &docs.methods {
            operations.extend(extract_operations(
                &page.group,
                &page.doc.body,
                &self.supported_version,
            ));
        }

        let result = SynthesisContext::new(self.policy.clone())
            .synthesize(&mut entities, &mut operations);

        let document = DocumentBuilder::new(&self.supported_version).build(
            &entities,
            &operations,
            &result.components,
        );

        Generated {
            document,
            notes: result.notes,
            entity_count: entities.len(),
            operation_count: operations.len(),
            shared_component_count: result.components.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DocFile, MethodPage};

    fn entity_page(name: &str, body: &str) -> DocFile {
        DocFile {
            name: name.to_string(),
            title: name.to_string(),
            description: format!("Represents a {}.", name.to_lowercase()),
            body: body.to_string(),
        }
    }

    const STATUS_BODY: &str = r#"## Attributes

### `id` {#id}

**Description:** ID of the status.\
**Type:** String (cast from an integer)\
**Version history:**\
0.1.0 - added

### `visibility` {#visibility}

**Description:** Visibility of this status.\
**Type:** String (Enumerable oneOf)\
`public` = Visible to everyone\
`unlisted` = Visible, but not in public timelines\
`private` = Followers only\
`direct` = Mentioned users only

**Version history:**\
0.9.9 - added
"#;

    const SCHEDULED_BODY: &str = r#"## Attributes

### `visibility` {#visibility}

**Description:** Visibility of the scheduled status.\
**Type:** String (Enumerable oneOf)\
`public` = Visible to everyone\
`unlisted` = Visible, but not in public timelines\
`private` = Followers only\
`direct` = Mentioned users only

**Version history:**\
2.7.0 - added
"#;

    fn docs() -> DocSet {
        DocSet {
            entities: vec![
                entity_page("Status", STATUS_BODY),
                entity_page("ScheduledStatus", SCHEDULED_BODY),
            ],
            methods: vec![MethodPage {
                group: "timelines".to_string(),
                doc: DocFile {
                    name: "public".to_string(),
                    title: "timelines".to_string(),
                    description: String::new(),
                    body: "## View public timeline {#public}\n\n```http\nGET /api/v1/timelines/public HTTP/1.1\n```\n\n**Returns:** Array of [Status]\\\n**OAuth:** Public\n".to_string(),
                },
            }],
        }
    }

    #[test]
    fn test_end_to_end_counts() {
        let generated = Generator::new("4.3.0").generate(&docs());
        assert_eq!(generated.entity_count, 2);
        assert_eq!(generated.operation_count, 1);
        assert_eq!(generated.shared_component_count, 1);
        assert!(generated.notes.is_empty());
    }

    #[test]
    fn test_duplicate_enum_is_shared_in_the_document() {
        let generated = Generator::new("4.3.0").generate(&docs());
        let schemas = &generated.document.components.schemas;
        assert!(schemas.contains_key("StatusVisibility"));
        let status = &schemas["Status"];
        let props = status.properties.as_ref().unwrap();
        assert_eq!(
            props["visibility"].reference.as_deref(),
            Some("#/components/schemas/StatusVisibility")
        );
    }

    #[test]
    fn test_attribute_less_pages_are_skipped() {
        let mut set = docs();
        set.entities.push(entity_page("Index", "Just prose, no sections.\n"));
        let generated = Generator::new("4.3.0").generate(&set);
        assert_eq!(generated.entity_count, 2);
        assert!(!generated.document.components.schemas.contains_key("Index"));
    }

    #[test]
    fn test_operations_land_under_their_paths() {
        let generated = Generator::new("4.3.0").generate(&docs());
        let path = &generated.document.paths["/api/v1/timelines/public"];
        assert_eq!(path["get"].tags, vec!["timelines"]);
    }
}
