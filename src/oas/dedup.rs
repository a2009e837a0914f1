//! # Schema Synthesizer & Enum Deduplicator
//!
//! Two-pass global analysis over every entity and operation fragment:
//!
//! 1. **Collection** walks the whole graph in a fixed order (entities in
//!    insertion order, then operations in insertion order) and computes a
//!    canonical signature for every literal-value list. The *first*
//!    occurrence determines the canonical value ordering and the naming
//!    hint; the *second* occurrence of a signature assigns a shared name.
//! 2. **Rewrite** replaces every occurrence of an assigned signature with a
//!    `$ref` to the shared component, whether it sits directly on a property
//!    or on an array's item slot.
//!
//! Deduplication is opportunistic: a signature seen once stays inline, and a
//! naming collision only costs a dedup opportunity (recorded as a note),
//! never the synthesis itself. All state lives in a per-run
//! [`SynthesisContext`]; nothing survives between runs.

use crate::oas::models::{ParsedEntity, ParsedOperation, SchemaFragment};
use crate::oas::naming::NamingPolicy;
use indexmap::IndexMap;
use std::collections::HashMap;

/// The canonical signature of a literal-value list: the JSON representation
/// of the values sorted lexically, so value order never splits a signature.
pub fn enum_signature(values: &[String]) -> String {
    let mut sorted = values.to_vec();
    sorted.sort();
    serde_json::to_string(&sorted).expect("string list serializes")
}

/// First-occurrence bookkeeping for one signature.
struct Occurrence {
    /// Original (unsorted) value list of the first occurrence.
    values: Vec<String>,
    /// Owning entity name or operation id of the first occurrence.
    owner: String,
    /// Owning property name of the first occurrence.
    property: String,
    /// How many times the signature has been seen.
    count: usize,
}

/// The result of one synthesis run.
pub struct SynthesisResult {
    /// Shared components in assignment order: name → string-enum schema
    /// carrying the first occurrence's original value order.
    pub components: IndexMap<String, SchemaFragment>,
    /// Non-fatal notes (naming collisions), for the caller to report.
    pub notes: Vec<String>,
}

/// Per-run synthesis state, threaded through both passes.
pub struct SynthesisContext {
    policy: NamingPolicy,
    occurrences: HashMap<String, Occurrence>,
    assigned: IndexMap<String, String>,
    taken: HashMap<String, String>,
    notes: Vec<String>,
}

impl SynthesisContext {
    /// Creates a fresh context for one run.
    pub fn new(policy: NamingPolicy) -> Self {
        SynthesisContext {
            policy,
            occurrences: HashMap::new(),
            assigned: IndexMap::new(),
            taken: HashMap::new(),
            notes: Vec::new(),
        }
    }

    /// Runs both passes over the full fragment set and returns the shared
    /// component table. Duplicated enums in `entities` / `operations` are
    /// rewritten into references in place.
    pub fn synthesize(
        mut self,
        entities: &mut [ParsedEntity],
        operations: &mut [ParsedOperation],
    ) -> SynthesisResult {
        // Pass 1: collection, fixed traversal order.
        for entity in entities.iter() {
            self.collect(&entity.schema, &entity.name, &entity.name);
        }
        for op in operations.iter() {
            for param in op.parameters.iter().chain(op.body_parameters.iter()) {
                self.collect(&param.schema, &op.operation_id, &param.name);
            }
        }

        // Pass 2: rewrite.
        for entity in entities.iter_mut() {
            self.rewrite(&mut entity.schema);
        }
        for op in operations.iter_mut() {
            for param in op
                .parameters
                .iter_mut()
                .chain(op.body_parameters.iter_mut())
            {
                self.rewrite(&mut param.schema);
            }
        }

        let mut components = IndexMap::new();
        for (signature, name) in &self.assigned {
            if let Some(occurrence) = self.occurrences.get(signature) {
                let mut schema = SchemaFragment::string();
                schema.enum_values = Some(occurrence.values.clone());
                components.insert(name.clone(), schema);
            }
        }

        SynthesisResult {
            components,
            notes: self.notes,
        }
    }

    fn collect(&mut self, schema: &SchemaFragment, owner: &str, property: &str) {
        if let Some(values) = &schema.enum_values {
            self.record(values, owner, property);
        }
        if let Some(items) = &schema.items {
            // The item slot inherits the owning property's name.
            self.collect(items, owner, property);
        }
        if let Some(properties) = &schema.properties {
            for (name, child) in properties {
                self.collect(child, owner, name);
            }
        }
    }

    fn record(&mut self, values: &[String], owner: &str, property: &str) {
        let signature = enum_signature(values);
        let occurrence = self
            .occurrences
            .entry(signature.clone())
            .or_insert_with(|| Occurrence {
                values: values.to_vec(),
                owner: owner.to_string(),
                property: property.to_string(),
                count: 0,
            });
        occurrence.count += 1;

        if occurrence.count == 2 {
            let base = self
                .policy
                .component_name(&occurrence.owner, &occurrence.property);
            let name = match self.taken.get(&base) {
                None => base,
                Some(existing) if existing == &signature => base,
                Some(_) => {
                    let suffixed = self.policy.disambiguated(&base, &signature);
                    self.notes.push(format!(
                        "component name collision: '{}' already taken, using '{}' for enum at {}/{}",
                        base, suffixed, occurrence.owner, occurrence.property
                    ));
                    suffixed
                }
            };

            if self.taken.contains_key(&name) {
                // Suffixed name still taken: leave this signature inline.
                self.notes.push(format!(
                    "unresolvable component name collision for enum at {}/{}; leaving inline",
                    occurrence.owner, occurrence.property
                ));
            } else {
                self.taken.insert(name.clone(), signature.clone());
                self.assigned.insert(signature, name);
            }
        }
    }

    fn rewrite(&self, schema: &mut SchemaFragment) {
        if let Some(values) = &schema.enum_values {
            if let Some(name) = self.assigned.get(&enum_signature(values)) {
                *schema = SchemaFragment::reference(name);
                return;
            }
        }
        if let Some(items) = &mut schema.items {
            self.rewrite(items);
        }
        if let Some(properties) = &mut schema.properties {
            for child in properties.values_mut() {
                self.rewrite(child);
            }
        }
    }
}
