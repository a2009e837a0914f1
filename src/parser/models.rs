//! # Parser Models
//!
//! Intermediate Representation for records extracted from documentation
//! sections, before any global schema synthesis.

use crate::oas::models::SchemaFragment;

/// One documented attribute of an entity, as extracted from its section.
///
/// Records are created once per scan and never mutated afterwards, with one
/// exception: the version-based nullability pass may *clear* `nullable`
/// (never set it) when every sibling shares a single identical version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    /// Attribute name, unique within its owning entity.
    pub name: String,
    /// The declared type text, still partially unparsed at this stage
    /// (e.g. `String (ISO 8601 Datetime)` or `Array of [Status]`).
    pub type_text: String,
    /// The prose description.
    pub description: String,
    /// Whether the heading carried the optional shortcode.
    pub optional: bool,
    /// Whether the heading carried the deprecated shortcode.
    pub deprecated: bool,
    /// Whether the type is nullable (shortcode or `or null` union).
    pub nullable: bool,
    /// Nullability stated directly in the type text (`or null`); never
    /// auto-suppressed by the version pass.
    pub explicitly_nullable: bool,
    /// Version strings from the history block, first-seen order,
    /// de-duplicated. `None` when the section has no history block.
    pub versions: Option<Vec<String>>,
    /// Literal values when the type is enumerable, in source order, with
    /// no deduplication (repeated values are a documentation error we keep).
    pub enum_values: Option<Vec<String>>,
}

/// Where a request parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Query string.
    Query,
    /// Path segment.
    Path,
    /// HTTP header.
    Header,
    /// Form-data / JSON request body.
    Body,
}

/// A raw parameter as documented: the name may still use bracket notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter {
    /// The documented name, bracket notation included (`a[b][c]`, `a[]`).
    pub name: String,
    /// The description line following the name.
    pub description: String,
    /// Whether the parameter is required (explicit marker or declarative
    /// prose; conditional "required if" never qualifies).
    pub required: bool,
    /// Where the parameter is carried.
    pub location: ParamLocation,
}

/// A reconstructed top-level parameter with no bracket characters in its
/// public name; nesting lives in the `schema` tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    /// The public parameter name (bracket notation resolved away).
    pub name: String,
    /// Description of the parameter (for a grouped parameter, the group's
    /// own description when documented, otherwise empty).
    pub description: String,
    /// Effective required flag: any required leaf makes the whole
    /// structured parameter required from the caller's perspective.
    pub required: bool,
    /// Where the parameter is carried.
    pub location: ParamLocation,
    /// The schema tree for this parameter.
    pub schema: SchemaFragment,
}
