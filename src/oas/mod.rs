//! # OpenAPI Synthesis Module
//!
//! Everything downstream of the parsers:
//!
//! - **models**: the [`models::SchemaFragment`] tree and the parsed
//!   entity/operation IR.
//! - **schemas**: attribute records → entity schema fragments.
//! - **naming**: the shared-component naming policy.
//! - **dedup**: the global enum deduplication passes.
//! - **document**: the OpenAPI envelope and serialization.

pub mod dedup;
pub mod document;
pub mod models;
pub mod naming;
pub mod schemas;

pub use dedup::{enum_signature, SynthesisContext, SynthesisResult};
pub use document::{DocumentBuilder, OpenApiDocument};
pub use models::{ParsedEntity, ParsedOperation, SchemaFragment};
pub use naming::{FixedName, NamingPolicy};
pub use schemas::{build_entity_schema, schema_for_attribute};
