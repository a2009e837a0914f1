#![deny(missing_docs)]

//! # Masto OpenAPI
//!
//! Generates a deduplicated OpenAPI 3.0 document from a local checkout of
//! the Mastodon API documentation (entity and method pages in Markdown with
//! YAML front matter).

/// Shared error types.
pub mod error;

/// Documentation checkout traversal and front-matter extraction.
pub mod loader;

/// Version token extraction, comparison, and release classification.
pub mod versions;

/// Layered line scanner for documentation sections.
pub mod scanner;

/// Prose section parsers (attributes, parameters, method pages).
pub mod parser;

/// Schema synthesis, enum deduplication, and the document envelope.
pub mod oas;

/// End-to-end pipeline wiring.
pub mod generator;

pub use error::{AppError, AppResult};
pub use generator::{Generated, Generator};
pub use loader::{load_docs, DocFile, DocSet, MethodPage};
pub use oas::{
    DocumentBuilder, NamingPolicy, OpenApiDocument, ParsedEntity, ParsedOperation,
    SchemaFragment, SynthesisContext,
};
pub use parser::{
    extract_attributes, extract_operations, AttributeRecord, ParamLocation, ParameterNode,
};
pub use versions::{
    compare_versions, extract_version_numbers, find_max_version, DEFAULT_SUPPORTED_VERSION,
};
