//! # Method Page Extraction
//!
//! Splits a method page into its `## Title` operation sections and assembles
//! one [`ParsedOperation`] per section: HTTP signature, description, request
//! parameters by location, response prose, OAuth requirement, and the
//! release-status classification from the version history.
//!
//! A section without a recognizable HTTP signature yields no operation;
//! scanning continues with the next section.

use crate::oas::models::ParsedOperation;
use crate::parser::models::ParamLocation;
use crate::parser::parameters::{build_parameter_nodes, parse_parameter_list};
use crate::scanner::{classify_line, classify_lines, Line};
use crate::versions::is_operation_unreleased;
use heck::ToUpperCamelCase;

/// Extracts every operation from a method page body.
///
/// `group` is the method-page directory name (the API group, used as the
/// operation tag); `supported` is the baseline version for the unreleased
/// classification.
pub fn extract_operations(group: &str, body: &str, supported: &str) -> Vec<ParsedOperation> {
    let mut operations = Vec::new();
    for (title, section) in split_operation_sections(body) {
        if let Some(op) = parse_operation_section(group, &title, &section, supported) {
            operations.push(op);
        }
    }
    operations
}

/// Splits the page on `## Title` headings, keeping each section's raw text.
fn split_operation_sections(body: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, String)> = Vec::new();
    for raw in body.lines() {
        if let Line::OperationHeading { title } = classify_line(raw) {
            sections.push((title.to_string(), String::new()));
        } else if let Some((_, text)) = sections.last_mut() {
            text.push_str(raw);
            text.push('\n');
        }
    }
    sections
}

fn parse_operation_section(
    group: &str,
    title: &str,
    section: &str,
    supported: &str,
) -> Option<ParsedOperation> {
    let lines = classify_lines(section);

    let (method, path) = lines.iter().find_map(|line| match line {
        Line::HttpSignature { method, path } => Some((method.to_string(), path.to_string())),
        _ => None,
    })?;
    let path = normalize_path(&path);

    let mut description_parts = Vec::new();
    let mut returns_text = None;
    let mut requires_auth = true;
    let mut history = Vec::new();
    let mut in_history = false;
    let mut in_preamble = true;

    for line in &lines {
        match line {
            Line::Label { name, text } => {
                in_preamble = false;
                in_history = false;
                match name.trim() {
                    "Returns" => returns_text = Some(text.to_string()),
                    "OAuth" => requires_auth = !text.to_lowercase().contains("public"),
                    "Version history" => in_history = true,
                    _ => {}
                }
            }
            Line::VersionEntry(entry) if in_history => history.push(entry.to_string()),
            Line::SubHeading { .. } => {
                in_preamble = false;
                in_history = false;
            }
            Line::Text(text) if in_preamble => description_parts.push(*text),
            Line::Fence | Line::HttpSignature { .. } | Line::Blank => {}
            _ => in_history = false,
        }
    }

    let mut parameters = Vec::new();
    let mut body_parameters = Vec::new();
    for (chunk_title, chunk) in sub_heading_chunks(section) {
        let location = match chunk_title.as_str() {
            "Path parameters" => ParamLocation::Path,
            "Query parameters" => ParamLocation::Query,
            "Headers" => ParamLocation::Header,
            "Form data parameters" => ParamLocation::Body,
            _ => continue,
        };
        let mut raw = parse_parameter_list(&chunk, location);
        if location == ParamLocation::Path {
            for param in raw.iter_mut() {
                param.required = true;
            }
        }
        let nodes = build_parameter_nodes(&raw);
        if location == ParamLocation::Body {
            body_parameters.extend(nodes);
        } else {
            parameters.extend(nodes);
        }
    }

    let unreleased = is_operation_unreleased(&history.join("\n"), supported);

    Some(ParsedOperation {
        operation_id: derive_operation_id(&method, &path),
        method: method.to_lowercase(),
        path,
        summary: title.to_string(),
        description: description_parts.join(" "),
        tag: group.to_string(),
        parameters,
        body_parameters,
        returns_text,
        requires_auth,
        unreleased,
    })
}

/// Groups a section's raw text under its `#####` sub-headings.
fn sub_heading_chunks(section: &str) -> Vec<(String, String)> {
    let mut chunks: Vec<(String, String)> = Vec::new();
    for raw in section.lines() {
        match classify_line(raw) {
            Line::SubHeading { level, title } if level >= 5 => {
                chunks.push((title.to_string(), String::new()));
            }
            Line::SubHeading { .. } => {
                // A `####` heading (e.g. `Request`) closes the current chunk.
                chunks.push((String::new(), String::new()));
            }
            _ => {
                if let Some((_, text)) = chunks.last_mut() {
                    text.push_str(raw);
                    text.push('\n');
                }
            }
        }
    }
    chunks
}

/// Converts documentation path placeholders (`:id`) to OpenAPI (`{id}`).
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| match seg.strip_prefix(':') {
            Some(name) => format!("{{{}}}", name),
            None => seg.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Derives a deterministic camelCase operation id from method + path.
fn derive_operation_id(method: &str, path: &str) -> String {
    let mut id = method.to_lowercase();
    for seg in path.split('/') {
        if seg.is_empty() || seg == "api" || seg == "v1" {
            continue;
        }
        if let Some(inner) = seg.strip_prefix('{') {
            let name = inner.trim_end_matches('}');
            id.push_str("By");
            id.push_str(&name.to_upper_camel_case());
        } else {
            id.push_str(&seg.to_upper_camel_case());
        }
    }
    id
}
