//! # Section Scanner
//!
//! Layered line scanner for the documentation grammar: each line of a section
//! body is classified into exactly one [`Line`] kind, and the extractors build
//! records from the classified stream.
//!
//! Classification is conservative. A line that matches no known shape becomes
//! [`Line::Text`]; the extractors skip what they do not recognize instead of
//! failing, since the source documents routinely drift.

use regex::Regex;
use std::sync::OnceLock;

/// One classified line of a documentation section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// An attribute heading: ``### `name` {{%optional%}} {#anchor}``.
    AttributeHeading {
        /// The backticked attribute name.
        name: &'a str,
        /// Whether the heading carries the `{{%optional%}}` shortcode.
        optional: bool,
        /// Whether the heading carries the `{{%deprecated%}}` shortcode.
        deprecated: bool,
    },
    /// An operation heading: `## Title {#anchor}`.
    OperationHeading {
        /// The heading title with any `{#anchor}` suffix removed.
        title: &'a str,
    },
    /// A deeper heading (`####`/`#####`), e.g. `##### Query parameters`.
    SubHeading {
        /// Number of `#` characters.
        level: usize,
        /// The heading title.
        title: &'a str,
    },
    /// A bolded label line: `**Description:** text`.
    Label {
        /// The label name (e.g. `Description`, `Type`, `Version history`).
        name: &'a str,
        /// The text after the label, possibly empty.
        text: &'a str,
    },
    /// An enumerated-value line: `` `value` = explanation ``.
    EnumValue {
        /// The backticked literal value.
        value: &'a str,
        /// The explanation after the `=` sign.
        text: &'a str,
    },
    /// A version-history entry: `4.0.0 - note`.
    VersionEntry(&'a str),
    /// An HTTP request signature: `GET /api/v1/timelines/public HTTP/1.1`.
    HttpSignature {
        /// The HTTP method, uppercase.
        method: &'a str,
        /// The request path.
        path: &'a str,
    },
    /// A definition-list description line: `: String. The description.`
    Definition(&'a str),
    /// A code-fence delimiter.
    Fence,
    /// A blank line.
    Blank,
    /// Any other non-blank line (parameter names land here).
    Text(&'a str),
}

fn attribute_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^###\s+`([^`]+)`(.*)$").expect("Invalid regex"))
}

fn operation_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^##\s+([^#{]+?)\s*(?:\{#[^}]*\})?\s*$").expect("Invalid regex"))
}

fn sub_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(#{4,6})\s+([^#{]+?)\s*(?:\{#[^}]*\})?\s*$").expect("Invalid regex")
    })
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\*\*([^*:]+):\*\*\s*(.*)$").expect("Invalid regex"))
}

fn enum_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^`([^`]*)`\s*=\s*(.*)$").expect("Invalid regex"))
}

fn version_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\s*-\s*").expect("Invalid regex"))
}

fn http_signature_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\s+(\S+)(?:\s+HTTP/[0-9.]+)?\s*$")
            .expect("Invalid regex")
    })
}

/// Classifies every line of a section body.
///
/// Trailing Markdown hard-break backslashes are stripped before
/// classification; literal `\n` escapes inside a line are left alone (the
/// version engine handles those).
pub fn classify_lines(body: &str) -> Vec<Line<'_>> {
    body.lines().map(classify_line).collect()
}

/// Classifies a single line.
pub fn classify_line(raw: &str) -> Line<'_> {
    let line = raw.trim().trim_end_matches('\\').trim_end();

    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with("```") {
        return Line::Fence;
    }
    if let Some(caps) = attribute_heading_re().captures(line) {
        let rest = caps.get(2).map_or("", |m| m.as_str());
        return Line::AttributeHeading {
            name: caps.get(1).map_or("", |m| m.as_str()),
            optional: rest.contains("{{%optional%}}"),
            deprecated: rest.contains("{{%deprecated%}}"),
        };
    }
    if let Some(caps) = sub_heading_re().captures(line) {
        return Line::SubHeading {
            level: caps.get(1).map_or(0, |m| m.as_str().len()),
            title: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(caps) = operation_heading_re().captures(line) {
        return Line::OperationHeading {
            title: caps.get(1).map_or("", |m| m.as_str()),
        };
    }
    if let Some(caps) = label_re().captures(line) {
        return Line::Label {
            name: caps.get(1).map_or("", |m| m.as_str()),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(caps) = enum_value_re().captures(line) {
        return Line::EnumValue {
            value: caps.get(1).map_or("", |m| m.as_str()),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if version_entry_re().is_match(line) {
        return Line::VersionEntry(line);
    }
    if let Some(caps) = http_signature_re().captures(line) {
        // Capture positions index into `line`, which borrows from `raw`.
        return Line::HttpSignature {
            method: caps.get(1).map_or("", |m| m.as_str()),
            path: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(rest) = line.strip_prefix(':') {
        // `: text` is a definition-list description; `:id` is a path
        // parameter name and stays plain text.
        if rest.starts_with(char::is_whitespace) {
            return Line::Definition(rest.trim_start());
        }
    }

    Line::Text(line)
}
