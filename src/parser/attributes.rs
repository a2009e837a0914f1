//! # Attribute Extractor
//!
//! Turns an entity documentation section into [`AttributeRecord`]s, one per
//! attribute heading. A heading whose subsequent fields do not match the
//! expected shape produces no record at all (never a partial one) and
//! scanning continues with the next heading.

use crate::parser::models::AttributeRecord;
use crate::scanner::{classify_lines, Line};
use crate::versions::extract_version_numbers;

const NULLABLE_SHORTCODE: &str = "{{<nullable>}}";

/// Scans a section body and yields one record per well-formed attribute.
pub fn extract_attributes(body: &str) -> Vec<AttributeRecord> {
    let lines = classify_lines(body);
    let mut records = Vec::new();
    let mut pending: Option<PendingAttribute> = None;

    for line in &lines {
        match line {
            Line::AttributeHeading {
                name,
                optional,
                deprecated,
            } => {
                if let Some(done) = pending.take() {
                    records.extend(done.finish());
                }
                pending = Some(PendingAttribute::new(name, *optional, *deprecated));
            }
            Line::OperationHeading { .. } => {
                // A level-2 heading ends the attribute list.
                if let Some(done) = pending.take() {
                    records.extend(done.finish());
                }
            }
            other => {
                if let Some(attr) = pending.as_mut() {
                    attr.feed(other);
                }
            }
        }
    }

    if let Some(done) = pending.take() {
        records.extend(done.finish());
    }

    records
}

/// Scan state for the attribute currently being assembled.
struct PendingAttribute {
    name: String,
    optional: bool,
    deprecated: bool,
    description: Option<String>,
    type_text: Option<String>,
    nullable: bool,
    explicitly_nullable: bool,
    enum_values: Vec<String>,
    collecting_enum: bool,
    in_history: bool,
    history: Vec<String>,
}

impl PendingAttribute {
    fn new(name: &str, optional: bool, deprecated: bool) -> Self {
        PendingAttribute {
            name: name.to_string(),
            optional,
            deprecated,
            description: None,
            type_text: None,
            nullable: false,
            explicitly_nullable: false,
            enum_values: Vec::new(),
            collecting_enum: false,
            in_history: false,
            history: Vec::new(),
        }
    }

    fn feed(&mut self, line: &Line<'_>) {
        match line {
            Line::Label { name, text } => {
                self.collecting_enum = false;
                self.in_history = false;
                match name.trim() {
                    "Description" => self.description = Some(text.to_string()),
                    "Type" => self.set_type(text),
                    "Version history" => self.in_history = true,
                    _ => {}
                }
            }
            Line::EnumValue { value, .. } if self.collecting_enum => {
                // Source order, no deduplication: a repeated value is a
                // documentation error, not something we normalize away.
                self.enum_values.push(value.to_string());
            }
            Line::VersionEntry(entry) if self.in_history => {
                self.history.push(entry.to_string());
            }
            _ => {
                self.collecting_enum = false;
                self.in_history = false;
            }
        }
    }

    fn set_type(&mut self, raw: &str) {
        let mut text = raw.to_string();
        if text.contains(NULLABLE_SHORTCODE) {
            self.nullable = true;
            text = text.replace(NULLABLE_SHORTCODE, "");
        }
        let lowered = text.to_lowercase();
        if lowered.contains("or null") {
            // Nullability spelled out in the type union itself.
            self.nullable = true;
            self.explicitly_nullable = true;
        }
        self.collecting_enum = lowered.contains("enumerable");
        self.type_text = Some(text.trim().to_string());
    }

    /// Produces a record only when the fixed field sequence was present.
    fn finish(self) -> Option<AttributeRecord> {
        let description = self.description?;
        let type_text = self.type_text?;

        let versions = if self.history.is_empty() {
            None
        } else {
            let tokens = extract_version_numbers(&self.history.join("\n"));
            if tokens.is_empty() {
                None
            } else {
                Some(tokens)
            }
        };

        Some(AttributeRecord {
            name: self.name,
            type_text,
            description,
            optional: self.optional,
            deprecated: self.deprecated,
            nullable: self.nullable,
            explicitly_nullable: self.explicitly_nullable,
            versions,
            enum_values: if self.enum_values.is_empty() {
                None
            } else {
                Some(self.enum_values)
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISIBILITY_SECTION: &str = r"### `visibility` {#visibility}

**Description:** Visibility of this status.\
**Type:** String (Enumerable oneOf)\
`public` = Visible to everyone, shown in public timelines.\
`unlisted` = Visible to public, but not included in public timelines.\
`private` = Visible to followers only.\
`direct` = Visible only to mentioned users.\
**Version history:**\
0.9.9 - added
";

    #[test]
    fn test_extracts_enumerable_attribute() {
        let records = extract_attributes(VISIBILITY_SECTION);
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.name, "visibility");
        assert_eq!(rec.type_text, "String (Enumerable oneOf)");
        assert_eq!(rec.description, "Visibility of this status.");
        assert_eq!(
            rec.enum_values.as_deref(),
            Some(&["public", "unlisted", "private", "direct"].map(String::from)[..])
        );
        assert_eq!(rec.versions.as_deref(), Some(&["0.9.9".to_string()][..]));
    }

    #[test]
    fn test_nullable_shortcode_sets_flag_and_is_stripped() {
        let body = r"### `last_status_at` {#last_status_at}

**Description:** When the most recent status was posted.\
**Type:** {{<nullable>}} String (ISO 8601 Date)\
**Version history:**\
3.0.0 - added
";
        let records = extract_attributes(body);
        assert_eq!(records.len(), 1);
        assert!(records[0].nullable);
        assert!(!records[0].explicitly_nullable);
        assert_eq!(records[0].type_text, "String (ISO 8601 Date)");
    }

    #[test]
    fn test_or_null_union_is_explicit_nullability() {
        let body = r"### `in_reply_to_id` {#in_reply_to_id}

**Description:** ID of the status being replied to.\
**Type:** String (cast from an integer) or null\
**Version history:**\
0.1.0 - added
";
        let records = extract_attributes(body);
        assert!(records[0].nullable);
        assert!(records[0].explicitly_nullable);
    }

    #[test]
    fn test_modifier_shortcodes_set_flags() {
        let body = r"### `suspended` {{%optional%}} {#suspended}

**Description:** An extra attribute returned only when an account is suspended.\
**Type:** Boolean\
**Version history:**\
3.3.0 - added
";
        let records = extract_attributes(body);
        assert!(records[0].optional);
        assert!(!records[0].deprecated);
    }

    #[test]
    fn test_malformed_heading_produces_no_record() {
        let body = r"### `broken` {#broken}

Some prose without the labeled fields.

### `ok` {#ok}

**Description:** A well-formed attribute.\
**Type:** String\
**Version history:**\
1.0.0 - added
";
        let records = extract_attributes(body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ok");
    }

    #[test]
    fn test_enum_collection_stops_at_version_history() {
        let records = extract_attributes(VISIBILITY_SECTION);
        let values = records[0].enum_values.as_ref().unwrap();
        assert!(!values.iter().any(|v| v.contains('-')));
    }

    #[test]
    fn test_repeated_enum_values_are_kept() {
        let body = r"### `severity` {#severity}

**Description:** Severity of the block.\
**Type:** String (Enumerable oneOf)\
`silence` = Accounts are hidden.\
`silence` = Accounts are hidden.\
`suspend` = Accounts are removed.\
**Version history:**\
4.0.0 - added
";
        let records = extract_attributes(body);
        assert_eq!(
            records[0].enum_values.as_deref(),
            Some(&["silence", "silence", "suspend"].map(String::from)[..])
        );
    }

    #[test]
    fn test_section_without_headings_yields_nothing() {
        assert!(extract_attributes("Just prose. No attributes.").is_empty());
    }
}
