//! # Version Token Engine
//!
//! Extracts `MAJOR.MINOR.PATCH` tokens from free-form version-history prose,
//! compares them, and classifies records as released or unreleased relative
//! to a supported baseline.
//!
//! The history prose is maintained by many contributors; malformed tokens are
//! simply not extracted, never an error.

use crate::parser::models::AttributeRecord;
use regex::Regex;
use std::sync::OnceLock;

/// The Mastodon release the generated document targets. Anything whose own
/// "added" entry is newer than this is classified as unreleased.
pub const DEFAULT_SUPPORTED_VERSION: &str = "4.3.0";

fn dotted_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)*").expect("Invalid regex"))
}

fn history_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `4.0.0 - note`, with the note running to the end of the line.
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*([0-9]+\.[0-9]+\.[0-9]+)\s*-\s*(.*?)\s*$").expect("Invalid regex")
    })
}

/// Extracts every `MAJOR.MINOR.PATCH` token from free-form history prose.
///
/// Literal `\n` escape sequences count as line breaks. Tokens are
/// de-duplicated while preserving first-seen order. Dotted runs with more or
/// fewer than three components (`1.2`, `1.2.3.4`, a parenthetical "see 1.2")
/// are not version tokens and are ignored.
pub fn extract_version_numbers(history: &str) -> Vec<String> {
    let unescaped = history.replace("\\n", "\n");
    let mut seen = Vec::new();

    for m in dotted_run_re().find_iter(&unescaped) {
        let token = m.as_str();
        if is_version_token(token) && !seen.iter().any(|v| v == token) {
            seen.push(token.to_string());
        }
    }

    seen
}

fn is_version_token(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// Compares two version strings numerically, component-wise.
///
/// Returns the larger operand; on exact equality the first operand wins.
/// `1.5.0` is smaller than `1.10.0`.
pub fn compare_versions<'a>(a: &'a str, b: &'a str) -> &'a str {
    let pa = parse_components(a);
    let pb = parse_components(b);
    if pb > pa {
        b
    } else {
        a
    }
}

fn parse_components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0))
        .collect()
}

/// Reduces a list of version strings to its maximum.
///
/// An empty list returns the supplied fallback baseline rather than failing.
pub fn find_max_version(versions: &[String], fallback: &str) -> String {
    versions
        .iter()
        .fold(None::<&str>, |max, candidate| match max {
            None => Some(candidate.as_str()),
            Some(current) => Some(compare_versions(current, candidate)),
        })
        .unwrap_or(fallback)
        .to_string()
}

/// Returns true iff some version in the list exceeds `supported`.
pub fn has_newer_version(versions: &[String], supported: &str) -> bool {
    let baseline = parse_components(supported);
    versions.iter().any(|v| parse_components(v) > baseline)
}

/// Returns true iff the history's own "added" entry exceeds `supported`.
///
/// Only an entry whose note is exactly the marker "added" counts. Later
/// parameter-addition notes ("4.4.0 - added `date_of_birth` parameter")
/// reference bigger versions without making the operation itself unreleased.
pub fn is_operation_unreleased(history: &str, supported: &str) -> bool {
    let added = added_versions(history);
    has_newer_version(&added, supported)
}

/// Collects the versions of history entries whose note is exactly "added".
fn added_versions(history: &str) -> Vec<String> {
    let unescaped = history.replace("\\n", "\n");
    let mut versions = Vec::new();

    for caps in history_entry_re().captures_iter(&unescaped) {
        let version = &caps[1];
        let note = caps[2].trim();
        if note.eq_ignore_ascii_case("added") && !versions.iter().any(|v| v == version) {
            versions.push(version.to_string());
        }
    }

    versions
}

/// Clears `nullable` on sibling attributes that were all present from the
/// entity's very first recorded release.
///
/// If every sibling carrying version data has exactly one identical version,
/// the field cannot be retroactively nullable, so the default `nullable` flag
/// is cleared on those siblings. Attributes lacking version data are left
/// untouched, and explicitly stated nullability is never suppressed.
pub fn remove_nullable_if_same_version(attributes: &mut [AttributeRecord]) {
    let mut shared: Option<&str> = None;
    for attr in attributes.iter() {
        let Some(versions) = attr.versions.as_deref() else {
            continue;
        };
        let [only] = versions else {
            return;
        };
        match shared {
            None => shared = Some(only.as_str()),
            Some(existing) if existing == only => {}
            Some(_) => return,
        }
    }

    if shared.is_none() {
        return;
    }

    for attr in attributes.iter_mut() {
        if attr.versions.is_some() && !attr.explicitly_nullable {
            attr.nullable = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, versions: Option<Vec<&str>>, explicit: bool) -> AttributeRecord {
        AttributeRecord {
            name: name.to_string(),
            type_text: "String".to_string(),
            description: String::new(),
            optional: false,
            deprecated: false,
            nullable: true,
            explicitly_nullable: explicit,
            versions: versions.map(|v| v.into_iter().map(String::from).collect()),
            enum_values: None,
        }
    }

    #[test]
    fn test_extract_preserves_first_seen_order() {
        let history = "0.0.0 - added\n2.7.0 - x\n2.8.0 - y";
        assert_eq!(
            extract_version_numbers(history),
            vec!["0.0.0", "2.7.0", "2.8.0"]
        );
    }

    #[test]
    fn test_extract_collapses_duplicates() {
        let history = "2.7.0 - added\n2.7.0 - changed\n3.0.0 - removed";
        assert_eq!(extract_version_numbers(history), vec!["2.7.0", "3.0.0"]);
    }

    #[test]
    fn test_extract_handles_escaped_newlines() {
        let history = r"0.1.0 - added\n4.0.0 - changed";
        assert_eq!(extract_version_numbers(history), vec!["0.1.0", "4.0.0"]);
    }

    #[test]
    fn test_extract_ignores_non_version_dotted_runs() {
        let history = "2.7.0 - added (see section 1.2 and build 1.2.3.4)";
        assert_eq!(extract_version_numbers(history), vec!["2.7.0"]);
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract_version_numbers("no versions here").is_empty());
        assert!(extract_version_numbers("").is_empty());
    }

    #[test]
    fn test_compare_is_numeric_not_lexical() {
        assert_eq!(compare_versions("1.5.0", "1.10.0"), "1.10.0");
        assert_eq!(compare_versions("4.3.0", "4.3.0"), "4.3.0");
        assert_eq!(compare_versions("2.0.1", "2.0.0"), "2.0.1");
    }

    #[test]
    fn test_find_max_version_with_fallback() {
        let versions = vec!["2.7.0".to_string(), "4.0.0".to_string(), "3.1.0".to_string()];
        assert_eq!(find_max_version(&versions, "0.0.0"), "4.0.0");
        assert_eq!(find_max_version(&[], DEFAULT_SUPPORTED_VERSION), "4.3.0");
    }

    #[test]
    fn test_operation_added_after_baseline_is_unreleased() {
        assert!(is_operation_unreleased("4.4.0 - added", "4.3.0"));
    }

    #[test]
    fn test_parameter_addition_note_does_not_qualify() {
        let history = "2.7.0 - added\n4.4.0 - added date_of_birth parameter";
        assert!(!is_operation_unreleased(history, "4.3.0"));
    }

    #[test]
    fn test_old_operation_is_released() {
        assert!(!is_operation_unreleased("2.7.0 - added", "4.3.0"));
    }

    #[test]
    fn test_nullable_cleared_when_all_siblings_share_one_version() {
        let mut attrs = vec![
            attr("a", Some(vec!["4.4.0"]), false),
            attr("b", Some(vec!["4.4.0"]), false),
        ];
        remove_nullable_if_same_version(&mut attrs);
        assert!(attrs.iter().all(|a| !a.nullable));
    }

    #[test]
    fn test_nullable_kept_when_versions_differ() {
        let mut attrs = vec![
            attr("a", Some(vec!["4.3.0"]), false),
            attr("b", Some(vec!["4.4.0"]), false),
        ];
        remove_nullable_if_same_version(&mut attrs);
        assert!(attrs.iter().all(|a| a.nullable));
    }

    #[test]
    fn test_explicit_nullability_is_never_suppressed() {
        let mut attrs = vec![
            attr("a", Some(vec!["4.4.0"]), true),
            attr("b", Some(vec!["4.4.0"]), false),
        ];
        remove_nullable_if_same_version(&mut attrs);
        assert!(attrs[0].nullable);
        assert!(!attrs[1].nullable);
    }

    #[test]
    fn test_unversioned_siblings_are_left_untouched() {
        let mut attrs = vec![
            attr("a", Some(vec!["4.4.0"]), false),
            attr("b", None, false),
        ];
        remove_nullable_if_same_version(&mut attrs);
        assert!(!attrs[0].nullable);
        assert!(attrs[1].nullable);
    }

    #[test]
    fn test_multi_version_sibling_blocks_the_pass() {
        let mut attrs = vec![
            attr("a", Some(vec!["4.4.0"]), false),
            attr("b", Some(vec!["4.4.0", "4.5.0"]), false),
        ];
        remove_nullable_if_same_version(&mut attrs);
        assert!(attrs.iter().all(|a| a.nullable));
    }
}
