//! # Shared-Component Naming Policy
//!
//! Assigns stable names to deduplicated enumerations. Well-known property
//! names map through a data-driven table to their conventional external
//! names; everything else falls back to a generic derivation from the owning
//! property. Residual collisions between different value lists get a short
//! content-derived suffix, keeping the whole policy deterministic and
//! traversal-order independent.
//!
//! Component names must match `^[A-Za-z0-9_.-]+$`: the consuming format
//! forbids structural separators in the component namespace.

use heck::ToUpperCamelCase;

/// One fixed-name table entry: a property (optionally scoped to owners whose
/// name contains `owner`) that maps to a conventional component name.
#[derive(Debug, Clone)]
pub struct FixedName {
    /// The owning property name this entry matches.
    pub property: &'static str,
    /// When set, the entry only matches owners whose name contains this.
    pub owner: Option<&'static str>,
    /// The conventional component name to use.
    pub component: &'static str,
}

/// The naming policy: fixed table first, generic derivation as fallback.
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    fixed: Vec<FixedName>,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        NamingPolicy {
            fixed: vec![
                FixedName {
                    property: "context",
                    owner: None,
                    component: "FilterContext",
                },
                FixedName {
                    property: "type",
                    owner: Some("Notification"),
                    component: "NotificationType",
                },
                FixedName {
                    property: "type",
                    owner: Some("PreviewCard"),
                    component: "PreviewCardType",
                },
                FixedName {
                    property: "visibility",
                    owner: None,
                    component: "StatusVisibility",
                },
                FixedName {
                    property: "category",
                    owner: None,
                    component: "ReportCategory",
                },
                FixedName {
                    property: "policy",
                    owner: None,
                    component: "NotificationPolicy",
                },
                FixedName {
                    property: "state",
                    owner: None,
                    component: "ReviewState",
                },
            ],
        }
    }
}

impl NamingPolicy {
    /// Creates a policy with a custom fixed-name table.
    pub fn new(fixed: Vec<FixedName>) -> Self {
        NamingPolicy { fixed }
    }

    /// Derives the base component name for an enum owned by
    /// `owner` (entity name or operation id) at property `property`.
    pub fn component_name(&self, owner: &str, property: &str) -> String {
        for entry in &self.fixed {
            if entry.property != property {
                continue;
            }
            let owner_matches = match entry.owner {
                Some(needle) => owner.contains(needle),
                None => true,
            };
            if owner_matches {
                return entry.component.to_string();
            }
        }

        sanitize(&format!("{}Enum", property.to_upper_camel_case()))
    }

    /// Appends a short content-derived suffix to break a collision between
    /// two different value lists that derive the same base name.
    pub fn disambiguated(&self, base: &str, signature: &str) -> String {
        format!("{}_{:06x}", base, fnv1a(signature.as_bytes()) & 0xff_ffff)
    }
}

/// FNV-1a, hand-rolled: `std::hash` is randomly seeded per process, which
/// would break run-to-run determinism of generated names.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100_0000_01b3);
    }
    hash
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_table_wins_over_derivation() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.component_name("Filter", "context"), "FilterContext");
        assert_eq!(
            policy.component_name("Status", "visibility"),
            "StatusVisibility"
        );
    }

    #[test]
    fn test_owner_scoped_entries() {
        let policy = NamingPolicy::default();
        assert_eq!(
            policy.component_name("Notification", "type"),
            "NotificationType"
        );
        assert_eq!(
            policy.component_name("PreviewCard", "type"),
            "PreviewCardType"
        );
        // `type` on an unrelated owner falls back to the generic derivation.
        assert_eq!(policy.component_name("MediaAttachment", "type"), "TypeEnum");
    }

    #[test]
    fn test_generic_derivation_is_pascal_cased() {
        let policy = NamingPolicy::default();
        assert_eq!(
            policy.component_name("Filter", "filter_action"),
            "FilterActionEnum"
        );
    }

    #[test]
    fn test_names_match_the_allowed_charset() {
        let policy = NamingPolicy::default();
        let name = policy.component_name("Admin::Ip", "weird prop/name");
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')));
    }

    #[test]
    fn test_disambiguation_is_deterministic() {
        let policy = NamingPolicy::default();
        let a = policy.disambiguated("TypeEnum", r#"["audio","image"]"#);
        let b = policy.disambiguated("TypeEnum", r#"["audio","image"]"#);
        let c = policy.disambiguated("TypeEnum", r#"["follow","mention"]"#);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("TypeEnum_"));
    }
}
