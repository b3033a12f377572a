//! Cell name policy: canonicalization and validity.
//!
//! Names are canonicalized by ASCII-uppercasing, and a canonical name is
//! valid when it satisfies both the fixed syntactic rule (a letter or
//! underscore, then letters, digits, or underscores) and the injected
//! predicate. The fixed rule compiles once per process; the injected
//! predicate is a precompiled regex supplied at construction, so no
//! pattern is ever re-parsed per call.

use regex::Regex;
use std::sync::OnceLock;

fn name_syntax_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("cell name syntax regex must compile")
    })
}

/// The pluggable half of cell-name validity, plus canonicalization.
#[derive(Clone, Debug)]
pub struct NamePolicy {
    allowed: Regex,
}

impl NamePolicy {
    /// A policy whose injected predicate is `allowed`, applied to
    /// canonical names on top of the fixed syntactic rule.
    pub fn new(allowed: Regex) -> NamePolicy {
        NamePolicy { allowed }
    }

    /// The canonical form of a raw name.
    pub fn normalize(&self, raw: &str) -> String {
        raw.to_ascii_uppercase()
    }

    /// Whether a canonical name is acceptable.
    pub fn is_valid(&self, canonical: &str) -> bool {
        name_syntax_re().is_match(canonical) && self.allowed.is_match(canonical)
    }
}

impl Default for NamePolicy {
    /// The empty pattern matches every name, so validity reduces to the
    /// fixed syntactic rule.
    fn default() -> NamePolicy {
        NamePolicy::new(Regex::new("").expect("empty pattern must compile"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_accepts_ordinary_names() {
        let policy = NamePolicy::default();
        for name in ["A15", "XY32", "BC7", "_TMP", "X", "TOTAL_2024"] {
            assert!(policy.is_valid(name), "{} should be valid", name);
        }
    }

    #[test]
    fn test_syntax_rule_rejections() {
        let policy = NamePolicy::default();
        for name in ["", "1A", "A-1", "A 1", "25", "A1!", "Ä1"] {
            assert!(!policy.is_valid(name), "{} should be invalid", name);
        }
    }

    #[test]
    fn test_normalize_uppercases() {
        let policy = NamePolicy::default();
        assert_eq!(policy.normalize("b12"), "B12");
        assert_eq!(policy.normalize("B12"), "B12");
    }

    #[test]
    fn test_injected_predicate_narrows_validity() {
        let policy = NamePolicy::new(Regex::new(r"^[A-Z][0-9]+$").unwrap());
        assert!(policy.is_valid("A1"));
        assert!(!policy.is_valid("TOTAL"));
    }

    #[test]
    fn test_fixed_rule_applies_even_when_the_predicate_matches() {
        let policy = NamePolicy::new(Regex::new(r"^[A-Z ]+$").unwrap());
        assert!(policy.is_valid("AB"));
        assert!(!policy.is_valid("A B"));
    }
}
