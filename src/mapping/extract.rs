// src/mapping/extract.rs
//! Declarative field extraction over raw provider JSON.
//!
//! Each mapper is a table of [`FieldRule`]s: a canonical field name, an
//! ordered list of source-path alternatives, and an optional transform.
//! One generic routine consumes the table, so supporting a new source
//! alias is a data change. Paths are dot-separated; every segment also
//! matches its camelCase→snake_case conversion, so either naming
//! convention in the source is accepted without a second table entry.

use crate::mapping::locations;
use crate::mapping::normalizer::{self, FieldKind};
use crate::models::form_data::CanonicalFormData;
use crate::utils::dates;
use serde_json::Value;

/// Value transform applied after extraction. Transforms are total; a
/// value that fails one collapses to `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// ISO date with optional discarded time suffix
    Date,
    /// ISO date or `DD/MM/YYYY`
    DateFlexible,
    /// Synonym-table normalization for the given field kind
    Normalize(FieldKind),
    /// Case-insensitive match against the dzongkhag allow-list
    Dzongkhag,
    /// Case-insensitive match against the gewog allow-list
    Gewog,
    /// PEP category sentinel: "Not Applicable" → "no", anything else → "yes"
    PepCategoryFlag,
    /// "Yes" sentinel → "yes", anything else → "no"
    YesNoSentinel,
}

/// One row of a mapper's extraction table.
pub struct FieldRule {
    /// Canonical output field name
    pub canonical: &'static str,
    /// Source paths, tried in order; first non-empty match wins
    pub sources: &'static [&'static str],
    pub transform: Option<Transform>,
}

/// Converts a camelCase key to snake_case: an underscore is inserted
/// before each uppercase letter and the result is lowercased.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn lookup_key<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(v) = obj.get(key) {
        return Some(v);
    }
    let snake = camel_to_snake(key);
    if snake != key {
        return obj.get(&snake);
    }
    None
}

/// Walks a dot-separated path into the raw payload. Missing segments or
/// non-object intermediates yield `None`.
pub fn extract_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = lookup_key(current.as_object()?, segment)?;
    }
    Some(current)
}

/// Renders a leaf value to a trimmed string. Strings, numbers and
/// booleans are accepted; null, objects and arrays count as absent.
pub fn leaf_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Tries each source path in order and returns the first non-empty
/// value, or `""` when none match.
pub fn extract_first(root: &Value, sources: &[&str]) -> String {
    for path in sources {
        if let Some(value) = extract_path(root, path) {
            let text = leaf_to_string(value);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

fn apply_transform(transform: Transform, raw: &str) -> String {
    if raw.is_empty() {
        // sentinel folds included: an absent field stays an unfilled
        // field, never a defaulted "no"
        return String::new();
    }
    match transform {
        Transform::Date => dates::format_date(raw),
        Transform::DateFlexible => dates::format_date_flexible(raw),
        Transform::Normalize(kind) => normalizer::normalize(raw, kind),
        Transform::Dzongkhag => locations::match_dzongkhag(raw),
        Transform::Gewog => locations::match_gewog(raw),
        Transform::PepCategoryFlag => {
            if raw.trim().eq_ignore_ascii_case("not applicable") {
                "no".to_string()
            } else {
                "yes".to_string()
            }
        }
        Transform::YesNoSentinel => {
            if raw.trim().eq_ignore_ascii_case("yes") {
                "yes".to_string()
            } else {
                "no".to_string()
            }
        }
    }
}

/// Runs a rule table against a raw payload, writing every canonical
/// field (possibly empty) into the output.
pub fn apply_rules(root: &Value, rules: &[FieldRule], out: &mut CanonicalFormData) {
    for rule in rules {
        let raw = extract_first(root, rule.sources);
        let value = match rule.transform {
            Some(transform) => apply_transform(transform, &raw),
            None => raw,
        };
        out.set(rule.canonical, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("fullName"), "full_name");
        assert_eq!(camel_to_snake("dateOfBirth"), "date_of_birth");
        assert_eq!(camel_to_snake("gender"), "gender");
    }

    #[test]
    fn test_path_walks_nested_sections() {
        let raw = json!({"address": {"Permanent_address": {"village": "Khasadrapchu"}}});
        let found = extract_path(&raw, "address.Permanent_address.village").unwrap();
        assert_eq!(leaf_to_string(found), "Khasadrapchu");
    }

    #[test]
    fn test_snake_case_fallback_per_segment() {
        let raw = json!({"full_name": "Pema Wangmo"});
        assert_eq!(extract_first(&raw, &["fullName"]), "Pema Wangmo");

        // listed spelling still wins when both are present
        let both = json!({"fullName": "A", "full_name": "B"});
        assert_eq!(extract_first(&both, &["fullName"]), "A");
    }

    #[test]
    fn test_first_nonempty_alternative_wins() {
        let raw = json!({"party_name": "", "name": "Karma Dorji"});
        assert_eq!(extract_first(&raw, &["party_name", "full_name", "name"]), "Karma Dorji");
    }

    #[test]
    fn test_wrong_leaf_types_are_absent() {
        let raw = json!({"gender": null, "age": 34, "tags": ["x"], "active": true});
        assert_eq!(extract_first(&raw, &["gender"]), "");
        assert_eq!(extract_first(&raw, &["age"]), "34");
        assert_eq!(extract_first(&raw, &["tags"]), "");
        assert_eq!(extract_first(&raw, &["active"]), "true");
    }

    #[test]
    fn test_totality_over_non_object_roots() {
        assert_eq!(extract_first(&Value::Null, &["personal.gender"]), "");
        assert_eq!(extract_first(&json!("scalar"), &["personal.gender"]), "");
    }

    #[test]
    fn test_sentinel_transforms() {
        assert_eq!(apply_transform(Transform::PepCategoryFlag, "Not Applicable"), "no");
        assert_eq!(apply_transform(Transform::PepCategoryFlag, "not applicable"), "no");
        assert_eq!(apply_transform(Transform::PepCategoryFlag, "Head of State"), "yes");
        assert_eq!(apply_transform(Transform::YesNoSentinel, "Yes"), "yes");
        assert_eq!(apply_transform(Transform::YesNoSentinel, "YES"), "yes");
        assert_eq!(apply_transform(Transform::YesNoSentinel, "No"), "no");
        // absent input stays absent, not defaulted
        assert_eq!(apply_transform(Transform::PepCategoryFlag, ""), "");
        assert_eq!(apply_transform(Transform::YesNoSentinel, ""), "");
    }
}
