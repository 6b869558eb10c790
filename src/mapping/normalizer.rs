// src/mapping/normalizer.rs
//! Field-value normalization for external provider payloads.
//!
//! Providers disagree about how they spell the same logical value
//! ("M" vs "male", "BT" vs "Bhutanese", "CID" vs the full label). Each
//! field kind carries a small synonym table; anything the table does not
//! recognize passes through unchanged, so the normalizer never invents
//! or guesses a value.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The form fields with a normalization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Gender,
    MaritalStatus,
    Nationality,
    Country,
    IdentificationType,
    BankName,
    Salutation,
}

static GENDER: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("m", "male"),
        ("male", "male"),
        ("f", "female"),
        ("female", "female"),
        ("o", "other"),
        ("other", "other"),
    ])
});

static MARITAL_STATUS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("s", "single"),
        ("single", "single"),
        ("m", "married"),
        ("married", "married"),
        ("d", "divorced"),
        ("divorced", "divorced"),
        ("w", "widowed"),
        ("widow", "widowed"),
        ("widowed", "widowed"),
        ("sep", "separated"),
        ("separated", "separated"),
    ])
});

static NATIONALITY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("bt", "Bhutanese"),
        ("bhu", "Bhutanese"),
        ("bhutan", "Bhutanese"),
        ("bhutanese", "Bhutanese"),
        ("in", "Indian"),
        ("ind", "Indian"),
        ("india", "Indian"),
        ("indian", "Indian"),
        ("np", "Nepalese"),
        ("nepal", "Nepalese"),
        ("nepalese", "Nepalese"),
    ])
});

static COUNTRY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("bt", "Bhutan"),
        ("btn", "Bhutan"),
        ("bhutan", "Bhutan"),
        ("in", "India"),
        ("ind", "India"),
        ("india", "India"),
        ("np", "Nepal"),
        ("npl", "Nepal"),
        ("nepal", "Nepal"),
        ("bd", "Bangladesh"),
        ("bangladesh", "Bangladesh"),
    ])
});

static IDENTIFICATION_TYPE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("cid", "Citizenship ID"),
        ("citizenship id", "Citizenship ID"),
        ("citizenship identity card", "Citizenship ID"),
        ("passport", "Passport"),
        ("pp", "Passport"),
        ("wp", "Work Permit"),
        ("work permit", "Work Permit"),
        ("srp", "Special Residency Permit"),
        ("special residency permit", "Special Residency Permit"),
    ])
});

static BANK_NAME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("bdb", "Bhutan Development Bank"),
        ("bdbl", "Bhutan Development Bank"),
        ("bob", "Bank of Bhutan"),
        ("bobl", "Bank of Bhutan"),
        ("bnb", "Bhutan National Bank"),
        ("bnbl", "Bhutan National Bank"),
        ("dpnb", "Druk PNB Bank"),
        ("tbank", "T Bank"),
        ("t bank", "T Bank"),
    ])
});

static SALUTATION: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("mister", "mr"),
        ("missus", "mrs"),
        ("madam", "mrs"),
        ("doctor", "dr"),
    ])
});

fn table(kind: FieldKind) -> &'static HashMap<&'static str, &'static str> {
    match kind {
        FieldKind::Gender => &GENDER,
        FieldKind::MaritalStatus => &MARITAL_STATUS,
        FieldKind::Nationality => &NATIONALITY,
        FieldKind::Country => &COUNTRY,
        FieldKind::IdentificationType => &IDENTIFICATION_TYPE,
        FieldKind::BankName => &BANK_NAME,
        FieldKind::Salutation => &SALUTATION,
    }
}

/// Normalizes a raw provider value for the given field kind.
///
/// Total: trims the input, returns `""` for empty input, looks the
/// lowercased value up in the kind's synonym table, and falls back to
/// the trimmed original when nothing matches. Salutations additionally
/// have trailing periods stripped and are always lowercased.
pub fn normalize(raw: &str, kind: FieldKind) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut key = trimmed.to_lowercase();
    if kind == FieldKind::Salutation {
        key = key.trim_end_matches('.').to_string();
    }

    let out = match table(kind).get(key.as_str()) {
        Some(canonical) => canonical.to_string(),
        // salutations normalize to the lowercased, period-stripped form
        None if kind == FieldKind::Salutation => key,
        None => trimmed.to_string(),
    };

    log::trace!("normalize {:?}: {:?} -> {:?}", kind, raw, out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_normalization() {
        assert_eq!(normalize("F", FieldKind::Gender), "female");
        assert_eq!(normalize("Female", FieldKind::Gender), "female");
        assert_eq!(normalize("m", FieldKind::Gender), "male");
        assert_eq!(normalize("", FieldKind::Gender), "");
        assert_eq!(normalize("   ", FieldKind::Gender), "");
    }

    #[test]
    fn test_nationality_abbreviations() {
        assert_eq!(normalize("bt", FieldKind::Nationality), "Bhutanese");
        assert_eq!(normalize("BHU", FieldKind::Nationality), "Bhutanese");
        assert_eq!(normalize("Bhutanese", FieldKind::Nationality), "Bhutanese");
    }

    #[test]
    fn test_country_codes() {
        assert_eq!(normalize("BT", FieldKind::Country), "Bhutan");
        assert_eq!(normalize("india", FieldKind::Country), "India");
        assert_eq!(normalize("Bhutan", FieldKind::Country), "Bhutan");
    }

    #[test]
    fn test_identification_type() {
        assert_eq!(normalize("CID", FieldKind::IdentificationType), "Citizenship ID");
        assert_eq!(normalize("passport", FieldKind::IdentificationType), "Passport");
    }

    #[test]
    fn test_salutation_strips_period_and_lowercases() {
        assert_eq!(normalize("Mr.", FieldKind::Salutation), "mr");
        assert_eq!(normalize("MRS", FieldKind::Salutation), "mrs");
        assert_eq!(normalize("Mister", FieldKind::Salutation), "mr");
        assert_eq!(normalize("Lopen", FieldKind::Salutation), "lopen");
    }

    #[test]
    fn test_unmatched_value_passes_through() {
        assert_eq!(normalize(" Displaced Person ", FieldKind::Nationality), "Displaced Person");
        assert_eq!(normalize("RICB", FieldKind::BankName), "RICB");
    }

    #[test]
    fn test_marital_status_single_letter_codes() {
        assert_eq!(normalize("M", FieldKind::MaritalStatus), "married");
        assert_eq!(normalize("w", FieldKind::MaritalStatus), "widowed");
        assert_eq!(normalize("Separated", FieldKind::MaritalStatus), "separated");
    }
}
