// src/mapping/ndi_mapper.rs
//! Mapper for the NDI wallet credential shape.
//!
//! The credential discloses a flat attribute set covering personal
//! details only. Unlike the customer-record system, the wallet's address
//! values are free text, so dzongkhag and gewog are only accepted when
//! they match the wizard's fixed dropdown lists; anything unlisted is
//! dropped rather than preserved. The credential carries a single
//! address, which doubles as the current address when no current-address
//! slice is disclosed.

use crate::mapping::extract::{self, FieldRule, Transform};
use crate::mapping::normalizer::FieldKind;
use crate::models::form_data::{field, CanonicalFormData};
use serde_json::Value;

static RULES: [FieldRule; 13] = [
    FieldRule {
        canonical: field::APPLICANT_NAME,
        sources: &["fullName", "name"],
        transform: None,
    },
    FieldRule {
        canonical: field::GENDER,
        sources: &["gender"],
        transform: Some(Transform::Normalize(FieldKind::Gender)),
    },
    FieldRule {
        canonical: field::DATE_OF_BIRTH,
        sources: &["dateOfBirth", "dob"],
        transform: Some(Transform::DateFlexible),
    },
    FieldRule {
        canonical: field::NATIONALITY,
        sources: &["citizenship", "nationality"],
        transform: Some(Transform::Normalize(FieldKind::Nationality)),
    },
    FieldRule {
        canonical: field::ID_TYPE,
        sources: &["idType", "documentType"],
        transform: Some(Transform::Normalize(FieldKind::IdentificationType)),
    },
    FieldRule {
        canonical: field::ID_NUMBER,
        sources: &["idNumber", "cidNumber"],
        transform: None,
    },
    FieldRule {
        canonical: field::PHONE_NUMBER,
        sources: &["mobileNumber", "phoneNumber"],
        transform: None,
    },
    // wallet addresses are matched against the dropdown lists; an
    // unlisted value is dropped, never stored as free text
    FieldRule {
        canonical: field::PERM_DZONGKHAG,
        sources: &["permanentDzongkhag", "dzongkhag"],
        transform: Some(Transform::Dzongkhag),
    },
    FieldRule {
        canonical: field::PERM_GEWOG,
        sources: &["permanentGewog", "gewog"],
        transform: Some(Transform::Gewog),
    },
    FieldRule {
        canonical: field::PERM_VILLAGE,
        sources: &["permanentVillage", "villageName", "village"],
        transform: None,
    },
    FieldRule {
        canonical: field::CURR_DZONGKHAG,
        sources: &["currentDzongkhag"],
        transform: Some(Transform::Dzongkhag),
    },
    FieldRule {
        canonical: field::CURR_GEWOG,
        sources: &["currentGewog"],
        transform: Some(Transform::Gewog),
    },
    FieldRule {
        canonical: field::CURR_VILLAGE,
        sources: &["currentVillage"],
        transform: None,
    },
];

/// Maps a disclosed NDI credential into canonical form data
/// (personal-detail subset). Total over arbitrary JSON.
pub fn map_ndi_credential(raw: &Value) -> CanonicalFormData {
    let mut data = CanonicalFormData::new();
    extract::apply_rules(raw, &RULES, &mut data);

    // The credential provider supplies only one address; it stands in
    // for the current address when none was disclosed.
    let current_absent = data.get(field::CURR_DZONGKHAG).is_empty()
        && data.get(field::CURR_GEWOG).is_empty()
        && data.get(field::CURR_VILLAGE).is_empty();
    if current_absent {
        for (curr, perm) in [
            (field::CURR_DZONGKHAG, field::PERM_DZONGKHAG),
            (field::CURR_GEWOG, field::PERM_GEWOG),
            (field::CURR_VILLAGE, field::PERM_VILLAGE),
        ] {
            let value = data.get(perm).to_string();
            data.set(curr, value);
        }
    }

    // Salutation is derived purely from normalized gender; there is no
    // name-prefix inference on this path.
    let gender = data.get(field::GENDER).to_string();
    let salutation = match gender.as_str() {
        "male" => "mr",
        "female" => "ms",
        _ => "",
    };
    data.set(field::SALUTATION, salutation);

    data.finalize_verified();
    log::debug!(
        "ndi credential mapped: {} checklist fields verified",
        data.verified_fields.len()
    );
    data
}
