// src/mapping/customer_mapper.rs
//! Mapper for the customer-onboarding system's nested record shape.
//!
//! The record arrives as optional sections (`personal`,
//! `address.Permanent_address`, `address.resident_address`, `contact`,
//! `employment`, `pep`), and the same logical field has accumulated
//! several source spellings over the system's history, so every rule
//! carries an ordered alternative list. The mapper is total: any
//! section, field or the whole record may be absent or malformed and the
//! output is still a fully-shaped [`CanonicalFormData`].
//!
//! Address text from this system is trusted and preserved verbatim,
//! including values outside the wizard's dropdown lists. The NDI mapper
//! takes the opposite stance.

use crate::mapping::extract::{self, FieldRule, Transform};
use crate::mapping::normalizer::{self, FieldKind};
use crate::models::form_data::{field, CanonicalFormData};
use serde_json::Value;

/// Titles recognized at the start of a full-name string.
const NAME_PREFIXES: [&str; 5] = ["mr", "mrs", "ms", "dr", "miss"];

static RULES: [FieldRule; 19] = [
    FieldRule {
        canonical: field::GENDER,
        sources: &["personal.gender", "personal.gender_code", "personal.sex"],
        transform: Some(Transform::Normalize(FieldKind::Gender)),
    },
    FieldRule {
        canonical: field::DATE_OF_BIRTH,
        sources: &["personal.date_of_birth", "personal.dob", "personal.birth_date"],
        transform: Some(Transform::Date),
    },
    FieldRule {
        canonical: field::MARITAL_STATUS,
        sources: &["personal.marital_status", "personal.civil_status"],
        transform: Some(Transform::Normalize(FieldKind::MaritalStatus)),
    },
    FieldRule {
        canonical: field::NATIONALITY,
        sources: &["personal.nationality", "personal.citizenship"],
        transform: Some(Transform::Normalize(FieldKind::Nationality)),
    },
    FieldRule {
        canonical: field::ID_TYPE,
        sources: &["personal.identification_type", "personal.id_type", "personal.document_type"],
        transform: Some(Transform::Normalize(FieldKind::IdentificationType)),
    },
    FieldRule {
        canonical: field::ID_NUMBER,
        sources: &["personal.cid_number", "personal.identification_no", "personal.id_number"],
        transform: None,
    },
    FieldRule {
        canonical: field::TPN_NUMBER,
        sources: &["personal.tpn_number", "personal.tpn"],
        transform: None,
    },
    FieldRule {
        canonical: field::PHONE_NUMBER,
        sources: &["contact.mobile_number", "contact.phone_number", "contact.phone"],
        transform: None,
    },
    FieldRule {
        canonical: field::EMAIL_ADDRESS,
        sources: &["contact.email", "contact.email_address"],
        transform: None,
    },
    FieldRule {
        canonical: field::OCCUPATION,
        sources: &["employment.occupation", "employment.occupation_desc", "employment.designation"],
        transform: None,
    },
    FieldRule {
        canonical: field::EMPLOYER_NAME,
        sources: &["employment.employer_name", "employment.organization_name", "employment.agency"],
        transform: None,
    },
    FieldRule {
        canonical: field::REPAYMENT_BANK_NAME,
        sources: &["employment.salary_bank", "employment.bank_name"],
        transform: Some(Transform::Normalize(FieldKind::BankName)),
    },
    // Permanent and current address text is preserved verbatim, even
    // when it does not match a dropdown option. Country codes still go
    // through the synonym table.
    FieldRule {
        canonical: field::PERM_COUNTRY,
        sources: &[
            "address.Permanent_address.country",
            "address.Permanent_address.country_name",
        ],
        transform: Some(Transform::Normalize(FieldKind::Country)),
    },
    FieldRule {
        canonical: field::PERM_DZONGKHAG,
        sources: &[
            "address.Permanent_address.pty_adr_permanent_dzongkhag",
            "address.Permanent_address.dzongkhag",
        ],
        transform: None,
    },
    FieldRule {
        canonical: field::PERM_GEWOG,
        sources: &[
            "address.Permanent_address.pty_adr_permanent_gewog",
            "address.Permanent_address.gewog",
        ],
        transform: None,
    },
    FieldRule {
        canonical: field::PERM_VILLAGE,
        sources: &[
            "address.Permanent_address.pty_adr_permanent_village",
            "address.Permanent_address.village",
        ],
        transform: None,
    },
    FieldRule {
        canonical: field::CURR_DZONGKHAG,
        sources: &[
            "address.resident_address.pty_adr_current_dzongkhag",
            "address.resident_address.dzongkhag",
        ],
        transform: None,
    },
    FieldRule {
        canonical: field::CURR_GEWOG,
        sources: &[
            "address.resident_address.pty_adr_current_gewog",
            "address.resident_address.gewog",
        ],
        transform: None,
    },
    FieldRule {
        canonical: field::CURR_VILLAGE,
        sources: &[
            "address.resident_address.pty_adr_current_village",
            "address.resident_address.village",
        ],
        transform: None,
    },
];

static PEP_RULES: [FieldRule; 3] = [
    FieldRule {
        canonical: field::PEP_CATEGORY,
        sources: &["pep.category", "pep.pep_category"],
        transform: None,
    },
    FieldRule {
        canonical: field::IS_PEP,
        sources: &["pep.category", "pep.pep_category"],
        transform: Some(Transform::PepCategoryFlag),
    },
    FieldRule {
        canonical: field::RELATED_TO_PEP,
        sources: &["pep.related_pep", "pep.is_related_to_pep"],
        transform: Some(Transform::YesNoSentinel),
    },
];

/// Splits a recognized title prefix off a full-name string.
///
/// Returns the lowercased salutation and the remaining name. When the
/// first token is not a recognized title, the salutation is empty and
/// the name passes through untouched.
fn split_salutation(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    if let Some((first, rest)) = trimmed.split_once(char::is_whitespace) {
        let token = first.trim_end_matches('.').to_lowercase();
        if NAME_PREFIXES.contains(&token.as_str()) {
            return (token, rest.trim().to_string());
        }
    }
    (String::new(), trimmed.to_string())
}

/// Maps a raw customer record into canonical form data.
///
/// Total over arbitrary JSON: a `null` record, missing sections or
/// wrongly-typed leaves simply leave the corresponding fields empty.
pub fn map_customer_record(response: &Value) -> CanonicalFormData {
    let mut data = CanonicalFormData::new();
    extract::apply_rules(response, &RULES, &mut data);
    extract::apply_rules(response, &PEP_RULES, &mut data);

    // Salutation comes from the explicit source field when present,
    // otherwise from a recognized title prefix on the full name. The
    // name output never carries a recognized prefix.
    let raw_name = extract::extract_first(
        response,
        &["personal.party_name", "personal.full_name", "personal.name"],
    );
    let explicit = extract::extract_first(response, &["personal.salutation", "personal.title"]);
    let (inferred, name_without_salutation) = split_salutation(&raw_name);
    let salutation = if explicit.is_empty() {
        inferred
    } else {
        normalizer::normalize(&explicit, FieldKind::Salutation)
    };
    data.set(field::SALUTATION, salutation);
    data.set(field::APPLICANT_NAME, name_without_salutation);

    data.finalize_verified();
    log::debug!(
        "customer record mapped: {} of {} checklist fields verified",
        data.verified_fields.len(),
        crate::models::form_data::VERIFIED_FIELD_CHECKLIST.len()
    );
    data
}
