// src/models/form_data.rs
//! Canonical form-data model produced by the verification mappers.
//!
//! Both external providers (the customer-record system and the NDI
//! wallet) are flattened into this single shape, which is what the loan
//! wizard's first data-entry step consumes. The `verified_fields` list
//! records which of the checklist fields were populated from a verified
//! source, so the wizard can pre-fill and lock exactly those inputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical form field names shared by the mappers, the hand-off store
/// and the wizard.
///
/// The names match the wizard's form schema; a mapper must never invent
/// a field outside this namespace.
pub mod field {
    pub const SALUTATION: &str = "salutation";
    pub const APPLICANT_NAME: &str = "applicantName";
    pub const GENDER: &str = "gender";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";
    pub const MARITAL_STATUS: &str = "maritalStatus";
    pub const NATIONALITY: &str = "nationality";
    pub const ID_TYPE: &str = "identificationType";
    pub const ID_NUMBER: &str = "identificationNumber";
    pub const TPN_NUMBER: &str = "tpnNumber";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const EMAIL_ADDRESS: &str = "emailAddress";
    pub const OCCUPATION: &str = "occupation";
    pub const EMPLOYER_NAME: &str = "employerName";
    pub const REPAYMENT_BANK_NAME: &str = "repaymentBankName";
    pub const PERM_COUNTRY: &str = "permCountry";
    pub const PERM_DZONGKHAG: &str = "permDzongkhag";
    pub const PERM_GEWOG: &str = "permGewog";
    pub const PERM_VILLAGE: &str = "permVillage";
    pub const CURR_DZONGKHAG: &str = "currDzongkhag";
    pub const CURR_GEWOG: &str = "currGewog";
    pub const CURR_VILLAGE: &str = "currVillage";
    pub const PEP_CATEGORY: &str = "pepCategory";
    pub const IS_PEP: &str = "isPep";
    pub const RELATED_TO_PEP: &str = "relatedToPep";
}

/// The fixed checklist of fields eligible for `verified_fields`.
///
/// A checklist field whose mapped value is non-empty at mapping time is
/// marked verified; everything else stays editable in the wizard.
pub const VERIFIED_FIELD_CHECKLIST: [&str; 17] = [
    field::APPLICANT_NAME,
    field::SALUTATION,
    field::GENDER,
    field::DATE_OF_BIRTH,
    field::MARITAL_STATUS,
    field::NATIONALITY,
    field::ID_TYPE,
    field::ID_NUMBER,
    field::TPN_NUMBER,
    field::PHONE_NUMBER,
    field::EMAIL_ADDRESS,
    field::OCCUPATION,
    field::PERM_DZONGKHAG,
    field::PERM_GEWOG,
    field::PERM_VILLAGE,
    field::CURR_DZONGKHAG,
    field::CURR_GEWOG,
];

/// Flat, canonical form data plus the verified-field bookkeeping.
///
/// This is the only artifact the mapping step persists. The invariant at
/// construction time: every name in `verified_fields` has a non-empty
/// value in `fields`. Later mutation by the form may make the list
/// stale; staleness is not tracked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalFormData {
    /// Canonical field name to normalized string value
    pub fields: BTreeMap<String, String>,

    /// Checklist fields populated from a verified external source
    pub verified_fields: Vec<String>,

    /// Whether this data originates from a completed verification
    pub is_verified: bool,
}

impl CanonicalFormData {
    /// Creates an empty, unverified form-data object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a canonical field. Empty values are stored too, so the
    /// output is always fully shaped regardless of source coverage.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Returns the value of a canonical field, or `""` when absent.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Recomputes `verified_fields` as the checklist subset with a
    /// non-empty value, and marks the object verified.
    ///
    /// Called exactly once by each mapper, after all fields are set.
    pub fn finalize_verified(&mut self) {
        self.verified_fields = VERIFIED_FIELD_CHECKLIST
            .iter()
            .filter(|name| !self.get(name).is_empty())
            .map(|name| name.to_string())
            .collect();
        self.is_verified = true;
    }
}
