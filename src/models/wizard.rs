// src/models/wizard.rs
//! Accumulated multi-step wizard form state.
//!
//! The wizard's top-level page owns one of these for the lifetime of a
//! tab session; each step works on a local copy of its slice and hands
//! back a patch on "Next". There is no durable draft storage: abandoning
//! the session discards all progress.

use crate::models::form_data::CanonicalFormData;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The merged, in-progress loan application form payload.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WizardFormState {
    /// All collected field values, across steps
    pub fields: BTreeMap<String, String>,

    /// Fields pre-filled from a verified source; patches cannot touch these
    pub locked_fields: BTreeSet<String>,

    /// Zero-based index of the step the applicant is on
    pub current_step: usize,
}

impl WizardFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the wizard from verified hand-off data.
    ///
    /// Every field the mapper produced is pre-filled; only the fields in
    /// `verified_fields` are locked, so values the mapper could not
    /// verify stay editable.
    pub fn prefill_from(data: &CanonicalFormData) -> Self {
        let mut state = Self::new();
        for (name, value) in &data.fields {
            if !value.is_empty() {
                state.fields.insert(name.clone(), value.clone());
            }
        }
        if data.is_verified {
            state.locked_fields = data.verified_fields.iter().cloned().collect();
        }
        state
    }

    /// Merges a step's patch into the accumulated state ("Next").
    ///
    /// Within the patch, last write wins. Patches against locked fields
    /// are dropped; the number of applied entries is returned so a
    /// caller can tell a silently-trimmed patch from a full merge.
    pub fn apply_patch(&mut self, patch: &BTreeMap<String, String>) -> usize {
        let mut applied = 0;
        for (name, value) in patch {
            if self.is_locked(name) {
                log::debug!("wizard patch dropped for locked field {}", name);
                continue;
            }
            self.fields.insert(name.clone(), value.clone());
            applied += 1;
        }
        applied
    }

    /// Applies a step patch and advances to the next step.
    pub fn next_step(&mut self, patch: &BTreeMap<String, String>) -> usize {
        let applied = self.apply_patch(patch);
        self.current_step += 1;
        applied
    }

    /// Whether a field was populated from a verified source.
    pub fn is_locked(&self, name: &str) -> bool {
        self.locked_fields.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form_data::field;

    fn verified_data() -> CanonicalFormData {
        let mut data = CanonicalFormData::new();
        data.set(field::APPLICANT_NAME, "Thinley Gyeltshen");
        data.set(field::GENDER, "male");
        data.set(field::OCCUPATION, "");
        data.finalize_verified();
        data
    }

    #[test]
    fn test_prefill_locks_only_verified_fields() {
        let state = WizardFormState::prefill_from(&verified_data());

        assert_eq!(state.fields.get(field::APPLICANT_NAME).unwrap(), "Thinley Gyeltshen");
        assert!(state.is_locked(field::APPLICANT_NAME));
        assert!(state.is_locked(field::GENDER));
        assert!(!state.is_locked(field::OCCUPATION));
        // empty mapped values are not carried into the wizard
        assert!(!state.fields.contains_key(field::OCCUPATION));
    }

    #[test]
    fn test_patch_skips_locked_fields() {
        let mut state = WizardFormState::prefill_from(&verified_data());

        let mut patch = BTreeMap::new();
        patch.insert(field::APPLICANT_NAME.to_string(), "Someone Else".to_string());
        patch.insert(field::OCCUPATION.to_string(), "Farmer".to_string());

        assert_eq!(state.apply_patch(&patch), 1);
        assert_eq!(state.fields.get(field::APPLICANT_NAME).unwrap(), "Thinley Gyeltshen");
        assert_eq!(state.fields.get(field::OCCUPATION).unwrap(), "Farmer");
    }

    #[test]
    fn test_next_step_merges_and_advances() {
        let mut state = WizardFormState::new();
        let mut patch = BTreeMap::new();
        patch.insert("loanAmount".to_string(), "500000".to_string());

        assert_eq!(state.next_step(&patch), 1);
        assert_eq!(state.current_step, 1);
        assert_eq!(state.fields.get("loanAmount").unwrap(), "500000");

        // a later step may overwrite an unlocked field
        patch.insert("loanAmount".to_string(), "650000".to_string());
        state.next_step(&patch);
        assert_eq!(state.current_step, 2);
        assert_eq!(state.fields.get("loanAmount").unwrap(), "650000");
    }
}
