// src/storage/session_store.rs
//! Hand-off store between verification and the wizard's first step.
//!
//! Verified, mapped form data is parked here by whichever verification
//! path completed, and read back when the applicant lands on the first
//! data-entry step. The two paths use independent keys that must never
//! be conflated; the services clear the opposite key on every write so
//! the wizard cannot read mismatched data after a path switch.

use crate::models::form_data::CanonicalFormData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// The hand-off slots, one per verification source.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum HandoffKey {
    /// Result of the existing-customer lookup + OTP path
    CustomerLookup,
    /// Result of the NDI wallet proof path
    NdiCredential,
}

impl HandoffKey {
    /// Stable storage/route name for the key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomerLookup => "customer-lookup",
            Self::NdiCredential => "ndi-credential",
        }
    }

    /// Parses a route segment back into a key.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "customer-lookup" => Some(Self::CustomerLookup),
            "ndi-credential" => Some(Self::NdiCredential),
            _ => None,
        }
    }

    /// The key of the opposite verification path.
    pub fn other(self) -> Self {
        match self {
            Self::CustomerLookup => Self::NdiCredential,
            Self::NdiCredential => Self::CustomerLookup,
        }
    }
}

/// Key-value port for the verified-data hand-off.
///
/// An absent key means "no prior verification", never an error.
pub trait HandoffStore: Send + Sync {
    fn put(&self, key: HandoffKey, data: CanonicalFormData);
    fn get(&self, key: HandoffKey) -> Option<CanonicalFormData>;
    fn clear(&self, key: HandoffKey);
}

/// In-memory hand-off store.
///
/// Backs the server process and doubles as the injectable fake in
/// tests. Entries live for the process lifetime unless cleared.
#[derive(Default)]
pub struct MemoryHandoffStore {
    entries: Mutex<HashMap<HandoffKey, CanonicalFormData>>,
}

impl MemoryHandoffStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HandoffStore for MemoryHandoffStore {
    fn put(&self, key: HandoffKey, data: CanonicalFormData) {
        self.entries
            .lock()
            .expect("handoff store lock poisoned")
            .insert(key, data);
    }

    fn get(&self, key: HandoffKey) -> Option<CanonicalFormData> {
        self.entries
            .lock()
            .expect("handoff store lock poisoned")
            .get(&key)
            .cloned()
    }

    fn clear(&self, key: HandoffKey) {
        self.entries
            .lock()
            .expect("handoff store lock poisoned")
            .remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form_data::field;

    fn sample(name: &str) -> CanonicalFormData {
        let mut data = CanonicalFormData::new();
        data.set(field::APPLICANT_NAME, name);
        data.finalize_verified();
        data
    }

    #[test]
    fn test_absent_key_is_none() {
        let store = MemoryHandoffStore::new();
        assert!(store.get(HandoffKey::CustomerLookup).is_none());
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryHandoffStore::new();
        store.put(HandoffKey::CustomerLookup, sample("From Lookup"));
        store.put(HandoffKey::NdiCredential, sample("From Wallet"));

        assert_eq!(
            store.get(HandoffKey::CustomerLookup).unwrap().get(field::APPLICANT_NAME),
            "From Lookup"
        );
        assert_eq!(
            store.get(HandoffKey::NdiCredential).unwrap().get(field::APPLICANT_NAME),
            "From Wallet"
        );

        store.clear(HandoffKey::CustomerLookup);
        assert!(store.get(HandoffKey::CustomerLookup).is_none());
        assert!(store.get(HandoffKey::NdiCredential).is_some());
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryHandoffStore::new();
        store.put(HandoffKey::NdiCredential, sample("First"));
        store.put(HandoffKey::NdiCredential, sample("Second"));
        assert_eq!(
            store.get(HandoffKey::NdiCredential).unwrap().get(field::APPLICANT_NAME),
            "Second"
        );
    }

    #[test]
    fn test_key_route_names_round_trip() {
        for key in [HandoffKey::CustomerLookup, HandoffKey::NdiCredential] {
            assert_eq!(HandoffKey::parse(key.as_str()), Some(key));
            assert_eq!(key.other().other(), key);
        }
        assert_eq!(HandoffKey::parse("something-else"), None);
    }
}
