// src/services/customer.rs
//! Existing-customer verification path (lookup + OTP gate).
//!
//! Unlike the NDI path this is synchronous: one lookup call either
//! matches a record or it does not. A match runs the customer mapper
//! and parks the result in the hand-off store; the fields stay editable
//! in the wizard because this path verifies contact ownership (via
//! OTP), not the record contents themselves. A miss means the applicant
//! proceeds as new.

use crate::clients::customer_client::{CustomerClient, CustomerLookupRequest};
use crate::clients::error::ClientError;
use crate::mapping::customer_mapper::map_customer_record;
use crate::models::form_data::CanonicalFormData;
use crate::storage::session_store::{HandoffKey, HandoffStore};
use serde::Serialize;
use std::sync::Arc;

/// Result of an existing-customer check.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum LookupOutcome {
    /// A record matched; mapped data was handed off to the wizard
    #[serde(rename = "found")]
    Found { data: CanonicalFormData },
    /// No record; the applicant continues as a new customer
    #[serde(rename = "notFound")]
    NotFound,
}

/// Service for the existing-customer lookup path.
pub struct CustomerService {
    client: Arc<CustomerClient>,
    store: Arc<dyn HandoffStore>,
}

impl CustomerService {
    pub fn new(client: Arc<CustomerClient>, store: Arc<dyn HandoffStore>) -> Self {
        Self { client, store }
    }

    /// Looks up an existing customer and hands mapped data to the wizard.
    ///
    /// A successful match writes the customer-lookup hand-off slot and
    /// clears the NDI slot, so the wizard reads from exactly one
    /// verification path at a time.
    pub async fn lookup(&self, request: &CustomerLookupRequest) -> Result<LookupOutcome, ClientError> {
        match self.client.lookup(request).await? {
            Some(record) => {
                let data = map_customer_record(&record);
                let key = HandoffKey::CustomerLookup;
                self.store.clear(key.other());
                self.store.put(key, data.clone());
                Ok(LookupOutcome::Found { data })
            }
            None => {
                log::info!("no customer record for the supplied identification");
                Ok(LookupOutcome::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form_data::field;
    use crate::storage::session_store::MemoryHandoffStore;
    use mockito::{mock, Matcher};

    fn request(id_number: &str) -> CustomerLookupRequest {
        CustomerLookupRequest {
            identification_type: "Citizenship ID".into(),
            identification_number: id_number.into(),
            mobile_number: Some("17601234".into()),
            email: None,
        }
    }

    fn match_id(id_number: &str) -> Matcher {
        Matcher::PartialJsonString(format!(r#"{{"identificationNumber": "{}"}}"#, id_number))
    }

    fn service() -> (CustomerService, Arc<MemoryHandoffStore>) {
        let store = Arc::new(MemoryHandoffStore::new());
        let client = Arc::new(CustomerClient::new(&mockito::server_url()));
        (
            CustomerService::new(client, store.clone() as Arc<dyn HandoffStore>),
            store,
        )
    }

    #[tokio::test]
    async fn test_match_maps_and_clears_the_ndi_slot() {
        let _m = mock("POST", "/customers/lookup")
            .match_body(match_id("11410005555"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"record": {"personal": {"party_name": "Mrs Sonam Choden", "gender": "F"}}}"#)
            .create();

        let (service, store) = service();
        let mut stale = CanonicalFormData::new();
        stale.set(field::APPLICANT_NAME, "Stale Wallet Data");
        store.put(HandoffKey::NdiCredential, stale);

        match service.lookup(&request("11410005555")).await.unwrap() {
            LookupOutcome::Found { data } => {
                assert_eq!(data.get(field::APPLICANT_NAME), "Sonam Choden");
                assert_eq!(data.get(field::SALUTATION), "mrs");
            }
            LookupOutcome::NotFound => panic!("expected a match"),
        }

        assert!(store.get(HandoffKey::CustomerLookup).is_some());
        assert!(store.get(HandoffKey::NdiCredential).is_none());
    }

    #[tokio::test]
    async fn test_miss_leaves_the_store_untouched() {
        let _m = mock("POST", "/customers/lookup")
            .match_body(match_id("11410006666"))
            .with_status(404)
            .create();

        let (service, store) = service();
        assert!(matches!(
            service.lookup(&request("11410006666")).await.unwrap(),
            LookupOutcome::NotFound
        ));
        assert!(store.get(HandoffKey::CustomerLookup).is_none());
        assert!(store.get(HandoffKey::NdiCredential).is_none());
    }
}
