// src/clients/customer_client.rs
//! Client for the internal customer-onboarding record system.
//!
//! A single synchronous lookup: identification type + number and one
//! contact channel in, a nested customer record or a not-found signal
//! out. Not-found is a business outcome ("proceed as a new applicant"),
//! never an error.

use crate::clients::error::ClientError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters of an existing-customer lookup.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLookupRequest {
    /// Identification type code, e.g. the canonical CID label
    pub identification_type: String,
    pub identification_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// HTTP client for the customer-record system.
pub struct CustomerClient {
    http: reqwest::Client,
    base_url: String,
}

impl CustomerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Looks up an existing customer record.
    ///
    /// # Returns
    /// - `Ok(Some(record))` - the raw nested record, ready for the mapper
    /// - `Ok(None)` - no customer matched (HTTP 404 or an empty body)
    /// - `Err` - transport failure or an out-of-contract response
    pub async fn lookup(&self, request: &CustomerLookupRequest) -> Result<Option<Value>, ClientError> {
        let url = format!("{}/customers/lookup", self.base_url);
        let response = self.http.post(&url).json(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "customer lookup",
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        // the record system wraps the payload under "record"; older
        // deployments returned the record as the whole body
        let record = match body.get("record") {
            Some(record) => record.clone(),
            None => body,
        };
        if record.is_null() {
            return Ok(None);
        }
        log::info!("customer lookup matched a record");
        Ok(Some(record))
    }
}
