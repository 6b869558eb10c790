// src/clients/ndi_client.rs
//! Client for the external NDI verifier.
//!
//! Two operations: create a proof (presentation) request disclosing a
//! fixed attribute set, and check the status of an outstanding request.
//! Provider status spellings are folded into the internal vocabulary
//! here, at the boundary; a "still processing" HTTP 202 and a `pending`
//! body are treated identically.

use crate::clients::error::ClientError;
use crate::models::session::VerificationStatus;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute names requested from the wallet, grouped under the
/// verifier's schema identifiers.
static PROOF_ATTRIBUTES: [(&str, &[&str]); 2] = [
    (
        "bhutan-ndi/foundational-id/1.0",
        &["ID Number", "Full Name", "Gender", "Date of Birth", "Citizenship"],
    ),
    (
        "bhutan-ndi/permanent-address/1.0",
        &["Dzongkhag", "Gewog", "Village"],
    ),
];

#[derive(Serialize)]
struct AttributeGroup {
    schema_id: &'static str,
    names: Vec<&'static str>,
}

#[derive(Serialize)]
struct CreateProofRequestBody {
    proof_name: &'static str,
    attributes: Vec<AttributeGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_url: Option<String>,
}

/// A proof request accepted by the verifier.
///
/// `invitation_url` is what the front-end renders as a QR code;
/// `deeplink_url` opens the wallet app directly on a phone.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProofRequestCreated {
    #[serde(alias = "presentationRequestId", alias = "presentation_request_id", alias = "thread_id")]
    pub thread_id: String,

    #[serde(alias = "invitation_url", alias = "proofRequestUrl")]
    pub invitation_url: String,

    #[serde(default, alias = "deep_link_url")]
    pub deeplink_url: Option<String>,

    #[serde(default, alias = "expires_at")]
    pub expires_at: Option<String>,
}

/// Outcome of one status poll.
#[derive(Debug, Clone)]
pub enum StatusCheck {
    Pending,
    /// The wallet holder disclosed the requested attributes; the raw
    /// attribute set is carried for the mapper.
    Verified(Value),
    Rejected,
    Expired,
}

/// HTTP client for the NDI verifier's proxy surface.
pub struct NdiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    webhook_url: Option<String>,
}

impl NdiClient {
    /// Creates a client for the verifier at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Verifier endpoint root (trailing slash tolerated)
    /// * `api_key` - Optional key sent as `x-api-key` on every call
    /// * `webhook_url` - Optional callback the verifier notifies on completion
    pub fn new(base_url: &str, api_key: Option<String>, webhook_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            webhook_url,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }

    /// Creates a proof request for the fixed attribute set.
    ///
    /// # Returns
    /// The verifier-assigned thread id plus the invitation payload, or a
    /// [`ClientError`] when the verifier is unreachable or answers
    /// outside its contract.
    pub async fn create_proof_request(&self) -> Result<ProofRequestCreated, ClientError> {
        let body = CreateProofRequestBody {
            proof_name: "loan-application-identity",
            attributes: PROOF_ATTRIBUTES
                .iter()
                .map(|&(schema_id, names)| AttributeGroup { schema_id, names: names.to_vec() })
                .collect(),
            webhook_url: self.webhook_url.clone(),
        };

        let url = format!("{}/verifier/proof-requests", self.base_url);
        let response = self.request(self.http.post(&url)).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "create proof request",
                status: response.status().as_u16(),
            });
        }

        let created: ProofRequestCreated = response.json().await?;
        log::info!("proof request {} created", created.thread_id);
        Ok(created)
    }

    /// Checks the status of an outstanding proof request.
    ///
    /// HTTP 202 and a `pending`-family body both mean "keep polling".
    /// A verified body carries the disclosed attribute set under `data`.
    /// An unrecognized status string is a decode error, not a guess.
    pub async fn check_status(&self, thread_id: &str) -> Result<StatusCheck, ClientError> {
        let url = format!("{}/verifier/proof-requests/{}", self.base_url, thread_id);
        let response = self.request(self.http.get(&url)).send().await?;

        if response.status() == StatusCode::ACCEPTED {
            return Ok(StatusCheck::Pending);
        }
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "proof request status",
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let raw_status = body.get("status").and_then(Value::as_str).unwrap_or_default();
        let status = VerificationStatus::parse_provider(raw_status).ok_or_else(|| {
            ClientError::decode(
                "proof request status",
                format!("unrecognized status {:?}", raw_status),
            )
        })?;

        Ok(match status {
            VerificationStatus::Pending => StatusCheck::Pending,
            VerificationStatus::Verified => {
                StatusCheck::Verified(body.get("data").cloned().unwrap_or(Value::Null))
            }
            VerificationStatus::Rejected => StatusCheck::Rejected,
            VerificationStatus::Expired => StatusCheck::Expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::mock;

    fn client(api_key: &str) -> NdiClient {
        NdiClient::new(&mockito::server_url(), Some(api_key.into()), None)
    }

    #[tokio::test]
    async fn test_create_proof_request_decodes_invitation() {
        let _m = mock("POST", "/verifier/proof-requests")
            .match_header("x-api-key", "key-create-ok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "presentationRequestId": "thread-123",
                    "invitationUrl": "https://verifier.example/i/abc",
                    "deeplinkUrl": "ndi://present?c=abc",
                    "expiresAt": "2026-08-04T10:00:00Z"
                }"#,
            )
            .create();

        let created = client("key-create-ok").create_proof_request().await.unwrap();
        assert_eq!(created.thread_id, "thread-123");
        assert_eq!(created.invitation_url, "https://verifier.example/i/abc");
        assert_eq!(created.deeplink_url.as_deref(), Some("ndi://present?c=abc"));
    }

    #[tokio::test]
    async fn test_create_failure_is_unexpected_status() {
        let _m = mock("POST", "/verifier/proof-requests")
            .match_header("x-api-key", "key-create-err")
            .with_status(500)
            .create();

        let err = client("key-create-err").create_proof_request().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnexpectedStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_status_accepted_means_pending() {
        let _m = mock("GET", "/verifier/proof-requests/t1").with_status(202).create();

        let check = client("k1").check_status("t1").await.unwrap();
        assert!(matches!(check, StatusCheck::Pending));
    }

    #[tokio::test]
    async fn test_status_completed_carries_attribute_set() {
        let _m = mock("GET", "/verifier/proof-requests/t2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "COMPLETED", "data": {"fullName": "Karma Dorji"}}"#)
            .create();

        match client("k2").check_status("t2").await.unwrap() {
            StatusCheck::Verified(raw) => {
                assert_eq!(raw["fullName"], "Karma Dorji");
            }
            other => panic!("expected verified, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unrecognized_status_is_decode_error() {
        let _m = mock("GET", "/verifier/proof-requests/t3")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "on-hold"}"#)
            .create();

        let err = client("k3").check_status("t3").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
