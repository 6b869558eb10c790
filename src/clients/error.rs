// src/clients/error.rs
//! Error taxonomy for the external collaborator clients.
//!
//! Transport failures and malformed responses are errors and halt the
//! current operation; provider business outcomes (rejected or expired
//! verification, customer not found) are values on the success path and
//! never appear here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure talking to the collaborator
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collaborator answered with a status the contract does not define
    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: &'static str, status: u16 },

    /// The collaborator answered 2xx but the body did not decode
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: &'static str, message: String },
}

impl ClientError {
    pub(crate) fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Decode { endpoint, message: message.into() }
    }
}
