// src/models/session.rs
//! Verification session model and the unified status vocabulary.
//!
//! The two verification paths (NDI wallet proof and customer lookup)
//! historically used diverging status strings for the same outcomes
//! (`"verified"` vs `"COMPLETED"`, `"pending"` vs `"in-progress"`).
//! All provider spellings are folded into [`VerificationStatus`] at the
//! client boundary; nothing past that boundary compares provider string
//! literals.

use crate::models::form_data::CanonicalFormData;
use serde::{Deserialize, Serialize};

/// Status of one verification attempt, in internal vocabulary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl VerificationStatus {
    /// Folds a provider status string into the internal vocabulary.
    ///
    /// Matching is case-insensitive and covers both providers'
    /// spellings. An unrecognized string yields `None`; callers treat
    /// that as a decode failure rather than guessing a state.
    pub fn parse_provider(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "in-progress" | "in_progress" | "requested" => Some(Self::Pending),
            "verified" | "completed" => Some(Self::Verified),
            "rejected" | "declined" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Terminal condition of a verification session.
///
/// `Failed` is the transport/decode taxonomy class: it is reached when a
/// status check errors out, and is distinct from the provider's own
/// `Rejected`/`Expired` business outcomes.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum SessionState {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "verified")]
    Verified { data: CanonicalFormData },
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "failed")]
    Failed { message: String },
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One in-flight or completed verification attempt.
///
/// Created when the proof request is accepted by the verifier;
/// transitions to a terminal state exactly once, driven by the poller.
/// Once verified it carries the mapped form data (the raw provider
/// payload is consumed by the mapper and not retained here).
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSession {
    /// Provider-assigned identifier for the proof request thread
    pub thread_id: String,

    /// Expiry timestamp reported by the verifier, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    #[serde(flatten)]
    pub state: SessionState,
}

impl VerificationSession {
    /// Creates a fresh pending session for a newly accepted request.
    pub fn pending(thread_id: impl Into<String>, expires_at: Option<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            expires_at,
            state: SessionState::Pending,
        }
    }
}
