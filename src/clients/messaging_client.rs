// src/clients/messaging_client.rs
//! Client for the external messaging gateway that delivers OTP codes.
//!
//! The gateway's contract is asymmetric: for email the caller generates
//! the 6-digit code and hands it over for delivery; for SMS the gateway
//! generates the code itself and echoes it back so the caller can
//! validate the applicant's entry locally. Delivery, correctness
//! checking and expiry are the gateway's concern.

use crate::clients::error::ClientError;
use serde::{Deserialize, Serialize};

/// Contact channel chosen by the applicant for OTP delivery.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    Phone,
    Email,
}

#[derive(Serialize)]
struct DispatchBody<'a> {
    destination: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

/// Gateway response to a dispatch call.
#[derive(Deserialize, Debug, Clone)]
pub struct OtpDispatch {
    pub success: bool,
    /// Present on the SMS path, where the gateway generates the code
    #[serde(default)]
    pub code: Option<String>,
}

/// HTTP client for the messaging gateway.
pub struct MessagingClient {
    http: reqwest::Client,
    base_url: String,
}

impl MessagingClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Dispatches an OTP to `destination` over the chosen channel.
    ///
    /// # Arguments
    /// * `channel` - Phone (gateway generates the code) or Email (caller supplies it)
    /// * `destination` - Phone number or email address
    /// * `code` - The caller-generated code; required for email, ignored for phone
    pub async fn dispatch_otp(
        &self,
        channel: OtpChannel,
        destination: &str,
        code: Option<&str>,
    ) -> Result<OtpDispatch, ClientError> {
        let path = match channel {
            OtpChannel::Phone => "/otp/sms",
            OtpChannel::Email => "/otp/email",
        };
        let body = DispatchBody {
            destination,
            code: match channel {
                OtpChannel::Email => code,
                OtpChannel::Phone => None,
            },
        };

        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "otp dispatch",
                status: response.status().as_u16(),
            });
        }

        let dispatch: OtpDispatch = response.json().await?;
        log::info!("otp dispatched via {:?}: success={}", channel, dispatch.success);
        Ok(dispatch)
    }
}
