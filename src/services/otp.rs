// src/services/otp.rs
//! One-time-password issuance for the contact-verification gate.
//!
//! The service only issues codes; delivery, correctness checking and
//! expiry belong to the external messaging gateway and its companion
//! entry step.

use crate::clients::error::ClientError;
use crate::clients::messaging_client::{MessagingClient, OtpChannel};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// An OTP that was dispatched to the applicant.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IssuedOtp {
    pub channel: OtpChannel,
    /// The 6-digit code against which the applicant's entry is checked
    pub code: String,
}

/// Generates a 6-digit OTP code.
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    code.to_string()
}

/// Service issuing OTP codes over the messaging gateway.
pub struct OtpService {
    messaging: Arc<MessagingClient>,
}

impl OtpService {
    pub fn new(messaging: Arc<MessagingClient>) -> Self {
        Self { messaging }
    }

    /// Issues an OTP over the chosen channel.
    ///
    /// Email: the code is generated here and handed to the gateway for
    /// delivery. Phone: the gateway generates the code and echoes it
    /// back. Either way the issued code is returned to the caller.
    pub async fn dispatch(
        &self,
        channel: OtpChannel,
        destination: &str,
    ) -> Result<IssuedOtp, ClientError> {
        match channel {
            OtpChannel::Email => {
                let code = generate_code();
                let dispatch = self
                    .messaging
                    .dispatch_otp(channel, destination, Some(&code))
                    .await?;
                if !dispatch.success {
                    return Err(ClientError::decode("otp dispatch", "gateway reported failure"));
                }
                Ok(IssuedOtp { channel, code })
            }
            OtpChannel::Phone => {
                let dispatch = self.messaging.dispatch_otp(channel, destination, None).await?;
                if !dispatch.success {
                    return Err(ClientError::decode("otp dispatch", "gateway reported failure"));
                }
                let code = dispatch.code.ok_or_else(|| {
                    ClientError::decode("otp dispatch", "gateway returned no code for sms")
                })?;
                Ok(IssuedOtp { channel, code })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{mock, Matcher};

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_email_dispatch_returns_local_code() {
        let _m = mock("POST", "/otp/email")
            .match_body(Matcher::PartialJsonString(r#"{"destination": "karma@example.bt"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true}"#)
            .create();

        let service = OtpService::new(Arc::new(MessagingClient::new(&mockito::server_url())));
        let issued = service.dispatch(OtpChannel::Email, "karma@example.bt").await.unwrap();
        assert_eq!(issued.channel, OtpChannel::Email);
        assert_eq!(issued.code.len(), 6);
    }

    #[tokio::test]
    async fn test_phone_dispatch_echoes_gateway_code() {
        let _m = mock("POST", "/otp/sms")
            .match_body(Matcher::PartialJsonString(r#"{"destination": "17755555"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "code": "557201"}"#)
            .create();

        let service = OtpService::new(Arc::new(MessagingClient::new(&mockito::server_url())));
        let issued = service.dispatch(OtpChannel::Phone, "17755555").await.unwrap();
        assert_eq!(issued.code, "557201");
    }

    #[tokio::test]
    async fn test_missing_gateway_code_is_an_error() {
        let _m = mock("POST", "/otp/sms")
            .match_body(Matcher::PartialJsonString(r#"{"destination": "17700000"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true}"#)
            .create();

        let service = OtpService::new(Arc::new(MessagingClient::new(&mockito::server_url())));
        let err = service.dispatch(OtpChannel::Phone, "17700000").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
