// src/main.rs

//! # Loan-Application Identity Verification Service - Main Entry Point
//!
//! This module serves as the main entry point for the verification
//! subsystem of the digital loan-application wizard. It wires the
//! external-collaborator clients into the services and starts the API
//! server the wizard front-end talks to.
//!
//! ## Architecture Overview
//! 1. **Clients Layer**: HTTP clients for the NDI verifier, the
//!    customer-record system and the messaging gateway
//! 2. **Mapping Layer**: Normalization of both providers' payloads into
//!    the canonical form-data shape
//! 3. **Services Layer**: Verification polling, customer lookup, OTP
//!    issuance and the REST API
//! 4. **Storage Layer**: The hand-off store between verification and
//!    the wizard's first data-entry step
//!
//! ## Environment Variables Required
//! - `NDI_BASE_URL`: NDI verifier endpoint root
//! - `NDI_API_KEY`: (Optional) API key for the verifier
//! - `NDI_WEBHOOK_URL`: (Optional) callback URL handed to the verifier
//! - `CBS_BASE_URL`: Customer-record system endpoint root
//! - `MESSAGING_BASE_URL`: OTP messaging gateway endpoint root
//! - `BIND_ADDR`: (Optional) listen address (default: 127.0.0.1:3000)

use crate::clients::customer_client::CustomerClient;
use crate::clients::messaging_client::MessagingClient;
use crate::clients::ndi_client::NdiClient;
use crate::services::api_server::ApiServer;
use crate::services::customer::CustomerService;
use crate::services::otp::OtpService;
use crate::services::verification::VerificationService;
use crate::storage::session_store::{HandoffStore, MemoryHandoffStore};
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;

// Module declarations (organized by functional domain)
mod clients;       // External collaborator HTTP clients
mod mapping;       // Provider payload -> canonical form data
mod models;        // Data structures
mod services;      // Business logic and API
mod storage;       // Hand-off store
mod utils;         // Helper functions

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Construct the collaborator clients
/// 3. Initialize service components around a shared hand-off store
/// 4. Start API server
///
/// # Panics
/// - If required environment variables are missing
/// - If the bind address is malformed
#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::init();

    // External collaborator endpoints
    let ndi_base_url = std::env::var("NDI_BASE_URL")
        .expect("NDI_BASE_URL must be set in .env");
    let cbs_base_url = std::env::var("CBS_BASE_URL")
        .expect("CBS_BASE_URL must be set in .env");
    let messaging_base_url = std::env::var("MESSAGING_BASE_URL")
        .expect("MESSAGING_BASE_URL must be set in .env");
    let ndi_api_key = std::env::var("NDI_API_KEY").ok();
    let ndi_webhook_url = std::env::var("NDI_WEBHOOK_URL").ok();

    // Initialize core components
    let ndi_client = Arc::new(NdiClient::new(&ndi_base_url, ndi_api_key, ndi_webhook_url));
    let customer_client = Arc::new(CustomerClient::new(&cbs_base_url));
    let messaging_client = Arc::new(MessagingClient::new(&messaging_base_url));

    // One hand-off store shared by both verification paths
    let store: Arc<dyn HandoffStore> = Arc::new(MemoryHandoffStore::new());

    let verification_service = VerificationService::new(ndi_client, store.clone());
    let customer_service = CustomerService::new(customer_client, store.clone());
    let otp_service = OtpService::new(messaging_client);

    // Initialize API Server with all dependencies
    let api_server = ApiServer::new(verification_service, customer_service, otp_service, store);

    // Start the HTTP server
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("BIND_ADDR must be a valid socket address");
    log::info!("verification API running at http://{}", addr);

    api_server.run(addr).await;
}
