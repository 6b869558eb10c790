// src/services/api_server.rs
//! API Server for the loan-application verification subsystem
//!
//! This module provides the REST interface the wizard front-end talks
//! to, proxying the external collaborators and owning the verification
//! lifecycle:
//! - NDI proof-request creation, status checks and cancellation
//! - Existing-customer lookup
//! - OTP dispatch over phone or email
//! - Hand-off store reads/clears and wizard pre-fill
//!
//! The API is built using Axum. Transport failures against the external
//! collaborators surface as 502 responses with a retryable error body;
//! provider business outcomes (rejected, expired, not found) are plain
//! 200 payloads.

use crate::clients::customer_client::CustomerLookupRequest;
use crate::clients::messaging_client::OtpChannel;
use crate::models::wizard::WizardFormState;
use crate::services::customer::CustomerService;
use crate::services::otp::OtpService;
use crate::services::verification::VerificationService;
use crate::storage::session_store::{HandoffKey, HandoffStore};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// API request and response structures

/// Request payload for dispatching an OTP
#[derive(Serialize, Deserialize)]
struct DispatchOtpRequest {
    channel: OtpChannel,
    destination: String,
}

/// Request payload for a wizard "Next" step merge
#[derive(Serialize, Deserialize)]
struct WizardNextRequest {
    state: WizardFormState,
    patch: BTreeMap<String, String>,
}

/// API server state containing all service dependencies
#[derive(Clone)]
pub struct ApiServer {
    /// Service driving NDI proof-request verification
    verification: Arc<VerificationService>,

    /// Service for the existing-customer lookup path
    customer: Arc<CustomerService>,

    /// Service issuing OTP codes
    otp: Arc<OtpService>,

    /// Hand-off store shared with the services
    store: Arc<dyn HandoffStore>,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `verification` - Service for proof-request operations
    /// * `customer` - Service for customer lookup
    /// * `otp` - Service for OTP issuance
    /// * `store` - Hand-off store read by the wizard endpoints
    pub fn new(
        verification: VerificationService,
        customer: CustomerService,
        otp: OtpService,
        store: Arc<dyn HandoffStore>,
    ) -> Self {
        ApiServer {
            verification: Arc::new(verification),
            customer: Arc::new(customer),
            otp: Arc::new(otp),
            store,
        }
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(&self, addr: SocketAddr) {
        // Configure all API routes
        let app = Router::new()
            .route("/verification/request", post(Self::start_verification_handler))
            .route("/verification/status/:thread_id", get(Self::verification_status_handler))
            .route("/verification/cancel/:thread_id", post(Self::cancel_verification_handler))
            .route("/customer/lookup", post(Self::customer_lookup_handler))
            .route("/otp/dispatch", post(Self::dispatch_otp_handler))
            .route(
                "/handoff/:source",
                get(Self::get_handoff_handler).delete(Self::clear_handoff_handler),
            )
            .route("/wizard/prefill/:source", get(Self::wizard_prefill_handler))
            .route("/wizard/next", post(Self::wizard_next_handler))
            // the wizard front-end is a browser app on another origin
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(self.clone()));

        // Create TCP listener
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

        // Start serving requests
        axum::serve(listener, app).await.unwrap();
    }

    // =====================
    // Verification Handlers
    // =====================

    /// Creates an NDI proof request and starts polling it
    ///
    /// # Endpoint
    /// POST /verification/request
    ///
    /// # Responses
    /// - 200 OK: Thread id plus invitation/deep-link URLs for the QR view
    /// - 502 Bad Gateway: Verifier unreachable or out of contract (retryable)
    async fn start_verification_handler(
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match state.verification.start_verification().await {
            Ok(created) => (StatusCode::OK, Json(created)).into_response(),
            Err(e) => {
                log::error!("proof request creation failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": e.to_string(), "retryable": true })),
                )
                    .into_response()
            }
        }
    }

    /// Reports the current state of a verification session
    ///
    /// # Endpoint
    /// GET /verification/status/:thread_id
    ///
    /// # Responses
    /// - 200 OK: Session snapshot (includes mapped data once verified)
    /// - 404 Not Found: Unknown thread id
    async fn verification_status_handler(
        Path(thread_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match state.verification.session_status(&thread_id) {
            Some(session) => (StatusCode::OK, Json(session)).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "unknown verification thread" })),
            )
                .into_response(),
        }
    }

    /// Stops polling a verification session (QR view teardown)
    ///
    /// # Endpoint
    /// POST /verification/cancel/:thread_id
    ///
    /// # Responses
    /// - 200 OK: Polling stopped (idempotent)
    /// - 404 Not Found: Unknown thread id
    async fn cancel_verification_handler(
        Path(thread_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        if state.verification.cancel_verification(&thread_id) {
            (StatusCode::OK, Json(json!({ "cancelled": true }))).into_response()
        } else {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "unknown verification thread" })),
            )
                .into_response()
        }
    }

    // =====================
    // Customer Path Handlers
    // =====================

    /// Looks up an existing customer by identification + contact
    ///
    /// # Endpoint
    /// POST /customer/lookup
    ///
    /// # Responses
    /// - 200 OK: `found` with mapped data, or `notFound`
    /// - 502 Bad Gateway: Record system unreachable (retryable)
    async fn customer_lookup_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<CustomerLookupRequest>,
    ) -> impl IntoResponse {
        match state.customer.lookup(&payload).await {
            Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
            Err(e) => {
                log::error!("customer lookup failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": e.to_string(), "retryable": true })),
                )
                    .into_response()
            }
        }
    }

    /// Dispatches a 6-digit OTP over the chosen channel
    ///
    /// # Endpoint
    /// POST /otp/dispatch
    ///
    /// # Responses
    /// - 200 OK: Issued code (echoed for local entry validation)
    /// - 502 Bad Gateway: Messaging gateway unreachable or failed
    async fn dispatch_otp_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<DispatchOtpRequest>,
    ) -> impl IntoResponse {
        match state.otp.dispatch(payload.channel, &payload.destination).await {
            Ok(issued) => (StatusCode::OK, Json(issued)).into_response(),
            Err(e) => {
                log::error!("otp dispatch failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": e.to_string(), "retryable": true })),
                )
                    .into_response()
            }
        }
    }

    // =====================
    // Hand-off / Wizard Handlers
    // =====================

    /// Reads a hand-off slot
    ///
    /// # Endpoint
    /// GET /handoff/:source  (`ndi-credential` or `customer-lookup`)
    ///
    /// # Responses
    /// - 200 OK: `{"data": ...}`; null data means no prior verification
    /// - 404 Not Found: Unknown source name
    async fn get_handoff_handler(
        Path(source): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match HandoffKey::parse(&source) {
            Some(key) => {
                (StatusCode::OK, Json(json!({ "data": state.store.get(key) }))).into_response()
            }
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "unknown handoff source" })),
            )
                .into_response(),
        }
    }

    /// Clears a hand-off slot (path switch)
    ///
    /// # Endpoint
    /// DELETE /handoff/:source
    async fn clear_handoff_handler(
        Path(source): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match HandoffKey::parse(&source) {
            Some(key) => {
                state.store.clear(key);
                log::debug!("handoff slot {} cleared", key.as_str());
                (StatusCode::OK, Json(json!({ "cleared": true }))).into_response()
            }
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "unknown handoff source" })),
            )
                .into_response(),
        }
    }

    /// Builds the wizard's initial form state from a hand-off slot
    ///
    /// # Endpoint
    /// GET /wizard/prefill/:source
    ///
    /// # Responses
    /// - 200 OK: Pre-filled state with verified fields locked; a blank
    ///   state when the slot is empty (no prior verification)
    /// - 404 Not Found: Unknown source name
    async fn wizard_prefill_handler(
        Path(source): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        let key = match HandoffKey::parse(&source) {
            Some(key) => key,
            None => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "unknown handoff source" })),
                )
                    .into_response()
            }
        };

        let form_state = match state.store.get(key) {
            Some(data) => WizardFormState::prefill_from(&data),
            None => WizardFormState::new(),
        };
        (StatusCode::OK, Json(form_state)).into_response()
    }

    /// Merges a step's patch and advances the wizard ("Next")
    ///
    /// # Endpoint
    /// POST /wizard/next
    ///
    /// The wizard state lives in the applicant's tab; this endpoint is
    /// stateless and simply applies the merge rules (locked fields are
    /// dropped, last write wins) and returns the advanced state.
    async fn wizard_next_handler(Json(mut payload): Json<WizardNextRequest>) -> impl IntoResponse {
        let applied = payload.state.next_step(&payload.patch);
        log::debug!(
            "wizard advanced to step {}: {} of {} patch fields applied",
            payload.state.current_step,
            applied,
            payload.patch.len()
        );
        (StatusCode::OK, Json(payload.state)).into_response()
    }
}
