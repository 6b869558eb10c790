// src/services/verification.rs
//! NDI proof-request verification lifecycle.
//!
//! Owns the session registry for in-flight verification attempts. A
//! started attempt registers a pending session and a poll task; the
//! poll outcome drives the session to exactly one terminal state. On a
//! verified outcome the raw credential runs through the NDI mapper and
//! the result is parked in the hand-off store for the wizard, clearing
//! the customer-lookup slot so a path switch can never leave stale data
//! behind.

use crate::clients::error::ClientError;
use crate::clients::ndi_client::{NdiClient, ProofRequestCreated, StatusCheck};
use crate::mapping::ndi_mapper::map_ndi_credential;
use crate::models::session::{SessionState, VerificationSession};
use crate::services::poller::{spawn_poller, PollHandle, PollOutcome};
use crate::storage::session_store::{HandoffKey, HandoffStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Status-poll period against the verifier.
const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Terminal result of a poll, after the pending case is filtered out.
enum TerminalCheck {
    Verified(Value),
    Rejected,
    Expired,
}

struct SessionEntry {
    session: VerificationSession,
    /// Present only while the poll task is running
    poller: Option<PollHandle>,
}

/// Service driving QR-based NDI identity verification.
pub struct VerificationService {
    ndi: Arc<NdiClient>,
    store: Arc<dyn HandoffStore>,
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
    poll_interval: Duration,
}

impl VerificationService {
    pub fn new(ndi: Arc<NdiClient>, store: Arc<dyn HandoffStore>) -> Self {
        Self::with_poll_interval(ndi, store, POLL_INTERVAL)
    }

    /// Like [`VerificationService::new`] with a custom poll period.
    pub fn with_poll_interval(
        ndi: Arc<NdiClient>,
        store: Arc<dyn HandoffStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            ndi,
            store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            poll_interval,
        }
    }

    /// Creates a proof request and starts polling its status.
    ///
    /// On success the caller receives the invitation payload to render
    /// as a QR code; the session is already registered and polling. On
    /// failure nothing is registered and the caller may simply retry.
    pub async fn start_verification(&self) -> Result<ProofRequestCreated, ClientError> {
        let created = self.ndi.create_proof_request().await?;
        let thread_id = created.thread_id.clone();

        {
            let mut sessions = self.sessions.lock().expect("session registry lock poisoned");
            let entry = SessionEntry {
                session: VerificationSession::pending(&thread_id, created.expires_at.clone()),
                poller: None,
            };
            if let Some(prior) = sessions.insert(thread_id.clone(), entry) {
                if !prior.session.state.is_terminal() {
                    log::warn!("replacing still-active verification attempt {}", thread_id);
                }
                // a re-created request for the same thread id must not
                // leave the old poll task running
                if let Some(poller) = prior.poller {
                    poller.cancel();
                }
            }
        }

        let check_client = self.ndi.clone();
        let check_thread = thread_id.clone();
        let check = move || {
            let client = check_client.clone();
            let id = check_thread.clone();
            async move {
                match client.check_status(&id).await? {
                    StatusCheck::Pending => Ok(PollOutcome::Pending),
                    StatusCheck::Verified(raw) => {
                        Ok(PollOutcome::Terminal(TerminalCheck::Verified(raw)))
                    }
                    StatusCheck::Rejected => Ok(PollOutcome::Terminal(TerminalCheck::Rejected)),
                    StatusCheck::Expired => Ok(PollOutcome::Terminal(TerminalCheck::Expired)),
                }
            }
        };

        let sessions = self.sessions.clone();
        let store = self.store.clone();
        let outcome_thread = thread_id.clone();
        let handle = spawn_poller(self.poll_interval, check, move |outcome| {
            Self::complete_session(&sessions, store.as_ref(), &outcome_thread, outcome);
        });

        if let Some(entry) = self
            .sessions
            .lock()
            .expect("session registry lock poisoned")
            .get_mut(&thread_id)
        {
            entry.poller = Some(handle);
        }

        Ok(created)
    }

    /// Applies a terminal poll outcome to the session, exactly once.
    fn complete_session(
        sessions: &Mutex<HashMap<String, SessionEntry>>,
        store: &dyn HandoffStore,
        thread_id: &str,
        outcome: Result<TerminalCheck, ClientError>,
    ) {
        let state = match outcome {
            Ok(TerminalCheck::Verified(raw)) => {
                let data = map_ndi_credential(&raw);
                let key = HandoffKey::NdiCredential;
                store.clear(key.other());
                store.put(key, data.clone());
                log::info!(
                    "verification {} completed with {} verified fields",
                    thread_id,
                    data.verified_fields.len()
                );
                SessionState::Verified { data }
            }
            Ok(TerminalCheck::Rejected) => {
                log::info!("verification {} rejected by the holder", thread_id);
                SessionState::Rejected
            }
            Ok(TerminalCheck::Expired) => {
                log::info!("verification {} expired unscanned", thread_id);
                SessionState::Expired
            }
            Err(error) => {
                log::error!("verification {} poll failed: {}", thread_id, error);
                SessionState::Failed { message: error.to_string() }
            }
        };

        if let Some(entry) = sessions
            .lock()
            .expect("session registry lock poisoned")
            .get_mut(thread_id)
        {
            entry.session.state = state;
            entry.poller = None;
        }
    }

    /// Stops polling for a session, leaving its last state readable.
    ///
    /// This is the teardown path: navigating away from the QR view must
    /// never leave a dangling poll behind. Returns `false` when the
    /// thread id is unknown.
    pub fn cancel_verification(&self, thread_id: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("session registry lock poisoned");
        match sessions.get_mut(thread_id) {
            Some(entry) => {
                if let Some(poller) = entry.poller.take() {
                    poller.cancel();
                    log::debug!("verification {} polling cancelled", thread_id);
                }
                true
            }
            None => false,
        }
    }

    /// Snapshot of a session for the status endpoint.
    pub fn session_status(&self, thread_id: &str) -> Option<VerificationSession> {
        self.sessions
            .lock()
            .expect("session registry lock poisoned")
            .get(thread_id)
            .map(|entry| entry.session.clone())
    }
}
