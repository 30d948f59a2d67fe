//! Proof generation orchestrator.
//!
//! Sequences build → complete → parse behind a single async `submit`
//! operation and mirrors each submission's outcome into an explicit
//! [`RequestState`] for UI consumers. A failure at any stage short-circuits
//! the rest; a partial result is never observable.
//!
//! Overlapping submissions are not cancelled, but the state cell enforces
//! last-write-wins: only the most recently initiated submission may settle
//! the observable state, regardless of the order in which the underlying
//! calls resolve.

use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};

use crate::client::{CompletionCapability, GeminiClient, GeminiConfig};
use crate::error::{ProofGenError, Result};
use crate::keystore::ApiKeyStore;
use crate::parser::parse_completion;
use crate::prompt::build_completion_request;
use crate::types::ParsedProof;

/// Observable lifecycle of the current submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// No submission has been made yet
    Idle,
    /// A submission is awaiting the remote service
    InFlight,
    /// The latest submission completed with a parsed proof
    Succeeded(ParsedProof),
    /// The latest submission failed; carries the human-readable message
    Failed(String),
}

impl RequestState {
    /// Whether a submission is currently awaiting the remote service
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }
}

/// Shared request-lifecycle cell with last-write-wins settlement.
///
/// `begin` hands out monotonically increasing tickets and moves the state to
/// `InFlight`; `settle` applies an outcome only when its ticket is still the
/// most recently issued one. Stale settlements are dropped silently.
#[derive(Debug, Default)]
pub struct RequestStateCell {
    inner: Mutex<CellInner>,
}

#[derive(Debug)]
struct CellInner {
    latest_ticket: u64,
    state: RequestState,
}

impl Default for CellInner {
    fn default() -> Self {
        Self {
            latest_ticket: 0,
            state: RequestState::Idle,
        }
    }
}

impl RequestStateCell {
    /// Create a cell in the `Idle` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new submission and return its ticket
    pub fn begin(&self) -> u64 {
        let mut inner = self.inner.lock().expect("state cell lock poisoned");
        inner.latest_ticket += 1;
        inner.state = RequestState::InFlight;
        inner.latest_ticket
    }

    /// Apply a submission outcome; returns whether the state was updated
    pub fn settle(&self, ticket: u64, outcome: std::result::Result<ParsedProof, String>) -> bool {
        let mut inner = self.inner.lock().expect("state cell lock poisoned");
        if ticket != inner.latest_ticket {
            tracing::debug!(
                target: "proofgen::service",
                ticket,
                latest = inner.latest_ticket,
                "dropping stale submission outcome"
            );
            return false;
        }
        inner.state = match outcome {
            Ok(proof) => RequestState::Succeeded(proof),
            Err(message) => RequestState::Failed(message),
        };
        true
    }

    /// Snapshot the current state
    pub fn state(&self) -> RequestState {
        self.inner
            .lock()
            .expect("state cell lock poisoned")
            .state
            .clone()
    }
}

/// Orchestrator: key store + completion client + parser behind one operation
#[derive(Clone)]
pub struct ProofService {
    client: Arc<dyn CompletionCapability>,
    key_store: Arc<dyn ApiKeyStore>,
    state: Arc<RequestStateCell>,
}

impl ProofService {
    /// Create a service over an arbitrary completion transport
    pub fn new(client: Arc<dyn CompletionCapability>, key_store: Arc<dyn ApiKeyStore>) -> Self {
        Self {
            client,
            key_store,
            state: Arc::new(RequestStateCell::new()),
        }
    }

    /// Create a service backed by the Gemini client
    pub fn gemini(config: GeminiConfig, key_store: Arc<dyn ApiKeyStore>) -> Result<Self> {
        Ok(Self::new(Arc::new(GeminiClient::new(config)?), key_store))
    }

    /// The shared state cell, for UI consumers observing transitions
    pub fn state_cell(&self) -> Arc<RequestStateCell> {
        Arc::clone(&self.state)
    }

    /// Snapshot of the current request state
    pub fn request_state(&self) -> RequestState {
        self.state.state()
    }

    /// Submit a formula using the stored API key.
    ///
    /// An absent key fails with [`ProofGenError::MissingApiKey`] before any
    /// network call is made.
    pub async fn submit(&self, formula: &str) -> Result<ParsedProof> {
        let api_key = self
            .key_store
            .get()
            .unwrap_or_else(|| SecretString::from(""));
        self.run(&api_key, formula).await
    }

    /// Validate, persist the key to the injected store, then submit.
    ///
    /// The key is only persisted once both inputs pass validation, so a
    /// rejected submission never overwrites a previously stored key.
    pub async fn submit_with_key(&self, api_key: &str, formula: &str) -> Result<ParsedProof> {
        let ticket = self.state.begin();
        let outcome = async {
            let request = build_completion_request(api_key, formula)?;
            let api_key = SecretString::from(api_key);
            self.key_store.set(api_key.clone());
            let raw = self.client.complete(&api_key, &request).await?;
            Ok(parse_completion(&raw))
        }
        .await;
        self.settle(ticket, outcome)
    }

    async fn run(&self, api_key: &SecretString, formula: &str) -> Result<ParsedProof> {
        let ticket = self.state.begin();
        let outcome = async {
            let request = build_completion_request(api_key.expose_secret(), formula)?;
            let raw = self.client.complete(api_key, &request).await?;
            Ok(parse_completion(&raw))
        }
        .await;
        self.settle(ticket, outcome)
    }

    fn settle(&self, ticket: u64, outcome: Result<ParsedProof>) -> Result<ParsedProof> {
        match &outcome {
            Ok(proof) => {
                self.state.settle(ticket, Ok(proof.clone()));
            }
            Err(e) => {
                self.state.settle(ticket, Err(e.to_string()));
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::MemoryKeyStore;
    use crate::types::CompletionRequest;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct FixedClient(std::result::Result<String, fn() -> ProofGenError>);

    #[async_trait]
    impl CompletionCapability for FixedClient {
        async fn complete(
            &self,
            _api_key: &SecretString,
            _request: &CompletionRequest,
        ) -> Result<String> {
            self.0.clone().map_err(|f| f())
        }
    }

    /// Client whose first call blocks until released, later calls answer
    /// immediately. Used to force out-of-order resolution.
    struct GatedClient {
        gate: Arc<Notify>,
        calls: std::sync::atomic::AtomicU64,
    }

    #[async_trait]
    impl CompletionCapability for GatedClient {
        async fn complete(
            &self,
            _api_key: &SecretString,
            _request: &CompletionRequest,
        ) -> Result<String> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call == 0 {
                self.gate.notified().await;
                Ok("slow\n---THINKING_STEPS_END---\nfirst".to_string())
            } else {
                Ok("fast\n---THINKING_STEPS_END---\nsecond".to_string())
            }
        }
    }

    fn store_with_key(key: &str) -> Arc<MemoryKeyStore> {
        let store = Arc::new(MemoryKeyStore::new());
        store.set(SecretString::from(key));
        store
    }

    #[test]
    fn state_cell_walks_idle_in_flight_succeeded() {
        let cell = RequestStateCell::new();
        assert_eq!(cell.state(), RequestState::Idle);

        let ticket = cell.begin();
        assert!(cell.state().is_in_flight());

        let proof = ParsedProof {
            thinking_steps: "t".to_string(),
            latex: "l".to_string(),
        };
        assert!(cell.settle(ticket, Ok(proof.clone())));
        assert_eq!(cell.state(), RequestState::Succeeded(proof));
    }

    #[test]
    fn stale_ticket_cannot_settle() {
        let cell = RequestStateCell::new();
        let first = cell.begin();
        let second = cell.begin();

        assert!(!cell.settle(first, Err("late failure".to_string())));
        assert!(cell.state().is_in_flight());

        let proof = ParsedProof {
            thinking_steps: String::new(),
            latex: "x".to_string(),
        };
        assert!(cell.settle(second, Ok(proof.clone())));
        assert_eq!(cell.state(), RequestState::Succeeded(proof.clone()));

        // Settling the old ticket after the fact changes nothing either
        assert!(!cell.settle(first, Err("even later".to_string())));
        assert_eq!(cell.state(), RequestState::Succeeded(proof));
    }

    #[tokio::test]
    async fn missing_stored_key_fails_before_transport() {
        struct PanicClient;
        #[async_trait]
        impl CompletionCapability for PanicClient {
            async fn complete(
                &self,
                _api_key: &SecretString,
                _request: &CompletionRequest,
            ) -> Result<String> {
                panic!("transport must not be reached");
            }
        }

        let service = Arc::new(ProofService::new(
            Arc::new(PanicClient),
            Arc::new(MemoryKeyStore::new()),
        ));
        let err = service.submit("p ⊢ p").await.unwrap_err();
        assert!(matches!(err, ProofGenError::MissingApiKey));
        assert_eq!(
            service.request_state(),
            RequestState::Failed("API key is missing.".to_string())
        );
    }

    #[tokio::test]
    async fn transport_failure_moves_state_to_failed() {
        let service = ProofService::new(
            Arc::new(FixedClient(Err(|| {
                ProofGenError::HttpError("connection reset".to_string())
            }))),
            store_with_key("k"),
        );
        let err = service.submit("p ⊢ p").await.unwrap_err();
        assert!(matches!(err, ProofGenError::HttpError(_)));
        assert_eq!(
            service.request_state(),
            RequestState::Failed("HTTP error: connection reset".to_string())
        );
    }

    #[tokio::test]
    async fn success_parses_and_publishes_result() {
        let service = ProofService::new(
            Arc::new(FixedClient(Ok(
                "Step 1...\n---THINKING_STEPS_END---\n```latex\n\\begin{prooftree}\\Axiom$p$\\end{prooftree}\n```".to_string(),
            ))),
            store_with_key("k"),
        );
        let proof = service.submit("p ⊢ p").await.unwrap();
        assert_eq!(proof.thinking_steps, "Step 1...");
        assert_eq!(proof.latex, "\\begin{prooftree}\\Axiom$p$\\end{prooftree}");
        assert_eq!(service.request_state(), RequestState::Succeeded(proof));
    }

    #[tokio::test]
    async fn submit_with_key_persists_only_after_validation() {
        let store = Arc::new(MemoryKeyStore::new());
        let service = ProofService::new(
            Arc::new(FixedClient(Ok(
                "---THINKING_STEPS_END---\nproof".to_string()
            ))),
            store.clone(),
        );

        // Invalid input: key not stored
        let err = service.submit_with_key("k", "").await.unwrap_err();
        assert!(matches!(err, ProofGenError::MissingInput));
        assert!(store.get().is_none());

        // Valid submission: key stored for later `submit` calls
        service.submit_with_key("k", "p ⊢ p").await.unwrap();
        assert_eq!(store.get().unwrap().expose_secret(), "k");
        service.submit("p ⊢ p").await.unwrap();
    }

    #[tokio::test]
    async fn later_submission_wins_when_earlier_resolves_last() {
        let gate = Arc::new(Notify::new());
        let client = Arc::new(GatedClient {
            gate: gate.clone(),
            calls: std::sync::atomic::AtomicU64::new(0),
        });
        let service = ProofService::new(client.clone(), store_with_key("k"));

        let slow = {
            let service = service.clone();
            tokio::spawn(async move { service.submit("p ⊢ p").await })
        };
        // Let the first submission reach the gate before starting the second
        while client.calls.load(std::sync::atomic::Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = service.submit("q ⊢ q").await.unwrap();
        assert_eq!(second.latex, "second");

        gate.notify_one();
        let first = slow.await.unwrap().unwrap();
        assert_eq!(first.latex, "first");

        // The earlier submission resolved last but may not overwrite state
        assert_eq!(service.request_state(), RequestState::Succeeded(second));
    }
}
