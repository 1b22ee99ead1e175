//! The trail finder submission state machine.
//!
//! ```text
//! Idle ──submit──> Validating ──empty──> Failed(EmptySelection)
//!                      │
//!                    valid
//!                      v
//!                   Loading ──ok──> Success(suggestion)
//!                      └─────err──> Failed(kind)
//! ```
//!
//! `Success` and `Failed` accept a new submission, which starts over at
//! `Validating`. The controller is the only writer of the state; readers get a
//! [`watch::Receiver`] from [`SubmissionController::subscribe`].

use crate::preferences::PreferenceSet;
use crate::transport::ProxyTransport;
use log::{debug, error, info, warn};
use tokio::sync::watch;
use trailfinder_core::errors::ErrorKind;
use trailfinder_core::schema::TrailSuggestion;

/// Submit button label while idle
pub const IDLE_LABEL: &str = "Generate My AI Trail";

/// Submit button label while a request is in flight
pub const LOADING_LABEL: &str = "Generating...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Loading,
    Success(TrailSuggestion),
    Failed(ErrorKind),
}

/// How the submit button looks in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub disabled: bool,
    pub loading: bool,
    pub label: &'static str,
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    pub fn control(&self) -> ControlView {
        if self.is_loading() {
            ControlView {
                disabled: true,
                loading: true,
                label: LOADING_LABEL,
            }
        } else {
            ControlView {
                disabled: false,
                loading: false,
                label: IDLE_LABEL,
            }
        }
    }
}

/// Drives one form's submissions through the proxy
pub struct SubmissionController<T> {
    transport: T,
    state: watch::Sender<SubmissionState>,
}

impl<T: ProxyTransport> SubmissionController<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self { transport, state }
    }

    /// A read-only view of every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    fn transition(&self, next: SubmissionState) {
        debug!("Submission state -> {:?}", next);
        self.state.send_replace(next);
    }

    /// Runs one submission to completion and returns the terminal state.
    ///
    /// Taking `&mut self` keeps a second submission from starting while one
    /// is in flight. An empty selection fails without any network call.
    pub async fn submit(&mut self, preferences: PreferenceSet) -> SubmissionState {
        self.transition(SubmissionState::Validating);

        if preferences.is_empty() {
            warn!("Trail finder submitted with no difficulty or vibe selected");
            self.transition(SubmissionState::Failed(ErrorKind::EmptySelection));
            return self.state();
        }

        let request = preferences.to_request();
        self.transition(SubmissionState::Loading);

        let outcome = match self.transport.request_suggestion(&request).await {
            Ok(text) => TrailSuggestion::from_model_text(&text),
            Err(kind) => Err(kind),
        };

        let next = match outcome {
            Ok(suggestion) => {
                info!("Generated trail suggestion: {}", suggestion.trail_name);
                SubmissionState::Success(suggestion)
            }
            Err(kind) => {
                error!("AI Trail Finder Error: {}", kind);
                SubmissionState::Failed(kind)
            }
        };
        self.transition(next);
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{collect, FormSnapshot};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use trailfinder_core::schema::TrailSuggestionRequest;

    /// Transport double that checks the published control state while "on the wire"
    struct FakeTransport {
        calls: AtomicUsize,
        disabled_during_call: AtomicBool,
        observer: Mutex<Option<watch::Receiver<SubmissionState>>>,
        last_prompt: Mutex<Option<String>>,
        reply: Result<String, ErrorKind>,
    }

    impl FakeTransport {
        fn new(reply: Result<String, ErrorKind>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                disabled_during_call: AtomicBool::new(true),
                observer: Mutex::new(None),
                last_prompt: Mutex::new(None),
                reply,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProxyTransport for FakeTransport {
        async fn request_suggestion(
            &self,
            request: &TrailSuggestionRequest,
        ) -> Result<String, ErrorKind> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
            if let Some(rx) = self.observer.lock().unwrap().as_ref() {
                let control = rx.borrow().control();
                if !control.disabled || control.label != LOADING_LABEL {
                    self.disabled_during_call.store(false, Ordering::SeqCst);
                }
            }
            tokio::task::yield_now().await;
            self.reply.clone()
        }
    }

    fn controller(
        reply: Result<String, ErrorKind>,
    ) -> (SubmissionController<Arc<FakeTransport>>, Arc<FakeTransport>) {
        let transport = FakeTransport::new(reply);
        let controller = SubmissionController::new(transport.clone());
        *transport.observer.lock().unwrap() = Some(controller.subscribe());
        (controller, transport)
    }

    fn suggestion_text() -> String {
        json!({
            "trailName": "Harriston Hollow Trail",
            "difficulty": "Easy",
            "distance": "5 km loop",
            "description": "Wildflowers along an old mill race.",
            "whyItMatches": "Easy going with scenic views."
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_call() {
        let (mut controller, transport) = controller(Ok(suggestion_text()));
        let mut rx = controller.subscribe();

        let state = controller.submit(collect(&FormSnapshot::new())).await;

        assert_eq!(state, SubmissionState::Failed(ErrorKind::EmptySelection));
        assert_eq!(transport.calls(), 0);
        assert!(!state.control().disabled);

        assert!(rx.has_changed().unwrap());
        assert_eq!(
            *rx.borrow_and_update(),
            SubmissionState::Failed(ErrorKind::EmptySelection)
        );
    }

    #[tokio::test]
    async fn test_success_path() {
        let (mut controller, transport) = controller(Ok(suggestion_text()));
        let prefs = PreferenceSet::new(["Easy"], Vec::<String>::new());

        let state = controller.submit(prefs).await;

        let expected = TrailSuggestion::from_model_text(&suggestion_text()).unwrap();
        assert_eq!(state, SubmissionState::Success(expected));
        assert_eq!(transport.calls(), 1);
        assert!(transport.disabled_during_call.load(Ordering::SeqCst));
        assert_eq!(state.control().label, IDLE_LABEL);
        assert!(!state.control().disabled);

        let prompt = transport.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("difficulty of Easy"));
        assert!(prompt.contains("vibes of any"));
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let mut value: serde_json::Value = serde_json::from_str(&suggestion_text()).unwrap();
        value.as_object_mut().unwrap().remove("whyItMatches");
        let (mut controller, transport) = controller(Ok(value.to_string()));

        let state = controller.submit(PreferenceSet::new(["Moderate"], ["Forest"])).await;

        assert!(matches!(
            state,
            SubmissionState::Failed(ErrorKind::MalformedResponse(_))
        ));
        assert_eq!(transport.calls(), 1);
        assert!(!state.control().disabled);
    }

    #[tokio::test]
    async fn test_transport_error_goes_to_failed() {
        let (mut controller, transport) =
            controller(Err(ErrorKind::UpstreamFailure("proxy returned 500".to_string())));

        let state = controller.submit(PreferenceSet::new(["Easy"], ["Scenic"])).await;

        assert_eq!(
            state,
            SubmissionState::Failed(ErrorKind::UpstreamFailure("proxy returned 500".to_string()))
        );
        assert_eq!(transport.calls(), 1);
        assert!(transport.disabled_during_call.load(Ordering::SeqCst));
        assert_eq!(state.control().label, IDLE_LABEL);
    }

    #[tokio::test]
    async fn test_resubmission_restarts_cycle() {
        let (mut controller, transport) = controller(Ok(suggestion_text()));

        let first = controller.submit(PreferenceSet::default()).await;
        assert_eq!(first, SubmissionState::Failed(ErrorKind::EmptySelection));

        let second = controller.submit(PreferenceSet::new(["Easy"], ["Scenic"])).await;
        assert!(matches!(second, SubmissionState::Success(_)));

        let third = controller.submit(PreferenceSet::new(["Easy"], ["Scenic"])).await;
        assert!(matches!(third, SubmissionState::Success(_)));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_observer_sees_loading() {
        let (mut controller, _transport) = controller(Ok(suggestion_text()));
        let mut rx = controller.subscribe();

        let watcher = tokio::spawn(async move {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                let done = matches!(state, SubmissionState::Success(_) | SubmissionState::Failed(_));
                seen.push(state);
                if done {
                    break;
                }
            }
            seen
        });

        controller.submit(PreferenceSet::new(["Easy"], ["Scenic"])).await;
        let seen = watcher.await.unwrap();

        assert!(seen.iter().any(SubmissionState::is_loading));
        assert!(matches!(seen.last(), Some(SubmissionState::Success(_))));
    }

    #[test]
    fn test_idle_control() {
        let control = SubmissionState::Idle.control();
        assert!(!control.disabled);
        assert!(!control.loading);
        assert_eq!(control.label, IDLE_LABEL);

        let control = SubmissionState::Loading.control();
        assert!(control.disabled);
        assert!(control.loading);
        assert_eq!(control.label, LOADING_LABEL);
    }
}
