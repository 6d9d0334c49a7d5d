//! Submit handler state machine
//!
//! `Idle -> Submitting -> (Success | Failed) -> Idle`. Only the request and
//! response path is recovered from; storage faults propagate to the caller.

use std::cell::Cell;

use crate::api::{CompletionClient, extract_routine};
use crate::config::ApiConfig;
use crate::error::{Result, RoutineError};
use crate::form::{FALLBACK_MESSAGE, FormView};
use crate::preferences::{PreferenceStore, RoutinePreferences};
use crate::prompt::build_request;
use crate::storage::KeyValueStore;

/// Where the handler is in a submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Success,
    Failed,
}

/// Ties the form, the preference store and the API client together
pub struct RoutineHandler<S, V, C> {
    preferences: PreferenceStore<S>,
    view: V,
    client: C,
    config: ApiConfig,
    phase: Cell<SubmitPhase>,
}

impl<S, V, C> RoutineHandler<S, V, C>
where
    S: KeyValueStore,
    V: FormView,
    C: CompletionClient,
{
    pub fn new(store: S, view: V, client: C, config: ApiConfig) -> Self {
        Self {
            preferences: PreferenceStore::new(store),
            view,
            client,
            config,
            phase: Cell::new(SubmitPhase::Idle),
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase.get()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn preferences(&self) -> &PreferenceStore<S> {
        &self.preferences
    }

    /// Pre-populate the form from storage. Returns whether a record was found.
    pub fn load_preferences(&self) -> Result<bool> {
        match self.preferences.load()? {
            Some(prefs) => {
                self.view.apply_form_values(&prefs);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run one full submit cycle and report how it ended.
    ///
    /// An `Err` means the preferences could not be saved; the form is left
    /// exactly as it was and no request is made.
    pub async fn submit(&self) -> Result<SubmitPhase> {
        let prefs = self.view.form_values();
        self.preferences.save(&prefs)?;

        self.phase.set(SubmitPhase::Submitting);
        self.view.show_working();

        let outcome = match self.generate(&prefs).await {
            Ok(routine) => {
                self.view.render_result(&routine);
                SubmitPhase::Success
            }
            Err(err) => {
                log::error!("Error: {}", err);
                self.view.render_error(FALLBACK_MESSAGE);
                SubmitPhase::Failed
            }
        };
        self.phase.set(outcome);

        self.view.restore_submit();
        self.phase.set(SubmitPhase::Idle);
        Ok(outcome)
    }

    async fn generate(&self, prefs: &RoutinePreferences) -> Result<String> {
        let api_key = self.config.api_key().ok_or(RoutineError::MissingApiKey)?;
        let request = build_request(&self.config, prefs);
        log::debug!("Requesting routine from {}", self.config.endpoint);
        let body = self.client.complete(api_key, &request).await?;
        extract_routine(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{SUBMIT_MARKUP, WORKING_CAPTION};
    use crate::storage::MemoryStore;
    use crate::testing::{FailingStore, MockClient, MockView};
    use futures_lite::future::block_on;

    fn filled_view() -> MockView {
        let view = MockView::with_options(&["Stretching", "Reading", "Meditation"]);
        view.apply_form_values(&RoutinePreferences {
            time_of_day: "Morning".into(),
            focus_area: "Energy".into(),
            time_available: "20".into(),
            energy_level: "High".into(),
            activities: vec!["Stretching".into(), "Meditation".into()],
        });
        view
    }

    fn handler(
        client: MockClient,
    ) -> RoutineHandler<MemoryStore, MockView, MockClient> {
        RoutineHandler::new(
            MemoryStore::new(),
            filled_view(),
            client,
            ApiConfig::with_api_key("sk-test"),
        )
    }

    #[test]
    fn test_success_renders_routine_and_reveals_panel() {
        let h = handler(MockClient::replying(
            r#"{"choices":[{"message":{"content":"Step 1..."}}]}"#,
        ));

        let outcome = block_on(h.submit()).unwrap();

        assert_eq!(outcome, SubmitPhase::Success);
        assert_eq!(h.phase(), SubmitPhase::Idle);
        assert_eq!(h.view().output(), "Step 1...");
        assert!(h.view().result_visible());
        assert_eq!(h.view().button_markup(), SUBMIT_MARKUP);
        assert!(!h.view().button_disabled());
    }

    #[test]
    fn test_network_error_shows_fallback_and_restores_button() {
        let h = handler(MockClient::failing("connection reset"));

        let outcome = block_on(h.submit()).unwrap();

        assert_eq!(outcome, SubmitPhase::Failed);
        assert_eq!(h.view().output(), FALLBACK_MESSAGE);
        assert!(!h.view().result_visible());
        assert_eq!(h.view().button_markup(), SUBMIT_MARKUP);
        assert!(!h.view().button_disabled());
    }

    #[test]
    fn test_button_is_busy_while_request_in_flight() {
        let h = handler(MockClient::replying(
            r#"{"choices":[{"message":{"content":"ok"}}]}"#,
        ));
        block_on(h.submit()).unwrap();

        let (caption, disabled) = h.view().working_snapshot().unwrap();
        assert_eq!(caption, WORKING_CAPTION);
        assert!(disabled);
    }

    #[test]
    fn test_failure_keeps_panel_visible_if_already_shown() {
        let h = handler(MockClient::replying(
            r#"{"choices":[{"message":{"content":"first"}}]}"#,
        ));
        block_on(h.submit()).unwrap();
        assert!(h.view().result_visible());

        h.client.fail_next("timeout");
        assert_eq!(block_on(h.submit()).unwrap(), SubmitPhase::Failed);
        assert!(h.view().result_visible());
        assert_eq!(h.view().output(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_unexpected_response_shape_fails() {
        let h = handler(MockClient::replying(r#"{"object":"list","data":[]}"#));
        assert_eq!(block_on(h.submit()).unwrap(), SubmitPhase::Failed);
        assert_eq!(h.view().output(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_missing_api_key_fails_without_sending() {
        let client = MockClient::replying(r#"{"choices":[{"message":{"content":"x"}}]}"#);
        let h = RoutineHandler::new(MemoryStore::new(), filled_view(), client, ApiConfig::default());

        assert_eq!(block_on(h.submit()).unwrap(), SubmitPhase::Failed);
        assert!(h.client.requests().is_empty());
        assert_eq!(h.view().output(), FALLBACK_MESSAGE);
        assert!(!h.view().button_disabled());
    }

    #[test]
    fn test_submit_saves_before_request() {
        let h = handler(MockClient::failing("offline"));
        block_on(h.submit()).unwrap();

        let saved = h.preferences().load().unwrap().unwrap();
        assert_eq!(saved.time_of_day, "Morning");
        assert_eq!(saved.activities, vec!["Stretching", "Meditation"]);
    }

    #[test]
    fn test_request_carries_form_values() {
        let h = handler(MockClient::replying(
            r#"{"choices":[{"message":{"content":"ok"}}]}"#,
        ));
        block_on(h.submit()).unwrap();

        let requests = h.client.requests();
        assert_eq!(requests.len(), 1);
        let (key, request) = &requests[0];
        assert_eq!(key, "sk-test");

        let content = &request.messages[1].content;
        assert!(content.contains("routine for my morning that focuses on energy"));
        assert!(content.contains("I have 20 minutes available and my energy level is high."));
        assert!(content.contains("Stretching, Meditation"));
    }

    #[test]
    fn test_storage_failure_propagates() {
        let client = MockClient::replying(r#"{"choices":[{"message":{"content":"x"}}]}"#);
        let h = RoutineHandler::new(
            FailingStore,
            filled_view(),
            client,
            ApiConfig::with_api_key("sk-test"),
        );

        let err = block_on(h.submit()).unwrap_err();
        assert!(matches!(err, RoutineError::Storage(_)));
        assert_eq!(h.phase(), SubmitPhase::Idle);
        assert!(h.client.requests().is_empty());
        assert_eq!(h.view().button_markup(), SUBMIT_MARKUP);
        assert!(h.view().working_snapshot().is_none());
    }

    #[test]
    fn test_load_preferences_applies_stored_record() {
        let h = handler(MockClient::failing("unused"));
        h.preferences()
            .save(&RoutinePreferences {
                time_of_day: "Evening".into(),
                focus_area: "Sleep".into(),
                time_available: "10".into(),
                energy_level: "Low".into(),
                activities: vec!["Reading".into(), "Stretching".into()],
            })
            .unwrap();

        assert!(h.load_preferences().unwrap());
        assert_eq!(h.view().form_values().time_of_day, "Evening");
        assert_eq!(h.view().checked(), vec!["Stretching", "Reading"]);
    }

    #[test]
    fn test_load_without_record_keeps_defaults() {
        let h = handler(MockClient::failing("unused"));
        let before = h.view().form_values();

        assert!(!h.load_preferences().unwrap());
        assert_eq!(h.view().form_values(), before);
    }
}
