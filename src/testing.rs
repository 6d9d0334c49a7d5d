//! Test doubles for the form, the store and the API client

use std::cell::RefCell;

use crate::api::CompletionClient;
use crate::error::{Result, RoutineError};
use crate::form::{Field, FormView, SUBMIT_MARKUP, WORKING_CAPTION};
use crate::preferences::RoutinePreferences;
use crate::prompt::ChatCompletionRequest;
use crate::storage::KeyValueStore;

#[derive(Debug, Default)]
struct MockDom {
    fields: [String; 4],
    /// (value, checked) in document order
    checkboxes: Vec<(String, bool)>,
    button_markup: String,
    button_disabled: bool,
    working_snapshot: Option<(String, bool)>,
    result_visible: bool,
    output: String,
}

/// In-memory stand-in for the page
#[derive(Debug, Default)]
pub struct MockView {
    dom: RefCell<MockDom>,
}

impl MockView {
    pub fn with_options(options: &[&str]) -> Self {
        let dom = MockDom {
            checkboxes: options.iter().map(|o| (o.to_string(), false)).collect(),
            button_markup: SUBMIT_MARKUP.to_string(),
            ..Default::default()
        };
        Self {
            dom: RefCell::new(dom),
        }
    }

    /// Checked activity values in document order
    pub fn checked(&self) -> Vec<String> {
        self.dom
            .borrow()
            .checkboxes
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(value, _)| value.clone())
            .collect()
    }

    pub fn output(&self) -> String {
        self.dom.borrow().output.clone()
    }

    pub fn result_visible(&self) -> bool {
        self.dom.borrow().result_visible
    }

    pub fn button_markup(&self) -> String {
        self.dom.borrow().button_markup.clone()
    }

    pub fn button_disabled(&self) -> bool {
        self.dom.borrow().button_disabled
    }

    /// Button caption and disabled flag right after the last `show_working`
    pub fn working_snapshot(&self) -> Option<(String, bool)> {
        self.dom.borrow().working_snapshot.clone()
    }
}

fn field_index(field: Field) -> usize {
    match field {
        Field::TimeOfDay => 0,
        Field::FocusArea => 1,
        Field::TimeAvailable => 2,
        Field::EnergyLevel => 3,
    }
}

impl FormView for MockView {
    fn form_values(&self) -> RoutinePreferences {
        let dom = self.dom.borrow();
        RoutinePreferences {
            time_of_day: dom.fields[0].clone(),
            focus_area: dom.fields[1].clone(),
            time_available: dom.fields[2].clone(),
            energy_level: dom.fields[3].clone(),
            activities: self.checked(),
        }
    }

    fn set_field(&self, field: Field, value: &str) {
        self.dom.borrow_mut().fields[field_index(field)] = value.to_string();
    }

    fn activity_options(&self) -> Vec<String> {
        self.dom
            .borrow()
            .checkboxes
            .iter()
            .map(|(value, _)| value.clone())
            .collect()
    }

    fn set_activity_checked(&self, value: &str, checked: bool) {
        for (v, c) in self.dom.borrow_mut().checkboxes.iter_mut() {
            if v == value {
                *c = checked;
            }
        }
    }

    fn show_working(&self) {
        let mut dom = self.dom.borrow_mut();
        dom.button_markup = WORKING_CAPTION.to_string();
        dom.button_disabled = true;
        let snapshot = (dom.button_markup.clone(), dom.button_disabled);
        dom.working_snapshot = Some(snapshot);
    }

    fn restore_submit(&self) {
        let mut dom = self.dom.borrow_mut();
        dom.button_markup = SUBMIT_MARKUP.to_string();
        dom.button_disabled = false;
    }

    fn render_result(&self, routine: &str) {
        let mut dom = self.dom.borrow_mut();
        dom.result_visible = true;
        dom.output = routine.to_string();
    }

    fn render_error(&self, message: &str) {
        self.dom.borrow_mut().output = message.to_string();
    }
}

/// Canned API responses, recording every request it sees
#[derive(Debug)]
pub struct MockClient {
    reply: RefCell<std::result::Result<String, String>>,
    requests: RefCell<Vec<(String, ChatCompletionRequest)>>,
}

impl MockClient {
    fn new(reply: std::result::Result<String, String>) -> Self {
        Self {
            reply: RefCell::new(reply),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn replying(body: &str) -> Self {
        Self::new(Ok(body.to_string()))
    }

    pub fn failing(reason: &str) -> Self {
        Self::new(Err(reason.to_string()))
    }

    /// Make every following request fail with a transport error
    pub fn fail_next(&self, reason: &str) {
        *self.reply.borrow_mut() = Err(reason.to_string());
    }

    pub fn requests(&self) -> Vec<(String, ChatCompletionRequest)> {
        self.requests.borrow().clone()
    }
}

impl CompletionClient for MockClient {
    async fn complete(&self, api_key: &str, request: &ChatCompletionRequest) -> Result<String> {
        self.requests
            .borrow_mut()
            .push((api_key.to_string(), request.clone()));
        self.reply
            .borrow()
            .clone()
            .map_err(RoutineError::Transport)
    }
}

/// Storage that is full or disabled
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(RoutineError::Storage("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(RoutineError::Storage("QuotaExceededError".into()))
    }
}
