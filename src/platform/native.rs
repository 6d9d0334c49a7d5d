//! Native host: preferences in a directory of JSON files, the form as
//! command-line values, and a blocking `ureq` client.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::api::CompletionClient;
use crate::error::{Result, RoutineError};
use crate::form::{Field, FormView, WORKING_CAPTION};
use crate::preferences::RoutinePreferences;
use crate::prompt::ChatCompletionRequest;
use crate::storage::KeyValueStore;

/// One `<key>.json` file per key under `dir`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Blocking chat-completion client
pub struct UreqClient {
    agent: ureq::Agent,
    endpoint: String,
}

impl UreqClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        // Non-2xx bodies still carry the provider's error message
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }
}

impl CompletionClient for UreqClient {
    async fn complete(&self, api_key: &str, request: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", api_key))
            .send_json(request)
            .map_err(|e| RoutineError::Transport(e.to_string()))?;
        log::debug!("Chat completion answered with status {}", response.status());

        response
            .into_body()
            .read_to_string()
            .map_err(|e| RoutineError::Transport(e.to_string()))
    }
}

/// The form as seen from a terminal.
///
/// There is no fixed checkbox set, so a stored record's activities are taken
/// as-is.
#[derive(Debug)]
pub struct TerminalForm {
    values: RefCell<RoutinePreferences>,
}

impl Default for TerminalForm {
    fn default() -> Self {
        Self::new(RoutinePreferences {
            time_of_day: "Morning".into(),
            focus_area: "Productivity".into(),
            time_available: "30".into(),
            energy_level: "Medium".into(),
            activities: Vec::new(),
        })
    }
}

impl TerminalForm {
    pub fn new(defaults: RoutinePreferences) -> Self {
        Self {
            values: RefCell::new(defaults),
        }
    }

    /// Replace the checked activities wholesale
    pub fn set_activities(&self, activities: &[String]) {
        self.values.borrow_mut().activities = activities.to_vec();
    }
}

impl FormView for TerminalForm {
    fn form_values(&self) -> RoutinePreferences {
        self.values.borrow().clone()
    }

    fn set_field(&self, field: Field, value: &str) {
        let mut values = self.values.borrow_mut();
        let slot = match field {
            Field::TimeOfDay => &mut values.time_of_day,
            Field::FocusArea => &mut values.focus_area,
            Field::TimeAvailable => &mut values.time_available,
            Field::EnergyLevel => &mut values.energy_level,
        };
        *slot = value.to_string();
    }

    fn activity_options(&self) -> Vec<String> {
        self.values.borrow().activities.clone()
    }

    fn set_activity_checked(&self, value: &str, checked: bool) {
        let mut values = self.values.borrow_mut();
        let present = values.activities.iter().any(|a| a == value);
        if checked && !present {
            values.activities.push(value.to_string());
        } else if !checked {
            values.activities.retain(|a| a != value);
        }
    }

    fn apply_form_values(&self, prefs: &RoutinePreferences) {
        *self.values.borrow_mut() = prefs.clone();
    }

    fn show_working(&self) {
        eprintln!("{}", WORKING_CAPTION);
    }

    fn restore_submit(&self) {}

    fn render_result(&self, routine: &str) {
        println!("{}", routine);
    }

    fn render_error(&self, message: &str) {
        println!("{}", message);
    }
}
