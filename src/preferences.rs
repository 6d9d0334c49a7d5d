//! Routine preferences and their persistence
//!
//! The whole record is rewritten on every submit and read back once at
//! startup to pre-populate the form.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// The five values the user picks on the form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutinePreferences {
    /// Time-of-day option value (e.g. "Morning")
    pub time_of_day: String,
    /// Focus area option value
    pub focus_area: String,
    /// Minutes available, kept as the control's string value
    pub time_available: String,
    /// Energy level option value
    pub energy_level: String,
    /// Checked activity values in document order
    pub activities: Vec<String>,
}

impl RoutinePreferences {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "routinePreferences";

    /// Whether an activity checkbox with this value should be checked
    pub fn includes_activity(&self, value: &str) -> bool {
        self.activities.iter().any(|a| a == value)
    }

    /// Activities joined the way the prompt lists them
    pub fn activities_list(&self) -> String {
        self.activities.join(", ")
    }
}

/// Reads and writes `RoutinePreferences` under a single fixed key
#[derive(Debug)]
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Serialize and overwrite the stored record
    pub fn save(&self, preferences: &RoutinePreferences) -> Result<()> {
        let json = serde_json::to_string(preferences)?;
        self.store.set(RoutinePreferences::STORAGE_KEY, &json)?;
        log::info!("Preferences saved");
        Ok(())
    }

    /// Read the stored record, `None` if nothing was ever saved
    pub fn load(&self) -> Result<Option<RoutinePreferences>> {
        let Some(json) = self.store.get(RoutinePreferences::STORAGE_KEY)? else {
            log::info!("No saved preferences, keeping form defaults");
            return Ok(None);
        };
        let preferences = serde_json::from_str(&json)?;
        log::info!("Loaded preferences from storage");
        Ok(Some(preferences))
    }

    /// Underlying key-value store
    pub fn inner(&self) -> &S {
        &self.store
    }
}
