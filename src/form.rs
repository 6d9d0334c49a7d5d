//! Boundary between the request handler and whatever renders the form

use crate::preferences::RoutinePreferences;

/// Caption shown on the submit control while a request is in flight
pub const WORKING_CAPTION: &str = "Generating...";
/// Submit control markup restored after every request
pub const SUBMIT_MARKUP: &str = r#"<i class="fas fa-wand-magic-sparkles"></i> Generate My Routine"#;
/// Shown in place of the routine when generation fails
pub const FALLBACK_MESSAGE: &str =
    "Sorry, there was an error generating your routine. Please try again.";

/// `document.readyState` while the markup is still being parsed
pub const DOCUMENT_LOADING: &str = "loading";

/// Whether the form has to wait for `DOMContentLoaded` before it can be wired
pub fn must_wait_for_dom(ready_state: &str) -> bool {
    ready_state == DOCUMENT_LOADING
}

/// The four single-value controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TimeOfDay,
    FocusArea,
    TimeAvailable,
    EnergyLevel,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::TimeOfDay,
        Field::FocusArea,
        Field::TimeAvailable,
        Field::EnergyLevel,
    ];

    /// Element id of the control
    pub fn element_id(&self) -> &'static str {
        match self {
            Field::TimeOfDay => "timeOfDay",
            Field::FocusArea => "focusArea",
            Field::TimeAvailable => "timeAvailable",
            Field::EnergyLevel => "energyLevel",
        }
    }

    /// The matching value in a preferences record
    pub fn value_in<'a>(&self, prefs: &'a RoutinePreferences) -> &'a str {
        match self {
            Field::TimeOfDay => &prefs.time_of_day,
            Field::FocusArea => &prefs.focus_area,
            Field::TimeAvailable => &prefs.time_available,
            Field::EnergyLevel => &prefs.energy_level,
        }
    }
}

/// Everything the handler needs from the UI.
///
/// Implementations own their interior mutability; the handler only ever
/// holds a shared reference.
pub trait FormView {
    /// Snapshot of the live control values
    fn form_values(&self) -> RoutinePreferences;

    /// Set one of the single-value controls
    fn set_field(&self, field: Field, value: &str);

    /// Values of every activity checkbox on the form
    fn activity_options(&self) -> Vec<String>;

    /// Check or uncheck the activity checkbox(es) with this value
    fn set_activity_checked(&self, value: &str, checked: bool);

    /// Pre-populate the form from a stored record.
    ///
    /// Checkboxes end up checked iff their value is in `activities`.
    fn apply_form_values(&self, prefs: &RoutinePreferences) {
        for field in Field::ALL {
            self.set_field(field, field.value_in(prefs));
        }
        for option in self.activity_options() {
            let checked = prefs.includes_activity(&option);
            self.set_activity_checked(&option, checked);
        }
    }

    /// Switch the submit control into its busy state
    fn show_working(&self);

    /// Put the submit control back to its idle caption and enable it
    fn restore_submit(&self);

    /// Reveal the result panel and show the routine as plain text
    fn render_result(&self, routine: &str);

    /// Show a failure message; panel visibility is left as it was
    fn render_error(&self, message: &str);
}
