//! Prompt templating and the chat-completion request body

use serde::Serialize;

use crate::config::ApiConfig;
use crate::preferences::RoutinePreferences;

/// Fixed system instruction
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates quick, focused daily routines. Always keep routines short, realistic, and tailored to the user's preferences.";

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// POST body for the chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_completion_tokens: u32,
}

/// Fill the user instruction template from the form values
pub fn user_prompt(prefs: &RoutinePreferences) -> String {
    let time_of_day = prefs.time_of_day.to_lowercase();
    let focus_area = prefs.focus_area.to_lowercase();
    let energy_level = prefs.energy_level.to_lowercase();

    format!(
        "Please create a structured, step-by-step routine for my {time_of_day} that focuses on {focus_area}. \n\
I have {minutes} minutes available and my energy level is {energy_level}.\n\
My preferred activities include: {activities}.\n\
\n\
Please provide a clear, numbered routine that:\n\
1. Fits within the time limit\n\
2. Matches my energy level\n\
3. Incorporates my preferred activities where suitable\n\
4. Focuses on {focus_area}\n\
5. Is appropriate for the {time_of_day}",
        minutes = prefs.time_available,
        activities = prefs.activities_list(),
    )
}

/// Build the two-message request for these preferences
pub fn build_request(config: &ApiConfig, prefs: &RoutinePreferences) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt(prefs))],
        temperature: config.temperature,
        max_completion_tokens: config.max_completion_tokens,
    }
}
