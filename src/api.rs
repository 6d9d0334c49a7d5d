//! Chat-completion transport and response parsing

use serde::Deserialize;

use crate::error::{Result, RoutineError};
use crate::prompt::ChatCompletionRequest;

/// Sends one request body and hands back the raw response text.
///
/// Implementations perform exactly one POST: no retries, no timeout.
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
    async fn complete(&self, api_key: &str, request: &ChatCompletionRequest) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Pull `choices[0].message.content` out of a response body
pub fn extract_routine(body: &str) -> Result<String> {
    let response: CompletionResponse = serde_json::from_str(body)?;

    if let Some(err) = response.error {
        return Err(RoutineError::Api(err.message));
    }

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(RoutineError::MissingChoice)
}
