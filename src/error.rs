//! Error types for the routine builder.

use thiserror::Error;

/// Everything that can go wrong between the form and the rendered routine.
///
/// Only the request/response variants are recovered from (they put the
/// handler in the failed state). The rest propagate to the host.
#[derive(Debug, Error)]
pub enum RoutineError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no API key configured")]
    MissingApiKey,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("response contained no choices")]
    MissingChoice,

    #[error("missing page element: {0}")]
    MissingElement(&'static str),

    #[error("host error: {0}")]
    Host(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RoutineError>;
