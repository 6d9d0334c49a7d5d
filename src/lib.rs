//! Routine Builder - a daily routine generator
//!
//! Core modules:
//! - `preferences`: The saved form record and its store
//! - `storage`: Key-value backends
//! - `form`: Boundary between the handler and the page
//! - `prompt`: Prompt template and request body
//! - `api`: Chat-completion transport and response parsing
//! - `handler`: Submit state machine
//! - `platform`: Browser/native hosts

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod handler;
pub mod platform;
pub mod preferences;
pub mod prompt;
pub mod storage;

#[cfg(test)]
mod testing;

pub use config::ApiConfig;
pub use error::{Result, RoutineError};
pub use form::{Field, FormView};
pub use handler::{RoutineHandler, SubmitPhase};
pub use preferences::{PreferenceStore, RoutinePreferences};
pub use storage::{KeyValueStore, MemoryStore};
