//! Routine Builder entry point
//!
//! The browser build wires the page form on start. The native build runs one
//! submit cycle from command-line values.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    log::info!("Routine Builder starting...");

    // Returned errors surface as uncaught exceptions on the page
    routine_builder::platform::web::start().map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;
    use futures_lite::future::block_on;

    use routine_builder::config::{ApiConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
    use routine_builder::platform::native::{FileStore, TerminalForm, UreqClient};
    use routine_builder::{Field, FormView, RoutineHandler, SubmitPhase};

    #[derive(Parser)]
    #[command(name = "routine-builder")]
    #[command(about = "Generate a short daily routine from your saved preferences", long_about = None)]
    struct Cli {
        /// Time of day (e.g. Morning, Afternoon, Evening)
        #[arg(long)]
        time_of_day: Option<String>,

        /// What the routine should focus on
        #[arg(long)]
        focus_area: Option<String>,

        /// Minutes available
        #[arg(long)]
        time_available: Option<String>,

        /// Energy level (e.g. Low, Medium, High)
        #[arg(long)]
        energy_level: Option<String>,

        /// Preferred activity; repeat for several. Replaces the saved list.
        #[arg(long = "activity")]
        activities: Vec<String>,

        /// Directory holding saved preferences
        #[arg(long, env = "ROUTINE_STORE", default_value = ".routine-builder")]
        store: PathBuf,

        /// API key for the chat-completion endpoint
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Chat-completion endpoint
        #[arg(long, env = "ROUTINE_API_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Model identifier
        #[arg(long, env = "ROUTINE_MODEL", default_value = DEFAULT_MODEL)]
        model: String,
    }

    impl Cli {
        fn fields(&self) -> [(Field, Option<&String>); 4] {
            [
                (Field::TimeOfDay, self.time_of_day.as_ref()),
                (Field::FocusArea, self.focus_area.as_ref()),
                (Field::TimeAvailable, self.time_available.as_ref()),
                (Field::EnergyLevel, self.energy_level.as_ref()),
            ]
        }
    }

    pub fn run() -> ExitCode {
        let cli = Cli::parse();
        env_logger::init();

        let config = ApiConfig {
            endpoint: cli.endpoint.clone(),
            model: cli.model.clone(),
            api_key: cli.api_key.clone(),
            ..ApiConfig::default()
        };
        let handler = RoutineHandler::new(
            FileStore::new(&cli.store),
            TerminalForm::default(),
            UreqClient::new(config.endpoint.clone()),
            config,
        );

        if let Err(err) = handler.load_preferences() {
            log::error!("Could not read saved preferences: {}", err);
            return ExitCode::FAILURE;
        }

        // Flags play the role of the user editing the pre-filled form
        for (field, value) in cli.fields() {
            if let Some(value) = value {
                handler.view().set_field(field, value);
            }
        }
        if !cli.activities.is_empty() {
            handler.view().set_activities(&cli.activities);
        }

        match block_on(handler.submit()) {
            Ok(SubmitPhase::Failed) => ExitCode::FAILURE,
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("Could not save preferences: {}", err);
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::run()
}
