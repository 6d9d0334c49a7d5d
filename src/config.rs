//! API configuration
//!
//! Request parameters are fixed; the key comes from the host (a page global
//! on the web, a flag or environment variable on native).

/// Chat-completion endpoint used by default
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Model identifier sent with every request
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Upper bound on generated tokens
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 500;

/// Name of the page global / environment variable holding the key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Where and how to ask for a routine
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub max_completion_tokens: u32,
    /// Bearer token; `None` makes every request fail before it is sent
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// Default parameters with the given key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Key with blank values treated as missing
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Read the key from the `OPENAI_API_KEY` page global (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Self {
        let api_key = web_sys::window().and_then(|w| {
            js_sys::Reflect::get(&w, &wasm_bindgen::JsValue::from_str(API_KEY_VAR))
                .ok()
                .and_then(|v| v.as_string())
        });

        if api_key.is_none() {
            log::warn!("{} is not set on the page, requests will fail", API_KEY_VAR);
        }

        Self {
            api_key,
            ..Self::default()
        }
    }
}
