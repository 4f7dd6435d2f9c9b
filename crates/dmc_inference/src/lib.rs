pub mod models;
pub mod roster;

pub use models::create_model;
pub use roster::Roster;

/// Inference configuration. When `api_key` is absent the heuristic model is
/// used instead of the LLM-backed one.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
}

impl Config {
    /// Reads `OPENAI_API_KEY` from the environment; empty values count as
    /// unset.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        Self {
            api_key,
            model_name: None,
        }
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::Config;
    pub use dmc_core::{Error, InferenceModel, Result};
}
