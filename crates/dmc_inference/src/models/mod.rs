use std::sync::Arc;

use dmc_core::{InferenceModel, Result};

use crate::Config;

pub mod heuristic;
pub mod openai;

pub use heuristic::HeuristicModel;
pub use openai::OpenAiModel;

/// Selects the inference model: LLM-backed when an API key is configured,
/// heuristic fallback otherwise.
pub fn create_model(config: &Config) -> Result<Arc<dyn InferenceModel>> {
    match &config.api_key {
        Some(key) if !key.is_empty() => {
            let model = OpenAiModel::new(key.clone(), config.model_name.clone())?;
            Ok(Arc::new(model))
        }
        _ => {
            tracing::info!("no API key configured, using heuristic inference");
            Ok(Arc::new(HeuristicModel::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_selection_by_api_key() {
        let with_key = Config {
            api_key: Some("test-key".to_string()),
            model_name: None,
        };
        assert_eq!(create_model(&with_key).unwrap().name(), "gpt-4o");

        let without_key = Config::default();
        assert_eq!(create_model(&without_key).unwrap().name(), "heuristic");

        let empty_key = Config {
            api_key: Some(String::new()),
            model_name: None,
        };
        assert_eq!(create_model(&empty_key).unwrap().name(), "heuristic");
    }
}
