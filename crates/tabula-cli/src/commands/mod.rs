//! Command implementations.

pub mod extract;
pub mod qa;

use tabula::{AnthropicOracle, OllamaOracle, OracleConfig, TextOracle};

use crate::cli::OracleChoice;

/// Build the chosen oracle provider, applying an optional model override.
pub(crate) fn build_oracle(
    choice: OracleChoice,
    model: Option<String>,
) -> Result<Box<dyn TextOracle>, Box<dyn std::error::Error>> {
    match choice {
        OracleChoice::Anthropic => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| "ANTHROPIC_API_KEY environment variable not set")?;
            let mut config = OracleConfig::default();
            if let Some(model) = model {
                config.model = model;
            }
            Ok(Box::new(AnthropicOracle::with_config(api_key, config)?))
        }
        OracleChoice::Ollama => {
            let oracle = match model {
                Some(model) => OllamaOracle::with_model(model)?,
                None => OllamaOracle::new()?,
            };
            Ok(Box::new(oracle))
        }
    }
}
