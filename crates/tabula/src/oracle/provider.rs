//! Text oracle trait and configuration.

use crate::error::Result;

/// Configuration shared by oracle providers.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in a response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0). Extraction wants
    /// deterministic output, so the default is 0.
    pub temperature: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
        }
    }
}

/// A stateless text-generation capability: prompt in, text out.
///
/// Implementations must be thread-safe (`Send + Sync`) because the
/// cell-extraction and answer stages fan requests out across a worker
/// pool. Providers may fail (unreachable backend, rejected request) or
/// return text that does not match the shape a call site expects; every
/// call site defines its own degenerate fallback for the latter case.
pub trait TextOracle: Send + Sync {
    /// Complete a free-text prompt.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the configuration for this oracle.
    fn config(&self) -> &OracleConfig;

    /// Get the name of this oracle (for logging/debugging).
    fn name(&self) -> &str;
}

/// Forwarding impl so callers can pick a provider at runtime and still
/// hand the pipeline a concrete `impl TextOracle`.
impl TextOracle for Box<dyn TextOracle> {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }

    fn config(&self) -> &OracleConfig {
        (**self).config()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
