//! Oracle providers: the text-generation capability behind the pipeline.
//!
//! Every stage that needs generation receives a `&dyn TextOracle`; the
//! orchestrator owns the provider and injects it everywhere, so the
//! choice of backend is a caller decision with no process-wide state.
//!
//! # Supported providers
//!
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Ollama** - Local models, no API key needed (requires Ollama installed)
//! - **Mock** - Scripted replies for tests and offline runs
//!
//! # Example
//!
//! ```no_run
//! use tabula::{OllamaOracle, Tabula};
//!
//! // Use a free local model
//! let tabula = Tabula::new(OllamaOracle::new().unwrap());
//!
//! // Or use the Anthropic API
//! // let tabula = Tabula::new(AnthropicOracle::from_env().unwrap());
//! ```

mod anthropic;
mod mock;
mod ollama;
pub mod prompts;
mod provider;

pub use anthropic::AnthropicOracle;
pub use mock::MockOracle;
pub use ollama::OllamaOracle;
pub use provider::{OracleConfig, TextOracle};
