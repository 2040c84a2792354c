//! Scripted oracle for tests and offline runs.

use std::sync::Mutex;

use crate::error::{Result, TabulaError};

use super::provider::{OracleConfig, TextOracle};

/// A scripted reply for a matching prompt.
enum Reply {
    Text(String),
    Fail(String),
}

/// Oracle that replies from a script instead of a model.
///
/// Rules are checked in insertion order; the first rule whose needle is a
/// substring of the prompt wins. Prompts that match no rule receive the
/// default reply. Every prompt is recorded so tests can assert on call
/// counts and ordering.
pub struct MockOracle {
    config: OracleConfig,
    rules: Vec<(String, Reply)>,
    default_reply: String,
    calls: Mutex<Vec<String>>,
}

impl MockOracle {
    /// Create a mock oracle whose default reply is empty.
    pub fn new() -> Self {
        Self {
            config: OracleConfig {
                model: "scripted".to_string(),
                ..OracleConfig::default()
            },
            rules: Vec::new(),
            default_reply: String::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the reply for prompts that match no rule.
    pub fn with_default(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Reply with `reply` whenever the prompt contains `needle`.
    pub fn respond(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules
            .push((needle.into(), Reply::Text(reply.into())));
        self
    }

    /// Fail with an oracle error whenever the prompt contains `needle`.
    pub fn fail_on(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules
            .push((needle.into(), Reply::Fail(message.into())));
        self
    }

    /// The prompts received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock_calls().clone()
    }

    /// How many prompts have been received.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl TextOracle for MockOracle {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.lock_calls().push(prompt.to_string());

        for (needle, reply) in &self.rules {
            if prompt.contains(needle.as_str()) {
                return match reply {
                    Reply::Text(text) => Ok(text.clone()),
                    Reply::Fail(message) => Err(TabulaError::Oracle(message.clone())),
                };
            }
        }
        Ok(self.default_reply.clone())
    }

    fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_match_in_order() {
        let oracle = MockOracle::new()
            .respond("table", "first")
            .respond("table structure", "second");

        assert_eq!(oracle.generate("check the table structure").unwrap(), "first");
    }

    #[test]
    fn test_default_reply() {
        let oracle = MockOracle::new().with_default("fallback");
        assert_eq!(oracle.generate("anything").unwrap(), "fallback");
    }

    #[test]
    fn test_failure_rule() {
        let oracle = MockOracle::new().fail_on("boom", "backend down");
        let err = oracle.generate("boom please").unwrap_err();
        assert!(matches!(err, TabulaError::Oracle(_)));
    }

    #[test]
    fn test_call_log() {
        let oracle = MockOracle::new();
        oracle.generate("one").unwrap();
        oracle.generate("two").unwrap();

        assert_eq!(oracle.call_count(), 2);
        assert_eq!(oracle.calls(), vec!["one".to_string(), "two".to_string()]);
    }
}
