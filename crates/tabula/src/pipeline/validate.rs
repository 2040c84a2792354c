//! Advisory structural and factual checks.
//!
//! Both validators are oracle-backed judgments over a textual rendering
//! of the table. Findings only annotate: they are appended to a report
//! and never mutate the table or halt the pipeline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Passage;
use crate::error::Result;
use crate::oracle::{TextOracle, prompts};
use crate::table::Table;

/// Which check produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Grid shape and header/value alignment findings.
    Structure,
    /// Citation and verifiability findings.
    Factual,
    /// Conflicting cell values discovered while merging.
    Merge,
}

impl DiagnosticKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::Structure => "Structure",
            DiagnosticKind::Factual => "Factual",
            DiagnosticKind::Merge => "Merge",
        }
    }
}

/// A single advisory finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Which check produced this finding.
    pub kind: DiagnosticKind,
    /// The finding itself.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// An ordered, purely additive collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    entries: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic.
    pub fn append(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Append a batch of diagnostics, preserving their order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.entries.extend(diagnostics);
    }

    /// The accumulated diagnostics, in the order they were appended.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Whether any diagnostics were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Checks grid rectangularity and header/value alignment.
#[derive(Debug, Clone, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    /// Create a new structural validator.
    pub fn new() -> Self {
        Self
    }

    /// Run the local (value placement) and global (shape) judgments.
    /// An empty table has nothing to check and produces no findings.
    pub fn check(&self, oracle: &dyn TextOracle, table: &Table) -> Result<Vec<Diagnostic>> {
        if table.is_empty() {
            return Ok(Vec::new());
        }

        let markdown = table.to_markdown();
        let local = oracle.generate(&prompts::structure_local(&markdown))?;
        let global = oracle.generate(&prompts::structure_global(&markdown))?;

        debug!("structural checks complete");
        Ok(vec![
            Diagnostic::new(DiagnosticKind::Structure, local.trim()),
            Diagnostic::new(DiagnosticKind::Structure, global.trim()),
        ])
    }
}

/// Attributes each cell value to a location in the source text.
#[derive(Debug, Clone, Default)]
pub struct FactualVerifier;

impl FactualVerifier {
    /// Create a new factual verifier.
    pub fn new() -> Self {
        Self
    }

    /// Ask for per-value citations against the source passage; values the
    /// oracle cannot attribute are flagged as unverifiable in the finding.
    pub fn check(
        &self,
        oracle: &dyn TextOracle,
        table: &Table,
        passage: &Passage,
    ) -> Result<Vec<Diagnostic>> {
        if table.is_empty() {
            return Ok(Vec::new());
        }

        let citations =
            oracle.generate(&prompts::factual_check(passage.text(), &table.to_markdown()))?;

        debug!("factual check complete");
        Ok(vec![Diagnostic::new(DiagnosticKind::Factual, citations.trim())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockOracle;

    fn sample_table() -> Table {
        let mut table = Table::with_headers(
            &["Revenue".to_string()],
            &["Q1".to_string(), "Q2".to_string()],
        );
        table.set("Revenue", "Q1", "$1.2M");
        table
    }

    #[test]
    fn test_structural_check_appends_two_findings() {
        let oracle = MockOracle::new()
            .respond("respective column categories", "All values look placed correctly.")
            .respond("table structure is correct", "Rows and columns are consistent.");

        let table = sample_table();
        let diagnostics = StructuralValidator::new().check(&oracle, &table).unwrap();

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::Structure));
    }

    #[test]
    fn test_checks_never_mutate_the_table() {
        let oracle = MockOracle::new().with_default("fine");
        let table = sample_table();
        let before = table.clone();

        StructuralValidator::new().check(&oracle, &table).unwrap();
        FactualVerifier::new()
            .check(&oracle, &table, &Passage::new("Revenue was $1.2M in Q1."))
            .unwrap();

        assert_eq!(table, before);
    }

    #[test]
    fn test_factual_check_produces_citation_finding() {
        let oracle = MockOracle::new()
            .respond("factual accuracy", "$1.2M: sentence 1. $1.5M: [NA].");

        let table = sample_table();
        let diagnostics = FactualVerifier::new()
            .check(&oracle, &table, &Passage::new("Revenue was $1.2M in Q1."))
            .unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Factual);
        assert!(diagnostics[0].message.contains("[NA]"));
    }

    #[test]
    fn test_empty_table_skips_oracle() {
        let oracle = MockOracle::new();
        let diagnostics = StructuralValidator::new()
            .check(&oracle, &Table::new())
            .unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(oracle.call_count(), 0);
    }

    #[test]
    fn test_report_is_additive() {
        let mut report = ValidationReport::new();
        report.append(Diagnostic::new(DiagnosticKind::Structure, "first"));
        report.extend(vec![Diagnostic::new(DiagnosticKind::Factual, "second")]);

        assert_eq!(report.len(), 2);
        assert_eq!(report.entries()[0].message, "first");
        assert_eq!(report.entries()[1].message, "second");
    }
}
