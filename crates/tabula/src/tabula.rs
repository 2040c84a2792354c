//! Main Tabula orchestrator and public API.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{Loader, Passage, SourceMetadata};
use crate::error::Result;
use crate::oracle::TextOracle;
use crate::pipeline::{
    FactualVerifier, FillConfig, HeaderInferrer, HeaderSet, QaConfig, QaGenerator, QaPair,
    QaReport, QaVerifier, Segment, Segmenter, StructuralValidator, TableFiller, TableMerger,
    ValidationReport,
};
use crate::table::Table;

/// Configuration for a Tabula pipeline.
#[derive(Debug, Clone, Default)]
pub struct TabulaConfig {
    /// Cell-extraction fan-out configuration.
    pub fill: FillConfig,
    /// Question generation and verification configuration.
    pub qa: QaConfig,
}

/// Everything the pipeline produced for one passage.
///
/// Fields are only ever populated as stages complete, never cleared; a
/// passage the table-need gate rejects yields a result whose collections
/// are all empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Provenance of the source document, when loaded from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// The segments the passage was divided into.
    pub segments: Vec<Segment>,
    /// The inferred headers.
    pub headers: HeaderSet,
    /// The populated table, before merging.
    pub table: Table,
    /// The merged table handed to consumers.
    pub merged: Table,
    /// Advisory findings from validation and merging.
    pub report: ValidationReport,
    /// Question/answer pairs about the merged table, for human review.
    pub qa_pairs: Vec<QaPair>,
}

impl ExtractionResult {
    fn empty() -> Self {
        Self {
            source: None,
            segments: Vec::new(),
            headers: HeaderSet::empty(),
            table: Table::new(),
            merged: Table::new(),
            report: ValidationReport::new(),
            qa_pairs: Vec::new(),
        }
    }
}

/// The pipeline orchestrator.
///
/// Threads a passage through the stages in fixed order, collecting each
/// stage's typed output and every advisory diagnostic along the way.
/// The oracle is an explicit dependency owned by the caller: construct a
/// provider once and inject it here.
pub struct Tabula {
    config: TabulaConfig,
    loader: Loader,
    segmenter: Segmenter,
    inferrer: HeaderInferrer,
    filler: TableFiller,
    structural: StructuralValidator,
    factual: FactualVerifier,
    merger: TableMerger,
    generator: QaGenerator,
    verifier: QaVerifier,
    oracle: Arc<dyn TextOracle>,
}

impl Tabula {
    /// Create a pipeline with default configuration.
    pub fn new(oracle: impl TextOracle + 'static) -> Self {
        Self::with_config(oracle, TabulaConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(oracle: impl TextOracle + 'static, config: TabulaConfig) -> Self {
        Self {
            loader: Loader::new(),
            segmenter: Segmenter::new(),
            inferrer: HeaderInferrer::new(),
            filler: TableFiller::with_config(config.fill.clone()),
            structural: StructuralValidator::new(),
            factual: FactualVerifier::new(),
            merger: TableMerger::new(),
            generator: QaGenerator::with_config(config.qa.clone()),
            verifier: QaVerifier::with_config(config.qa.clone()),
            config,
            oracle: Arc::new(oracle),
        }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &TabulaConfig {
        &self.config
    }

    /// Load a document and run the extraction pipeline on it.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<ExtractionResult> {
        let (passage, metadata) = self.loader.load_file(path)?;
        let mut result = self.extract(&passage)?;
        result.source = Some(metadata);
        Ok(result)
    }

    /// Run the extraction pipeline on a passage.
    ///
    /// Fatal failures (oracle unreachable, document problems) abort the
    /// run; degenerate oracle responses degrade to their documented
    /// defaults and advisory findings accumulate in the report. If the
    /// run completes, the artifacts are returned even when every cell is
    /// a placeholder.
    pub fn extract(&self, passage: &Passage) -> Result<ExtractionResult> {
        let oracle = self.oracle.as_ref();

        let segments = self.segmenter.segment(oracle, passage)?;
        if segments.is_empty() {
            info!("nothing to extract from passage");
            return Ok(ExtractionResult::empty());
        }

        let headers = self.inferrer.infer(oracle, &segments)?;
        debug!(
            rows = headers.row_headers.len(),
            columns = headers.column_headers.len(),
            "headers inferred"
        );

        let table = self.filler.fill(oracle, &headers, &segments)?;

        let mut report = ValidationReport::new();
        report.extend(self.structural.check(oracle, &table)?);
        report.extend(self.factual.check(oracle, &table, passage)?);

        let merge = self.merger.merge(std::slice::from_ref(&table));
        report.extend(merge.diagnostics);

        let qa_pairs = self.generator.generate(oracle, &merge.table)?;

        info!(
            rows = merge.table.row_count(),
            columns = merge.table.column_count(),
            diagnostics = report.len(),
            "extraction complete"
        );

        Ok(ExtractionResult {
            source: None,
            segments,
            headers,
            table,
            merged: merge.table,
            report,
            qa_pairs,
        })
    }

    /// Cross-check a table against its source passage with generated
    /// verification questions. Independent of [`Self::extract`]; usually
    /// run against the merged table it produced.
    pub fn verify(&self, passage: &Passage, table: &Table) -> Result<QaReport> {
        self.verifier.verify(self.oracle.as_ref(), passage, table)
    }

    /// Run extraction and verification in one call.
    pub fn extract_and_verify(&self, passage: &Passage) -> Result<(ExtractionResult, QaReport)> {
        let result = self.extract(passage)?;
        let report = self.verify(passage, &result.merged)?;
        Ok((result, report))
    }
}
