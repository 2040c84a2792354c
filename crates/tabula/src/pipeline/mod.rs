//! The extraction-validation-merge pipeline stages.
//!
//! Stages run in a fixed order, each consuming the typed output of the
//! previous one: segmentation, header inference, cell population,
//! structural and factual validation, merging, question generation. The
//! QA verification path is separate, consuming the same source passage
//! plus the produced table.

mod fill;
mod headers;
mod merge;
mod qa;
mod segment;
mod validate;

pub use fill::{FillConfig, TableFiller};
pub use headers::{HeaderInferrer, HeaderSet};
pub use merge::{MergeOutcome, TableMerger, normalize_header};
pub use qa::{
    QaConfig, QaGenerator, QaItem, QaPair, QaReport, QaVerdict, QaVerifier, UNANSWERED,
    normalize_answer,
};
pub use segment::{Segment, Segmenter, joined_text};
pub use validate::{
    Diagnostic, DiagnosticKind, FactualVerifier, StructuralValidator, ValidationReport,
};
