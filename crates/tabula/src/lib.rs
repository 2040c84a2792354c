//! Tabula: LLM-driven extraction of validated tables from unstructured text.
//!
//! Tabula turns free text into a rectangular table, validates the table
//! structurally and factually against the source, and cross-checks it by
//! generating verification questions that are answered independently from
//! the table and from the text.
//!
//! # Core Principles
//!
//! - **Non-blocking validation**: checks annotate, they never mutate the
//!   table or halt the pipeline
//! - **Degenerate over fatal**: an oracle response the pipeline cannot
//!   parse degrades to a documented placeholder, not an error
//! - **Explicit dependencies**: the oracle is injected by the caller,
//!   there is no process-wide provider state
//!
//! # Example
//!
//! ```no_run
//! use tabula::{OllamaOracle, Passage, Tabula};
//!
//! let tabula = Tabula::new(OllamaOracle::new().unwrap());
//! let passage = Passage::new("Week 1 swelling fell 20%; by Week 4 it fell 35%.");
//!
//! let (result, qa) = tabula.extract_and_verify(&passage).unwrap();
//!
//! println!("{}", result.merged.to_markdown());
//! println!("QA agreement: {}/{}", qa.matched(), qa.total());
//! ```

pub mod document;
pub mod error;
pub mod oracle;
pub mod pipeline;
pub mod table;

mod tabula;

pub use crate::tabula::{ExtractionResult, Tabula, TabulaConfig};
pub use document::{Loader, Passage, SourceMetadata};
pub use error::{Result, TabulaError};
pub use oracle::{AnthropicOracle, MockOracle, OllamaOracle, OracleConfig, TextOracle};
pub use pipeline::{
    Diagnostic, DiagnosticKind, FillConfig, HeaderSet, QaConfig, QaItem, QaPair, QaReport,
    QaVerdict, Segment, ValidationReport,
};
pub use table::{MERGED_NA, NA, Table};
