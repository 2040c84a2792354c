//! Per-cell table population over a bounded request pool.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{Result, TabulaError};
use crate::oracle::{TextOracle, prompts};
use crate::table::{NA, Table};

use super::headers::HeaderSet;
use super::segment::{Segment, joined_text};

/// Configuration for the cell-extraction fan-out.
#[derive(Debug, Clone)]
pub struct FillConfig {
    /// Number of oracle requests in flight at once.
    pub concurrency: usize,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Populates a row-by-column grid of cell values from segments.
///
/// Each (row, column) pair gets its own extraction request scoped to the
/// full segment text. The requests share no mutable state, so they are
/// dispatched concurrently on a fixed-size pool; results are written back
/// by (row, column) index, never by completion order, and each slot is
/// written exactly once.
#[derive(Debug, Clone, Default)]
pub struct TableFiller {
    config: FillConfig,
}

impl TableFiller {
    /// Create a filler with default configuration.
    pub fn new() -> Self {
        Self::with_config(FillConfig::default())
    }

    /// Create a filler with custom configuration.
    pub fn with_config(config: FillConfig) -> Self {
        Self { config }
    }

    /// Fill a table whose row set equals `headers.row_headers` and whose
    /// column set equals `headers.column_headers` exactly.
    ///
    /// Empty or unparseable responses, and individual request failures,
    /// coerce to the [`NA`] placeholder. If every request of a non-empty
    /// grid fails the oracle is considered unreachable and the error is
    /// fatal.
    pub fn fill(
        &self,
        oracle: &dyn TextOracle,
        headers: &HeaderSet,
        segments: &[Segment],
    ) -> Result<Table> {
        let mut table = Table::with_headers(&headers.row_headers, &headers.column_headers);
        if table.is_empty() || segments.is_empty() {
            return Ok(table);
        }

        let text = joined_text(segments);
        let pairs: Vec<(&str, &str)> = headers
            .row_headers
            .iter()
            .flat_map(|row| {
                headers
                    .column_headers
                    .iter()
                    .map(move |column| (row.as_str(), column.as_str()))
            })
            .collect();

        debug!(
            cells = pairs.len(),
            concurrency = self.config.concurrency,
            "dispatching cell extraction"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency.max(1))
            .build()
            .map_err(|e| TabulaError::Config(format!("Failed to build worker pool: {}", e)))?;

        let results: Vec<Result<String>> = pool.install(|| {
            pairs
                .par_iter()
                .map(|(row, column)| oracle.generate(&prompts::cell_extraction(row, column, &text)))
                .collect()
        });

        let mut failures = 0;
        for ((row, column), result) in pairs.iter().zip(results) {
            let value = match result {
                Ok(response) => clean_cell(&response),
                Err(e) => {
                    failures += 1;
                    warn!(row = %row, column = %column, error = %e, "cell extraction failed");
                    NA.to_string()
                }
            };
            table.set(row, column, value);
        }

        if failures == pairs.len() {
            return Err(TabulaError::Oracle(format!(
                "all {} cell extractions failed",
                failures
            )));
        }

        Ok(table)
    }
}

/// Accept the oracle's value verbatim, except that blank responses
/// coerce to the placeholder.
fn clean_cell(response: &str) -> String {
    let value = response.trim();
    if value.is_empty() {
        NA.to_string()
    } else {
        value.to_string()
    }
}
