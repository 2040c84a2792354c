//! Deterministic union of partial tables.

use std::collections::HashMap;

use tracing::debug;

use crate::table::{MERGED_NA, Table, is_na};

use super::validate::{Diagnostic, DiagnosticKind};

/// The merged table plus any conflicts discovered along the way.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The unified table.
    pub table: Table,
    /// One diagnostic per conflicting (row, column) overwrite.
    pub diagnostics: Vec<Diagnostic>,
}

/// Unions one or more partial tables into a single coherent table.
///
/// Merging is a pure function of its inputs: no oracle calls, and
/// re-running it on the same inputs yields an identical result.
#[derive(Debug, Clone, Default)]
pub struct TableMerger;

impl TableMerger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Merge `inputs` (N >= 1; empty input yields an empty table).
    ///
    /// Column identity is the exact header string, ordered by first
    /// appearance across inputs. Row identity is the case- and
    /// whitespace-normalized header, spelled as first seen. Columns a
    /// given input row lacks are filled with [`MERGED_NA`], and NA-like
    /// cell values are canonicalized to [`MERGED_NA`].
    ///
    /// Conflict rule: a concrete value always beats a placeholder; when
    /// two concrete values disagree, the later input wins and the
    /// overwrite is reported as a merge diagnostic.
    pub fn merge(&self, inputs: &[Table]) -> MergeOutcome {
        let mut columns: Vec<String> = Vec::new();
        for table in inputs {
            for column in table.columns() {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        // First-seen spelling per normalized row key.
        let mut row_names: Vec<String> = Vec::new();
        let mut canonical_rows: HashMap<String, String> = HashMap::new();
        for table in inputs {
            for row in table.row_headers() {
                let key = normalize_header(row);
                if !canonical_rows.contains_key(&key) {
                    canonical_rows.insert(key, row.to_string());
                    row_names.push(row.to_string());
                }
            }
        }

        let mut merged = Table::filled(&row_names, &columns, MERGED_NA);
        let mut diagnostics = Vec::new();

        for table in inputs {
            for (row, cells) in table.iter_rows() {
                let target_row = &canonical_rows[&normalize_header(row)];
                for (column, value) in cells {
                    if is_na(value) {
                        // Placeholders never overwrite; gaps are already
                        // filled with the canonical spelling.
                        continue;
                    }
                    let incoming = value.trim();
                    if let Some(current) = merged.get(target_row, column) {
                        if !is_na(current) && current != incoming {
                            diagnostics.push(Diagnostic::new(
                                DiagnosticKind::Merge,
                                format!(
                                    "conflicting values for ({}, {}): '{}' replaced by '{}'",
                                    target_row, column, current, incoming
                                ),
                            ));
                        }
                    }
                    merged.set(target_row, column, incoming);
                }
            }
        }

        debug!(
            inputs = inputs.len(),
            rows = merged.row_count(),
            columns = merged.column_count(),
            conflicts = diagnostics.len(),
            "tables merged"
        );
        MergeOutcome {
            table: merged,
            diagnostics,
        }
    }
}

/// Collapse interior whitespace and case so row headers match across tables.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
