//! Row-by-column table representation.
//!
//! A [`Table`] maps row headers to column/value maps. Insertion order of
//! both rows and columns is preserved, and the grid is rectangular at all
//! times: every row carries an entry for every column, with a missing
//! extracted value represented by the [`NA`] placeholder rather than an
//! absent key.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder written when the oracle cannot find a value in the text.
pub const NA: &str = "NA";

/// Placeholder written when merging fills a column absent from an input row.
pub const MERGED_NA: &str = "N/A";

/// Whether a cell value is any spelling of the missing-value placeholder.
pub fn is_na(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "" | "na" | "n/a")
}

/// A rectangular grid of cell values keyed by row and column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: IndexMap<String, IndexMap<String, String>>,
}

impl Table {
    /// Create an empty table with no rows or columns.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: IndexMap::new(),
        }
    }

    /// Create a table with the given headers, every cell set to [`NA`].
    pub fn with_headers(row_headers: &[String], column_headers: &[String]) -> Self {
        Self::filled(row_headers, column_headers, NA)
    }

    /// Create a table with the given headers, every cell set to `fill`.
    ///
    /// Duplicate headers are skipped so the grid stays rectangular.
    pub fn filled(row_headers: &[String], column_headers: &[String], fill: &str) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(column_headers.len());
        for column in column_headers {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }

        let mut rows = IndexMap::with_capacity(row_headers.len());
        for row in row_headers {
            rows.entry(row.clone()).or_insert_with(|| {
                columns
                    .iter()
                    .map(|c| (c.clone(), fill.to_string()))
                    .collect()
            });
        }

        Self { columns, rows }
    }

    /// The column headers, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The row headers, in order.
    pub fn row_headers(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Get a cell value.
    pub fn get(&self, row: &str, column: &str) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Set a cell value. Ignored if the row or column does not exist;
    /// cells are created up front by the constructors so that every
    /// write targets an existing slot.
    pub fn set(&mut self, row: &str, column: &str, value: impl Into<String>) {
        if !self.columns.iter().any(|c| c == column) {
            return;
        }
        if let Some(cells) = self.rows.get_mut(row) {
            cells.insert(column.to_string(), value.into());
        }
    }

    /// Iterate over rows as (row header, column/value map) pairs.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&String, &IndexMap<String, String>)> {
        self.rows.iter()
    }

    /// Every row carries exactly the table's column set.
    pub fn is_rectangular(&self) -> bool {
        self.rows.values().all(|cells| {
            cells.len() == self.columns.len()
                && self.columns.iter().all(|c| cells.contains_key(c))
        })
    }

    /// Render the table as a markdown grid with row headers in the first
    /// column, the shape the oracle prompts and the CLI display expect.
    pub fn to_markdown(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        out.push_str("| |");
        for column in &self.columns {
            out.push_str(&format!(" {} |", column));
        }
        out.push('\n');

        out.push_str("|---|");
        for _ in &self.columns {
            out.push_str("---|");
        }
        out.push('\n');

        for (row, cells) in &self.rows {
            out.push_str(&format!("| {} |", row));
            for column in &self.columns {
                let value = cells.get(column).map(String::as_str).unwrap_or(NA);
                out.push_str(&format!(" {} |", value));
            }
            out.push('\n');
        }

        out
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
