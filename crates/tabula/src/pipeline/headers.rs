//! Header inference with row/column role disambiguation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::oracle::{TextOracle, prompts};

use super::segment::{Segment, joined_text};

/// Inferred row and column headers for a table.
///
/// Headers within each sequence are unique (case-normalized) and the two
/// sequences are role-disjoint: a header claimed as a row label cannot
/// also appear as a column label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSet {
    /// Metric / measured-quantity names.
    pub row_headers: Vec<String>,
    /// Time periods or group/cohort labels.
    pub column_headers: Vec<String>,
}

impl HeaderSet {
    /// Build a header set, de-duplicating each sequence (first occurrence
    /// wins) and enforcing role disjointness (the row role, parsed first,
    /// keeps a header claimed by both).
    pub fn new(row_headers: Vec<String>, column_headers: Vec<String>) -> Self {
        let row_headers = dedupe(row_headers);
        let row_keys: HashSet<String> =
            row_headers.iter().map(|h| h.to_lowercase()).collect();

        let column_headers = dedupe(column_headers)
            .into_iter()
            .filter(|header| {
                let clashes = row_keys.contains(&header.to_lowercase());
                if clashes {
                    warn!(header = %header, "header claimed as both row and column, keeping row role");
                }
                !clashes
            })
            .collect();

        Self {
            row_headers,
            column_headers,
        }
    }

    /// A header set with no headers at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether both sequences are empty.
    pub fn is_empty(&self) -> bool {
        self.row_headers.is_empty() && self.column_headers.is_empty()
    }

    /// Swap row and column headers wholesale.
    pub fn swap_roles(&mut self) {
        std::mem::swap(&mut self.row_headers, &mut self.column_headers);
    }
}

/// Drop empty entries and case-insensitive duplicates, preserving first
/// occurrence order.
fn dedupe(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .filter(|h| seen.insert(h.to_lowercase()))
        .collect()
}

/// Derives row and column headers from segments.
#[derive(Debug, Clone, Default)]
pub struct HeaderInferrer;

impl HeaderInferrer {
    /// Create a new header inferrer.
    pub fn new() -> Self {
        Self
    }

    /// Infer a header set from the segments.
    ///
    /// The oracle proposes headers, then is asked a second, independent
    /// question about whether it reversed the two roles; a "reversed"
    /// verdict swaps the sequences wholesale. The swap is a
    /// self-consistency heuristic, best-effort rather than authoritative.
    pub fn infer(&self, oracle: &dyn TextOracle, segments: &[Segment]) -> Result<HeaderSet> {
        if segments.is_empty() {
            return Ok(HeaderSet::empty());
        }

        let text = joined_text(segments);
        let response = oracle.generate(&prompts::header_extraction(&text))?;

        let (rows, columns) = parse_header_lines(&response);
        if rows.is_empty() && columns.is_empty() {
            warn!("no headers parsed from oracle response, continuing with an empty set");
        }

        let mut headers = HeaderSet::new(rows, columns);
        if headers.is_empty() {
            return Ok(headers);
        }

        let confirmation = oracle.generate(&prompts::header_confirmation(
            &headers.row_headers,
            &headers.column_headers,
        ))?;
        if confirmation.to_lowercase().contains("reversed") {
            debug!("oracle judged header roles reversed, swapping");
            headers.swap_roles();
        }

        Ok(headers)
    }
}

/// Attribute each response line to a role by substring match and split
/// the part after the colon on commas. Lines matching neither role are
/// ignored, so an unparseable response yields two empty sequences.
fn parse_header_lines(response: &str) -> (Vec<String>, Vec<String>) {
    let mut rows = Vec::new();
    let mut columns = Vec::new();

    for line in response.lines() {
        let lower = line.to_lowercase();
        let Some((_, tail)) = line.split_once(':') else {
            continue;
        };

        let values: Vec<String> = tail
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if lower.contains("row header") {
            rows = values;
        } else if lower.contains("column header") {
            columns = values;
        }
    }

    (rows, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockOracle;

    fn segments() -> Vec<Segment> {
        vec![Segment::new(
            "Revenue was $1.2M in Q1 and $1.5M in Q2. Costs held at $0.8M.",
        )]
    }

    #[test]
    fn test_parse_header_lines() {
        let response = "Row Headers: Revenue, Costs\nColumn Headers: Q1, Q2";
        let (rows, columns) = parse_header_lines(response);
        assert_eq!(rows, vec!["Revenue", "Costs"]);
        assert_eq!(columns, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_parse_unlabelled_response_is_empty() {
        let (rows, columns) = parse_header_lines("I could not find any structure here.");
        assert!(rows.is_empty());
        assert!(columns.is_empty());
    }

    #[test]
    fn test_infer_headers() {
        let oracle = MockOracle::new()
            .respond(
                "extract potential row and column headers",
                "Row Headers: Revenue, Costs\nColumn Headers: Q1, Q2",
            )
            .respond("reversed", "correct");

        let headers = HeaderInferrer::new().infer(&oracle, &segments()).unwrap();
        assert_eq!(headers.row_headers, vec!["Revenue", "Costs"]);
        assert_eq!(headers.column_headers, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_reversal_swaps_wholesale() {
        let oracle = MockOracle::new()
            .respond(
                "extract potential row and column headers",
                "Row Headers: Q1, Q2\nColumn Headers: Revenue",
            )
            .respond("reversed", "These are reversed.");

        let headers = HeaderInferrer::new().infer(&oracle, &segments()).unwrap();
        assert_eq!(headers.row_headers, vec!["Revenue"]);
        assert_eq!(headers.column_headers, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_empty_segments_skip_oracle() {
        let oracle = MockOracle::new();
        let headers = HeaderInferrer::new().infer(&oracle, &[]).unwrap();
        assert!(headers.is_empty());
        assert_eq!(oracle.call_count(), 0);
    }

    #[test]
    fn test_unparseable_response_is_recoverable() {
        let oracle = MockOracle::new().with_default("nothing useful");
        let headers = HeaderInferrer::new().infer(&oracle, &segments()).unwrap();
        assert!(headers.is_empty());
        // No confirmation question for an empty set.
        assert_eq!(oracle.call_count(), 1);
    }

    #[test]
    fn test_dedupe_preserves_first_occurrence() {
        let set = HeaderSet::new(
            vec!["Revenue".into(), "revenue".into(), "Costs".into()],
            vec!["Q1".into(), "".into(), "Q1".into()],
        );
        assert_eq!(set.row_headers, vec!["Revenue", "Costs"]);
        assert_eq!(set.column_headers, vec!["Q1"]);
    }

    #[test]
    fn test_roles_are_disjoint() {
        let set = HeaderSet::new(
            vec!["Revenue".into()],
            vec!["revenue".into(), "Q1".into()],
        );
        assert_eq!(set.row_headers, vec!["Revenue"]);
        assert_eq!(set.column_headers, vec!["Q1"]);
    }
}
