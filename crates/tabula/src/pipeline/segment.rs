//! Passage segmentation and the table-need gate.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::Passage;
use crate::error::Result;
use crate::oracle::{TextOracle, prompts};

/// A topically coherent slice of a passage.
///
/// Segment order matters for downstream prompts, not for the correctness
/// of extracted facts; duplication of a fact across segments is harmless
/// because extraction is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    text: String,
}

impl Segment {
    /// Create a segment from raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw text of the segment.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Concatenate segments into the single text the extraction prompts use.
pub fn joined_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits raw text into fact-coherent segments.
#[derive(Debug, Clone, Default)]
pub struct Segmenter;

impl Segmenter {
    /// Create a new segmenter.
    pub fn new() -> Self {
        Self
    }

    /// Decide whether the passage warrants a table at all.
    ///
    /// Anything other than an affirmative answer, including a malformed
    /// one, counts as negative: the pipeline then produces empty
    /// artifacts rather than an error.
    pub fn table_needed(&self, oracle: &dyn TextOracle, passage: &Passage) -> Result<bool> {
        let response = oracle.generate(&prompts::table_needed(passage.text()))?;
        let answer = response.trim().to_lowercase();

        let needed = answer.contains("yes");
        if !needed && !answer.contains("no") {
            warn!(response = %response, "unrecognized table-need answer, treating as negative");
        }
        Ok(needed)
    }

    /// Split the passage into segments.
    ///
    /// Returns an empty sequence when the table-need gate answers
    /// negative; downstream stages treat that as "nothing to extract".
    pub fn segment(&self, oracle: &dyn TextOracle, passage: &Passage) -> Result<Vec<Segment>> {
        if !self.table_needed(oracle, passage)? {
            debug!("table not needed, skipping segmentation");
            return Ok(Vec::new());
        }

        let response = oracle.generate(&prompts::segmentation(passage.text()))?;
        let mut segments: Vec<Segment> = response
            .split(prompts::SEGMENT_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Segment::new)
            .collect();

        if segments.is_empty() {
            // No fact may be dropped, so an unusable segmentation
            // response degrades to the whole passage as one segment.
            warn!("empty segmentation response, falling back to a single segment");
            segments.push(Segment::new(passage.text()));
        }

        debug!(count = segments.len(), "passage segmented");
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockOracle;

    #[test]
    fn test_table_needed_yes() {
        let oracle = MockOracle::new().respond("whether a table is needed", "Yes.");
        let segmenter = Segmenter::new();
        let passage = Passage::new("some text");

        assert!(segmenter.table_needed(&oracle, &passage).unwrap());
    }

    #[test]
    fn test_table_needed_malformed_is_negative() {
        let oracle = MockOracle::new().respond("whether a table is needed", "perhaps?");
        let segmenter = Segmenter::new();
        let passage = Passage::new("some text");

        assert!(!segmenter.table_needed(&oracle, &passage).unwrap());
    }

    #[test]
    fn test_segment_splits_on_separator() {
        let oracle = MockOracle::new()
            .respond("whether a table is needed", "yes")
            .respond(
                "divide a passage",
                "Group A improved 20%. __NEW_PASSAGE__ Group B improved 15%.",
            );
        let segmenter = Segmenter::new();
        let passage = Passage::new("Group A improved 20%. Group B improved 15%.");

        let segments = segmenter.segment(&oracle, &passage).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text(), "Group A improved 20%.");
        assert_eq!(segments[1].text(), "Group B improved 15%.");
    }

    #[test]
    fn test_negative_gate_short_circuits() {
        let oracle = MockOracle::new().respond("whether a table is needed", "no");
        let segmenter = Segmenter::new();
        let passage = Passage::new("nothing tabular here");

        let segments = segmenter.segment(&oracle, &passage).unwrap();
        assert!(segments.is_empty());
        // Only the gate question was asked.
        assert_eq!(oracle.call_count(), 1);
    }

    #[test]
    fn test_empty_response_falls_back_to_whole_passage() {
        let oracle = MockOracle::new()
            .respond("whether a table is needed", "yes")
            .respond("divide a passage", "   ");
        let segmenter = Segmenter::new();
        let passage = Passage::new("Week 1 saw a 20% reduction.");

        let segments = segmenter.segment(&oracle, &passage).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), passage.text());
    }

    #[test]
    fn test_joined_text() {
        let segments = vec![Segment::new("a b"), Segment::new("c")];
        assert_eq!(joined_text(&segments), "a b c");
    }
}
