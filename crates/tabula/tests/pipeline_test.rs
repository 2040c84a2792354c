//! Integration tests for the full extraction and verification pipeline.

use tabula::{MockOracle, Passage, Tabula, TabulaError};

/// Script the oracle for a passage describing two groups ("Group A",
/// "Group B") tracked at two time points ("Week 1", "Week 4") with six
/// numeric facts.
fn scenario_passage() -> Passage {
    Passage::new(
        "Group A and Group B were monitored over four weeks. In Week 1, Group A \
         cut joint swelling by 20% while Group B cut it by 15%, and Group A's \
         mobility rose 2 points. By Week 4, Group A's swelling reduction reached \
         35%, Group B's reached 30%, and Group A's mobility gain reached 3 points.",
    )
}

fn scenario_oracle() -> MockOracle {
    MockOracle::new()
        .respond("whether a table is needed", "yes")
        .respond(
            "divide a passage",
            "In Week 1, Group A cut joint swelling by 20% while Group B cut it by 15%, \
             and Group A's mobility rose 2 points.\n__NEW_PASSAGE__\n\
             By Week 4, Group A's swelling reduction reached 35%, Group B's reached 30%, \
             and Group A's mobility gain reached 3 points.",
        )
        .respond(
            "extract potential row and column headers",
            "Row Headers: Group A Swelling Reduction, Group B Swelling Reduction, Group A Mobility Gain\n\
             Column Headers: Week 1, Week 4",
        )
        .respond("Are these correct", "correct")
        .respond(r#""Group A Swelling Reduction" under the column "Week 1""#, "20%")
        .respond(r#""Group A Swelling Reduction" under the column "Week 4""#, "35%")
        .respond(r#""Group B Swelling Reduction" under the column "Week 1""#, "15%")
        .respond(r#""Group B Swelling Reduction" under the column "Week 4""#, "30%")
        .respond(r#""Group A Mobility Gain" under the column "Week 1""#, "2 points")
        .respond(r#""Group A Mobility Gain" under the column "Week 4""#, "3 points")
        .respond(
            "respective column categories",
            "All values are placed under the correct week.",
        )
        .respond(
            "table structure is correct",
            "All rows have the same number of columns.",
        )
        .respond(
            "factual accuracy",
            "20%: sentence 2. 35%: sentence 3. All values verified.",
        )
        .respond(
            "question-answer pairs",
            "Q: What was Group A's swelling reduction in Week 4?\nA: 35%\n\
             Q: What was Group B's swelling reduction in Week 1?\nA: 15%",
        )
        .respond(
            "Generate verification questions",
            "What was Group A's swelling reduction in Week 4?\n\
             What was Group B's swelling reduction in Week 1?",
        )
        .respond("Question: What was Group A's swelling reduction in Week 4?", "35%")
        .respond("Question: What was Group B's swelling reduction in Week 1?", "15%")
}

// =============================================================================
// End-to-End Extraction
// =============================================================================

#[test]
fn test_end_to_end_extraction() {
    let tabula = Tabula::new(scenario_oracle());
    let result = tabula.extract(&scenario_passage()).expect("Extraction failed");

    assert_eq!(result.segments.len(), 2);
    assert_eq!(result.headers.column_headers, vec!["Week 1", "Week 4"]);
    assert_eq!(
        result.headers.row_headers,
        vec![
            "Group A Swelling Reduction",
            "Group B Swelling Reduction",
            "Group A Mobility Gain"
        ]
    );

    // Every row carries every column.
    assert!(result.table.is_rectangular());
    assert_eq!(result.table.row_count(), 3);
    assert_eq!(result.table.get("Group A Swelling Reduction", "Week 1"), Some("20%"));
    assert_eq!(result.table.get("Group B Swelling Reduction", "Week 4"), Some("30%"));
    assert_eq!(result.table.get("Group A Mobility Gain", "Week 4"), Some("3 points"));

    // Merging the single table returns it unchanged: all cells are concrete.
    assert_eq!(result.merged, result.table);

    // Two structural findings plus one factual finding, all advisory.
    assert_eq!(result.report.len(), 3);

    assert_eq!(result.qa_pairs.len(), 2);
    assert_eq!(result.qa_pairs[0].answer, "35%");
}

#[test]
fn test_end_to_end_verification() {
    let tabula = Tabula::new(scenario_oracle());
    let (result, qa) = tabula
        .extract_and_verify(&scenario_passage())
        .expect("Pipeline failed");

    assert!(!result.merged.is_empty());
    assert_eq!(qa.total(), 2);
    assert_eq!(qa.matched(), 2);
    assert!((qa.match_rate() - 1.0).abs() < f64::EPSILON);
}

// =============================================================================
// Degenerate Paths
// =============================================================================

#[test]
fn test_table_not_needed_produces_empty_artifacts() {
    let oracle = MockOracle::new().respond("whether a table is needed", "No.");
    let tabula = Tabula::new(oracle);

    let (result, qa) = tabula
        .extract_and_verify(&Passage::new("A short narrative with no data."))
        .expect("Rejection must not be an error");

    assert!(result.segments.is_empty());
    assert!(result.headers.is_empty());
    assert!(result.table.is_empty());
    assert!(result.merged.is_empty());
    assert!(result.qa_pairs.is_empty());
    assert!(qa.items.is_empty());
}

#[test]
fn test_unparseable_headers_produce_empty_table() {
    let oracle = MockOracle::new()
        .respond("whether a table is needed", "yes")
        .respond("divide a passage", "just one segment")
        .with_default("nothing the parser recognizes");
    let tabula = Tabula::new(oracle);

    let result = tabula
        .extract(&scenario_passage())
        .expect("Degenerate headers must not be an error");

    assert!(result.headers.is_empty());
    assert!(result.table.is_empty());
    assert!(result.report.is_empty());
}

#[test]
fn test_missing_cells_degrade_to_placeholder() {
    let oracle = MockOracle::new()
        .respond("whether a table is needed", "yes")
        .respond("divide a passage", "one segment of facts")
        .respond(
            "extract potential row and column headers",
            "Row Headers: Revenue\nColumn Headers: Q1, Q2",
        )
        .respond("Are these correct", "correct")
        .respond(r#""Revenue" under the column "Q1""#, "$1.2M")
        .with_default("");
    let tabula = Tabula::new(oracle);

    let result = tabula.extract(&scenario_passage()).expect("Extraction failed");

    assert_eq!(result.table.get("Revenue", "Q1"), Some("$1.2M"));
    assert_eq!(result.table.get("Revenue", "Q2"), Some("NA"));
    // The merge canonicalizes the placeholder spelling.
    assert_eq!(result.merged.get("Revenue", "Q2"), Some("N/A"));
}

// =============================================================================
// Fatal Paths
// =============================================================================

#[test]
fn test_unreachable_oracle_is_fatal() {
    let oracle = MockOracle::new().fail_on("whether a table is needed", "connection refused");
    let tabula = Tabula::new(oracle);

    let err = tabula.extract(&scenario_passage()).unwrap_err();
    assert!(matches!(err, TabulaError::Oracle(_)));
}

#[test]
fn test_header_stage_failure_is_fatal() {
    let oracle = MockOracle::new()
        .respond("whether a table is needed", "yes")
        .respond("divide a passage", "one segment")
        .fail_on("extract potential row and column headers", "timeout");
    let tabula = Tabula::new(oracle);

    assert!(tabula.extract(&scenario_passage()).is_err());
}

// =============================================================================
// Header Reversal
// =============================================================================

#[test]
fn test_reversed_headers_are_swapped_end_to_end() {
    let oracle = MockOracle::new()
        .respond("whether a table is needed", "yes")
        .respond("divide a passage", "one segment")
        .respond(
            "extract potential row and column headers",
            "Row Headers: Q1, Q2\nColumn Headers: Revenue",
        )
        .respond("Are these correct", "reversed")
        .with_default("NA");
    let tabula = Tabula::new(oracle);

    let result = tabula.extract(&scenario_passage()).expect("Extraction failed");

    assert_eq!(result.headers.row_headers, vec!["Revenue"]);
    assert_eq!(result.headers.column_headers, vec!["Q1", "Q2"]);
    assert_eq!(result.table.row_count(), 1);
    assert_eq!(result.table.column_count(), 2);
}
