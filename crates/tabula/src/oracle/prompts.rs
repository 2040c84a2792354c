//! Prompt templates for oracle interactions.

/// Marker the segmentation prompt asks the oracle to separate segments with.
pub const SEGMENT_SEPARATOR: &str = "__NEW_PASSAGE__";

/// System prompt shared by the HTTP providers.
pub fn system_prompt() -> &'static str {
    r#"You are a precision data-extraction assistant for Tabula, a tool that turns unstructured text into tables.

Your role is to:
1. Decide whether a passage contains enough structured facts to tabulate
2. Extract headers and cell values exactly as they appear in the text
3. Verify tables against their source text

Guidelines:
- Be concise and literal; never invent values
- Preserve original units and formatting
- When a value is absent, say so rather than guessing"#
}

/// Ask whether the passage warrants a table at all.
pub fn table_needed(text: &str) -> String {
    format!(
        r#"Evaluate the following passage and determine whether a table is needed.

Conditions:
1. The passage contains more than 20 numerical values.
2. The passage includes at least 3 structured sentences.

Passage:
{text}

Answer "yes" or "no"."#
    )
}

/// Ask the oracle to split a passage into fact-coherent segments.
pub fn segmentation(text: &str) -> String {
    format!(
        r#"Your task is to divide a passage into smaller passages grouped by similar facts.
Keep related numerical values and categorical data within the same section.
Separate sections using "{SEGMENT_SEPARATOR}".

Passage:
{text}"#
    )
}

/// Ask for candidate row and column headers.
pub fn header_extraction(segments_text: &str) -> String {
    format!(
        r#"Your task is to extract potential row and column headers from the passage below.

Think about the context:
- If the passage compares time periods (e.g., Q1, Jan, 2023), treat them as COLUMN headers.
- If the passage compares groups or cohorts (e.g., Group A, Control, Male/Female), treat those as COLUMN headers.
- Use metric names (e.g., Blood Pressure, Revenue, Satisfaction Score) as ROW headers.
- Avoid guessing. If the layout isn't clear, follow typical report structure.

Return your output in this format:
Row Headers: <comma-separated>
Column Headers: <comma-separated>

Passage:
{segments_text}"#
    )
}

/// Ask the oracle to confirm or reverse its own header role assignment.
pub fn header_confirmation(row_headers: &[String], column_headers: &[String]) -> String {
    format!(
        r#"You provided the following headers:

Row Headers: {}
Column Headers: {}

Are these correct, or are they reversed? Reply only:
- "correct"
- "reversed""#,
        row_headers.join(", "),
        column_headers.join(", ")
    )
}

/// Ask for the value of a single (row, column) pair.
pub fn cell_extraction(row: &str, column: &str, segments_text: &str) -> String {
    format!(
        r#"Your task is to extract the value for "{row}" under the column "{column}" from the passage below.
Each cell should contain a single value or "NA" if not found. No extra context needed.

Passage: {segments_text}"#
    )
}

/// Ask whether values sit under the right columns.
pub fn structure_local(table_markdown: &str) -> String {
    format!(
        r#"Your task is to verify if the extracted values match their respective column categories.

Check the following:
1. Are all numerical values placed in their correct column?
2. Are there any misclassifications (e.g., "66 years" appearing under Revenue)?

Table to check:
{table_markdown}"#
    )
}

/// Ask whether the overall table structure holds together.
pub fn structure_global(table_markdown: &str) -> String {
    format!(
        r#"Your task is to ensure the table structure is correct.

Checks:
1. Do all rows have the same number of columns?
2. Are there missing or duplicate headers?
3. Do values align with headers?

Table:
{table_markdown}"#
    )
}

/// Ask the oracle to attribute each cell value to the source passage.
pub fn factual_check(passage: &str, table_markdown: &str) -> String {
    format!(
        r#"Your task is to verify the factual accuracy of each value in the table below, based on the passage.

Instructions:
- For each value, indicate the sentence number where it was found.
- If unverifiable, mark [NA].

Passage:
{passage}

Table:
{table_markdown}"#
    )
}

/// Ask for question-answer pairs about a finished table.
pub fn qa_pairs(table_markdown: &str, count: usize) -> String {
    format!(
        r#"Based on the table below, generate {count} question-answer pairs that test if the table is informative.

Table:
{table_markdown}

Format each pair as:
Q: <question>
A: <answer>

Only return the Q&A pairs."#
    )
}

/// Ask for verification questions about a table.
pub fn qa_questions(table_markdown: &str) -> String {
    format!(
        r#"You are a QA analyst. Generate verification questions to check data accuracy between a table and its source text. Follow these rules:
1. Create questions about numerical values, comparisons, and trends
2. Ask for exact values from specific table cells
3. Phrase questions to be answerable in 1-2 words
4. Generate 3-5 critical questions
5. Return each question on a separate line

Table to verify:
{table_markdown}

Generate verification questions:"#
    )
}

/// Ask a question answerable only from the table.
pub fn qa_table_answer(table_markdown: &str, question: &str) -> String {
    format!(
        r#"Answer the question based SOLELY on the provided table. Follow these rules:
1. Use EXACT values from the table
2. Include units if present
3. If information is missing, respond with 'N/A'
4. Keep answers concise (1-3 words)

Table:
{table_markdown}

Question: {question}
Answer:"#
    )
}

/// Ask the same question answerable only from the source text.
pub fn qa_text_answer(text: &str, question: &str) -> String {
    format!(
        r#"Answer the question based SOLELY on the provided text. Follow these rules:
1. Use EXACT values from the text
2. Include units if present
3. If information is missing, respond with 'N/A'
4. Keep answers concise (1-3 words)

Text:
{text}

Question: {question}
Answer:"#
    )
}
