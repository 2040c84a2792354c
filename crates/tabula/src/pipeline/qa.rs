//! Question generation and table-versus-text consistency checking.

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::Passage;
use crate::error::{Result, TabulaError};
use crate::oracle::{TextOracle, prompts};
use crate::table::Table;

/// Placeholder answer when a question cannot be answered from a source.
pub const UNANSWERED: &str = "N/A";

/// A question about the table, answered from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// The question.
    pub question: String,
    /// The answer, derived from the table.
    pub answer: String,
}

/// One verification question with both answers and their agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaItem {
    /// The verification question.
    pub question: String,
    /// Answer derived only from the table.
    pub table_answer: String,
    /// Answer derived only from the source text.
    pub text_answer: String,
    /// Whether the two answers agree after normalization. Derived,
    /// never authored.
    #[serde(rename = "match")]
    pub matches: bool,
}

/// Configuration for question generation and verification.
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// How many question/answer pairs the generator asks for.
    pub pair_count: usize,
    /// Hard cap on verification questions, regardless of how many the
    /// oracle returns.
    pub max_questions: usize,
    /// Number of answer requests in flight at once.
    pub concurrency: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            pair_count: 5,
            max_questions: 5,
            concurrency: 4,
        }
    }
}

/// The per-question verification results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaReport {
    /// One item per verification question, in question order.
    pub items: Vec<QaItem>,
}

/// Overall verdict over a QA report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaVerdict {
    /// Every answer pair agreed.
    AllMatch,
    /// At least 80% of answer pairs agreed.
    MostlyMatch,
    /// Significant disagreement between table and text.
    Discrepant,
}

impl QaVerdict {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            QaVerdict::AllMatch => "All answers match",
            QaVerdict::MostlyMatch => "Most answers match",
            QaVerdict::Discrepant => "Significant discrepancies found",
        }
    }
}

impl QaReport {
    /// Number of questions asked.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Number of questions whose answers agreed.
    pub fn matched(&self) -> usize {
        self.items.iter().filter(|item| item.matches).count()
    }

    /// Fraction of agreeing answers; 0.0 for an empty report.
    pub fn match_rate(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            self.matched() as f64 / self.total() as f64
        }
    }

    /// Overall verdict for the report.
    pub fn verdict(&self) -> QaVerdict {
        let rate = self.match_rate();
        if self.items.is_empty() || (rate - 1.0).abs() < f64::EPSILON {
            QaVerdict::AllMatch
        } else if rate >= 0.8 {
            QaVerdict::MostlyMatch
        } else {
            QaVerdict::Discrepant
        }
    }
}

/// Derives question/answer pairs from a finished table, for human review.
#[derive(Debug, Clone, Default)]
pub struct QaGenerator {
    config: QaConfig,
}

impl QaGenerator {
    /// Create a generator with default configuration.
    pub fn new() -> Self {
        Self::with_config(QaConfig::default())
    }

    /// Create a generator with custom configuration.
    pub fn with_config(config: QaConfig) -> Self {
        Self { config }
    }

    /// Generate pairs about the table, answered from the table.
    /// An unparseable response degrades to an empty list.
    pub fn generate(&self, oracle: &dyn TextOracle, table: &Table) -> Result<Vec<QaPair>> {
        if table.is_empty() {
            return Ok(Vec::new());
        }

        let response =
            oracle.generate(&prompts::qa_pairs(&table.to_markdown(), self.config.pair_count))?;
        let pairs = parse_qa_pairs(&response);
        if pairs.is_empty() {
            warn!("no question-answer pairs parsed from oracle response");
        }
        Ok(pairs)
    }
}

static QUESTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^q(?:uestion)?\s*\d*\s*[:.)]\s*(.+)$").expect("valid regex"));
static ANSWER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^a(?:nswer)?\s*\d*\s*[:.)]\s*(.+)$").expect("valid regex"));

/// Parse "Q: ... / A: ..." lines into pairs, tolerating numbering
/// variants. A question with no following answer is dropped.
fn parse_qa_pairs(response: &str) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut pending: Option<String> = None;

    for line in response.lines() {
        let line = line.trim();
        if let Some(captures) = QUESTION_LINE.captures(line) {
            pending = Some(captures[1].trim().to_string());
        } else if let Some(captures) = ANSWER_LINE.captures(line) {
            if let Some(question) = pending.take() {
                pairs.push(QaPair {
                    question,
                    answer: captures[1].trim().to_string(),
                });
            }
        }
    }

    pairs
}

/// Cross-checks a table against its source text with generated questions.
///
/// Four strictly ordered stages: generate questions, answer each from the
/// table, answer each from the text, compare normalized answers. A stage
/// never starts before the previous one has completed for all questions;
/// within the two answer stages the per-question requests are independent
/// and run concurrently, written back by question index.
#[derive(Debug, Clone, Default)]
pub struct QaVerifier {
    config: QaConfig,
}

impl QaVerifier {
    /// Create a verifier with default configuration.
    pub fn new() -> Self {
        Self::with_config(QaConfig::default())
    }

    /// Create a verifier with custom configuration.
    pub fn with_config(config: QaConfig) -> Self {
        Self { config }
    }

    /// Run the four verification stages.
    pub fn verify(
        &self,
        oracle: &dyn TextOracle,
        passage: &Passage,
        table: &Table,
    ) -> Result<QaReport> {
        if table.is_empty() {
            return Ok(QaReport::default());
        }

        let markdown = table.to_markdown();
        let questions = self.generate_questions(oracle, &markdown)?;
        if questions.is_empty() {
            warn!("no verification questions generated");
            return Ok(QaReport::default());
        }

        let table_answers =
            self.answer_stage(oracle, &questions, |q| prompts::qa_table_answer(&markdown, q))?;
        let text_answers = self.answer_stage(oracle, &questions, |q| {
            prompts::qa_text_answer(passage.text(), q)
        })?;

        let items = questions
            .into_iter()
            .zip(table_answers)
            .zip(text_answers)
            .map(|((question, table_answer), text_answer)| {
                let matches = normalize_answer(&table_answer) == normalize_answer(&text_answer);
                QaItem {
                    question,
                    table_answer,
                    text_answer,
                    matches,
                }
            })
            .collect();

        Ok(QaReport { items })
    }

    /// Ask for short, fact-checkable questions; drop blank lines and cap
    /// the count.
    fn generate_questions(&self, oracle: &dyn TextOracle, markdown: &str) -> Result<Vec<String>> {
        let response = oracle.generate(&prompts::qa_questions(markdown))?;
        let questions: Vec<String> = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(self.config.max_questions)
            .map(String::from)
            .collect();

        debug!(count = questions.len(), "verification questions generated");
        Ok(questions)
    }

    /// Answer every question from one source. Blank responses and
    /// individual request failures degrade to [`UNANSWERED`].
    fn answer_stage(
        &self,
        oracle: &dyn TextOracle,
        questions: &[String],
        build_prompt: impl Fn(&str) -> String + Sync,
    ) -> Result<Vec<String>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency.max(1))
            .build()
            .map_err(|e| TabulaError::Config(format!("Failed to build worker pool: {}", e)))?;

        let answers = pool.install(|| {
            questions
                .par_iter()
                .map(|question| match oracle.generate(&build_prompt(question)) {
                    Ok(answer) => {
                        let answer = answer.trim();
                        if answer.is_empty() {
                            UNANSWERED.to_string()
                        } else {
                            answer.to_string()
                        }
                    }
                    Err(e) => {
                        warn!(question = %question, error = %e, "answer extraction failed");
                        UNANSWERED.to_string()
                    }
                })
                .collect()
        });

        Ok(answers)
    }
}

/// Normalize an answer for comparison: lower-case, strip whitespace and
/// comma separators, trim degree/percent/currency symbols. Pure and
/// deterministic; never consults the oracle.
pub fn normalize_answer(answer: &str) -> String {
    let stripped: String = answer
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    stripped
        .trim_matches(|c| matches!(c, '°' | '%' | '$'))
        .to_string()
}
