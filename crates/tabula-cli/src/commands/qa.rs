//! QA command - verify an extracted table against its source text.

use std::path::PathBuf;

use colored::Colorize;
use tabula::{FillConfig, Loader, QaVerdict, Tabula, TabulaConfig};

use crate::cli::OracleChoice;

pub fn run(
    file: PathBuf,
    oracle: OracleChoice,
    model: Option<String>,
    concurrency: usize,
    json: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let oracle = super::build_oracle(oracle, model)?;

    let config = TabulaConfig {
        fill: FillConfig { concurrency },
        ..TabulaConfig::default()
    };
    let tabula = Tabula::with_config(oracle, config);

    let loader = Loader::new();
    let (passage, _) = loader.load_file(&file)?;

    let (result, report) = tabula.extract_and_verify(&passage)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if result.merged.is_empty() {
        println!(
            "{}",
            "No table needed: nothing to verify for this document.".yellow()
        );
        return Ok(());
    }

    println!("{}", "==================== QA Report ====================".cyan());
    println!("Questions Generated: {}", report.total());
    println!(
        "Correct Answers  : {}/{}",
        report.matched().to_string().white().bold(),
        report.total()
    );
    println!();

    for (index, item) in report.items.iter().enumerate() {
        let status = if item.matches {
            "match".green()
        } else {
            "mismatch".red()
        };
        println!("{}. {}", index + 1, item.question);
        println!("   Table Answer: {}", item.table_answer);
        println!("   Text  Answer: {}", item.text_answer);
        println!("   Match       : {}", status);
        println!();
    }

    let verdict = report.verdict();
    let label = match verdict {
        QaVerdict::AllMatch => verdict.label().green().bold(),
        QaVerdict::MostlyMatch => verdict.label().yellow().bold(),
        QaVerdict::Discrepant => verdict.label().red().bold(),
    };
    println!("{}", label);

    Ok(())
}
