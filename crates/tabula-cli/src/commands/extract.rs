//! Extract command - run the pipeline and export the table.

use std::path::PathBuf;

use colored::Colorize;
use tabula::{ExtractionResult, FillConfig, Table, Tabula, TabulaConfig};

use crate::cli::{OracleChoice, OutputFormat};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    oracle: OracleChoice,
    model: Option<String>,
    concurrency: usize,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let oracle = super::build_oracle(oracle, model)?;

    let config = TabulaConfig {
        fill: FillConfig { concurrency },
        ..TabulaConfig::default()
    };
    let tabula = Tabula::with_config(oracle, config);

    println!(
        "{} {}",
        "Extracting table from".cyan().bold(),
        file.display().to_string().white()
    );

    let result = tabula.extract_file(&file)?;

    if result.merged.is_empty() {
        println!(
            "{}",
            "No table needed: the document does not contain enough structured data.".yellow()
        );
        return Ok(());
    }

    println!();
    println!("{}", "Extracted table".cyan().bold());
    println!("{}", result.merged.to_markdown());

    if !result.report.is_empty() {
        println!("{}", "Validation comments".cyan().bold());
        for diagnostic in result.report.entries() {
            println!(
                "  {} {}",
                format!("[{}]", diagnostic.kind.label()).yellow(),
                diagnostic.message
            );
        }
        println!();
    }

    if !result.qa_pairs.is_empty() {
        println!("{}", "Generated Q&A pairs".cyan().bold());
        for pair in &result.qa_pairs {
            println!("  Q: {}", pair.question);
            println!("  A: {}", pair.answer.white().bold());
        }
        println!();
    }

    if let Some(path) = output {
        write_output(&result, &path, format)?;
        println!("{} {}", "Table written to".green().bold(), path.display());
    }

    Ok(())
}

/// Write the merged table (or the full result, for JSON) to disk.
fn write_output(
    result: &ExtractionResult,
    path: &PathBuf,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => write_csv(&result.merged, path)?,
        OutputFormat::Markdown => std::fs::write(path, result.merged.to_markdown())?,
        OutputFormat::Json => {
            std::fs::write(path, serde_json::to_string_pretty(result)?)?;
        }
    }
    Ok(())
}

/// Export the table as CSV, row headers in the first column.
fn write_csv(table: &Table, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![String::new()];
    header.extend(table.columns().iter().cloned());
    writer.write_record(&header)?;

    for (row, cells) in table.iter_rows() {
        let mut record = vec![row.clone()];
        for column in table.columns() {
            record.push(cells.get(column).cloned().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
