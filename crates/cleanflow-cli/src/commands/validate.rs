//! Validate command - report structural problems in a CSV file.

use std::path::PathBuf;

use cleanflow::validation::validate_csv_bytes_with;
use colored::Colorize;
use tracing::debug;

use super::{parser_config, read_input};

pub fn run(file: PathBuf, legacy: bool, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_input(&file)?;
    let result = validate_csv_bytes_with(&bytes, &parser_config(legacy));
    debug!(errors = result.errors.len(), "validated {}", file.display());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.valid {
        println!("{} {}", "Valid:".green().bold(), file.display());
    } else {
        println!(
            "{} {} ({} problems)",
            "Invalid:".red().bold(),
            file.display(),
            result.errors.len()
        );
        for error in &result.errors {
            println!("  {}", error);
        }
    }

    if result.valid {
        Ok(())
    } else {
        Err(format!("{} failed validation", file.display()).into())
    }
}
