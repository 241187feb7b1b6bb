//! Stats command - describe the shape of a CSV file.

use std::path::PathBuf;

use cleanflow::validation::csv_stats_bytes_with;
use colored::Colorize;

use super::{parser_config, read_input};

pub fn run(file: PathBuf, legacy: bool, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_input(&file)?;
    let stats = csv_stats_bytes_with(&bytes, &parser_config(legacy));

    if json_output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{} {}", "Statistics for".cyan().bold(), file.display().to_string().white());
    println!();
    println!("  Rows:        {}", stats.row_count.to_string().white().bold());
    println!("  Columns:     {}", stats.column_count.to_string().white().bold());
    println!("  Cells:       {}", stats.total_cells);
    println!(
        "  Empty cells: {} ({:.1}%)",
        stats.empty_cells.to_string().yellow(),
        stats.empty_ratio() * 100.0
    );
    if !stats.has_headers {
        println!();
        println!("{}", "No header row found.".yellow());
    }

    Ok(())
}
