// src/commands/aggregate.rs

use anyhow::{Result, bail};
use colored::*;
use std::path::PathBuf;

use crate::core::aggregator::ResultAggregator;
use crate::infra::fs::is_directory;
use crate::reporting::print_aggregate_summary;

/// Collects all JSON/JUnit artifacts under `artifacts_dir`, writes the
/// combined report to `output`, and prints the totals. In strict mode the
/// first malformed artifact aborts the aggregation.
pub fn execute(artifacts_dir: PathBuf, output: PathBuf, strict: bool) -> Result<()> {
    if !is_directory(&artifacts_dir) {
        bail!(
            "artifacts directory not found: {}",
            artifacts_dir.display()
        );
    }

    let mut aggregator = if strict {
        ResultAggregator::strict()
    } else {
        ResultAggregator::new()
    };

    let stats = aggregator.collect_results(&artifacts_dir)?;
    let summary = aggregator.save_aggregated_results(&output)?;

    print_aggregate_summary(&summary, &stats);
    println!(
        "\nCombined report written to {}",
        output.display().to_string().green()
    );
    Ok(())
}
