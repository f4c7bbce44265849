// src/commands/generate.rs

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use crate::core::config::MatrixConfig;
use crate::core::generator::MatrixGenerator;
use crate::core::models::Scope;
use crate::reporting::print_matrix_summary;

/// Discovers the test-suite layout under `base_path`, generates the scoped
/// matrix, and writes it to `output` for the CI orchestrator to fan out.
pub fn execute(
    scope: Scope,
    output: PathBuf,
    base_path: PathBuf,
    config_path: Option<PathBuf>,
    lenient: bool,
    verbose: bool,
) -> Result<()> {
    let mut config = MatrixConfig::resolve(config_path.as_deref())?;
    if lenient {
        config.strict = false;
    }

    let mut generator = MatrixGenerator::new(base_path.clone(), config);
    let discovered = generator.discover_tests()?;

    println!(
        "Discovered {} execution configuration(s) under {}",
        discovered.to_string().bold(),
        base_path.display().to_string().cyan()
    );

    let matrix = generator.save_matrix(&output, scope)?;
    print_matrix_summary(&matrix, scope, verbose);

    if matrix.is_empty() {
        println!(
            "{}",
            "The generated matrix is empty; downstream CI jobs will have nothing to run."
                .yellow()
        );
    }

    println!("\nMatrix written to {}", output.display().to_string().green());
    Ok(())
}
