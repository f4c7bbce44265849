// src/commands/run.rs

use anyhow::{Result, bail};
use colored::*;
use futures::{StreamExt, stream};
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::core::config::MatrixConfig;
use crate::core::error::MatrixError;
use crate::core::generator::load_matrix;
use crate::core::models::{ArtifactEnvelope, ExecutionConfig, RunReport};
use crate::core::runner::{RunnerOptions, TestRunner};
use crate::infra::fs::write_json_pretty;
use crate::reporting::print_run_report;

pub struct RunArgs {
    pub matrix: PathBuf,
    pub index: Option<usize>,
    pub all: bool,
    pub jobs: Option<usize>,
    pub artifacts_dir: PathBuf,
    pub simulate: bool,
    pub config: Option<PathBuf>,
}

/// Runs one matrix entry (CI mode, `--index`) or the whole matrix with an
/// in-process worker pool (`--all`). Every run writes one JSON artifact for
/// the aggregator; test failures are recorded in the artifacts rather than
/// aborting the process, but execution errors make the command fail.
pub async fn execute(args: RunArgs) -> Result<()> {
    let matrix = load_matrix(&args.matrix)?;
    let config = MatrixConfig::resolve(args.config.as_deref())?;
    let options = RunnerOptions {
        simulate: args.simulate,
        runner_command: config.runner_command.clone(),
    };

    println!(
        "Loaded matrix with {} entr{} from {}",
        matrix.len().to_string().bold(),
        if matrix.len() == 1 { "y" } else { "ies" },
        args.matrix.display().to_string().cyan()
    );

    if let Some(index) = args.index {
        let entry = matrix
            .get(index)
            .cloned()
            .ok_or(MatrixError::IndexOutOfBounds {
                index,
                len: matrix.len(),
            })?;
        let report = TestRunner::with_options(entry, options).run_tests().await;
        print_run_report(&report);
        let artifact_path = write_artifact(&args.artifacts_dir, index, &report)?;
        println!("Artifact written to {}", artifact_path.display());

        if let Some(error) = report.error() {
            bail!("matrix entry {index} did not complete: {error}");
        }
        return Ok(());
    }

    let jobs = args.jobs.unwrap_or_else(|| num_cpus::get() / 2 + 1);
    let stop_token = setup_signal_handler();

    println!(
        "{}",
        format!("Running all entries with {jobs} parallel job(s)").bold()
    );

    let reports = run_all(matrix, jobs, options, stop_token).await;

    let mut execution_errors = 0usize;
    for (index, report) in &reports {
        print_run_report(report);
        write_artifact(&args.artifacts_dir, *index, report)?;
        if report.is_failure() {
            execution_errors += 1;
        }
    }

    println!(
        "\nArtifacts for {} run(s) written to {}",
        reports.len(),
        args.artifacts_dir.display().to_string().green()
    );

    if execution_errors > 0 {
        bail!("{execution_errors} matrix entr(ies) did not complete; see artifacts for details");
    }
    Ok(())
}

/// Fans the matrix out across an in-process worker pool. Each runner owns
/// its configuration, so workers share no mutable state; a shutdown signal
/// cancels pending entries, which are reported as failed runs.
async fn run_all(
    matrix: Vec<ExecutionConfig>,
    jobs: usize,
    options: RunnerOptions,
    stop_token: CancellationToken,
) -> Vec<(usize, RunReport)> {
    let mut reports: Vec<(usize, RunReport)> = stream::iter(
        matrix
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let options = options.clone();
                let stop_token = stop_token.clone();
                async move {
                    let runner = TestRunner::with_options(entry, options);
                    tokio::select! {
                        biased;
                        _ = stop_token.cancelled() => {
                            let report = RunReport::Failed {
                                error: "cancelled by shutdown signal".to_string(),
                                execution_time: 0.0,
                                config: runner.config().clone(),
                            };
                            (index, report)
                        }
                        report = runner.run_tests() => (index, report),
                    }
                }
            }),
    )
    .buffer_unordered(jobs)
    .collect()
    .await;

    // Artifacts and console output follow matrix order, not finish order.
    reports.sort_by_key(|(index, _)| *index);
    reports
}

fn write_artifact(artifacts_dir: &Path, index: usize, report: &RunReport) -> Result<PathBuf> {
    let file_name = format!("run-{:03}-{}.json", index, report.config().label());
    let path = artifacts_dir.join(file_name);
    write_json_pretty(&path, &ArtifactEnvelope::new(report.clone()))?;
    Ok(path)
}

fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", "Shutdown signal received, cancelling pending entries...".yellow());
            token_clone.cancel();
        }
    });

    token
}
