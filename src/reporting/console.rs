//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints human-readable summaries of generated matrices,
//! single runs, and aggregated results, using color coding to highlight
//! the different statuses.
//!
//! 此模块打印生成矩阵、单次运行和聚合结果的可读摘要，
//! 使用颜色编码突出显示不同状态。

use crate::core::aggregator::CollectStats;
use crate::core::models::{AggregatedSummary, ExecutionConfig, RunReport, Scope, TestType};
use colored::*;

/// Prints a per-type breakdown of a generated matrix, followed by the list
/// of entries when `verbose` is set.
///
/// 打印生成矩阵按类型的分解统计，`verbose` 时附带条目列表。
///
/// # Output Format / 输出格式
/// ```text
/// --- Matrix Summary (scope: all) ---
///   unit              1 entry
///   integration       3 entries
///   e2e              12 entries
///   Total            16 entries
/// ```
pub fn print_matrix_summary(matrix: &[ExecutionConfig], scope: Scope, verbose: bool) {
    println!(
        "\n{}",
        format!("--- Matrix Summary (scope: {scope}) ---").bold()
    );

    for test_type in TestType::ALL {
        let count = matrix
            .iter()
            .filter(|config| config.test_type == test_type)
            .count();
        if count == 0 {
            continue;
        }
        println!(
            "  {:<14} {:>4} {}",
            test_type.as_str().cyan(),
            count,
            plural(count)
        );
    }

    let total_line = format!("  {:<14} {:>4} {}", "Total", matrix.len(), plural(matrix.len()));
    if matrix.is_empty() {
        println!("{}", "  (empty matrix)".yellow());
    } else {
        println!("{}", total_line.bold());
    }

    if verbose {
        for (index, config) in matrix.iter().enumerate() {
            println!(
                "  [{:>3}] {:<34} {}",
                index,
                config.label(),
                config.test_path.display().to_string().dimmed()
            );
        }
    }
}

/// Prints the outcome of one runner invocation.
/// 打印一次运行器调用的结果。
pub fn print_run_report(report: &RunReport) {
    let label = report.config().label();
    match report {
        RunReport::Completed { counts, execution_time, .. } => {
            let status = if counts.failed > 0 || counts.errors > 0 {
                "FAILED".red().bold()
            } else {
                "PASSED".green().bold()
            };
            println!(
                "  {} {:<34} {:>3} passed {:>3} failed {:>3} skipped {:>3} errors in {:.2}s",
                status,
                label.cyan(),
                counts.passed,
                counts.failed,
                counts.skipped,
                counts.errors,
                execution_time
            );
        }
        RunReport::Failed { error, execution_time, .. } => {
            println!(
                "  {} {:<34} {} (after {:.2}s)",
                "ERROR ".red().bold(),
                label.cyan(),
                error.red(),
                execution_time
            );
        }
    }
}

/// Prints the combined totals after aggregation, plus what collection saw
/// on disk. Skipped artifact files are called out loudly since silently
/// dropped CI data can mask a widespread failure.
///
/// 打印聚合后的合并总计以及收集过程在磁盘上看到的情况。
/// 被跳过的产物文件会被醒目提示，因为静默丢弃的 CI 数据可能掩盖大范围故障。
pub fn print_aggregate_summary(summary: &AggregatedSummary, stats: &CollectStats) {
    println!("\n{}", "--- Aggregated Test Summary ---".bold());
    println!(
        "  Artifacts: {} scanned, {} collected, {} skipped",
        stats.scanned,
        stats.collected,
        if stats.skipped > 0 {
            stats.skipped.to_string().yellow().to_string()
        } else {
            stats.skipped.to_string()
        }
    );

    let totals = &summary.summary;
    println!("  {:<14} {:>6}", "Total tests", totals.total_tests);
    println!(
        "  {:<14} {:>6}",
        "Passed",
        totals.passed.to_string().green()
    );
    println!(
        "  {:<14} {:>6}",
        "Failed",
        if totals.failed > 0 {
            totals.failed.to_string().red().to_string()
        } else {
            totals.failed.to_string()
        }
    );
    println!("  {:<14} {:>6}", "Skipped", totals.skipped);
    println!(
        "  {:<14} {:>5.2}%",
        "Success rate",
        totals.success_rate
    );
    println!("  {:<14} {:>5.2}s", "Total time", totals.execution_time);

    if stats.skipped > 0 {
        println!(
            "\n{}",
            format!(
                "{} artifact file(s) could not be parsed and were not counted.",
                stats.skipped
            )
            .yellow()
            .bold()
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}
