//! # Result Aggregator Module / 结果聚合器模块
//!
//! Reassembles the artifacts produced by independent parallel CI jobs into
//! one combined report. JSON artifacts carry the runner's own report
//! envelope; XML artifacts are standard JUnit files whose `<testsuite>`
//! attributes are summed. Collection is best-effort by default: a corrupt
//! artifact is warned about and skipped, never aborting the whole summary.
//!
//! 将独立并行 CI 作业产生的产物重新组装成一份合并报告。
//! JSON 产物携带运行器自己的报告信封；XML 产物是标准 JUnit 文件，
//! 其 `<testsuite>` 属性会被求和。收集默认为尽力而为：
//! 损坏的产物会产生警告并被跳过，绝不中止整个摘要。

use crate::core::error::MatrixError;
use crate::core::models::{
    AggregatedResult, AggregatedSummary, RunReport, SummaryTotals, TestCounts,
};
use crate::infra::fs::{find_artifact_files, write_json_pretty};
use anyhow::{Context, Result};
use colored::*;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

/// What one `collect_results` call saw on disk.
/// 一次 `collect_results` 调用在磁盘上看到的情况。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Artifact files found under the directory.
    pub scanned: usize,
    /// Files successfully folded into the totals.
    pub collected: usize,
    /// Files skipped as malformed (lenient mode only).
    pub skipped: usize,
}

/// Accumulates per-run results into one combined summary.
///
/// The lifecycle is accumulate-then-read, but not one-way: collecting more
/// artifacts after a summary has been generated is legal, the summary just
/// has to be regenerated to observe them. Accumulation is associative over
/// disjoint artifact sets.
///
/// 将每次运行的结果累积为一份合并摘要。
///
/// 生命周期是先累积后读取，但不是单向的：生成摘要之后继续收集产物是
/// 合法的，只需重新生成摘要即可反映新数据。累积在不相交的产物集合上
/// 满足结合律。
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: AggregatedResult,
    strict: bool,
}

impl ResultAggregator {
    /// A lenient aggregator: malformed artifacts are warned about and
    /// skipped. 宽松聚合器：损坏的产物会被警告并跳过。
    pub fn new() -> Self {
        Self::default()
    }

    /// A strict aggregator: the first malformed artifact aborts collection.
    /// 严格聚合器：第一个损坏的产物会中止收集。
    pub fn strict() -> Self {
        Self {
            results: AggregatedResult::default(),
            strict: true,
        }
    }

    /// Walks `artifacts_dir` recursively and folds every `*.json` and
    /// `*.xml` result file into the running totals.
    ///
    /// 递归遍历 `artifacts_dir`，将每个 `*.json` 和 `*.xml` 结果文件
    /// 折叠进运行总计。
    pub fn collect_results(&mut self, artifacts_dir: &Path) -> Result<CollectStats, MatrixError> {
        let mut stats = CollectStats::default();

        for path in find_artifact_files(artifacts_dir) {
            stats.scanned += 1;
            let outcome = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => self.process_json_artifact(&path),
                Some("xml") => self.process_xml_artifact(&path),
                _ => continue,
            };

            match outcome {
                Ok(()) => stats.collected += 1,
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    eprintln!("{} {}", "warning:".yellow().bold(), e);
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Folds an in-process run report into the totals, for pipelines that
    /// run and aggregate inside one process instead of via artifact files.
    ///
    /// 将进程内的运行报告折叠进总计，供在单个进程内既运行又聚合、
    /// 不经过产物文件的流水线使用。
    pub fn collect_report(&mut self, report: &RunReport) {
        match report.counts() {
            Some(counts) => self.results.add_counts(counts),
            None => {
                // A run that never produced counts is accounted for as one
                // errored test so the aggregate cannot silently shrink.
                // 没有产生计数的运行按一个出错测试入账，
                // 使聚合结果不会被静默缩小。
                self.results.total_tests += 1;
                self.results.errors += 1;
            }
        }
        self.results.execution_time += report.execution_time();
        if let Ok(raw) = serde_json::to_value(report) {
            self.results.test_suites.push(raw);
        }
    }

    fn process_json_artifact(&mut self, path: &Path) -> Result<(), MatrixError> {
        let content = fs::read_to_string(path).map_err(|e| MatrixError::MalformedArtifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|e| MatrixError::MalformedArtifact {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let payload = document
            .get("test_results")
            .ok_or_else(|| MatrixError::MalformedArtifact {
                path: path.to_path_buf(),
                reason: "missing top-level 'test_results' key".to_string(),
            })?;

        let report: RunReport =
            serde_json::from_value(payload.clone()).map_err(|e| MatrixError::MalformedArtifact {
                path: path.to_path_buf(),
                reason: format!("unrecognized result payload: {e}"),
            })?;

        if let Some(counts) = report.counts()
            && !counts.is_consistent()
        {
            return Err(MatrixError::MalformedArtifact {
                path: path.to_path_buf(),
                reason: format!(
                    "inconsistent counts: total {} != passed {} + failed {} + skipped {} + errors {}",
                    counts.total, counts.passed, counts.failed, counts.skipped, counts.errors
                ),
            });
        }

        self.collect_report(&report);
        Ok(())
    }

    /// Sums `tests`, `failures`, `errors`, `skipped`, and `time` attributes
    /// across every `<testsuite>` element of a JUnit file. The passed count
    /// is derived, since JUnit does not record it directly.
    ///
    /// 对 JUnit 文件中每个 `<testsuite>` 元素的 `tests`、`failures`、
    /// `errors`、`skipped` 和 `time` 属性求和。通过数是派生出来的，
    /// 因为 JUnit 不直接记录它。
    fn process_xml_artifact(&mut self, path: &Path) -> Result<(), MatrixError> {
        let content = fs::read_to_string(path).map_err(|e| MatrixError::MalformedArtifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut reader = Reader::from_str(&content);
        let mut suites_seen = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) | Ok(Event::Empty(element))
                    if element.name().as_ref() == b"testsuite" =>
                {
                    let mut suite = JunitSuite::default();
                    for attribute in element.attributes() {
                        let attribute =
                            attribute.map_err(|e| MatrixError::MalformedArtifact {
                                path: path.to_path_buf(),
                                reason: e.to_string(),
                            })?;
                        let value = attribute.unescape_value().map_err(|e| {
                            MatrixError::MalformedArtifact {
                                path: path.to_path_buf(),
                                reason: e.to_string(),
                            }
                        })?;
                        suite.read_attribute(attribute.key.as_ref(), &value);
                    }

                    self.results.add_counts(&suite.counts());
                    self.results.execution_time += suite.time;
                    self.results.test_suites.push(suite.to_value(path));
                    suites_seen += 1;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(MatrixError::MalformedArtifact {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if suites_seen == 0 {
            return Err(MatrixError::MalformedArtifact {
                path: path.to_path_buf(),
                reason: "no <testsuite> elements found".to_string(),
            });
        }

        Ok(())
    }

    pub fn results(&self) -> &AggregatedResult {
        &self.results
    }

    /// Mutable access to the totals, for callers that seed or adjust them
    /// directly instead of going through collection.
    /// 对总计的可变访问，供直接填充或调整总计而不经过收集流程的调用方使用。
    pub fn results_mut(&mut self) -> &mut AggregatedResult {
        &mut self.results
    }

    /// Produces the combined report from the current totals. Reading does
    /// not consume anything; collecting more and summarizing again is fine.
    ///
    /// 根据当前总计生成合并报告。读取不消耗任何状态；
    /// 继续收集后再次生成摘要是可以的。
    pub fn generate_summary(&self) -> AggregatedSummary {
        AggregatedSummary {
            summary: SummaryTotals {
                total_tests: self.results.total_tests,
                passed: self.results.passed,
                failed: self.results.failed,
                skipped: self.results.skipped,
                success_rate: self.results.success_rate(),
                execution_time: self.results.execution_time,
            },
            test_suites: self.results.test_suites.clone(),
            generated_at: Some(chrono::Utc::now()),
        }
    }

    /// Persists the combined report as indented JSON and returns it.
    /// 将合并报告持久化为带缩进的 JSON 并返回它。
    pub fn save_aggregated_results(&self, path: &Path) -> Result<AggregatedSummary> {
        let summary = self.generate_summary();
        write_json_pretty(path, &summary)
            .with_context(|| format!("failed to write combined report: {}", path.display()))?;
        Ok(summary)
    }
}

/// One `<testsuite>` element's attributes, as read from a JUnit file.
#[derive(Debug, Default)]
struct JunitSuite {
    name: String,
    tests: u64,
    failures: u64,
    errors: u64,
    skipped: u64,
    time: f64,
}

impl JunitSuite {
    fn read_attribute(&mut self, key: &[u8], value: &str) {
        match key {
            b"name" => self.name = value.to_string(),
            b"tests" => self.tests = value.parse().unwrap_or(0),
            b"failures" => self.failures = value.parse().unwrap_or(0),
            b"errors" => self.errors = value.parse().unwrap_or(0),
            b"skipped" => self.skipped = value.parse().unwrap_or(0),
            b"time" => self.time = value.parse().unwrap_or(0.0),
            _ => {}
        }
    }

    fn counts(&self) -> TestCounts {
        // JUnit suites report tests/failures/errors/skipped; passed is the
        // remainder. Saturating keeps a lying suite from underflowing.
        // JUnit 套件报告 tests/failures/errors/skipped；通过数是余数。
        // 饱和减法避免属性不实的套件造成下溢。
        let passed = self
            .tests
            .saturating_sub(self.failures)
            .saturating_sub(self.errors)
            .saturating_sub(self.skipped);
        TestCounts {
            total: passed + self.failures + self.skipped + self.errors,
            passed,
            failed: self.failures,
            skipped: self.skipped,
            errors: self.errors,
        }
    }

    fn to_value(&self, source: &Path) -> Value {
        json!({
            "name": self.name,
            "tests": self.tests,
            "failures": self.failures,
            "errors": self.errors,
            "skipped": self.skipped,
            "time": self.time,
            "source": source.display().to_string(),
        })
    }
}
