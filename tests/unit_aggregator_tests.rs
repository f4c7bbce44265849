//! # Aggregator Module Unit Tests / 聚合器模块单元测试
//!
//! Tests for artifact collection (JSON and JUnit XML), lenient versus
//! strict handling of malformed files, and summary generation.
//!
//! 产物收集（JSON 与 JUnit XML）、对损坏文件的宽松/严格处理
//! 以及摘要生成的测试。

use matrix_forge::core::aggregator::ResultAggregator;
use matrix_forge::core::error::MatrixError;
use matrix_forge::core::models::{
    ArtifactEnvelope, ExecutionConfig, RunReport, TestCounts, TestType,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config(test_type: TestType) -> ExecutionConfig {
    ExecutionConfig::new(
        test_type,
        "pytest",
        "python",
        Path::new("tests").join(test_type.dir_name()),
    )
}

/// Writes a completed-run JSON artifact into `dir`.
/// 将一次完成运行的 JSON 产物写入 `dir`。
fn write_json_artifact(dir: &Path, name: &str, counts: TestCounts, execution_time: f64) {
    let report = RunReport::Completed {
        counts,
        execution_time,
        config: config(TestType::Unit),
    };
    let envelope = ArtifactEnvelope::new(report);
    let content = serde_json::to_string_pretty(&envelope).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

fn counts(total: u64, passed: u64, failed: u64, skipped: u64, errors: u64) -> TestCounts {
    TestCounts {
        total,
        passed,
        failed,
        skipped,
        errors,
    }
}

#[cfg(test)]
mod json_collection_tests {
    use super::*;

    #[test]
    fn test_collects_completed_run_artifacts() {
        let dir = TempDir::new().unwrap();
        write_json_artifact(dir.path(), "run-a.json", counts(10, 8, 1, 1, 0), 12.5);
        write_json_artifact(dir.path(), "run-b.json", counts(5, 5, 0, 0, 0), 2.5);

        let mut aggregator = ResultAggregator::new();
        let stats = aggregator.collect_results(dir.path()).unwrap();
        assert_eq!(stats.scanned, 2);
        assert_eq!(stats.collected, 2);
        assert_eq!(stats.skipped, 0);

        let results = aggregator.results();
        assert_eq!(results.total_tests, 15);
        assert_eq!(results.passed, 13);
        assert_eq!(results.failed, 1);
        assert_eq!(results.skipped, 1);
        assert_eq!(results.execution_time, 15.0);
        assert_eq!(results.test_suites.len(), 2);
    }

    /// A failed run produced no counts; it is accounted as one errored test
    /// so the aggregate cannot silently shrink.
    /// 失败的运行没有产生计数；按一个出错测试入账，聚合结果不会被静默缩小。
    #[test]
    fn test_failed_run_artifact_counts_as_error() {
        let dir = TempDir::new().unwrap();
        let report = RunReport::Failed {
            error: "boom".to_string(),
            execution_time: 1.5,
            config: config(TestType::E2e),
        };
        let content = serde_json::to_string(&ArtifactEnvelope::new(report)).unwrap();
        fs::write(dir.path().join("run-err.json"), content).unwrap();

        let mut aggregator = ResultAggregator::new();
        aggregator.collect_results(dir.path()).unwrap();

        let results = aggregator.results();
        assert_eq!(results.total_tests, 1);
        assert_eq!(results.errors, 1);
        assert_eq!(results.execution_time, 1.5);
    }

    #[test]
    fn test_nested_directories_are_walked() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("job-1").join("results");
        fs::create_dir_all(&nested).unwrap();
        write_json_artifact(&nested, "run.json", counts(3, 3, 0, 0, 0), 1.0);

        let mut aggregator = ResultAggregator::new();
        let stats = aggregator.collect_results(dir.path()).unwrap();
        assert_eq!(stats.collected, 1);
        assert_eq!(aggregator.results().total_tests, 3);
    }

    /// Collecting {A, B} then {C} equals collecting {A, B, C} at once.
    /// 先收集 {A, B} 再收集 {C}，与一次收集 {A, B, C} 结果一致。
    #[test]
    fn test_accumulation_is_associative_over_disjoint_sets() {
        let first = TempDir::new().unwrap();
        write_json_artifact(first.path(), "a.json", counts(10, 9, 1, 0, 0), 3.0);
        write_json_artifact(first.path(), "b.json", counts(4, 4, 0, 0, 0), 1.0);
        let second = TempDir::new().unwrap();
        write_json_artifact(second.path(), "c.json", counts(6, 5, 0, 1, 0), 2.0);

        let combined = TempDir::new().unwrap();
        for (source, name) in [
            (first.path(), ["a.json", "b.json"].as_slice()),
            (second.path(), ["c.json"].as_slice()),
        ] {
            for file in name {
                fs::copy(source.join(file), combined.path().join(file)).unwrap();
            }
        }

        let mut incremental = ResultAggregator::new();
        incremental.collect_results(first.path()).unwrap();
        incremental.collect_results(second.path()).unwrap();

        let mut single_pass = ResultAggregator::new();
        single_pass.collect_results(combined.path()).unwrap();

        let a = incremental.results();
        let b = single_pass.results();
        assert_eq!(a.total_tests, b.total_tests);
        assert_eq!(a.passed, b.passed);
        assert_eq!(a.failed, b.failed);
        assert_eq!(a.skipped, b.skipped);
        assert_eq!(a.execution_time, b.execution_time);
    }
}

#[cfg(test)]
mod malformed_artifact_tests {
    use super::*;

    #[test]
    fn test_lenient_mode_skips_malformed_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("keyless.json"), r#"{"other": 1}"#).unwrap();
        write_json_artifact(dir.path(), "good.json", counts(2, 2, 0, 0, 0), 0.5);

        let mut aggregator = ResultAggregator::new();
        let stats = aggregator.collect_results(dir.path()).unwrap();

        assert_eq!(stats.scanned, 3);
        assert_eq!(stats.collected, 1);
        assert_eq!(stats.skipped, 2);
        assert_eq!(aggregator.results().total_tests, 2);
    }

    #[test]
    fn test_strict_mode_aborts_on_malformed_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let mut aggregator = ResultAggregator::strict();
        match aggregator.collect_results(dir.path()) {
            Err(MatrixError::MalformedArtifact { path, .. }) => {
                assert!(path.ends_with("broken.json"));
            }
            other => panic!("expected MalformedArtifact, got {other:?}"),
        }
    }

    /// Artifacts violating `total == passed + failed + skipped + errors`
    /// are rejected rather than poisoning the totals.
    /// 违反计数一致性不变式的产物会被拒绝，而不是污染总计。
    #[test]
    fn test_inconsistent_counts_are_rejected() {
        let dir = TempDir::new().unwrap();
        let payload = serde_json::json!({
            "test_results": {
                "total": 10,
                "passed": 3,
                "failed": 0,
                "skipped": 0,
                "errors": 0,
                "execution_time": 1.0,
                "config": config(TestType::Unit),
            }
        });
        fs::write(
            dir.path().join("lying.json"),
            serde_json::to_string(&payload).unwrap(),
        )
        .unwrap();

        let mut aggregator = ResultAggregator::strict();
        assert!(matches!(
            aggregator.collect_results(dir.path()),
            Err(MatrixError::MalformedArtifact { .. })
        ));
    }
}

#[cfg(test)]
mod junit_xml_tests {
    use super::*;

    const JUNIT_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="api-suite" tests="5" failures="1" errors="0" skipped="1" time="3.5">
    <testcase name="test_one" time="1.0"/>
  </testsuite>
  <testsuite name="ui-suite" tests="3" failures="0" errors="1" time="1.5"/>
</testsuites>
"#;

    /// JUnit summation: `tests`, `failures`, `errors`, `skipped`, and
    /// `time` attributes are summed across every `<testsuite>` element.
    /// JUnit 求和：对每个 `<testsuite>` 元素的属性求和。
    #[test]
    fn test_junit_suites_are_summed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("junit.xml"), JUNIT_REPORT).unwrap();

        let mut aggregator = ResultAggregator::new();
        let stats = aggregator.collect_results(dir.path()).unwrap();
        assert_eq!(stats.collected, 1);

        let results = aggregator.results();
        assert_eq!(results.total_tests, 8);
        assert_eq!(results.failed, 1);
        assert_eq!(results.errors, 1);
        assert_eq!(results.skipped, 1);
        assert_eq!(results.passed, 5);
        assert_eq!(results.execution_time, 5.0);
        assert_eq!(results.test_suites.len(), 2);
        assert_eq!(results.test_suites[0]["name"], "api-suite");
    }

    #[test]
    fn test_xml_without_testsuite_elements_is_malformed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("other.xml"), "<coverage line-rate=\"0.9\"/>").unwrap();

        let mut aggregator = ResultAggregator::strict();
        assert!(matches!(
            aggregator.collect_results(dir.path()),
            Err(MatrixError::MalformedArtifact { .. })
        ));
    }

    #[test]
    fn test_mixed_json_and_xml_artifacts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("junit.xml"), JUNIT_REPORT).unwrap();
        write_json_artifact(dir.path(), "run.json", counts(10, 10, 0, 0, 0), 4.0);

        let mut aggregator = ResultAggregator::new();
        aggregator.collect_results(dir.path()).unwrap();

        let results = aggregator.results();
        assert_eq!(results.total_tests, 18);
        assert_eq!(results.passed, 15);
        assert_eq!(results.execution_time, 9.0);
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    /// The concrete seeded scenario from the reporting contract.
    /// 报告契约中的具体填充场景。
    #[test]
    fn test_seeded_summary_totals() {
        let mut aggregator = ResultAggregator::new();
        {
            let results = aggregator.results_mut();
            results.total_tests = 100;
            results.passed = 95;
            results.failed = 5;
            results.execution_time = 120.5;
        }

        let summary = aggregator.generate_summary().summary;
        assert_eq!(summary.total_tests, 100);
        assert_eq!(summary.passed, 95);
        assert_eq!(summary.failed, 5);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.success_rate, 95.0);
        assert_eq!(summary.execution_time, 120.5);
    }

    #[test]
    fn test_fresh_aggregator_summary_has_zero_success_rate() {
        let summary = ResultAggregator::new().generate_summary().summary;
        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    /// Collecting after summarizing is legal; the summary is regenerated.
    /// 生成摘要后继续收集是合法的；重新生成摘要即可。
    #[test]
    fn test_collect_after_summarize_continues_accumulating() {
        let dir = TempDir::new().unwrap();
        write_json_artifact(dir.path(), "a.json", counts(4, 4, 0, 0, 0), 1.0);

        let mut aggregator = ResultAggregator::new();
        aggregator.collect_results(dir.path()).unwrap();
        let first = aggregator.generate_summary().summary;
        assert_eq!(first.total_tests, 4);

        let more = TempDir::new().unwrap();
        write_json_artifact(more.path(), "b.json", counts(6, 6, 0, 0, 0), 1.0);
        aggregator.collect_results(more.path()).unwrap();

        let second = aggregator.generate_summary().summary;
        assert_eq!(second.total_tests, 10);
    }

    #[test]
    fn test_save_aggregated_results_round_trip() {
        let dir = TempDir::new().unwrap();
        write_json_artifact(dir.path(), "a.json", counts(8, 7, 1, 0, 0), 2.0);

        let mut aggregator = ResultAggregator::new();
        aggregator.collect_results(dir.path()).unwrap();

        let output = dir.path().join("reports").join("combined.json");
        let saved = aggregator.save_aggregated_results(&output).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(raw["summary"]["total_tests"], serde_json::json!(8));
        assert_eq!(raw["summary"]["success_rate"], serde_json::json!(87.5));
        assert_eq!(
            raw["test_suites"].as_array().unwrap().len(),
            saved.test_suites.len()
        );
    }
}
