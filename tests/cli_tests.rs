//! # CLI Integration Tests / CLI 集成测试
//!
//! Drives the compiled binary end to end through a temporary working
//! directory, checking exit codes, stderr diagnostics, and the files each
//! subcommand leaves behind.
//!
//! 通过临时工作目录端到端驱动编译后的二进制文件，
//! 检查退出码、stderr 诊断信息以及每个子命令留下的文件。

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn forge() -> Command {
    Command::cargo_bin("matrix-forge").expect("binary should build")
}

/// Creates a test-suite layout under `root/tests` with the given subdirs.
/// 在 `root/tests` 下创建包含给定子目录的测试套件布局。
fn seed_suite(root: &Path, subdirs: &[&str]) {
    let base = root.join("tests");
    fs::create_dir(&base).unwrap();
    for subdir in subdirs {
        fs::create_dir(base.join(subdir)).unwrap();
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

mod generate_command {
    use super::*;

    #[test]
    fn test_generate_writes_matrix_file() {
        let dir = TempDir::new().unwrap();
        seed_suite(dir.path(), &["unit", "e2e"]);

        forge()
            .current_dir(dir.path())
            .args(["generate"])
            .assert()
            .success();

        let matrix = read_json(&dir.path().join("test-matrix.json"));
        let entries = matrix.as_array().expect("matrix should be a JSON array");
        assert_eq!(entries.len(), 13);
        assert!(entries.iter().all(|e| e.get("test_type").is_some()));
    }

    #[test]
    fn test_generate_scope_filters_entries() {
        let dir = TempDir::new().unwrap();
        seed_suite(dir.path(), &["unit", "integration", "e2e"]);

        forge()
            .current_dir(dir.path())
            .args(["generate", "--scope", "unit"])
            .assert()
            .success();

        let matrix = read_json(&dir.path().join("test-matrix.json"));
        let entries = matrix.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["test_type"], "unit");
    }

    #[test]
    fn test_generate_rejects_unknown_scope() {
        let dir = TempDir::new().unwrap();
        seed_suite(dir.path(), &["unit"]);

        forge()
            .current_dir(dir.path())
            .args(["generate", "--scope", "smoke"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown scope 'smoke'"));
    }

    #[test]
    fn test_generate_fails_on_missing_base_path() {
        let dir = TempDir::new().unwrap();

        forge()
            .current_dir(dir.path())
            .args(["generate", "--base-path", "no-such-dir"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("missing or not a directory"));
    }

    #[test]
    fn test_generate_lenient_writes_empty_matrix() {
        let dir = TempDir::new().unwrap();

        forge()
            .current_dir(dir.path())
            .args(["generate", "--base-path", "no-such-dir", "--lenient"])
            .assert()
            .success();

        let matrix = read_json(&dir.path().join("test-matrix.json"));
        assert_eq!(matrix.as_array().unwrap().len(), 0);
    }
}

mod run_command {
    use super::*;

    #[test]
    fn test_run_requires_index_or_all() {
        let dir = TempDir::new().unwrap();

        forge()
            .current_dir(dir.path())
            .args(["run"])
            .assert()
            .failure();
    }

    #[test]
    fn test_run_index_out_of_bounds_fails() {
        let dir = TempDir::new().unwrap();
        seed_suite(dir.path(), &["unit"]);

        forge()
            .current_dir(dir.path())
            .args(["generate"])
            .assert()
            .success();

        forge()
            .current_dir(dir.path())
            .args(["run", "--index", "5", "--simulate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("out of bounds"));
    }

    #[test]
    fn test_run_index_writes_one_artifact() {
        let dir = TempDir::new().unwrap();
        seed_suite(dir.path(), &["unit"]);

        forge()
            .current_dir(dir.path())
            .args(["generate"])
            .assert()
            .success();

        forge()
            .current_dir(dir.path())
            .args(["run", "--index", "0", "--simulate"])
            .assert()
            .success();

        let artifacts: Vec<_> = fs::read_dir(dir.path().join("test-artifacts"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(artifacts.len(), 1);

        let envelope = read_json(&artifacts[0]);
        assert_eq!(envelope["test_results"]["total"], 24);
        assert_eq!(envelope["test_results"]["config"]["test_type"], "unit");
    }
}

mod aggregate_command {
    use super::*;

    #[test]
    fn test_aggregate_fails_on_missing_artifacts_dir() {
        let dir = TempDir::new().unwrap();

        forge()
            .current_dir(dir.path())
            .args(["aggregate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("test-artifacts"));
    }

    /// The full generate → run --all → aggregate flow over a simulated
    /// suite, checked against the combined report on disk.
    /// 对模拟套件执行完整的生成 → 运行 --all → 聚合流程，
    /// 并核对磁盘上的合并报告。
    #[test]
    fn test_generate_run_aggregate_flow() {
        let dir = TempDir::new().unwrap();
        seed_suite(dir.path(), &["unit", "integration"]);

        forge()
            .current_dir(dir.path())
            .args(["generate"])
            .assert()
            .success();

        forge()
            .current_dir(dir.path())
            .args(["run", "--all", "--simulate", "--jobs", "2"])
            .assert()
            .success();

        forge()
            .current_dir(dir.path())
            .args(["aggregate", "--strict"])
            .assert()
            .success();

        // unit simulates 24 tests; each of the 3 integration entries
        // simulates 8, all passing.
        let report = read_json(&dir.path().join("combined-report.json"));
        assert_eq!(report["summary"]["total_tests"], 48);
        assert_eq!(report["summary"]["passed"], 48);
        assert_eq!(report["summary"]["failed"], 0);
        assert_eq!(report["summary"]["success_rate"], 100.0);
        assert_eq!(report["test_suites"].as_array().unwrap().len(), 4);
    }
}

mod init_command {
    use super::*;

    #[test]
    fn test_init_non_interactive_writes_config() {
        let dir = TempDir::new().unwrap();

        forge()
            .current_dir(dir.path())
            .args(["init", "--non-interactive"])
            .assert()
            .success();

        let content = fs::read_to_string(dir.path().join("MatrixForge.toml")).unwrap();
        let config: toml::Value = toml::from_str(&content).unwrap();
        assert_eq!(config["framework"].as_str(), Some("pytest"));
        assert_eq!(config["environments"].as_array().unwrap().len(), 2);
        assert_eq!(config["browsers"].as_array().unwrap().len(), 3);
    }
}
