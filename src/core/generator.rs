//! # Matrix Generator Module / 矩阵生成器模块
//!
//! Turns a test-suite directory layout into an exhaustive, explicit list of
//! execution configurations suitable for a CI parallel-matrix strategy.
//! Discovery walks the five fixed test-type subdirectories; expansion adds
//! per-environment replicas for integration and e2e, and the full
//! browser × device cross-product for e2e.
//!
//! 将测试套件目录布局转换为详尽、显式的执行配置列表，
//! 以适配 CI 并行矩阵策略。发现过程遍历五个固定的测试类型子目录；
//! 展开过程为集成和 e2e 添加每个环境的副本，并为 e2e 添加完整的
//! 浏览器 × 设备叉积。

use crate::core::config::MatrixConfig;
use crate::core::error::MatrixError;
use crate::core::models::{ExecutionConfig, Scope, TestType};
use crate::infra::fs::write_json_pretty;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Generates CI execution matrices from a discovered test-suite layout.
///
/// The expansion groups are additive, not mutually exclusive: a discovered
/// e2e directory yields one base entry, one entry per environment, and one
/// entry per browser × device pair (1 + 2 + 9 = 12 with the stock sets).
///
/// 从发现的测试套件布局生成 CI 执行矩阵。
///
/// 展开组是相加的，而不是互斥的：发现的 e2e 目录产生一个基础条目、
/// 每个环境一个条目，以及每个浏览器 × 设备组合一个条目
/// （使用标准集合时为 1 + 2 + 9 = 12）。
#[derive(Debug)]
pub struct MatrixGenerator {
    base_path: PathBuf,
    config: MatrixConfig,
    configs: Vec<ExecutionConfig>,
}

impl MatrixGenerator {
    pub fn new(base_path: impl Into<PathBuf>, config: MatrixConfig) -> Self {
        Self {
            base_path: base_path.into(),
            config,
            configs: Vec::new(),
        }
    }

    /// Convenience constructor with the stock configuration.
    /// 使用标准配置的便捷构造函数。
    pub fn with_defaults(base_path: impl Into<PathBuf>) -> Self {
        Self::new(base_path, MatrixConfig::default())
    }

    /// Scans the base path for test-type subdirectories and rebuilds the
    /// internal configuration list. The list is cleared first, so repeated
    /// calls re-discover instead of appending duplicates.
    ///
    /// In strict mode a missing base path is a `MissingDirectory` error;
    /// in lenient mode it simply yields zero configurations. Individual
    /// missing test-type subdirectories are always skipped silently.
    ///
    /// 扫描基础路径下的测试类型子目录并重建内部配置列表。
    /// 列表会先被清空，因此重复调用是重新发现而不是追加重复项。
    ///
    /// 严格模式下缺失的基础路径是 `MissingDirectory` 错误；
    /// 宽松模式下只会产生零个配置。缺失的单个测试类型子目录总是被静默跳过。
    pub fn discover_tests(&mut self) -> Result<usize, MatrixError> {
        self.configs.clear();

        if !self.base_path.is_dir() {
            if self.config.strict {
                return Err(MatrixError::MissingDirectory(self.base_path.clone()));
            }
            return Ok(0);
        }

        for test_type in TestType::ALL {
            let test_path = self.base_path.join(test_type.dir_name());
            if !test_path.is_dir() {
                continue;
            }
            self.expand(test_type, test_path);
        }

        Ok(self.configs.len())
    }

    /// Appends the base entry and the applicable expansion groups for one
    /// discovered test-type directory.
    /// 为一个已发现的测试类型目录追加基础条目和适用的展开组。
    fn expand(&mut self, test_type: TestType, test_path: PathBuf) {
        let base = ExecutionConfig::new(
            test_type,
            self.config.framework.clone(),
            self.config.language.clone(),
            test_path,
        );

        self.configs.push(base.clone());

        if test_type.multi_environment() {
            for environment in &self.config.environments {
                self.configs
                    .push(base.clone().with_environment(*environment));
            }
        }

        if test_type.cross_browser() {
            for browser in &self.config.browsers {
                for device in &self.config.devices {
                    self.configs
                        .push(base.clone().with_browser_device(*browser, *device));
                }
            }
        }
    }

    /// The configurations produced by the last `discover_tests` call.
    /// 最近一次 `discover_tests` 调用产生的配置。
    pub fn discovered(&self) -> &[ExecutionConfig] {
        &self.configs
    }

    /// Filters the discovered configurations by scope. Scope validation
    /// happens when the `Scope` value is parsed, so this cannot silently
    /// widen an unknown filter to `all`.
    ///
    /// 按范围过滤已发现的配置。范围验证在解析 `Scope` 值时完成，
    /// 因此这里不会把未知过滤器静默扩展为 `all`。
    pub fn generate_matrix(&self, scope: Scope) -> Vec<ExecutionConfig> {
        self.configs
            .iter()
            .filter(|config| scope.matches(config))
            .cloned()
            .collect()
    }

    /// Writes the scoped matrix as a pretty-printed JSON array, creating
    /// parent directories as needed. Returns the written entries so callers
    /// can report on them without regenerating.
    ///
    /// 将筛选后的矩阵写入格式化的 JSON 数组，按需创建父目录。
    /// 返回写入的条目，使调用方无需重新生成即可进行报告。
    pub fn save_matrix(&self, path: &Path, scope: Scope) -> Result<Vec<ExecutionConfig>> {
        let matrix = self.generate_matrix(scope);
        write_json_pretty(path, &matrix)
            .with_context(|| format!("failed to write matrix file: {}", path.display()))?;
        Ok(matrix)
    }
}

/// Loads a previously saved matrix file back into configurations, for the
/// `run` command consuming a matrix produced by `generate`.
/// 将先前保存的矩阵文件加载回配置列表，供 `run` 命令使用
/// `generate` 产生的矩阵。
pub fn load_matrix(path: &Path) -> Result<Vec<ExecutionConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read matrix file: {}", path.display()))?;
    let matrix: Vec<ExecutionConfig> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse matrix file: {}", path.display()))?;
    Ok(matrix)
}
