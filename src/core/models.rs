//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout matrix-forge.
//! It includes the execution configuration that makes up a CI matrix entry,
//! the per-run result reports, and the aggregated totals.
//!
//! 此模块定义了整个 matrix-forge 中使用的核心数据结构。
//! 它包括构成 CI 矩阵条目的执行配置、每次运行的结果报告以及聚合的总计。

use crate::core::error::MatrixError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The five test types a test-suite layout can provide, each mapped to a
/// subdirectory of the scanned base path.
/// 测试套件布局可以提供的五种测试类型，每种对应扫描基础路径的一个子目录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Fast, isolated tests with no external dependencies.
    /// 快速、隔离、无外部依赖的测试。
    Unit,
    /// Component-level tests exercising a single module boundary.
    /// 组件级测试，针对单个模块边界。
    Component,
    /// Integration tests against deployed service environments.
    /// 针对已部署服务环境的集成测试。
    Integration,
    /// Browser-driven end-to-end tests, expanded per browser and device.
    /// 浏览器驱动的端到端测试，按浏览器和设备展开。
    E2e,
    /// Performance and load tests.
    /// 性能和负载测试。
    Performance,
}

impl TestType {
    /// All supported test types, in discovery order.
    /// 所有支持的测试类型，按发现顺序排列。
    pub const ALL: [TestType; 5] = [
        TestType::Unit,
        TestType::Component,
        TestType::Integration,
        TestType::E2e,
        TestType::Performance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Unit => "unit",
            TestType::Component => "component",
            TestType::Integration => "integration",
            TestType::E2e => "e2e",
            TestType::Performance => "performance",
        }
    }

    /// The subdirectory name this test type occupies under the base path.
    /// 此测试类型在基础路径下占用的子目录名称。
    pub fn dir_name(self) -> &'static str {
        self.as_str()
    }

    /// The category a test type belongs to. Unit-style tests run in-process,
    /// integration and performance tests hit APIs, e2e tests drive a UI.
    /// 测试类型所属的分类。单元类测试在进程内运行，
    /// 集成和性能测试访问 API，端到端测试驱动 UI。
    pub fn category(self) -> Category {
        match self {
            TestType::Unit | TestType::Component => Category::Unit,
            TestType::Integration | TestType::Performance => Category::Api,
            TestType::E2e => Category::Ui,
        }
    }

    /// Whether this test type is replicated once per target environment.
    /// 此测试类型是否按目标环境各复制一份。
    pub fn multi_environment(self) -> bool {
        matches!(self, TestType::Integration | TestType::E2e)
    }

    /// Whether this test type is expanded across the browser × device grid.
    /// 此测试类型是否按浏览器 × 设备网格展开。
    pub fn cross_browser(self) -> bool {
        matches!(self, TestType::E2e)
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping of test types, used by the `api`/`ui` scope filters.
/// 测试类型的粗粒度分组，由 `api`/`ui` 范围过滤器使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Api,
    Ui,
    Unit,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Api => "api",
            Category::Ui => "ui",
            Category::Unit => "unit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target environment for a matrix entry.
/// 矩阵条目的目标环境。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    /// The default environment set used when no config file overrides it.
    /// 未被配置文件覆盖时使用的默认环境集合。
    pub fn defaults() -> Vec<Environment> {
        vec![Environment::Staging, Environment::Production]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browsers covered by the e2e browser × device grid.
/// e2e 浏览器 × 设备网格覆盖的浏览器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
}

impl Browser {
    pub fn defaults() -> Vec<Browser> {
        vec![Browser::Chrome, Browser::Firefox, Browser::Edge]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Edge => "edge",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device form factors covered by the e2e browser × device grid.
/// e2e 浏览器 × 设备网格覆盖的设备形态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
    Tablet,
}

impl Device {
    pub fn defaults() -> Vec<Device> {
        vec![Device::Desktop, Device::Mobile, Device::Tablet]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scope filter selecting which discovered configurations end up in a
/// generated matrix. `python` matches the language, `api`/`ui` match the
/// category, and the remaining values match the test type exactly.
///
/// 范围过滤器，选择哪些已发现的配置进入生成的矩阵。
/// `python` 匹配语言，`api`/`ui` 匹配分类，其余值精确匹配测试类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Language(&'static str),
    Category(Category),
    Type(TestType),
}

impl Scope {
    /// Checks whether a configuration survives this scope filter.
    pub fn matches(&self, config: &ExecutionConfig) -> bool {
        match self {
            Scope::All => true,
            Scope::Language(lang) => config.language == *lang,
            Scope::Category(category) => config.category == *category,
            Scope::Type(test_type) => config.test_type == *test_type,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Language(lang) => lang,
            Scope::Category(category) => category.as_str(),
            Scope::Type(test_type) => test_type.as_str(),
        }
    }
}

impl FromStr for Scope {
    type Err = MatrixError;

    /// Unknown scope strings are rejected rather than silently widened to
    /// `all`; a typo in a CI pipeline should fail loudly at parse time.
    /// 未知的范围字符串会被拒绝，而不是被静默扩展为 `all`；
    /// CI 流水线中的拼写错误应在解析时立刻失败。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Scope::All),
            "python" => Ok(Scope::Language("python")),
            "api" => Ok(Scope::Category(Category::Api)),
            "ui" => Ok(Scope::Category(Category::Ui)),
            "unit" => Ok(Scope::Type(TestType::Unit)),
            "component" => Ok(Scope::Type(TestType::Component)),
            "integration" => Ok(Scope::Type(TestType::Integration)),
            "e2e" => Ok(Scope::Type(TestType::E2e)),
            "performance" => Ok(Scope::Type(TestType::Performance)),
            other => Err(MatrixError::UnknownScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned unit of test execution: a single entry of the CI matrix.
/// Field order matters for the serialized matrix, which is a key-stable
/// hand-off contract to the CI orchestrator. `browser` and `device` are
/// serialized as explicit `null` when absent, never omitted.
///
/// 一个计划的测试执行单元：CI 矩阵的单个条目。
/// 字段顺序对序列化矩阵很重要，它是交给 CI 编排器的键稳定契约。
/// `browser` 和 `device` 缺失时序列化为显式 `null`，而不是省略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub test_type: TestType,
    pub framework: String,
    pub language: String,
    pub category: Category,
    pub module: String,
    pub test_path: PathBuf,
    pub environment: Environment,
    pub browser: Option<Browser>,
    pub device: Option<Device>,
}

impl ExecutionConfig {
    /// Creates a base configuration for a discovered test-type directory.
    /// Category and module are derived from the test type; environment
    /// defaults to staging with no browser or device.
    ///
    /// 为发现的测试类型目录创建基础配置。
    /// 分类和模块从测试类型派生；环境默认为 staging，不带浏览器或设备。
    pub fn new(
        test_type: TestType,
        framework: impl Into<String>,
        language: impl Into<String>,
        test_path: PathBuf,
    ) -> Self {
        Self {
            test_type,
            framework: framework.into(),
            language: language.into(),
            category: test_type.category(),
            module: test_type.as_str().to_string(),
            test_path,
            environment: Environment::Staging,
            browser: None,
            device: None,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_browser_device(mut self, browser: Browser, device: Device) -> Self {
        self.browser = Some(browser);
        self.device = Some(device);
        self
    }

    /// Builds the environment-variable map passed to the child test process.
    /// These variables are only ever set on the child's explicit environment
    /// mapping; the parent process environment is never mutated.
    ///
    /// 构建传递给子测试进程的环境变量映射。
    /// 这些变量只会设置在子进程的显式环境映射上；父进程环境永远不会被修改。
    pub fn env_map(&self) -> BTreeMap<&'static str, String> {
        let mut env = BTreeMap::new();
        env.insert("TEST_TYPE", self.test_type.to_string());
        env.insert("TEST_FRAMEWORK", self.framework.clone());
        env.insert("TEST_LANGUAGE", self.language.clone());
        env.insert("TEST_CATEGORY", self.category.to_string());
        env.insert("TEST_MODULE", self.module.clone());
        env.insert("TEST_ENVIRONMENT", self.environment.to_string());
        if let Some(browser) = self.browser {
            env.insert("BROWSER", browser.to_string());
        }
        if let Some(device) = self.device {
            env.insert("DEVICE", device.to_string());
        }
        env
    }

    /// A short human-readable label for console output and artifact names,
    /// e.g. `e2e-staging-chrome-desktop`.
    /// 用于控制台输出和产物命名的简短可读标签，例如 `e2e-staging-chrome-desktop`。
    pub fn label(&self) -> String {
        let mut label = format!("{}-{}", self.test_type, self.environment);
        if let Some(browser) = self.browser {
            label.push('-');
            label.push_str(browser.as_str());
        }
        if let Some(device) = self.device {
            label.push('-');
            label.push_str(device.as_str());
        }
        label
    }
}

/// Test outcome counts for a single run.
/// The consistency invariant `total == passed + failed + skipped + errors`
/// is enforced wherever counts are constructed from external input.
///
/// 单次运行的测试结果计数。
/// 一致性不变式 `total == passed + failed + skipped + errors`
/// 在所有从外部输入构造计数的地方强制执行。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub errors: u64,
}

impl TestCounts {
    pub fn is_consistent(&self) -> bool {
        self.total == self.passed + self.failed + self.skipped + self.errors
    }
}

/// The report produced by one `TestRunner` invocation. Execution failures
/// are folded into the `Failed` variant instead of being propagated, so a
/// broken run still yields an artifact the aggregator can account for.
///
/// Serialized untagged: a completed run carries the count fields, a failed
/// run carries an `error` string; both always carry `execution_time` and
/// the echoed `config`.
///
/// 一次 `TestRunner` 调用产生的报告。执行失败被折叠进 `Failed` 变体而不是
/// 向上传播，因此失败的运行仍会产生聚合器可以统计的产物。
///
/// 无标签序列化：完成的运行携带计数字段，失败的运行携带 `error` 字符串；
/// 两者始终携带 `execution_time` 和回显的 `config`。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunReport {
    Completed {
        #[serde(flatten)]
        counts: TestCounts,
        execution_time: f64,
        config: ExecutionConfig,
    },
    Failed {
        error: String,
        execution_time: f64,
        config: ExecutionConfig,
    },
}

impl RunReport {
    pub fn execution_time(&self) -> f64 {
        match self {
            RunReport::Completed { execution_time, .. } => *execution_time,
            RunReport::Failed { execution_time, .. } => *execution_time,
        }
    }

    pub fn config(&self) -> &ExecutionConfig {
        match self {
            RunReport::Completed { config, .. } => config,
            RunReport::Failed { config, .. } => config,
        }
    }

    pub fn counts(&self) -> Option<&TestCounts> {
        match self {
            RunReport::Completed { counts, .. } => Some(counts),
            RunReport::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RunReport::Completed { .. } => None,
            RunReport::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunReport::Failed { .. })
    }
}

/// The envelope written to disk for one run. The aggregator reads only the
/// `test_results` key; `generated_at` is informational.
/// 一次运行写入磁盘的信封格式。聚合器只读取 `test_results` 键；
/// `generated_at` 仅供参考。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub test_results: RunReport,
    #[serde(default)]
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ArtifactEnvelope {
    pub fn new(test_results: RunReport) -> Self {
        Self {
            test_results,
            generated_at: Some(chrono::Utc::now()),
        }
    }
}

/// Running totals accumulated by the aggregator. Counts only ever grow;
/// `test_suites` keeps the raw collected payloads in insertion order for
/// traceability.
///
/// 聚合器累积的运行总计。计数只增不减；
/// `test_suites` 按插入顺序保留原始收集的载荷以便追溯。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub total_tests: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub errors: u64,
    pub execution_time: f64,
    pub test_suites: Vec<serde_json::Value>,
}

impl AggregatedResult {
    /// Folds one run's counts into the totals.
    pub fn add_counts(&mut self, counts: &TestCounts) {
        self.total_tests += counts.total;
        self.passed += counts.passed;
        self.failed += counts.failed;
        self.skipped += counts.skipped;
        self.errors += counts.errors;
    }

    /// Percentage of passed tests over all collected tests, rounded to two
    /// decimals. Defined as `0.0` for an empty aggregation so a fresh
    /// aggregator never divides by zero.
    ///
    /// 通过测试占所有收集测试的百分比，保留两位小数。
    /// 空聚合定义为 `0.0`，因此新建的聚合器永远不会除以零。
    pub fn success_rate(&self) -> f64 {
        if self.total_tests == 0 {
            return 0.0;
        }
        let rate = self.passed as f64 / self.total_tests as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}

/// The fixed-key totals block of the persisted combined report.
/// 持久化合并报告中键固定的总计块。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub total_tests: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub success_rate: f64,
    pub execution_time: f64,
}

/// The combined report persisted by `save_aggregated_results` and consumed
/// by downstream summary-rendering scripts.
/// 由 `save_aggregated_results` 持久化、供下游摘要渲染脚本使用的合并报告。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedSummary {
    pub summary: SummaryTotals,
    pub test_suites: Vec<serde_json::Value>,
    #[serde(default)]
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
}
