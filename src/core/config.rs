//! # Pipeline Configuration Module / 流水线配置模块
//!
//! Optional `MatrixForge.toml` settings controlling matrix expansion and
//! test execution. Every field has a default, so the file is only needed
//! when a project deviates from the stock pytest/python setup.
//!
//! 可选的 `MatrixForge.toml` 设置，控制矩阵展开和测试执行。
//! 每个字段都有默认值，因此只有当项目偏离标准 pytest/python 设置时才需要此文件。

use crate::core::models::{Browser, Device, Environment};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The default name of the configuration file, looked up in the working
/// directory when no explicit `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "MatrixForge.toml";

/// Settings for matrix generation and test execution, loaded from a TOML
/// file. The environment, browser, and device sets drive the expansion
/// rules; the defaults reproduce the stock matrix exactly.
///
/// 从 TOML 文件加载的矩阵生成和测试执行设置。
/// 环境、浏览器和设备集合驱动展开规则；默认值精确重现标准矩阵。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatrixConfig {
    /// The test framework invoked by the runner (e.g. "pytest").
    /// 运行器调用的测试框架（例如 "pytest"）。
    #[serde(default = "default_framework")]
    pub framework: String,
    /// The implementation language of the test suite, matched by the
    /// `python` scope filter.
    /// 测试套件的实现语言，由 `python` 范围过滤器匹配。
    #[serde(default = "default_language")]
    pub language: String,
    /// Environments integration and e2e entries are replicated across.
    /// 集成和 e2e 条目要复制到的环境列表。
    #[serde(default = "Environment::defaults")]
    pub environments: Vec<Environment>,
    /// Browsers in the e2e browser × device grid.
    /// e2e 浏览器 × 设备网格中的浏览器。
    #[serde(default = "Browser::defaults")]
    pub browsers: Vec<Browser>,
    /// Devices in the e2e browser × device grid.
    /// e2e 浏览器 × 设备网格中的设备。
    #[serde(default = "Device::defaults")]
    pub devices: Vec<Device>,
    /// An optional command line overriding the framework invocation, split
    /// shell-style. The test path is appended as the final argument.
    /// 可选的命令行，覆盖框架调用，按 shell 风格拆分。
    /// 测试路径作为最后一个参数附加。
    #[serde(default)]
    pub runner_command: Option<String>,
    /// When `true` (the default), a missing base path is an error instead
    /// of an empty matrix. Misconfigured CI pipelines should fail loudly.
    /// 为 `true`（默认）时，缺失的基础路径是错误而不是空矩阵。
    /// 配置错误的 CI 流水线应当立刻失败。
    #[serde(default = "default_strict")]
    pub strict: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            framework: default_framework(),
            language: default_language(),
            environments: Environment::defaults(),
            browsers: Browser::defaults(),
            devices: Device::defaults(),
            runner_command: None,
            strict: default_strict(),
        }
    }
}

impl MatrixConfig {
    /// Loads the configuration from an explicit TOML file path.
    /// 从显式的 TOML 文件路径加载配置。
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: MatrixConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Resolves the effective configuration: an explicit path must parse,
    /// the default file is used when present, and stock defaults otherwise.
    ///
    /// 解析生效的配置：显式路径必须解析成功，默认文件存在时使用它，
    /// 否则使用标准默认值。
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

fn default_framework() -> String {
    "pytest".to_string()
}

fn default_language() -> String {
    "python".to_string()
}

fn default_strict() -> bool {
    true
}
