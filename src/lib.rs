//! # Matrix Forge Library / Matrix Forge 库
//!
//! This library provides the core functionality for the matrix-forge tool,
//! a CI test-matrix pipeline: it turns a test-suite directory layout into
//! an explicit parallel execution matrix, runs individual matrix entries,
//! and aggregates the resulting artifacts into one combined report.
//!
//! 此库为 matrix-forge 工具提供核心功能，
//! 这是一条 CI 测试矩阵流水线：它将测试套件目录布局转换为显式的并行
//! 执行矩阵，运行单个矩阵条目，并将产生的产物聚合为一份合并报告。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, matrix generation, test execution, aggregation
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Console summaries of matrices and aggregated results
//! - `cli` - Command-line interface
//! - `commands` - Subcommand implementations
//!
//! - `core` - 数据模型、矩阵生成、测试执行、聚合
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 矩阵和聚合结果的控制台摘要
//! - `cli` - 命令行接口
//! - `commands` - 子命令实现

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::aggregator;
pub use crate::core::generator;
pub use crate::core::models;
pub use crate::core::runner;
