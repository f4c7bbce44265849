//! # Core Module / 核心模块
//!
//! This module contains the core functionality of matrix-forge,
//! including data models, configuration, matrix generation, test
//! execution, and result aggregation.
//!
//! 此模块包含 matrix-forge 的核心功能，
//! 包括数据模型、配置、矩阵生成、测试执行和结果聚合。

pub mod aggregator;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod runner;

// Re-exports
pub use aggregator::ResultAggregator;
pub use config::MatrixConfig;
pub use error::MatrixError;
pub use generator::MatrixGenerator;
pub use models::{ExecutionConfig, RunReport, Scope};
pub use runner::TestRunner;
