//! # Commands Module / 命令模块
//!
//! Implementations of the CLI subcommands: wizard-driven initialization,
//! matrix generation, matrix-entry execution, and artifact aggregation.
//!
//! CLI 子命令的实现：向导式初始化、矩阵生成、矩阵条目执行和产物聚合。

pub mod aggregate;
pub mod generate;
pub mod init;
pub mod run;
