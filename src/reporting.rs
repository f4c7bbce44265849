//! # Reporting Module / 报告模块
//!
//! This module handles the display of matrix and aggregation summaries.
//! It prints colorful, formatted tables to the console.
//!
//! 此模块处理矩阵和聚合摘要的展示。
//! 它在控制台打印彩色的格式化表格。

pub mod console;

// Re-export common reporting functions
pub use console::{print_aggregate_summary, print_matrix_summary, print_run_report};
