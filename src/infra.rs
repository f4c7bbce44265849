//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for matrix-forge,
//! including child process execution and file system operations.
//!
//! 此模块为 matrix-forge 提供基础设施服务，
//! 包括子进程执行和文件系统操作。

pub mod command;
pub mod fs;
