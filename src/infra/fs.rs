//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as persisting JSON documents and discovering artifact files.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如持久化 JSON 文档和发现产物文件。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Serializes a value as pretty-printed (2-space indented) JSON and writes
/// it to `path`, creating parent directories as needed.
///
/// 将值序列化为格式化（2 空格缩进）的 JSON 并写入 `path`，
/// 按需创建父目录。
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create parent directory: {}", parent.display())
        })?;
    }

    let mut json = serde_json::to_string_pretty(value).context("failed to serialize to JSON")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write file: {}", path.display()))?;
    Ok(())
}

/// Recursively finds result artifact files (`*.json` and `*.xml`) under a
/// directory. Entries are sorted by path for deterministic collection order.
///
/// 递归查找目录下的结果产物文件（`*.json` 和 `*.xml`）。
/// 条目按路径排序，以保证确定性的收集顺序。
pub fn find_artifact_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("json") | Some("xml")
            )
        })
        .collect()
}

/// Checks if a path exists and is a directory.
///
/// # Arguments
/// * `path` - Path to check
///
/// # Returns
/// `true` if the path exists and is a directory, `false` otherwise
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Expands a leading `~` in a user-supplied path.
/// 展开用户提供路径中的前导 `~`。
pub fn expand_path(input: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(input).into_owned())
}
