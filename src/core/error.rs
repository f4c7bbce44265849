//! # Error Types Module / 错误类型模块
//!
//! Typed errors for the matrix pipeline. Strict mode surfaces these to the
//! caller; lenient mode degrades to warnings and smaller results.
//!
//! 矩阵流水线的类型化错误。严格模式将它们上报给调用方；
//! 宽松模式降级为警告和更小的结果集。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    /// The requested scope is not one of the supported filter values.
    /// 请求的范围不是支持的过滤值之一。
    #[error(
        "unknown scope '{0}' (expected one of: all, python, api, ui, unit, component, integration, e2e, performance)"
    )]
    UnknownScope(String),

    /// The test base path does not exist or is not a directory.
    /// 测试基础路径不存在或不是目录。
    #[error("test base path is missing or not a directory: {0}")]
    MissingDirectory(PathBuf),

    /// An artifact file could not be parsed into a result payload.
    /// 产物文件无法解析为结果载荷。
    #[error("malformed artifact {path}: {reason}")]
    MalformedArtifact { path: PathBuf, reason: String },

    /// A matrix entry index past the end of the loaded matrix.
    /// 矩阵条目索引超出已加载矩阵的范围。
    #[error("matrix index {index} is out of bounds for a matrix of {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },
}
