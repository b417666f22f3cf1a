//! エラー型定義
//!
//! 実行を中断させる致命的エラー（thiserror使用）。
//! 個々のプローブ失敗は`Category`で表現され、ここには現れない。

use sourcecheck_common::error::CommonError;
use std::path::PathBuf;
use thiserror::Error;

/// sourcecheck error type
#[derive(Debug, Error)]
pub enum SourceCheckError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Registry file does not exist
    #[error("Endpoint registry not found: {}", .0.display())]
    RegistryNotFound(PathBuf),

    /// Registry could not be parsed or validated
    #[error("Invalid endpoint registry {}: {message}", path.display())]
    Registry {
        /// Registry file path
        path: PathBuf,
        /// Details
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Probe task panicked or was cancelled
    #[error("Probe task failed: {0}")]
    Task(String),

    /// Report could not be written
    #[error("Failed to write report {}: {message}", path.display())]
    ReportWrite {
        /// Report file path
        path: PathBuf,
        /// Details
        message: String,
    },

    /// Logging initialization error
    #[error("Logging error: {0}")]
    Logging(String),
}

/// sourcecheck result type
pub type Result<T> = std::result::Result<T, SourceCheckError>;

impl From<tokio::task::JoinError> for SourceCheckError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
