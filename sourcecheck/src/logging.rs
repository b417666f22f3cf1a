//! ロギング初期化
//!
//! 標準出力は進捗行とサマリー専用のため、ログは標準エラーへ出力する。

use crate::config::log_filter;
use crate::error::{Result, SourceCheckError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// tracingサブスクライバーを初期化
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_new(log_filter())
        .map_err(|e| SourceCheckError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| SourceCheckError::Logging(e.to_string()))
}
