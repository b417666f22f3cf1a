//! レポートの永続化
//!
//! 実行終了時に1度だけJSONとして書き出す。既存ファイルは上書きする。

use crate::error::{Result, SourceCheckError};
use sourcecheck_common::error::CommonError;
use sourcecheck_common::types::Report;
use std::path::Path;
use tracing::info;

/// レポートを書き出す
pub async fn write_report(path: &Path, report: &Report) -> Result<()> {
    let write_error = |message: String| SourceCheckError::ReportWrite {
        path: path.to_path_buf(),
        message,
    };

    let mut body = serde_json::to_vec_pretty(report).map_err(|e| write_error(e.to_string()))?;
    body.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(e.to_string()))?;
    }
    tokio::fs::write(path, body)
        .await
        .map_err(|e| write_error(e.to_string()))?;

    info!(
        path = %path.display(),
        total = report.total_count,
        "Report written"
    );
    Ok(())
}

/// 書き出し済みのレポートを読み込む
///
/// 表示専用の応答時間順は保存されないため、読み込み後は空になる。
pub async fn load_report(path: &Path) -> Result<Report> {
    let content = tokio::fs::read(path).await?;
    let report = serde_json::from_slice(&content).map_err(CommonError::from)?;
    Ok(report)
}
