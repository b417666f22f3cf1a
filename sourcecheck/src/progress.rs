//! 進捗表示
//!
//! 確定したタスクごとに1行を出力する。表示専用で、結果には影響しない。

use crate::error::Result;
use sourcecheck_common::types::{ProbeOutcome, Report};
use std::io::{self, Write};
use std::path::Path;
use tracing::warn;

/// 確定結果の通知先
pub trait ProgressSink: Send {
    /// タスクが確定するたびに1回呼ばれる（確定順）
    fn on_outcome(&mut self, outcome: &ProbeOutcome);
}

/// 何も出力しないシンク
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn on_outcome(&mut self, _outcome: &ProbeOutcome) {}
}

/// 行単位で書き出すコンソールシンク
pub struct ConsoleProgress<W> {
    out: W,
    completed: usize,
    total: usize,
}

impl ConsoleProgress<io::Stdout> {
    /// 標準出力へ書き出すシンクを作成
    pub fn stdout(total: usize) -> Self {
        Self::new(io::stdout(), total)
    }
}

impl<W: Write + Send> ConsoleProgress<W> {
    /// 任意の出力先へ書き出すシンクを作成
    pub fn new(out: W, total: usize) -> Self {
        Self {
            out,
            completed: 0,
            total,
        }
    }

    /// 出力先を取り出す
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ProgressSink for ConsoleProgress<W> {
    fn on_outcome(&mut self, outcome: &ProbeOutcome) {
        self.completed += 1;
        let line = format!(
            "[{}/{}] {}",
            self.completed,
            self.total,
            format_progress_line(outcome)
        );
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!(error = %e, "Failed to write progress line");
        }
    }
}

/// 進捗1行分の文字列（グリフ・ラベル・表示名・キー・経過時間）
pub fn format_progress_line(outcome: &ProbeOutcome) -> String {
    let mut line = format!(
        "{} {:<7} {} ({}) {}ms",
        outcome.status.glyph(),
        outcome.status.label(),
        outcome.endpoint.name,
        outcome.key(),
        outcome.elapsed_ms
    );
    if outcome.has_usable_data {
        line.push_str(&format!(" items={}", outcome.item_count));
    } else if let Some(message) = &outcome.error_message {
        line.push_str(&format!(" - {}", message));
    }
    line
}

/// 実行後のサマリー
///
/// 件数・総経過時間・応答の速い上位`top`件・レポートの保存先を含む。
pub fn render_summary(report: &Report, report_path: &Path, top: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\nChecked {} endpoints in {}ms: {} ok, {} without data, {} failed\n",
        report.total_count,
        report.total_elapsed_ms,
        report.success_count,
        report.no_data_count,
        report.failed_count
    ));

    let fastest: Vec<&ProbeOutcome> = report.fastest().take(top).collect();
    if !fastest.is_empty() {
        out.push_str("Fastest sources:\n");
        for (rank, outcome) in fastest.iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {} ({}) {}ms, {} items\n",
                rank + 1,
                outcome.endpoint.name,
                outcome.key(),
                outcome.elapsed_ms,
                outcome.item_count
            ));
        }
    }

    out.push_str(&format!("Report: {}\n", report_path.display()));
    out
}

/// サマリーを出力先へ書き出す
///
/// 出力先が閉じられている場合はI/Oエラーとして返す。
pub fn write_summary<W: Write>(out: &mut W, summary: &str) -> Result<()> {
    out.write_all(summary.as_bytes())?;
    out.flush()?;
    Ok(())
}
