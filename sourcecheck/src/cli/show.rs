//! show サブコマンド
//!
//! 保存済みレポートのサマリーを表示します。

use crate::error::Result;
use crate::progress::render_summary;
use crate::report::{load_report, partition, rank_by_latency};
use clap::Args;
use std::path::PathBuf;

/// show サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Report file to read
    #[arg(
        short,
        long,
        default_value = "sourcecheck-report.json",
        env = "SOURCECHECK_REPORT"
    )]
    pub report: PathBuf,

    /// Number of fastest sources to list
    #[arg(long, default_value_t = 10, env = "SOURCECHECK_TOP")]
    pub top: usize,
}

/// レポートを読み込んでサマリー文字列を返す
pub async fn execute(args: &ShowArgs) -> Result<String> {
    let mut report = load_report(&args.report).await?;
    // 応答時間順は保存されないため読み込み後に再計算する
    let buckets = partition(&report.results);
    report.latency_ranking = rank_by_latency(&report.results, &buckets.successful);

    Ok(render_summary(&report, &args.report, args.top))
}
