//! 実行ドライバー
//!
//! レジストリ読み込み → タスク生成 → スケジューラ実行 → 集計 → レポート保存 の順に進める。
//! 途中の致命的エラーはそのまま呼び出し元へ返す。

use crate::error::Result;
use crate::probe::{HttpProber, Probe};
use crate::progress::{ConsoleProgress, ProgressSink};
use crate::registry::load_registry;
use crate::report::{aggregate, write_report};
use crate::scheduler::{RunStats, Scheduler};
use sourcecheck_common::config::ProbeConfig;
use sourcecheck_common::types::{Endpoint, ProbeTask, Report};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// 1回の実行結果
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// 構築済みレポート
    pub report: Report,
    /// 実行統計
    pub stats: RunStats,
}

/// エンドポイント一覧からタスクを作成（投入順はそのまま）
pub fn build_tasks(endpoints: Vec<Endpoint>, max_retries: u32) -> Vec<ProbeTask> {
    endpoints
        .into_iter()
        .map(|endpoint| ProbeTask::new(endpoint, max_retries))
        .collect()
}

/// 任意のプローブで全エンドポイントを確認し、レポートを構築する（保存はしない）
pub async fn run_with_prober<P>(
    prober: Arc<P>,
    config: &ProbeConfig,
    endpoints: Vec<Endpoint>,
    sink: &mut dyn ProgressSink,
) -> Result<RunOutput>
where
    P: Probe + 'static,
{
    let scheduler = Scheduler::new(prober, config.concurrency)?;
    let tasks = build_tasks(endpoints, config.max_retries);

    let started = Instant::now();
    let (outcomes, stats) = scheduler.run(tasks, sink).await?;
    let report = aggregate(outcomes, started.elapsed());

    info!(
        total = report.total_count,
        success = report.success_count,
        no_data = report.no_data_count,
        failed = report.failed_count,
        elapsed_ms = report.total_elapsed_ms,
        "Probe run completed"
    );
    Ok(RunOutput { report, stats })
}

/// HTTPプローバーで全エンドポイントを確認する（保存はしない）
pub async fn run_checks(
    config: &ProbeConfig,
    endpoints: Vec<Endpoint>,
    sink: &mut dyn ProgressSink,
) -> Result<RunOutput> {
    let prober = Arc::new(HttpProber::new(config)?);
    run_with_prober(prober, config, endpoints, sink).await
}

/// 設定に従って1回分の実行を行い、レポートを保存する
///
/// 進捗は標準出力へ1行ずつ書き出す。
pub async fn execute(config: &ProbeConfig) -> Result<RunOutput> {
    config.validate()?;
    let endpoints = load_registry(&config.registry_path).await?;

    let mut sink = ConsoleProgress::stdout(endpoints.len());
    let output = run_checks(config, endpoints, &mut sink).await?;

    write_report(&config.report_path, &output.report).await?;
    Ok(output)
}
