//! 同時実行数制限付きスケジューラ
//!
//! 同時実行数`C`のセマフォで投入を制御するスライディングウィンドウ方式。
//! 空きがある限りキュー先頭から投入し、1件確定するごとに次を投入する。
//! 確定順は不定だが、結果は投入順のインデックスに戻して返す。

pub mod in_flight;

use crate::error::{Result, SourceCheckError};
use crate::probe::Probe;
use crate::progress::ProgressSink;
use sourcecheck_common::error::CommonError;
use sourcecheck_common::types::{ProbeOutcome, ProbeTask};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub use in_flight::{InFlightGuard, InFlightTracker};

/// 実行統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// 同時に実行中だったプローブ数の最大値
    pub peak_in_flight: usize,
}

/// プローブスケジューラ
pub struct Scheduler<P> {
    prober: Arc<P>,
    concurrency: usize,
}

impl<P> Scheduler<P>
where
    P: Probe + 'static,
{
    /// 新しいスケジューラを作成（同時実行数は1以上）
    pub fn new(prober: Arc<P>, concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(SourceCheckError::Common(CommonError::Config(
                "concurrency must be at least 1".to_string(),
            )));
        }
        Ok(Self {
            prober,
            concurrency,
        })
    }

    /// 全タスクを実行し、投入順の結果を返す
    ///
    /// 個々のプローブの失敗で実行は中断しない。全タスクが確定するまで待つ。
    /// 進捗は確定順に`sink`へ1件ずつ通知する。
    pub async fn run(
        &self,
        tasks: Vec<ProbeTask>,
        sink: &mut dyn ProgressSink,
    ) -> Result<(Vec<ProbeOutcome>, RunStats)> {
        let total = tasks.len();
        info!(
            total = total,
            concurrency = self.concurrency,
            "Starting probe run"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let tracker = InFlightTracker::new();
        let mut slots: Vec<Option<ProbeOutcome>> = (0..total).map(|_| None).collect();
        let mut queue = tasks.into_iter().enumerate().peekable();
        let mut running = JoinSet::new();

        loop {
            while queue.peek().is_some() {
                let Ok(permit) = Arc::clone(&semaphore).try_acquire_owned() else {
                    break;
                };
                let Some((index, task)) = queue.next() else {
                    break;
                };
                debug!(
                    index = index,
                    endpoint_key = %task.endpoint.key,
                    "Dispatching probe"
                );

                let prober = Arc::clone(&self.prober);
                let tracker = tracker.clone();
                running.spawn(async move {
                    let _permit = permit;
                    let _guard = tracker.begin();
                    (index, prober.probe(task).await)
                });
            }

            let Some(joined) = running.join_next().await else {
                break;
            };
            let (index, outcome) = joined?;
            sink.on_outcome(&outcome);
            slots[index] = Some(outcome);
        }

        let outcomes = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    SourceCheckError::Task(format!("probe #{} produced no outcome", index))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let stats = RunStats {
            peak_in_flight: tracker.peak(),
        };
        info!(
            total = total,
            peak_in_flight = stats.peak_in_flight,
            "Probe run drained"
        );
        Ok((outcomes, stats))
    }
}
