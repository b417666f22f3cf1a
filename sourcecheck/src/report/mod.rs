//! 結果集計とレポート生成
//!
//! 投入順の結果を分類ごとに振り分け、件数を数えて`Report`を1度だけ構築する。
//! `results`は投入順のまま保持し、応答時間順の並びは表示専用として別に持つ。

pub mod writer;

use chrono::Utc;
use sourcecheck_common::types::{Category, ProbeOutcome, Report};
use std::time::Duration;

pub use writer::{load_report, write_report};

/// 分類ごとの振り分け結果（`results`内のインデックス）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buckets {
    /// Success
    pub successful: Vec<usize>,
    /// SuccessNoData
    pub no_data: Vec<usize>,
    /// HttpError + Timeout + NetworkError
    pub failed: Vec<usize>,
}

/// 結果を3つのバケットに振り分ける
pub fn partition(outcomes: &[ProbeOutcome]) -> Buckets {
    let mut buckets = Buckets::default();
    for (index, outcome) in outcomes.iter().enumerate() {
        let bucket = if outcome.status.is_failure() {
            &mut buckets.failed
        } else if outcome.status == Category::Success {
            &mut buckets.successful
        } else {
            &mut buckets.no_data
        };
        bucket.push(index);
    }
    buckets
}

/// Successを応答時間の昇順に並べる（同値は投入順）
pub fn rank_by_latency(outcomes: &[ProbeOutcome], successful: &[usize]) -> Vec<usize> {
    let mut ranking = successful.to_vec();
    // 安定ソートなので同値は投入順のまま
    ranking.sort_by_key(|&index| outcomes[index].elapsed_ms);
    ranking
}

/// 結果を集計してレポートを構築
///
/// `total_elapsed`は実行全体の壁時計時間（各プローブ時間の合計ではない）。
pub fn aggregate(outcomes: Vec<ProbeOutcome>, total_elapsed: Duration) -> Report {
    let buckets = partition(&outcomes);
    let latency_ranking = rank_by_latency(&outcomes, &buckets.successful);

    Report {
        generated_at: Utc::now(),
        total_count: outcomes.len(),
        success_count: buckets.successful.len(),
        no_data_count: buckets.no_data.len(),
        failed_count: buckets.failed.len(),
        total_elapsed_ms: total_elapsed.as_millis() as u64,
        results: outcomes,
        latency_ranking,
    }
}
