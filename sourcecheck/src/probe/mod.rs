//! プローブ実行
//!
//! 1エンドポイントに対してGETを送信し、結果を分類する。
//!
//! 状態遷移は `Pending → InFlight → {Terminal | Retry → InFlight}` の有限ループで、
//! 再試行回数はタスクの`remaining_retries`で上限が決まる。
//!
//! - タイムアウト: 再試行しない（`Timeout`）
//! - 2xx以外: 再試行しない（`HttpError`）
//! - 通信エラー・不正な2xxペイロード: 再試行枠がある限り即時再送、尽きたら`NetworkError`

pub mod payload;

use crate::error::{Result, SourceCheckError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use sourcecheck_common::config::ProbeConfig;
use sourcecheck_common::types::{ProbeOutcome, ProbeTask};
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tracing::debug;

pub use payload::extract_item_count;

/// プローブの実行インターフェース
///
/// スケジューラはこのトレイト越しにプローブを呼び出す。
#[async_trait]
pub trait Probe: Send + Sync {
    /// タスクを確定結果まで実行する（再試行を含む）
    async fn probe(&self, task: ProbeTask) -> ProbeOutcome;
}

/// 1回の試行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptResult {
    /// 2xxかつJSONとして解釈できた
    Data { http_status: u16, item_count: usize },
    /// 2xx以外
    HttpError(u16),
    /// 試行タイマー満了
    TimedOut,
    /// 再試行対象の失敗
    Transient {
        http_status: Option<u16>,
        message: String,
    },
}

/// HTTPプローバー
#[derive(Clone)]
pub struct HttpProber {
    /// HTTPクライアント（接続プーリング有効）
    client: Client,
    /// 全エンドポイント共通のクエリ文字列
    query_suffix: String,
    /// 1回の試行のタイムアウト
    timeout: Duration,
}

impl HttpProber {
    /// 設定からプローバーを作成
    ///
    /// クライアント全体のタイムアウトは設定せず、試行ごとのタイマーで打ち切る。
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| SourceCheckError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            query_suffix: config.query_suffix.clone(),
            timeout: config.timeout(),
        })
    }

    /// 1回分の送信と分類
    ///
    /// タイマーは送信と本文の受信の両方を覆う。満了時は未完了のリクエストが
    /// ドロップされ、その試行だけが中断される。
    async fn attempt(&self, url: &str) -> AttemptResult {
        let exchange = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Ok(AttemptResult::HttpError(status.as_u16()));
            }

            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(
                match serde_json::from_slice::<serde_json::Value>(&body) {
                    Ok(value) => AttemptResult::Data {
                        http_status: status.as_u16(),
                        item_count: extract_item_count(&value).unwrap_or(0),
                    },
                    Err(e) => AttemptResult::Transient {
                        http_status: Some(status.as_u16()),
                        message: format!("malformed payload: {}", e),
                    },
                },
            )
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => AttemptResult::TimedOut,
            Ok(Err(e)) if e.is_timeout() => AttemptResult::TimedOut,
            Ok(Err(e)) => AttemptResult::Transient {
                http_status: None,
                message: error_chain(&e),
            },
            Ok(Ok(result)) => result,
        }
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, mut task: ProbeTask) -> ProbeOutcome {
        let url = task.endpoint.probe_url(&self.query_suffix);
        let started = Instant::now();
        let mut attempts: u32 = 1;

        loop {
            let result = self.attempt(&url).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let outcome = match result {
                AttemptResult::Data {
                    http_status,
                    item_count,
                } => ProbeOutcome::from_items(task.endpoint, http_status, item_count, elapsed_ms),
                AttemptResult::HttpError(status) => {
                    ProbeOutcome::http_error(task.endpoint, status, elapsed_ms)
                }
                AttemptResult::TimedOut => ProbeOutcome::timeout(
                    task.endpoint,
                    elapsed_ms,
                    format!("no response within {} ms", self.timeout.as_millis()),
                ),
                AttemptResult::Transient {
                    http_status,
                    message,
                } => {
                    if task.consume_retry() {
                        debug!(
                            endpoint_key = %task.endpoint.key,
                            attempt = attempts,
                            remaining_retries = task.remaining_retries,
                            error = %message,
                            "Probe attempt failed, retrying"
                        );
                        attempts += 1;
                        continue;
                    }
                    ProbeOutcome::network_error(
                        task.endpoint,
                        http_status,
                        elapsed_ms,
                        format!("{} (after {} attempts)", message, attempts),
                    )
                }
            };

            debug!(
                endpoint_key = %outcome.key(),
                status = %outcome.status,
                attempts = attempts,
                elapsed_ms = outcome.elapsed_ms,
                "Probe settled"
            );
            return outcome;
        }
    }
}

/// エラーと原因の連鎖を1行にまとめる
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
