//! 共通型定義
//!
//! Endpoint, ProbeTask, ProbeOutcome, Report等のデータモデル

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// プローブ対象のエンドポイント
///
/// レジストリから実行開始時に読み込まれ、以降は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// 一意なキー
    pub key: String,
    /// 表示名
    pub name: String,
    /// APIベースURL
    pub base_url: String,
}

impl Endpoint {
    /// 新しいエンドポイントを作成
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    /// プローブ先URLを組み立てる（`{base_url}{query_suffix}`をそのまま連結）
    pub fn probe_url(&self, query_suffix: &str) -> String {
        format!("{}{}", self.base_url, query_suffix)
    }
}

/// プローブタスク
///
/// エンドポイントごとに1つ作成される。再試行は同じタスクの残り回数を減らして行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTask {
    /// 対象エンドポイント
    pub endpoint: Endpoint,
    /// 残り再試行回数
    pub remaining_retries: u32,
}

impl ProbeTask {
    /// 新しいタスクを作成
    pub fn new(endpoint: Endpoint, max_retries: u32) -> Self {
        Self {
            endpoint,
            remaining_retries: max_retries,
        }
    }

    /// 再試行枠を1つ消費する
    ///
    /// 残りがあれば減算して`true`、なければ`false`を返す。
    pub fn consume_retry(&mut self) -> bool {
        if self.remaining_retries == 0 {
            return false;
        }
        self.remaining_retries -= 1;
        true
    }
}

/// プローブ結果の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// 2xxかつ利用可能なデータあり
    Success,
    /// 2xxだがデータなし
    SuccessNoData,
    /// 2xx以外のHTTPステータス
    HttpError,
    /// タイムアウト
    Timeout,
    /// 通信エラー（不正な2xxペイロードを含む）
    NetworkError,
}

impl Category {
    /// Categoryを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SuccessNoData => "success_no_data",
            Self::HttpError => "http_error",
            Self::Timeout => "timeout",
            Self::NetworkError => "network_error",
        }
    }

    /// 進捗表示用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::SuccessNoData => "EMPTY",
            Self::HttpError => "HTTP",
            Self::Timeout => "TIMEOUT",
            Self::NetworkError => "NETWORK",
        }
    }

    /// 進捗表示用のグリフ
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::SuccessNoData => "⚠️",
            Self::HttpError | Self::Timeout | Self::NetworkError => "❌",
        }
    }

    /// 失敗扱いの分類か
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::HttpError | Self::Timeout | Self::NetworkError)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 1タスクの最終プローブ結果
///
/// 再試行を使い切った後、タスクごとにちょうど1つ生成される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    /// 対象エンドポイント（key, name, baseUrl として平坦化）
    #[serde(flatten)]
    pub endpoint: Endpoint,
    /// 分類
    pub status: Category,
    /// HTTPステータス（応答があった場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// 初回送信から確定までの経過時間（ミリ秒、再試行込み）
    pub elapsed_ms: u64,
    /// 一覧フィールドの件数
    pub item_count: usize,
    /// 利用可能なデータがあるか
    pub has_usable_data: bool,
    /// エラーメッセージ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProbeOutcome {
    /// 2xx応答から結果を作成（件数で Success / SuccessNoData を判定）
    pub fn from_items(
        endpoint: Endpoint,
        http_status: u16,
        item_count: usize,
        elapsed_ms: u64,
    ) -> Self {
        let has_usable_data = item_count > 0;
        Self {
            endpoint,
            status: if has_usable_data {
                Category::Success
            } else {
                Category::SuccessNoData
            },
            http_status: Some(http_status),
            elapsed_ms,
            item_count,
            has_usable_data,
            error_message: None,
        }
    }

    /// 2xx以外の応答から結果を作成
    pub fn http_error(endpoint: Endpoint, http_status: u16, elapsed_ms: u64) -> Self {
        Self::failure(
            endpoint,
            Category::HttpError,
            Some(http_status),
            elapsed_ms,
            format!("HTTP {}", http_status),
        )
    }

    /// タイムアウト結果を作成
    pub fn timeout(endpoint: Endpoint, elapsed_ms: u64, message: impl Into<String>) -> Self {
        Self::failure(endpoint, Category::Timeout, None, elapsed_ms, message.into())
    }

    /// 通信エラー結果を作成
    pub fn network_error(
        endpoint: Endpoint,
        http_status: Option<u16>,
        elapsed_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::failure(
            endpoint,
            Category::NetworkError,
            http_status,
            elapsed_ms,
            message.into(),
        )
    }

    fn failure(
        endpoint: Endpoint,
        status: Category,
        http_status: Option<u16>,
        elapsed_ms: u64,
        message: String,
    ) -> Self {
        Self {
            endpoint,
            status,
            http_status,
            elapsed_ms,
            item_count: 0,
            has_usable_data: false,
            error_message: Some(message),
        }
    }

    /// エンドポイントキー
    pub fn key(&self) -> &str {
        &self.endpoint.key
    }
}

/// 実行レポート
///
/// 全タスク確定後に1度だけ構築され、以後変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// 生成時刻
    pub generated_at: DateTime<Utc>,
    /// 総数
    pub total_count: usize,
    /// Success件数
    pub success_count: usize,
    /// SuccessNoData件数
    pub no_data_count: usize,
    /// 失敗件数（HttpError + Timeout + NetworkError）
    pub failed_count: usize,
    /// 実行全体の経過時間（ミリ秒）
    pub total_elapsed_ms: u64,
    /// 投入順の結果
    pub results: Vec<ProbeOutcome>,
    /// 表示専用: Success結果の`results`内インデックスを応答時間昇順に並べたもの
    #[serde(skip)]
    pub latency_ranking: Vec<usize>,
}

impl Report {
    /// 件数の整合性を確認
    pub fn is_consistent(&self) -> bool {
        self.success_count + self.no_data_count + self.failed_count == self.total_count
            && self.total_count == self.results.len()
    }

    /// 応答時間の速い順にSuccess結果を返す（表示用）
    pub fn fastest(&self) -> impl Iterator<Item = &ProbeOutcome> + '_ {
        self.latency_ranking
            .iter()
            .filter_map(|&index| self.results.get(index))
    }
}
