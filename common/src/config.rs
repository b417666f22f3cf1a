//! 設定管理
//!
//! ProbeConfig設定構造体

use crate::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// プローブ実行設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// エンドポイントレジストリのパス (デフォルト: "sources.json")
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// レポート出力先 (デフォルト: "sourcecheck-report.json")
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// 同時実行数の上限 (デフォルト: 10)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// 1回の試行のタイムアウト（ミリ秒）(デフォルト: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// 通信エラー時の再試行回数 (デフォルト: 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// 全エンドポイント共通のクエリ文字列 (デフォルト: "?ac=list")
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,

    /// User-Agentヘッダー
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("sources.json")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("sourcecheck-report.json")
}

fn default_concurrency() -> usize {
    10
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    1
}

fn default_query_suffix() -> String {
    "?ac=list".to_string()
}

fn default_user_agent() -> String {
    concat!("sourcecheck/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            report_path: default_report_path(),
            concurrency: default_concurrency(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            query_suffix: default_query_suffix(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    /// 1回の試行のタイムアウト
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 設定値を検証
    pub fn validate(&self) -> CommonResult<()> {
        if self.concurrency == 0 {
            return Err(CommonError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(CommonError::Config(
                "timeout must be greater than 0 ms".to_string(),
            ));
        }
        if !self.query_suffix.is_empty()
            && !self.query_suffix.starts_with('?')
            && !self.query_suffix.starts_with('/')
        {
            return Err(CommonError::Config(format!(
                "query suffix must start with '?' or '/': {}",
                self.query_suffix
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CommonError::Config("user agent must not be empty".to_string()));
        }
        Ok(())
    }
}
