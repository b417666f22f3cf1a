//! sourcecheck
//!
//! 動画ソースAPIの一括ヘルスチェッカー。
//! 同時実行数を制限してエンドポイントを確認し、結果を1つのレポートにまとめる。

#![warn(missing_docs)]

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型定義
pub mod error;

/// ロギング初期化ユーティリティ
pub mod logging;

/// プローブ実行（HTTP送信・分類・再試行）
pub mod probe;

/// 進捗表示とサマリー
pub mod progress;

/// エンドポイントレジストリ
pub mod registry;

/// 集計とレポート
pub mod report;

/// 実行ドライバー
pub mod runner;

/// 同時実行数制限付きスケジューラ
pub mod scheduler;

pub use error::{Result, SourceCheckError};
