//! sourcecheck 共通ライブラリ
//!
//! プローバー本体とツール群で共有する型・設定・エラー定義

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// エラー型定義
pub mod error;

/// 共通型定義（エンドポイント・プローブ結果・レポート）
pub mod types;
