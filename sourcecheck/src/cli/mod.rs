//! CLI module for sourcecheck
//!
//! Provides the command-line interface for running a probe batch and
//! inspecting the last report.

pub mod show;

use clap::{Args, Parser, Subcommand};
use sourcecheck_common::config::ProbeConfig;
use std::path::PathBuf;

/// sourcecheck - Batch health prober for video source APIs
#[derive(Parser, Debug)]
#[command(name = "sourcecheck")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    SOURCECHECK_REGISTRY      Endpoint registry file (default: sources.json)
    SOURCECHECK_REPORT        Report output file (default: sourcecheck-report.json)
    SOURCECHECK_CONCURRENCY   Maximum probes in flight (default: 10)
    SOURCECHECK_TIMEOUT_MS    Per-attempt timeout in milliseconds (default: 10000)
    SOURCECHECK_RETRIES       Retries on network errors (default: 1)
    SOURCECHECK_QUERY         Query suffix appended to every base URL (default: ?ac=list)
    SOURCECHECK_USER_AGENT    User-Agent header
    SOURCECHECK_TOP           Fastest sources listed in the summary (default: 10)
    SOURCECHECK_LOG_LEVEL     Log filter (falls back to RUST_LOG, default: warn)
"#)]
pub struct Cli {
    /// Subcommand to execute (defaults to running a probe batch)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Probe options
    #[command(flatten)]
    pub run: RunArgs,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the summary of an existing report without probing
    Show(show::ShowArgs),
}

/// Probe batch arguments
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Endpoint registry file (JSON or YAML)
    #[arg(short, long, default_value = "sources.json", env = "SOURCECHECK_REGISTRY")]
    pub registry: PathBuf,

    /// Report output file
    #[arg(
        short,
        long,
        default_value = "sourcecheck-report.json",
        env = "SOURCECHECK_REPORT"
    )]
    pub output: PathBuf,

    /// Maximum number of probes in flight
    #[arg(short, long, default_value_t = 10, env = "SOURCECHECK_CONCURRENCY")]
    pub concurrency: usize,

    /// Per-attempt timeout in milliseconds
    #[arg(long, default_value_t = 10_000, env = "SOURCECHECK_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Retries on network errors (timeouts and HTTP errors are never retried)
    #[arg(long, default_value_t = 1, env = "SOURCECHECK_RETRIES")]
    pub retries: u32,

    /// Query suffix appended to every base URL
    #[arg(long, default_value = "?ac=list", env = "SOURCECHECK_QUERY")]
    pub query: String,

    /// User-Agent header sent with every probe
    #[arg(long, env = "SOURCECHECK_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Number of fastest sources listed in the summary
    #[arg(long, default_value_t = 10, env = "SOURCECHECK_TOP")]
    pub top: usize,
}

impl RunArgs {
    /// 引数から実行設定を組み立てる
    pub fn to_config(&self) -> ProbeConfig {
        let defaults = ProbeConfig::default();
        ProbeConfig {
            registry_path: self.registry.clone(),
            report_path: self.output.clone(),
            concurrency: self.concurrency,
            timeout_ms: self.timeout_ms,
            max_retries: self.retries,
            query_suffix: self.query.clone(),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}
