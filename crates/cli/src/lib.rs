//! Lintrelay CLI library — exposed for integration tests

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lintrelay")]
#[command(about = "Run external static analyzers and normalize their findings", long_about = None)]
#[command(version = lintrelay_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a source tree and print canonical issues
    Scan {
        /// Source root to scan (default: current directory)
        path: Option<PathBuf>,

        /// Task working directory for manifests and raw results
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Rule identifier to request; repeatable. Omit to scan broadly
        #[arg(long = "rule")]
        rules: Vec<String>,

        /// Restrict the scan to files changed since the diff base
        #[arg(long)]
        incremental: bool,

        /// Diff base for incremental scans
        #[arg(long, default_value = "HEAD")]
        diff_base: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
    },

    /// Print the rule catalog reported by the installed tool
    Rules {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
    },

    /// Check whether the tool can run on this host
    Probe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
