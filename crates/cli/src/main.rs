//! Lintrelay CLI - drive external analyzers, report canonical issues

use anyhow::Result;
use clap::Parser;
use lintrelay_cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            ref path,
            ref work_dir,
            ref rules,
            incremental,
            ref diff_base,
            format,
        } => {
            commands::scan::run(
                path.as_deref(),
                work_dir.as_deref(),
                rules,
                incremental,
                diff_base,
                format,
            )?;
        }
        Commands::Rules { format } => {
            commands::rules::run(format)?;
        }
        Commands::Probe => {
            if !commands::probe::run()? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
