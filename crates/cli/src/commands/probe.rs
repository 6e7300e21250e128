//! Probe command — advisory local-vs-remote capability check

use anyhow::Result;
use colored::Colorize;
use lintrelay_core::{CppcheckAdapter, RelayConfig};

pub fn run() -> Result<bool> {
    let config = RelayConfig::find_and_load(std::path::Path::new("."))?;
    let adapter = CppcheckAdapter::new(config);

    let usable = adapter.check_usable();
    if usable {
        println!("  {} tool is executable on this host", "ok".green());
    } else {
        println!(
            "  {} tool is not executable here; dispatch the task remotely",
            "unavailable".red()
        );
    }
    Ok(usable)
}
