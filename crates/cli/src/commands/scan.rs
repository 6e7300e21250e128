//! Scan command — one adapter invocation against a source tree

use crate::output;
use crate::OutputFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use lintrelay_core::{CppcheckAdapter, GitDiffProvider, RelayConfig, ScanRequest, ScmDiffProvider};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

pub fn run(
    path: Option<&Path>,
    work_dir: Option<&Path>,
    rules: &[String],
    incremental: bool,
    diff_base: &str,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let source_root = path.unwrap_or_else(|| Path::new("."));
    let source_root = std::fs::canonicalize(source_root)
        .with_context(|| format!("source root does not exist: {}", source_root.display()))?;

    if format == OutputFormat::Terminal {
        println!(
            "{}",
            format!(
                "  lintrelay v{} — scanning {}",
                lintrelay_core::VERSION,
                source_root.display()
            )
            .bold()
        );
    }

    let config = RelayConfig::find_and_load(&source_root)?;
    let work_dir = match work_dir {
        Some(dir) => dir.to_path_buf(),
        None => source_root.join(".lintrelay-cache/work"),
    };

    let request = ScanRequest {
        source_root: source_root.clone(),
        work_dir,
        rules: rules.iter().cloned().collect::<BTreeSet<String>>(),
        incremental,
    };

    let adapter = CppcheckAdapter::new(config);
    let issues = if incremental {
        let provider = GitDiffProvider::new(&source_root, diff_base)?;
        adapter.analyze(&request, Some(&provider as &dyn ScmDiffProvider))?
    } else {
        adapter.analyze(&request, None)?
    };

    match format {
        OutputFormat::Json => output::json::print(&issues)?,
        OutputFormat::Terminal => output::terminal::print(&issues, start.elapsed()),
    }

    Ok(())
}
