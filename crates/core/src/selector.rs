//! Candidate file selection — full-tree walk or incremental SCM diff

use crate::scm::{ChangeState, ScmDiffProvider};
use anyhow::Result;
use ignore::WalkBuilder;
use std::path::Path;

/// Newline-delimited file manifest handed to the tool via `--file-list`.
///
/// The tool receives a manifest instead of per-file arguments because large
/// trees overflow the command-line length limit.
pub const MANIFEST_FILE: &str = "paths.txt";

/// Walk `source_root` and collect every file whose suffix matches the
/// allow-list. Paths are absolute with separators normalized to `/`,
/// sorted alphabetically.
pub fn full_tree_files(source_root: &Path, extensions: &[String]) -> Result<Vec<String>> {
    let root = source_root.canonicalize()?;

    let mut builder = WalkBuilder::new(&root);
    builder
        .hidden(true) // skip hidden files/dirs (includes .git)
        .ignore(false) // scan ignored files too; exclusion is the path filter's job
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false);

    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue, // skip unreadable entries
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let normalized = normalize(&entry.into_path().to_string_lossy());
        if has_wanted_suffix(&normalized, extensions) {
            files.push(normalized);
        }
    }

    files.sort();
    Ok(files)
}

/// Collect changed files from the SCM diff, excluding deletions and paths
/// outside the suffix allow-list. Relative diff paths are joined onto
/// `source_root` and normalized.
pub fn changed_files(
    source_root: &Path,
    extensions: &[String],
    provider: &dyn ScmDiffProvider,
) -> Result<Vec<String>> {
    let root = normalize(&source_root.to_string_lossy());

    let files = provider
        .changed_files()?
        .into_iter()
        .filter(|entry| entry.state != ChangeState::Deleted)
        .filter(|entry| has_wanted_suffix(&entry.path, extensions))
        .map(|entry| format!("{}/{}", root.trim_end_matches('/'), entry.path))
        .collect();

    Ok(files)
}

/// Persist the candidate list to `<work_dir>/paths.txt` and return its path.
pub fn write_manifest(work_dir: &Path, files: &[String]) -> std::io::Result<std::path::PathBuf> {
    let manifest = work_dir.join(MANIFEST_FILE);
    std::fs::write(&manifest, files.join("\n"))?;
    Ok(manifest)
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

fn has_wanted_suffix(path: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| path.ends_with(ext.as_str()))
}
