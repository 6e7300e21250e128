//! SCM diff collaborator — supplies changed-file records for incremental scans

use anyhow::{Context, Result};
use git2::{DiffOptions, Repository};
use std::path::Path;

/// How a file changed relative to the diff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeState {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A changed-file record as reported by the SCM.
#[derive(Debug, Clone)]
pub struct DiffEntry {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub state: ChangeState,
}

/// Source of changed-file records. The adapter only consumes entries whose
/// state is not [`ChangeState::Deleted`].
pub trait ScmDiffProvider {
    fn changed_files(&self) -> Result<Vec<DiffEntry>>;
}

/// Diff provider backed by the local git repository.
pub struct GitDiffProvider {
    repo: Repository,
    base: String,
}

impl GitDiffProvider {
    /// Open the repository at `repo_path` and diff the working tree against
    /// the `base` revision.
    pub fn new(repo_path: &Path, base: &str) -> Result<Self> {
        let repo = Repository::open(repo_path).context("Failed to open git repository")?;

        Ok(Self {
            repo,
            base: base.to_string(),
        })
    }
}

impl ScmDiffProvider for GitDiffProvider {
    fn changed_files(&self) -> Result<Vec<DiffEntry>> {
        let obj = self
            .repo
            .revparse_single(&self.base)
            .with_context(|| format!("Failed to resolve diff base '{}'", self.base))?;
        let base_tree = obj.peel_to_commit()?.tree()?;

        let mut opts = DiffOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);

        let diff = self
            .repo
            .diff_tree_to_workdir_with_index(Some(&base_tree), Some(&mut opts))?;

        let mut entries = Vec::new();
        diff.foreach(
            &mut |delta, _progress| {
                if let Some(path) = delta.new_file().path() {
                    let state = match delta.status() {
                        git2::Delta::Added | git2::Delta::Untracked => ChangeState::Added,
                        git2::Delta::Deleted => ChangeState::Deleted,
                        git2::Delta::Renamed => ChangeState::Renamed,
                        _ => ChangeState::Modified,
                    };

                    entries.push(DiffEntry {
                        path: path.to_string_lossy().replace('\\', "/"),
                        state,
                    });
                }
                true
            },
            None,
            None,
            None,
        )?;

        Ok(entries)
    }
}
