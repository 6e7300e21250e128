//! Lintrelay Core - Tool Adapter Execution Pipeline
//!
//! This crate drives external static-analysis tools and normalizes their
//! heterogeneous output into canonical issue records:
//! - Candidate file selection (full tree or incremental SCM diff)
//! - Rule capability negotiation against the installed tool version
//! - Bounded, observable subprocess execution
//! - Line-oriented result parsing with noise filtering

pub mod adapter;
pub mod catalog;
pub mod config;
pub mod error;
pub mod issue;
pub mod pathfilter;
pub mod probe;
pub mod process;
pub mod results;
pub mod sanitize;
pub mod scm;
pub mod selector;

pub use adapter::{CppcheckAdapter, Redactor, ScanRequest};
pub use catalog::RuleCatalog;
pub use config::RelayConfig;
pub use error::AdapterError;
pub use issue::{Issue, Severity};
pub use pathfilter::PathFilter;
pub use scm::{ChangeState, DiffEntry, GitDiffProvider, ScmDiffProvider};

/// Lintrelay version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
