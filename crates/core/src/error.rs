//! Error types for the adapter pipeline

use thiserror::Error;

/// Errors surfaced to the caller of an adapter invocation.
///
/// Per-line parsing anomalies are never errors — they are dropped with a
/// debug log inside the result parser. A missing result artifact is also
/// not an error; it means the scan produced no findings.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The tool cannot run in introspection mode on this host. Fatal to the
    /// current task and not retryable; callers should fall back to remote
    /// dispatch or fix the host environment.
    #[error("Tool environment unusable: {0}")]
    Configuration(String),

    /// A fatal pattern was observed on the tool's live stderr stream.
    /// Retrying with the same arguments will reproduce the failure.
    #[error("Tool execution aborted: {0}")]
    ToolExecution(String),

    /// The rule catalog produced by the tool could not be read or parsed.
    #[error("Invalid rule catalog: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
