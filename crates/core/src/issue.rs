//! Canonical issue records returned by an adapter invocation

use serde::{Deserialize, Serialize};

/// Severity category as classified by the analysis tool itself.
///
/// Categories are tool-defined and versioned by the installed binary: the
/// catalog introspection run decides which rules map to which category, never
/// static configuration. Categories (not individual rule ids) are what the
/// tool's enable flags accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Style,
    Performance,
    Portability,
    Information,
    Debug,
}

impl Severity {
    /// Parse a severity string from the tool's catalog output.
    ///
    /// Returns `None` for categories this version of the adapter does not
    /// know; callers skip those rules rather than failing the run.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "style" => Some(Severity::Style),
            "performance" => Some(Severity::Performance),
            "portability" => Some(Severity::Portability),
            "information" => Some(Severity::Information),
            "debug" => Some(Severity::Debug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Style => "style",
            Severity::Performance => "performance",
            Severity::Portability => "portability",
            Severity::Information => "information",
            Severity::Debug => "debug",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized finding, the only artifact returned to the caller.
///
/// Produced once, immutable, consumed by the upload/reporting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Path relative to the scan's source root, `/`-separated
    pub path: String,

    /// 1-based line number as reported by the tool
    pub line: u32,

    /// The tool does not report a real column; fixed at "1"
    pub column: String,

    /// Finding message, verbatim from the tool
    #[serde(rename = "msg")]
    pub message: String,

    /// Rule identifier, verbatim from the tool
    pub rule: String,
}
