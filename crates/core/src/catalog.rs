//! Rule catalog discovery and negotiation
//!
//! The installed tool binary is the source of truth for which rules exist
//! and how they are classified: upgrades silently add, remove, and
//! reclassify rules, so the catalog is re-derived from the tool's
//! introspection mode on every run and never cached or hard-coded.

use crate::config::RelayConfig;
use crate::error::AdapterError;
use crate::issue::Severity;
use crate::process::{self, LineCallback, RunOptions};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Catalog artifact produced by the introspection run.
pub const ERRORLIST_FILE: &str = "errorlist.xml";

/// Whole-program rule requiring single-threaded analysis; its presence in a
/// negotiated set disables the tool's internal parallelism.
pub const WHOLE_PROGRAM_RULE: &str = "unusedFunction";

/// Categories enabled when the caller requests no specific rules.
pub const DEFAULT_ENABLE: &[Severity] =
    &[Severity::Warning, Severity::Style, Severity::Information];

/// Mapping from rule identifier to the tool-defined severity category,
/// valid for exactly one installed tool version.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: BTreeMap<String, Severity>,
}

impl RuleCatalog {
    /// Run the tool's self-describing mode and parse the resulting catalog.
    ///
    /// The introspection subprocess follows the same execution discipline as
    /// the scan itself: explicit cwd, scrubbed environment, stderr observed
    /// line by line. A tool that cannot produce its catalog marks the host
    /// environment unusable — fatal and not retryable.
    pub fn discover(
        config: &RelayConfig,
        work_dir: &Path,
        env: &BTreeMap<String, String>,
        log_line: LineCallback,
    ) -> Result<Self, AdapterError> {
        let errorlist_path = work_dir.join(ERRORLIST_FILE);
        let tool_home = config.tool.resolve_home();
        let args = vec![
            config.tool.binary.clone(),
            "--errorlist".to_string(),
            "--xml-version=2".to_string(),
        ];

        let status = process::run(
            &args,
            &RunOptions {
                cwd: Some(&tool_home),
                stdout_file: Some(&errorlist_path),
                on_stderr_line: Some(log_line),
                env: Some(env),
                ..Default::default()
            },
        )
        .map_err(|e| match e {
            AdapterError::Io(e) => AdapterError::Configuration(format!(
                "cannot launch the tool in introspection mode: {e}; \
                 verify the binary is installed and on the configured path"
            )),
            other => other,
        })?;

        if !status.success() {
            return Err(AdapterError::Configuration(
                "the tool's introspection mode failed on this host; \
                 inspect the task log and adapt the machine environment"
                    .to_string(),
            ));
        }

        let xml = std::fs::read_to_string(&errorlist_path)?;
        Self::from_errorlist_xml(&xml)
    }

    /// Parse the `<results><errors><error id=… severity=…/>` catalog XML.
    pub fn from_errorlist_xml(xml: &str) -> Result<Self, AdapterError> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| AdapterError::Catalog(e.to_string()))?;

        let errors = doc
            .descendants()
            .find(|n| n.has_tag_name("errors"))
            .ok_or_else(|| AdapterError::Catalog("missing <errors> element".to_string()))?;

        let mut rules = BTreeMap::new();
        for node in errors.children().filter(|n| n.has_tag_name("error")) {
            let (Some(id), Some(severity)) = (node.attribute("id"), node.attribute("severity"))
            else {
                log::debug!("catalog entry without id or severity, skipping");
                continue;
            };
            match Severity::parse(severity) {
                Some(sev) => {
                    rules.insert(id.to_string(), sev);
                }
                None => {
                    log::debug!("rule {id} has unrecognized severity '{severity}', skipping");
                }
            }
        }

        Ok(Self { rules })
    }

    /// Intersect the caller's requested rules with the installed catalog.
    /// Requested-but-unsupported rules are dropped silently; tool versions
    /// drift and that must never fail a scan.
    pub fn negotiate(&self, requested: &BTreeSet<String>) -> BTreeSet<String> {
        let mut negotiated = BTreeSet::new();
        for rule in requested {
            if self.rules.contains_key(rule) {
                negotiated.insert(rule.clone());
            } else {
                log::debug!("requested rule not supported by installed tool: {rule}");
            }
        }
        negotiated
    }

    /// Distinct severity categories to enable for a negotiated rule set.
    ///
    /// The error category is always active in the tool and must not appear
    /// in the enable flag; it is excluded here on purpose.
    pub fn enable_categories(&self, negotiated: &BTreeSet<String>) -> BTreeSet<Severity> {
        negotiated
            .iter()
            .filter_map(|rule| self.rules.get(rule).copied())
            .filter(|sev| *sev != Severity::Error)
            .collect()
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    pub fn severity_of(&self, rule: &str) -> Option<Severity> {
        self.rules.get(rule).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.rules.iter().map(|(id, sev)| (id.as_str(), *sev))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
