//! The tool adapter — wires selection, negotiation, execution, and parsing
//! into one blocking invocation

use crate::catalog::{RuleCatalog, DEFAULT_ENABLE, WHOLE_PROGRAM_RULE};
use crate::config::RelayConfig;
use crate::error::AdapterError;
use crate::issue::{Issue, Severity};
use crate::pathfilter::PathFilter;
use crate::probe;
use crate::process::{self, RunOptions};
use crate::results::{self, FIELD_DELIMITER};
use crate::sanitize;
use crate::scm::ScmDiffProvider;
use crate::selector;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Raw scan result artifact inside the task working directory.
pub const RESULT_FILE: &str = "scan_result.txt";

/// Stderr line marking an invocation that can never succeed with the same
/// arguments.
const FATAL_STDERR_PATTERN: &str = "The command line is too long";

/// One scan invocation, owned by the caller and immutable for its duration.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Absolute root of the source tree to scan
    pub source_root: PathBuf,

    /// Private working directory for this task's artifacts
    pub work_dir: PathBuf,

    /// Requested rule identifiers; empty means "everything relevant"
    pub rules: BTreeSet<String>,

    /// Restrict the scan to SCM-changed files
    pub incremental: bool,
}

/// Word substitutions applied to relayed tool log lines before they leave
/// the adapter. Built once per adapter instance, never mutated.
#[derive(Debug, Clone)]
pub struct Redactor {
    words: Vec<(String, String)>,
}

impl Redactor {
    pub fn new(words: Vec<(String, String)>) -> Self {
        Self { words }
    }

    /// Default map masking the underlying tool's name.
    pub fn tool_defaults() -> Self {
        Self::new(vec![
            ("cppcheck".to_string(), "Tool".to_string()),
            ("Cppcheck".to_string(), "Tool".to_string()),
        ])
    }

    pub fn apply(&self, line: &str) -> String {
        self.words
            .iter()
            .fold(line.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

/// Adapter driving one external analysis tool per invocation.
pub struct CppcheckAdapter {
    config: RelayConfig,
    redactor: Redactor,
}

impl CppcheckAdapter {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            redactor: Redactor::tool_defaults(),
        }
    }

    /// Pre-flight check used by the scheduler for local-vs-remote dispatch.
    pub fn check_usable(&self) -> bool {
        probe::is_usable(&self.config)
    }

    /// Run the full pipeline: select files, negotiate rules, drive the tool,
    /// parse its output into canonical issues.
    ///
    /// Stages are strictly sequential; the only parallelism is the tool's
    /// own worker pool. An empty candidate set short-circuits to zero
    /// issues without touching the tool.
    pub fn analyze(
        &self,
        request: &ScanRequest,
        scm: Option<&dyn ScmDiffProvider>,
    ) -> Result<Vec<Issue>, AdapterError> {
        let source_root = request.source_root.canonicalize()?;
        let root_str = source_root.to_string_lossy().replace('\\', "/");
        let relpos = root_str.len() + 1;

        std::fs::create_dir_all(&request.work_dir)?;

        let filter = PathFilter::new(&self.config.scan.include, &self.config.scan.exclude)?;
        let extensions = &self.config.scan.extensions;

        let candidates = if request.incremental {
            let provider = scm.ok_or_else(|| {
                AdapterError::Configuration(
                    "incremental scan requested without an SCM diff provider".to_string(),
                )
            })?;
            selector::changed_files(&source_root, extensions, provider)
        } else {
            selector::full_tree_files(&source_root, extensions)
        }
        .map_err(|e| AdapterError::Configuration(format!("file selection failed: {e:#}")))?;

        let toscan = filter.retain(candidates, relpos);
        if toscan.is_empty() {
            log::debug!("to-be-scanned file list is empty");
            return Ok(Vec::new());
        }

        let manifest = selector::write_manifest(&request.work_dir, &toscan)?;

        let env = self.config.env.scrubbed();
        let relay_log = |line: &str| -> Result<(), AdapterError> {
            log::info!("{}", self.redactor.apply(line));
            Ok(())
        };

        let catalog = RuleCatalog::discover(&self.config, &request.work_dir, &env, &relay_log)?;
        let negotiated = catalog.negotiate(&request.rules);

        let tool_home = self.config.tool.resolve_home();
        let args = self.scan_args(&manifest, &negotiated, &catalog, &tool_home);
        log::info!("cmd: {}", self.redactor.apply(&args.join(" ")));

        let result_path = request.work_dir.join(RESULT_FILE);
        let detect_fatal = |line: &str| -> Result<(), AdapterError> {
            if line.contains(FATAL_STDERR_PATTERN) {
                return Err(AdapterError::ToolExecution(
                    "command line exceeds the platform limit; retry must batch files, \
                     not repeat the same arguments"
                        .to_string(),
                ));
            }
            Ok(())
        };
        process::run(
            &args,
            &RunOptions {
                cwd: Some(&tool_home),
                stderr_file: Some(&result_path),
                on_stderr_line: Some(&detect_fatal),
                on_stdout_line: Some(&relay_log),
                env: Some(&env),
                ..Default::default()
            },
        )?;

        if !result_path.exists() {
            log::info!("scan produced no result artifact");
            return Ok(Vec::new());
        }
        let content = sanitize::read_result_file(&result_path)?;
        if content.is_empty() {
            log::info!("scan result is empty");
            return Ok(Vec::new());
        }

        let explicit = if request.rules.is_empty() {
            None
        } else {
            Some(&negotiated)
        };
        Ok(results::parse_results(&content, explicit, &catalog, relpos))
    }

    /// Build the scan command line from the negotiated rule set.
    fn scan_args(
        &self,
        manifest: &Path,
        negotiated: &BTreeSet<String>,
        catalog: &RuleCatalog,
        tool_home: &Path,
    ) -> Vec<String> {
        let mut args = vec![
            self.config.tool.binary.clone(),
            "--quiet".to_string(),
            format!(
                "--template={{file}}{d}{{line}}{d}{{id}}{d}{{severity}}{d}{{message}}",
                d = FIELD_DELIMITER
            ),
            "--inconclusive".to_string(),
        ];

        if negotiated.is_empty() {
            // Nothing specific requested: broad default bundle, full
            // tool-internal parallelism.
            let names: Vec<&str> = DEFAULT_ENABLE.iter().map(Severity::as_str).collect();
            args.push(format!("--enable={}", names.join(",")));
            args.push(format!("-j{}", num_cpus::get()));
        } else {
            let categories = catalog.enable_categories(negotiated);
            if !categories.is_empty() {
                let names: Vec<&str> = categories.iter().map(Severity::as_str).collect();
                args.push(format!("--enable={}", names.join(",")));
            }
            // Whole-program analysis is not file-local; it must run
            // single-threaded.
            if !negotiated.contains(WHOLE_PROGRAM_RULE) {
                args.push(format!("-j{}", num_cpus::get()));
            }
        }

        for file in plugin_files(&tool_home.join("custom_plugins"), ".xml") {
            args.push(format!("--rule-file={file}"));
        }
        for file in plugin_files(&tool_home.join("custom_cfg"), ".cfg") {
            args.push(format!("--library={file}"));
        }

        args.push(format!("--file-list={}", manifest.display()));
        args
    }
}

/// Custom rule and library files shipped in the tool's plugin layout.
/// A missing directory simply contributes nothing.
fn plugin_files(dir: &Path, suffix: &str) -> Vec<String> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            let normalized = path.to_string_lossy().replace('\\', "/");
            if normalized.ends_with(suffix) {
                files.push(normalized);
            }
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_XML: &str = r#"<?xml version="1.0"?>
<results version="2">
  <errors>
    <error id="nullPointer" severity="error" msg=""/>
    <error id="unusedVariable" severity="style" msg=""/>
    <error id="unusedFunction" severity="style" msg=""/>
    <error id="shadowVariable" severity="warning" msg=""/>
  </errors>
</results>"#;

    fn adapter() -> CppcheckAdapter {
        CppcheckAdapter::new(RelayConfig::default())
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::from_errorlist_xml(CATALOG_XML).unwrap()
    }

    fn negotiated(rules: &[&str]) -> BTreeSet<String> {
        rules.iter().map(|s| s.to_string()).collect()
    }

    fn args_for(rules: &[&str]) -> Vec<String> {
        adapter().scan_args(
            Path::new("/work/paths.txt"),
            &negotiated(rules),
            &catalog(),
            Path::new("/nonexistent-tool-home"),
        )
    }

    #[test]
    fn empty_rule_set_enables_default_bundle_with_parallelism() {
        let args = args_for(&[]);
        assert!(args.contains(&"--enable=warning,style,information".to_string()));
        assert!(args.iter().any(|a| a.starts_with("-j")));
        assert!(args.contains(&"--file-list=/work/paths.txt".to_string()));
    }

    #[test]
    fn error_category_is_never_enabled_explicitly() {
        let args = args_for(&["nullPointer"]);
        assert!(!args.iter().any(|a| a.starts_with("--enable=")));
        assert!(args.iter().any(|a| a.starts_with("-j")));
    }

    #[test]
    fn whole_program_rule_disables_parallelism() {
        let args = args_for(&["unusedFunction", "shadowVariable"]);
        assert!(args.contains(&"--enable=warning,style".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("-j")));
    }

    #[test]
    fn template_uses_the_field_delimiter() {
        let args = args_for(&[]);
        let template = args
            .iter()
            .find(|a| a.starts_with("--template="))
            .expect("template flag present");
        assert_eq!(
            template,
            "--template={file}[LINTRELAY]{line}[LINTRELAY]{id}[LINTRELAY]{severity}[LINTRELAY]{message}"
        );
    }

    #[test]
    fn plugin_layout_contributes_rule_and_library_flags() {
        let dir = tempfile::tempdir().unwrap();
        let plugins = dir.path().join("custom_plugins");
        let cfgs = dir.path().join("custom_cfg");
        std::fs::create_dir(&plugins).unwrap();
        std::fs::create_dir(&cfgs).unwrap();
        std::fs::write(plugins.join("team.xml"), "<rules/>").unwrap();
        std::fs::write(plugins.join("notes.txt"), "not a rule file").unwrap();
        std::fs::write(cfgs.join("patch.cfg"), "").unwrap();

        let args = adapter().scan_args(
            Path::new("/work/paths.txt"),
            &BTreeSet::new(),
            &catalog(),
            dir.path(),
        );

        assert!(args.iter().any(|a| a.starts_with("--rule-file=") && a.ends_with("team.xml")));
        assert!(!args.iter().any(|a| a.contains("notes.txt")));
        assert!(args.iter().any(|a| a.starts_with("--library=") && a.ends_with("patch.cfg")));
    }

    #[test]
    fn missing_plugin_directories_contribute_nothing() {
        let args = args_for(&[]);
        assert!(!args.iter().any(|a| a.starts_with("--rule-file=")));
        assert!(!args.iter().any(|a| a.starts_with("--library=")));
    }

    #[test]
    fn redactor_masks_tool_names() {
        let redactor = Redactor::tool_defaults();
        assert_eq!(
            redactor.apply("Cppcheck 2.10 (cppcheck --version)"),
            "Tool 2.10 (Tool --version)"
        );
    }

    #[test]
    fn incremental_without_provider_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let request = ScanRequest {
            source_root: dir.path().to_path_buf(),
            work_dir: dir.path().join("work"),
            rules: BTreeSet::new(),
            incremental: true,
        };
        let err = adapter().analyze(&request, None).unwrap_err();
        assert!(matches!(err, AdapterError::Configuration(_)));
    }
}
