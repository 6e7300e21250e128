//! Configuration file parsing for .lintrelay.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure for .lintrelay.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub env: EnvConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool executable name or path
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Tool installation directory; falls back to the CPPCHECK_HOME
    /// environment variable, then the current directory
    #[serde(default)]
    pub home: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File suffixes eligible for scanning
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Include globs applied to source-root-relative paths; empty means
    /// everything is included
    #[serde(default)]
    pub include: Vec<String>,

    /// Exclude globs applied to source-root-relative paths
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Parent environment variables copied into the child's scrubbed
    /// environment
    #[serde(default = "default_env_pass")]
    pub pass: Vec<String>,

    /// Explicit variables set in the child environment
    #[serde(default)]
    pub set: BTreeMap<String, String>,
}

fn default_binary() -> String {
    "cppcheck".to_string()
}

fn default_extensions() -> Vec<String> {
    [".cpp", ".cxx", ".cc", ".c++", ".c", ".tpp", ".txx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_env_pass() -> Vec<String> {
    ["PATH", "HOME", "LANG", "TMPDIR", "SystemRoot"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RelayConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty TOML should parse to defaults")
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            home: None,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            pass: default_env_pass(),
            set: BTreeMap::new(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RelayConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Find and load .lintrelay.toml from the given directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(".lintrelay.toml");
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }
}

impl ToolConfig {
    /// Resolve the tool installation directory.
    pub fn resolve_home(&self) -> PathBuf {
        if let Some(home) = &self.home {
            return home.clone();
        }
        if let Ok(home) = std::env::var("CPPCHECK_HOME") {
            if !home.is_empty() {
                return PathBuf::from(home);
            }
        }
        PathBuf::from(".")
    }
}

impl EnvConfig {
    /// Build the explicit child environment: pass-listed variables copied
    /// from the parent, then explicit overrides. Nothing else crosses the
    /// process boundary in either direction.
    pub fn scrubbed(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        for name in &self.pass {
            if let Ok(value) = std::env::var(name) {
                env.insert(name.clone(), value);
            }
        }
        for (name, value) in &self.set {
            env.insert(name.clone(), value.clone());
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_cpp_suffixes() {
        let config = RelayConfig::default();
        assert_eq!(config.tool.binary, "cppcheck");
        assert!(config.scan.extensions.contains(&".cpp".to_string()));
        assert!(config.scan.extensions.contains(&".txx".to_string()));
        assert!(config.scan.include.is_empty());
    }

    #[test]
    fn parses_partial_config() {
        let config: RelayConfig = toml::from_str(
            r#"
            [tool]
            binary = "/opt/analysis/bin/cppcheck"

            [scan]
            exclude = ["third_party/**"]
            "#,
        )
        .unwrap();
        assert_eq!(config.tool.binary, "/opt/analysis/bin/cppcheck");
        assert_eq!(config.scan.exclude, vec!["third_party/**".to_string()]);
        // untouched sections keep their defaults
        assert!(config.env.pass.contains(&"PATH".to_string()));
    }

    #[test]
    fn scrubbed_env_applies_overrides() {
        let mut env_config = EnvConfig::default();
        env_config
            .set
            .insert("ANALYSIS_FLAGS".to_string(), "--strict".to_string());
        let env = env_config.scrubbed();
        assert_eq!(env.get("ANALYSIS_FLAGS"), Some(&"--strict".to_string()));
        // PATH exists in any sane test environment
        assert!(env.contains_key("PATH"));
    }
}
