//! Include/exclude glob policy applied to candidate file lists

use crate::error::AdapterError;
use glob::Pattern;

/// Compiled include/exclude policy.
///
/// Patterns match against source-root-relative paths. An empty include set
/// admits every path; exclusion always wins over inclusion.
#[derive(Debug)]
pub struct PathFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, AdapterError> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Retain the paths admitted by the policy. `relpos` is the byte offset
    /// of the source-root prefix (root length plus separator) stripped
    /// before matching.
    pub fn retain(&self, files: Vec<String>, relpos: usize) -> Vec<String> {
        files
            .into_iter()
            .filter(|file| {
                let rel = file.get(relpos..).unwrap_or(file.as_str());
                self.admits(rel)
            })
            .collect()
    }

    fn admits(&self, rel: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(rel)) {
            log::debug!("path excluded by policy: {rel}");
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|p| p.matches(rel))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, AdapterError> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw)
                .map_err(|e| AdapterError::Configuration(format!("invalid glob '{raw}': {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str]) -> PathFilter {
        let include: Vec<String> = include.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        PathFilter::new(&include, &exclude).unwrap()
    }

    #[test]
    fn empty_policy_admits_everything() {
        let f = filter(&[], &[]);
        let files = vec!["/src/a.cpp".to_string(), "/src/sub/b.cpp".to_string()];
        assert_eq!(f.retain(files.clone(), 5), files);
    }

    #[test]
    fn exclude_wins_over_include() {
        let f = filter(&["**/*.cpp"], &["vendor/**"]);
        let files = vec![
            "/src/a.cpp".to_string(),
            "/src/vendor/x.cpp".to_string(),
        ];
        assert_eq!(f.retain(files, 5), vec!["/src/a.cpp".to_string()]);
    }

    #[test]
    fn include_restricts_when_present() {
        let f = filter(&["app/**"], &[]);
        let files = vec![
            "/src/app/a.cpp".to_string(),
            "/src/lib/b.cpp".to_string(),
        ];
        assert_eq!(f.retain(files, 5), vec!["/src/app/a.cpp".to_string()]);
    }

    #[test]
    fn invalid_glob_is_a_configuration_error() {
        let err = PathFilter::new(&["[".to_string()], &[]).unwrap_err();
        assert!(matches!(err, AdapterError::Configuration(_)));
    }
}
