//! JSON output formatting

use anyhow::Result;
use lintrelay_core::Issue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput {
    pub issues: Vec<Issue>,
    pub count: usize,
}

pub fn build(issues: &[Issue]) -> JsonOutput {
    JsonOutput {
        issues: issues.to_vec(),
        count: issues.len(),
    }
}

pub fn print(issues: &[Issue]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&build(issues))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_matches_issue_list() {
        let issues = vec![Issue {
            path: "a.cpp".to_string(),
            line: 1,
            column: "1".to_string(),
            message: "m".to_string(),
            rule: "nullPointer".to_string(),
        }];
        let out = build(&issues);
        assert_eq!(out.count, 1);
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"count\":1"));
        assert!(json.contains("\"rule\":\"nullPointer\""));
    }
}
