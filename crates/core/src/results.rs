//! Raw tool output parsing — a line-oriented filter pipeline
//!
//! External tool output is untrusted and partially unreliable across
//! versions and locales, so every anomaly here is absorbed with a debug
//! log; nothing in this module raises.

use crate::catalog::RuleCatalog;
use crate::issue::Issue;
use std::collections::BTreeSet;

/// Field delimiter used in the tool's output template.
pub const FIELD_DELIMITER: &str = "[LINTRELAY]";

/// Rules whose findings are pure noise on every known tool version;
/// dropped unconditionally, even when explicitly requested.
pub const RULE_DENYLIST: &[&str] = &["missingInclude", "MissingIncludeSystem"];

/// Parse sanitized tool output into canonical issues.
///
/// `explicit_rules` is `Some` when the caller requested specific rules; in
/// that case findings outside the negotiated set are dropped. `relpos` is
/// the byte length of the source root plus its trailing separator, stripped
/// from each file field to yield a root-relative path.
///
/// Issues are emitted in raw output order, without de-duplication. Parsing
/// has no hidden state: the same content always yields the same sequence.
pub fn parse_results(
    content: &str,
    explicit_rules: Option<&BTreeSet<String>>,
    catalog: &RuleCatalog,
    relpos: usize,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for line in content.lines() {
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != 5 {
            log::debug!("malformed result line, wrong field count: {line}");
            continue;
        }
        if fields.iter().any(|f| f.is_empty()) {
            log::debug!("ignored result line with empty field: {line}");
            continue;
        }

        let rule = fields[2];
        if !catalog.contains(rule) {
            log::debug!("rule not in installed catalog: {rule}");
            continue;
        }
        if RULE_DENYLIST.contains(&rule) {
            log::debug!("denylisted rule: {rule}");
            continue;
        }
        if let Some(requested) = explicit_rules {
            if !requested.contains(rule) {
                continue;
            }
        }

        let line_number = match fields[1].parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                log::debug!("malformed result line, bad line number: {line}");
                continue;
            }
        };

        issues.push(Issue {
            path: fields[0].get(relpos..).unwrap_or_default().to_string(),
            line: line_number,
            column: "1".to_string(),
            message: fields[4].to_string(),
            rule: rule.to_string(),
        });
    }

    issues
}
