//! Terminal output formatting

use colored::Colorize;
use lintrelay_core::Issue;
use std::time::Duration;

pub fn print(issues: &[Issue], elapsed: Duration) {
    for issue in issues {
        println!("{}", format_issue(issue));
    }

    if issues.is_empty() {
        println!(
            "\n  {} no issues ({:.1}s)",
            "clean".green(),
            elapsed.as_secs_f64()
        );
    } else {
        println!(
            "\n  {} issue(s) ({:.1}s)",
            issues.len().to_string().bold(),
            elapsed.as_secs_f64()
        );
    }
}

pub fn format_issue(issue: &Issue) -> String {
    format!(
        "  {}:{} {} {}",
        issue.path.bold(),
        issue.line,
        format!("[{}]", issue.rule).yellow(),
        issue.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_contains_path_line_and_rule() {
        colored::control::set_override(false);
        let issue = Issue {
            path: "src/a.cpp".to_string(),
            line: 12,
            column: "1".to_string(),
            message: "Null pointer dereference".to_string(),
            rule: "nullPointer".to_string(),
        };
        assert_eq!(
            format_issue(&issue),
            "  src/a.cpp:12 [nullPointer] Null pointer dereference"
        );
    }
}
