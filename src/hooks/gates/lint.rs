//! Deciding whether a lint run found anything
//!
//! The line-count oracle treats the tool's diagnostic stream as opaque and
//! compares its length to the banner size of a clean run. The JSON oracle
//! reads cargo's `--message-format=json` records instead.

use serde_json::Value;

/// Findings shown in a failure message before truncating
const MAX_REPORTED_FINDINGS: usize = 5;

/// Pass iff `diagnostics` has exactly `expected` lines, whatever the exit status
pub fn check_line_count(diagnostics: &str, expected: usize) -> Result<(), String> {
    let lines = diagnostics.lines().count();
    if lines == expected {
        Ok(())
    } else {
        Err(format!(
            "linter printed {lines} diagnostic line(s), expected {expected}"
        ))
    }
}

/// Pass iff the tool succeeded and no compiler message is a warning or error
pub fn check_json_messages(stdout: &str, exit_success: bool) -> Result<(), String> {
    let findings: Vec<String> = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .filter(|msg| msg.get("reason").and_then(Value::as_str) == Some("compiler-message"))
        .filter_map(|msg| {
            let message = msg.get("message")?;
            let level = message.get("level").and_then(Value::as_str)?;
            if !matches!(level, "warning" | "error") {
                return None;
            }
            let text = message
                .get("rendered")
                .and_then(Value::as_str)
                .or_else(|| message.get("message").and_then(Value::as_str))
                .unwrap_or(level);
            Some(text.lines().next().unwrap_or(level).to_string())
        })
        .collect();

    if !findings.is_empty() {
        let mut reason = format!("{} lint finding(s)", findings.len());
        for finding in findings.iter().take(MAX_REPORTED_FINDINGS) {
            reason.push_str("\n  ");
            reason.push_str(finding);
        }
        if findings.len() > MAX_REPORTED_FINDINGS {
            reason.push_str(&format!(
                "\n  ... and {} more",
                findings.len() - MAX_REPORTED_FINDINGS
            ));
        }
        return Err(reason);
    }

    if !exit_success {
        return Err("linter exited unsuccessfully without reporting findings".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_RUN: &str = "    Checking demo v0.1.0 (/work/demo)\n    Finished `dev` profile [unoptimized + debuginfo] target(s) in 0.42s\n";

    #[test]
    fn test_two_line_banner_passes() {
        assert!(check_line_count(CLEAN_RUN, 2).is_ok());
    }

    #[test]
    fn test_extra_lines_fail() {
        let noisy = format!("{CLEAN_RUN}warning: unused variable: `x`\n");
        let err = check_line_count(&noisy, 2).unwrap_err();
        assert!(err.contains("3 diagnostic line(s)"));
    }

    #[test]
    fn test_too_few_lines_fail() {
        assert!(check_line_count("", 2).is_err());
        assert!(check_line_count("    Finished\n", 2).is_err());
    }

    #[test]
    fn test_json_clean_run_passes() {
        let stdout = r#"{"reason":"compiler-artifact","package_id":"demo"}
{"reason":"build-finished","success":true}"#;
        assert!(check_json_messages(stdout, true).is_ok());
    }

    #[test]
    fn test_json_warning_fails_even_on_success() {
        let stdout = r#"{"reason":"compiler-message","message":{"level":"warning","message":"unused variable: `x`","rendered":"warning: unused variable: `x`\n --> src/lib.rs:1:5\n"}}
{"reason":"build-finished","success":true}"#;
        let err = check_json_messages(stdout, true).unwrap_err();
        assert!(err.starts_with("1 lint finding(s)"));
        assert!(err.contains("warning: unused variable: `x`"));
        assert!(!err.contains("src/lib.rs"));
    }

    #[test]
    fn test_json_notes_are_not_findings() {
        let stdout = r#"{"reason":"compiler-message","message":{"level":"note","message":"fyi"}}"#;
        assert!(check_json_messages(stdout, true).is_ok());
    }

    #[test]
    fn test_json_failure_without_findings_fails() {
        let err = check_json_messages("not json at all", false).unwrap_err();
        assert!(err.contains("exited unsuccessfully"));
    }

    #[test]
    fn test_json_many_findings_are_truncated() {
        let line = r#"{"reason":"compiler-message","message":{"level":"error","message":"bad"}}"#;
        let stdout = vec![line; 8].join("\n");
        let err = check_json_messages(&stdout, false).unwrap_err();
        assert!(err.starts_with("8 lint finding(s)"));
        assert!(err.ends_with("... and 3 more"));
    }
}
