//! Plain-text report of a stored-document check, grouped by settings group.

use std::collections::BTreeMap;

use super::{ValidationIssue, ValidationResult, ValidationSeverity};

/// Order in which settings groups appear in the report.
const GROUP_ORDER: &[&str] = &[
    "general",
    "interface",
    "dlna",
    "scraping",
    "defaults",
    "ui",
    "plugins",
];

/// Renders every issue under the settings group its key is configured through.
///
/// Within a group errors come first, then warnings, each in discovery order.
pub fn format_report(result: &ValidationResult) -> String {
    if result.issues.is_empty() {
        return "Configuration is valid.".to_string();
    }

    let mut by_group: BTreeMap<usize, Vec<&ValidationIssue>> = BTreeMap::new();
    for issue in &result.issues {
        let rank = GROUP_ORDER
            .iter()
            .position(|group| *group == issue.key.group())
            .unwrap_or(GROUP_ORDER.len());
        by_group.entry(rank).or_default().push(issue);
    }

    let mut report = String::new();
    for issues in by_group.values_mut() {
        issues.sort_by_key(|issue| issue.severity != ValidationSeverity::Error);

        report.push_str(&format!("[{}]\n", issues[0].key.group()));
        for issue in issues.iter() {
            report.push_str(&render_issue(issue));
        }
        report.push('\n');
    }

    report.push_str(&format!(
        "{} error(s), {} warning(s) across {} group(s)\n",
        result.error_count(),
        result.warnings().count(),
        by_group.len()
    ));
    report
}

fn render_issue(issue: &ValidationIssue) -> String {
    let label = match issue.severity {
        ValidationSeverity::Error => "error",
        ValidationSeverity::Warning => "warning",
    };

    let mut line = format!("  {:<8}{}: {}\n", label, issue.key, issue.message);
    if let Some(suggestion) = &issue.suggestion {
        line.push_str(&format!("  {:<8}hint: {}\n", "", suggestion));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingKey;

    #[test]
    fn empty_result_is_valid() {
        assert_eq!(format_report(&ValidationResult::new()), "Configuration is valid.");
    }

    #[test]
    fn issues_are_grouped_with_errors_first() {
        let mut result = ValidationResult::new();
        result.add(ValidationIssue::warning(SettingKey::Stash, "Library path no longer exists"));
        result.add(ValidationIssue::error(SettingKey::DlnaPort, "port out of range"));
        result.add(
            ValidationIssue::error(SettingKey::Database, "bad extension")
                .with_suggestion("use .sqlite"),
        );

        let report = format_report(&result);
        let general = report.find("[general]").unwrap();
        let dlna = report.find("[dlna]").unwrap();
        assert!(general < dlna);

        let error_at = report.find("error   database: bad extension").unwrap();
        let warning_at = report.find("warning stash:").unwrap();
        assert!(error_at < warning_at && warning_at < dlna);
        assert!(report.contains("hint: use .sqlite"));
        assert!(report.ends_with("2 error(s), 1 warning(s) across 2 group(s)\n"));
    }
}
