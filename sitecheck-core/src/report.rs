//! Report rendering for finished audits.

use crate::engine::AuditOutput;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const THIN_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_text_report(output: &AuditOutput) -> String {
    let result = &output.result;
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                           SITECHECK SEO AUDIT REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Site:           {}\n", result.site));
    report.push_str(&format!(
        "Audit Date:     {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("Pages Scanned:  {}\n", result.pages_scanned));
    report.push_str(&format!(
        "Health Score:   {}/100 (grade {})\n",
        result.health_score, result.grade
    ));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("SUMMARY\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!("Total Issues: {}\n\n", result.summary.total()));
    if result.summary.critical > 0 {
        report.push_str(&format!(
            "  [CRITICAL] {}  (Immediate action required)\n",
            result.summary.critical
        ));
    }
    if result.summary.warning > 0 {
        report.push_str(&format!(
            "  [WARNING]  {}  (Should be addressed)\n",
            result.summary.warning
        ));
    }
    if result.summary.info > 0 {
        report.push_str(&format!(
            "  [INFO]     {}  (Informational)\n",
            result.summary.info
        ));
    }
    if !output.skipped_checks.is_empty() {
        report.push_str(&format!(
            "\n  Skipped checks: {}\n",
            output.skipped_checks.join(", ")
        ));
    }
    report.push('\n');

    if !result.issues.is_empty() {
        report.push_str(RULE);
        report.push_str("ISSUES\n");
        report.push_str(RULE);
        report.push('\n');

        for (idx, issue) in result.issues.iter().enumerate() {
            report.push_str(&format!("[{}] {}\n", idx + 1, issue.title));
            report.push_str(&format!(
                "Severity:     {}\n",
                issue.severity.as_str().to_uppercase()
            ));
            report.push_str(&format!("Category:     {}\n", issue.category.as_str()));
            report.push_str("\nDescription:\n");
            report.push_str(&wrap_text(&issue.description, 80, "  "));
            report.push_str("\nRecommendation:\n");
            report.push_str(&wrap_text(&issue.recommendation, 80, "  "));
            if !issue.affected_pages.is_empty() {
                report.push_str("\nAffected pages:\n");
                for page in &issue.affected_pages {
                    report.push_str(&format!("  - {}\n", page));
                }
            }
            report.push('\n');
            report.push_str(THIN_RULE);
            report.push('\n');
        }
    }

    report.push_str(RULE);
    report.push_str("                                End of Report\n");
    report.push_str(RULE);
    report.push_str("\nGenerated by sitecheck\n\n");

    report
}

pub fn generate_json_report(output: &AuditOutput) -> Result<String, serde_json::Error> {
    let result = &output.result;
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "sitecheck",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "site": result.site,
            "summary": {
                "pages_scanned": result.pages_scanned,
                "health_score": result.health_score,
                "grade": result.grade,
                "total_issues": result.summary.total(),
                "severity_breakdown": {
                    "critical": result.summary.critical,
                    "warning": result.summary.warning,
                    "info": result.summary.info
                },
                "skipped_checks": output.skipped_checks
            },
            "issues": result.issues
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > width - indent.len() && !current_line.is_empty() {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
