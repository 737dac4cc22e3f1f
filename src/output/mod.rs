pub mod sarif;

use crate::models::finding::Finding;
use crate::models::ScanReport;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    #[default]
    #[serde(alias = "md")]
    Markdown,
    Sarif,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "md" | "markdown" => Ok(ReportFormat::Markdown),
            "sarif" => Ok(ReportFormat::Sarif),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "Json"),
            ReportFormat::Markdown => write!(f, "Markdown"),
            ReportFormat::Sarif => write!(f, "Sarif"),
        }
    }
}

pub fn generate_report(
    report: &ScanReport,
    format: &ReportFormat,
    output: Option<PathBuf>,
) -> io::Result<()> {
    match format {
        ReportFormat::Json => {
            if let Some(path) = output {
                let path_with_extension = path.with_extension("json");
                let file = File::create(path_with_extension)?;
                serde_json::to_writer_pretty(file, report)?;
            } else {
                let stdout = io::stdout();
                let handle = stdout.lock();
                serde_json::to_writer_pretty(handle, report)?;
            }
        }
        ReportFormat::Markdown => {
            let markdown = generate_markdown_report(report);

            if let Some(path) = output {
                let path_with_extension = path.with_extension("md");
                let mut file = File::create(path_with_extension)?;
                write!(file, "{}", markdown)?;
            } else {
                println!("{}", markdown);
            }
        }
        ReportFormat::Sarif => {
            let sarif = sarif::generate_sarif_report(report);

            if let Some(path) = output {
                let path_with_extension = path.with_extension("sarif");
                let file = File::create(path_with_extension)?;
                serde_json::to_writer_pretty(file, &sarif)?;
            } else {
                let stdout = io::stdout();
                let handle = stdout.lock();
                serde_json::to_writer_pretty(handle, &sarif)?;
            }
        }
    }

    Ok(())
}

/// Generate a markdown report
fn generate_markdown_report(report: &ScanReport) -> String {
    let mut markdown = String::new();

    markdown.push_str("# PHI Compliance Scan Report\n\n");

    if let Some(metadata) = &report.metadata {
        markdown.push_str("## Metadata\n\n");
        for (key, value) in metadata {
            markdown.push_str(&format!("- **{}**: {}\n", key, value));
        }
        markdown.push('\n');
    }

    if !report.comment.is_empty() {
        markdown.push_str(&format!("## Overview\n\n{}\n\n", report.comment));
    }

    let summary = report.summary();
    markdown.push_str("## Summary\n\n");
    markdown.push_str(&format!("- **Scan type**: {}\n", report.scan_type));
    markdown.push_str(&format!("- **Files scanned**: {}\n", report.files_scanned));
    markdown.push_str(&format!("- **Critical**: {}\n", summary.critical));
    markdown.push_str(&format!("- **Warning**: {}\n", summary.warning));
    markdown.push_str(&format!("- **Info**: {}\n", summary.info));
    markdown.push_str(&format!("- **Total**: {}\n", summary.total));
    markdown.push_str(&format!(
        "- **Model safety score**: {}/100\n\n",
        report.scan_result.model_safety_score
    ));

    if !report.scan_result.phi_patterns.is_empty() {
        markdown.push_str("## PHI Patterns\n\n");
        for tally in &report.scan_result.phi_patterns {
            markdown.push_str(&format!(
                "- **{}** ({}): {} occurrence{} — e.g. `{}`\n",
                tally.name,
                tally.category,
                tally.count,
                if tally.count == 1 { "" } else { "s" },
                tally.examples.join("`, `")
            ));
        }
        markdown.push('\n');
    }

    if !report.scan_result.egress_risks.is_empty() {
        markdown.push_str("## Egress Risks\n\n");
        markdown.push_str("| Endpoint | Method | Risk | Location | Data Types |\n");
        markdown.push_str("|---|---|---|---|---|\n");
        for risk in &report.scan_result.egress_risks {
            markdown.push_str(&format!(
                "| {} | {} | {} | {}:{} | {} |\n",
                risk.endpoint,
                risk.method,
                risk.risk_level,
                risk.file,
                risk.line,
                risk.data_types.join(", ")
            ));
        }
        markdown.push('\n');
    }

    if let Some(safety) = report.scan_result.model_safety_checks.first() {
        markdown.push_str("## Model Safety Checks\n\n");
        for check in &safety.checks {
            let status = if check.passed { "PASS" } else { "FAIL" };
            markdown.push_str(&format!(
                "- [{}] **{}**: {}\n",
                status, check.name, check.details
            ));
        }
        markdown.push('\n');
    }

    if !report.findings.is_empty() {
        markdown.push_str("## Findings\n\n");

        // Group findings by detector type, keeping first-seen order.
        let mut order: Vec<&str> = Vec::new();
        let mut by_kind: HashMap<&str, Vec<&Finding>> = HashMap::new();
        for finding in &report.findings {
            if !by_kind.contains_key(finding.kind.as_str()) {
                order.push(finding.kind.as_str());
            }
            by_kind.entry(finding.kind.as_str()).or_default().push(finding);
        }

        for (i, kind) in order.iter().enumerate() {
            let group = &by_kind[kind];
            let first = group[0];
            markdown.push_str(&format!("### {}. {} ({})\n\n", i + 1, kind, first.severity));
            markdown.push_str(&format!("**Description**:\n{}\n\n", first.description));
            markdown.push_str(&format!("**Recommendation**:\n{}\n\n", first.suggestion));

            let instance_plural = if group.len() == 1 {
                "instance"
            } else {
                "instances"
            };
            markdown.push_str(&format!(
                "<details>\n<summary><i>{} {}</i></summary>\n\n",
                group.len(),
                instance_plural
            ));
            markdown.push_str("```\n");
            for finding in group {
                let snippet = finding.snippet.as_deref().unwrap_or("...");
                markdown.push_str(&format!("{}:{}: {}\n", finding.file, finding.line, snippet));
            }
            markdown.push_str("```\n\n</details>\n\n");
            markdown.push_str("---\n\n");
        }
    } else {
        markdown.push_str("## Findings\n\n");
        markdown.push_str("No issues found.\n\n");
    }

    if !report.recommendations.is_empty() {
        markdown.push_str("## Recommendations\n\n");
        for recommendation in &report.recommendations {
            markdown.push_str(&format!("- {}\n", recommendation));
        }
        markdown.push('\n');
    }

    if !report.footnote.is_empty() {
        markdown.push_str(&format!("## Note\n\n{}\n", report.footnote));
    }

    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::static_analysis;
    use crate::core::engine::ScanEngine;
    use std::collections::BTreeMap;

    fn sample_report() -> ScanReport {
        let mut project = BTreeMap::new();
        project.insert(
            "a.ts".to_string(),
            "const ssn = \"123-45-6789\";\nfetch(\"https://evil.example.com/x\");".to_string(),
        );
        static_analysis(&ScanEngine::default(), &project)
    }

    #[test]
    fn test_markdown_report_sections() {
        let markdown = generate_markdown_report(&sample_report());
        assert!(markdown.contains("# PHI Compliance Scan Report"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## PHI Patterns"));
        assert!(markdown.contains("## Egress Risks"));
        assert!(markdown.contains("## Model Safety Checks"));
        assert!(markdown.contains("Social Security Number"));
        assert!(markdown.contains("https://evil.example.com/x"));
        assert!(markdown.contains("## Recommendations"));
    }

    #[test]
    fn test_markdown_report_without_findings() {
        let mut project = BTreeMap::new();
        project.insert("a.ts".to_string(), "const x = 1;".to_string());
        let report = static_analysis(&ScanEngine::default(), &project);
        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("No issues found."));
    }

    #[test]
    fn test_format_parsing() {
        assert!(matches!(
            "sarif".parse::<ReportFormat>().unwrap(),
            ReportFormat::Sarif
        ));
        assert!(matches!(
            "MD".parse::<ReportFormat>().unwrap(),
            ReportFormat::Markdown
        ));
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
