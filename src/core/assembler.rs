//! Report entry points. Each is a pure function over a project map of
//! `path -> content`; callers are responsible for coercing non-text
//! content into strings before handing it over.

use crate::core::engine::ScanEngine;
use crate::core::safety;
use crate::models::{
    Finding, ModelSafetyGrade, RiskLevel, ScanReport, Severity, SourceFile,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

fn project_files(project: &BTreeMap<String, String>) -> Vec<SourceFile> {
    project
        .iter()
        .map(|(path, content)| SourceFile::new(PathBuf::from(path), content.clone()))
        .collect()
}

fn elapsed_seconds(started: Instant) -> u64 {
    started.elapsed().as_secs_f64().round() as u64
}

/// Full PHI + egress scan with a severity breakdown over PHI findings.
pub fn static_analysis(engine: &ScanEngine, project: &BTreeMap<String, String>) -> ScanReport {
    let started = Instant::now();
    let files = project_files(project);
    let scan_result = engine.scan(&files);

    ScanReport {
        scan_type: "static".to_string(),
        status: "completed".to_string(),
        total_files: files.len(),
        files_scanned: files.len(),
        issues_found: scan_result.findings.len(),
        critical_issues: scan_result.count_by_severity(Severity::Critical),
        warning_issues: scan_result.count_by_severity(Severity::Warning),
        info_issues: scan_result.count_by_severity(Severity::Info),
        findings: scan_result.findings.clone(),
        recommendations: scan_result.recommendations.clone(),
        scan_duration: elapsed_seconds(started),
        completed_at: Utc::now().to_rfc3339(),
        scan_result,
        comment: String::new(),
        footnote: String::new(),
        metadata: None,
    }
}

/// Same underlying scan, but surfacing egress risks as the findings:
/// high risk maps to critical, medium to warning, low to info.
pub fn egress_analysis(engine: &ScanEngine, project: &BTreeMap<String, String>) -> ScanReport {
    let started = Instant::now();
    let files = project_files(project);
    let scan_result = engine.scan(&files);

    let high = scan_result.count_by_risk(RiskLevel::High);
    let medium = scan_result.count_by_risk(RiskLevel::Medium);
    let total = scan_result.egress_risks.len();

    let findings: Vec<Finding> = scan_result
        .egress_risks
        .iter()
        .map(|risk| Finding {
            file: risk.file.clone(),
            line: risk.line,
            kind: "Egress Risk".to_string(),
            severity: match risk.risk_level {
                RiskLevel::High => Severity::Critical,
                RiskLevel::Medium => Severity::Warning,
                RiskLevel::Low => Severity::Info,
            },
            description: format!("Data egress to {}", risk.endpoint),
            snippet: None,
            suggestion: risk.suggestion.clone(),
            pattern: None,
        })
        .collect();

    let mut recommendations: Vec<String> = scan_result
        .recommendations
        .iter()
        .filter(|r| r.contains("egress") || r.contains("BAA"))
        .cloned()
        .collect();
    recommendations.push(format!(
        "{} external endpoints detected. {} require immediate attention.",
        total, high
    ));

    ScanReport {
        scan_type: "egress".to_string(),
        status: "completed".to_string(),
        total_files: files.len(),
        files_scanned: files.len(),
        issues_found: total,
        critical_issues: high,
        warning_issues: medium,
        info_issues: total - high - medium,
        findings,
        recommendations,
        scan_duration: elapsed_seconds(started),
        completed_at: Utc::now().to_rfc3339(),
        scan_result,
        comment: String::new(),
        footnote: String::new(),
        metadata: None,
    }
}

/// Checklist-only grade over the project's concatenated code: one
/// remediation line per failed check, or the all-passed note.
pub fn model_safety(project: &BTreeMap<String, String>) -> ModelSafetyGrade {
    let all_code = project.values().cloned().collect::<Vec<_>>().join("\n");
    let checks = safety::run_safety_checks(&all_code);
    let score = safety::safety_score(&checks);

    let mut recommendations: Vec<String> = checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| format!("{}: {}", c.name, c.details))
        .collect();

    if score == 100 {
        recommendations.push("All AI safety checks passed. Continue to monitor.".to_string());
    }

    ModelSafetyGrade {
        score,
        checks,
        recommendations,
    }
}
