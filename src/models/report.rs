use crate::models::egress::{EgressRisk, RiskLevel};
use crate::models::finding::Finding;
use crate::models::safety::ModelSafetyReport;
use crate::models::severity::Severity;
use crate::models::tally::PatternTally;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything a single engine scan produces. Fully populated within one
/// `scan` call and immutable afterwards; no state survives between scans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub findings: Vec<Finding>,
    #[serde(rename = "phiPatterns")]
    pub phi_patterns: Vec<PatternTally>,
    #[serde(rename = "egressRisks")]
    pub egress_risks: Vec<EgressRisk>,
    #[serde(rename = "modelSafetyScore")]
    pub model_safety_score: u8,
    #[serde(rename = "modelSafetyChecks")]
    pub model_safety_checks: Vec<ModelSafetyReport>,
    pub recommendations: Vec<String>,
}

impl ScanResult {
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn count_by_risk(&self, level: RiskLevel) -> usize {
        self.egress_risks
            .iter()
            .filter(|r| r.risk_level == level)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub total: usize,
}

/// A finished report from one of the scan entry points, ready for output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(rename = "scanType")]
    pub scan_type: String,
    pub status: String,
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
    #[serde(rename = "filesScanned")]
    pub files_scanned: usize,
    #[serde(rename = "issuesFound")]
    pub issues_found: usize,
    #[serde(rename = "criticalIssues")]
    pub critical_issues: usize,
    #[serde(rename = "warningIssues")]
    pub warning_issues: usize,
    #[serde(rename = "infoIssues")]
    pub info_issues: usize,
    /// The findings surfaced by this report type. For egress reports these
    /// are risk entries reframed as findings.
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    #[serde(rename = "scanDuration")]
    pub scan_duration: u64,
    #[serde(rename = "completedAt")]
    pub completed_at: String,
    #[serde(rename = "scanResult")]
    pub scan_result: ScanResult,
    pub comment: String,
    pub footnote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl ScanReport {
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn with_footnote(mut self, footnote: &str) -> Self {
        self.footnote = footnote.to_string();
        self
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            critical: 0,
            warning: 0,
            info: 0,
            total: self.findings.len(),
        };

        for finding in &self.findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> Finding {
        Finding {
            file: "a.ts".to_string(),
            line: 1,
            kind: "Test".to_string(),
            severity,
            description: String::new(),
            snippet: None,
            suggestion: String::new(),
            pattern: None,
        }
    }

    #[test]
    fn test_summary_counts_by_severity() {
        let report = ScanReport {
            scan_type: "static".to_string(),
            status: "completed".to_string(),
            total_files: 1,
            files_scanned: 1,
            issues_found: 3,
            critical_issues: 2,
            warning_issues: 1,
            info_issues: 0,
            findings: vec![
                finding(Severity::Critical),
                finding(Severity::Critical),
                finding(Severity::Warning),
            ],
            recommendations: Vec::new(),
            scan_duration: 0,
            completed_at: String::new(),
            scan_result: ScanResult {
                findings: Vec::new(),
                phi_patterns: Vec::new(),
                egress_risks: Vec::new(),
                model_safety_score: 100,
                model_safety_checks: Vec::new(),
                recommendations: Vec::new(),
            },
            comment: String::new(),
            footnote: String::new(),
            metadata: None,
        };

        let summary = report.summary();
        assert_eq!(summary.critical, 2);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.info, 0);
        assert_eq!(summary.total, 3);
    }
}
