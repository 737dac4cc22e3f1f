use crate::models::{ScanReport, Severity};
use fnv::FnvHasher;
use serde_sarif::sarif::{
    self, ArtifactLocation, Message, MultiformatMessageString, PhysicalLocation,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, ToolComponent, Version,
    SCHEMA_URL,
};
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

/// Convert scanner Severity to SARIF ResultLevel
fn severity_to_level(severity: &Severity) -> ResultLevel {
    match severity {
        Severity::Critical => ResultLevel::Error,
        Severity::Warning => ResultLevel::Warning,
        Severity::Info => ResultLevel::Note,
    }
}

/// Convert scanner Severity to security-severity score (for GitHub)
fn severity_to_score(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "9.0",
        Severity::Warning => "6.0",
        Severity::Info => "3.0",
    }
}

/// Generate a fingerprint hash for tracking results across runs.
/// Uses rule id + file + line + snippet to create a stable identifier.
/// FnvHasher is used because DefaultHasher is not guaranteed stable
/// across Rust versions.
fn generate_fingerprint(rule_id: &str, file: &str, line: usize, snippet: Option<&str>) -> String {
    let mut hasher = FnvHasher::default();
    rule_id.hash(&mut hasher);
    file.hash(&mut hasher);
    line.hash(&mut hasher);
    if let Some(s) = snippet {
        s.trim().hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

/// Generate a SARIF document from a finished scan report.
pub fn generate_sarif_report(report: &ScanReport) -> Sarif {
    let mut rules: Vec<ReportingDescriptor> = Vec::new();
    let mut rule_indices: HashMap<String, i64> = HashMap::new();
    let mut results: Vec<SarifResult> = Vec::new();

    for finding in &report.findings {
        // Egress findings carry no catalogue id; they share one rule.
        let rule_id = finding.pattern.clone().unwrap_or_else(|| "egress-risk".to_string());

        if !rule_indices.contains_key(&rule_id) {
            let rule_index = rules.len() as i64;
            rule_indices.insert(rule_id.clone(), rule_index);

            let rule = ReportingDescriptor::builder()
                .id(&rule_id)
                .name(&finding.kind)
                .short_description(&finding.kind)
                .full_description(&finding.description)
                .help(
                    MultiformatMessageString::builder()
                        .text(format!("**Recommendation:**\n\n{}", finding.suggestion))
                        .build(),
                )
                .properties(
                    sarif::PropertyBag::builder()
                        .additional_properties({
                            let mut props = std::collections::BTreeMap::new();
                            props.insert(
                                "security-severity".to_string(),
                                serde_json::json!(severity_to_score(&finding.severity)),
                            );
                            props.insert("precision".to_string(), serde_json::json!("medium"));
                            props.insert(
                                "tags".to_string(),
                                serde_json::json!(["security", "phi", "hipaa"]),
                            );
                            props
                        })
                        .build(),
                )
                .build();

            rules.push(rule);
        }

        // Strip ./ prefix for GitHub compatibility
        let file_path = finding.file.strip_prefix("./").unwrap_or(&finding.file);
        let artifact_location = ArtifactLocation::builder().uri(file_path).build();

        let region = sarif::Region::builder()
            .start_line(finding.line as i64)
            .start_column(1)
            .end_line(finding.line as i64)
            .build();

        let physical_location = PhysicalLocation::builder()
            .artifact_location(artifact_location)
            .region(region)
            .build();

        let sarif_location = sarif::Location::builder()
            .physical_location(physical_location)
            .build();

        let fingerprint = generate_fingerprint(
            &rule_id,
            &finding.file,
            finding.line,
            finding.snippet.as_deref(),
        );

        let mut partial_fingerprints = BTreeMap::new();
        partial_fingerprints.insert("primaryLocationLineHash".to_string(), fingerprint);

        let result = SarifResult::builder()
            .rule_id(&rule_id)
            .rule_index(rule_indices[&rule_id])
            .level(severity_to_level(&finding.severity))
            .message(Message::builder().text(&finding.description).build())
            .locations(vec![sarif_location])
            .partial_fingerprints(partial_fingerprints)
            .build();

        results.push(result);
    }

    let tool_component = ToolComponent::builder()
        .name("phiscan")
        .semantic_version(env!("CARGO_PKG_VERSION"))
        .rules(rules)
        .build();

    let run = Run::builder().tool(tool_component).results(results).build();

    Sarif::builder()
        .version(Version::V2_1_0.to_string())
        .schema(SCHEMA_URL)
        .runs(vec![run])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::static_analysis;
    use crate::core::engine::ScanEngine;
    use std::collections::BTreeMap;

    #[test]
    fn test_sarif_generation_basic() {
        let mut project = BTreeMap::new();
        project.insert(
            "a.ts".to_string(),
            "const ssn = \"123-45-6789\";".to_string(),
        );
        let report = static_analysis(&ScanEngine::default(), &project);

        let sarif = generate_sarif_report(&report);

        assert_eq!(sarif.version, "2.1.0");
        assert_eq!(sarif.runs.len(), 1);

        let run = &sarif.runs[0];
        assert_eq!(run.tool.driver.name, "phiscan");
        assert_eq!(run.tool.driver.rules.as_ref().unwrap().len(), 1);
        assert_eq!(run.results.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = generate_fingerprint("ssn", "a.ts", 3, Some("x"));
        let b = generate_fingerprint("ssn", "a.ts", 3, Some("  x  "));
        let c = generate_fingerprint("ssn", "a.ts", 4, Some("x"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
