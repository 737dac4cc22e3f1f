use serde::{Deserialize, Serialize};

/// Outcome of a single model-safety check, before it is paired with a name.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyCheckResult {
    pub name: String,
    pub passed: bool,
    pub details: String,
}

/// Checklist-only report: score, per-check detail, remediation lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSafetyGrade {
    pub score: u8,
    pub checks: Vec<SafetyCheckResult>,
    pub recommendations: Vec<String>,
}

/// Checklist results for a project's AI integration as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSafetyReport {
    #[serde(rename = "modelName")]
    pub model_name: String,
    pub provider: String,
    #[serde(rename = "safetyScore")]
    pub safety_score: u8,
    pub checks: Vec<SafetyCheckResult>,
}
