use crate::models::severity::Severity;
use serde::{Deserialize, Serialize};

/// A single detector hit inside a scanned file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub file: String,
    /// 1-based line number of the match start.
    pub line: usize,
    /// Human-readable detector name, e.g. "Social Security Number".
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub suggestion: String,
    /// Detector id that produced this finding, when it came from the
    /// PHI catalogue (egress findings carry no pattern id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}
