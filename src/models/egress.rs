use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::Low => write!(f, "low"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(RiskLevel::High),
            "medium" => Ok(RiskLevel::Medium),
            "low" => Ok(RiskLevel::Low),
            _ => Err(format!("Invalid risk level: {}", s)),
        }
    }
}

/// An outbound call to a domain outside the trusted allow-list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EgressRisk {
    pub endpoint: String,
    pub method: String,
    pub file: String,
    pub line: usize,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    /// Sensitive-data categories spotted near the call site. Contains the
    /// single entry "unknown" when no tracked keyword is nearby.
    #[serde(rename = "dataTypes")]
    pub data_types: Vec<String>,
    pub suggestion: String,
}
