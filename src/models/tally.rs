use serde::{Deserialize, Serialize};

/// Per-detector occurrence count across a whole scan. Only detectors that
/// matched at least once appear in a scan result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternTally {
    pub name: String,
    pub category: String,
    pub count: usize,
    /// Up to the first 3 matched strings, truncated to 20 characters.
    pub examples: Vec<String>,
}
