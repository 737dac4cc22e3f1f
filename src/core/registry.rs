use crate::models::Severity;
use crate::patterns::phi::{all_detectors, Category, PhiDetector};
use fnv::FnvHashMap;
use std::collections::HashMap;

/// Lookup structure over the fixed PHI detector catalogue. Built once per
/// engine; detectors themselves are immutable statics.
pub struct DetectorRegistry {
    detectors: Vec<&'static PhiDetector>,
    detectors_by_id: FnvHashMap<&'static str, &'static PhiDetector>,
    detectors_by_severity: HashMap<Severity, Vec<&'static PhiDetector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            detectors_by_id: FnvHashMap::default(),
            detectors_by_severity: HashMap::new(),
        }
    }

    /// Registry over the complete built-in catalogue.
    pub fn with_built_ins() -> Self {
        let mut registry = Self::new();
        for detector in all_detectors() {
            registry.register(detector);
        }
        registry
    }

    pub fn register(&mut self, detector: &'static PhiDetector) {
        self.detectors.push(detector);
        self.detectors_by_id.insert(detector.id, detector);
        self.detectors_by_severity
            .entry(detector.severity)
            .or_default()
            .push(detector);
    }

    pub fn get(&self, id: &str) -> Option<&'static PhiDetector> {
        self.detectors_by_id.get(id).copied()
    }

    pub fn get_by_severity(&self, severity: &Severity) -> Vec<&'static PhiDetector> {
        self.detectors_by_severity
            .get(severity)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_by_category(&self, category: Category) -> Vec<&'static PhiDetector> {
        self.detectors
            .iter()
            .copied()
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn get_all(&self) -> Vec<&'static PhiDetector> {
        self.detectors.clone()
    }

    /// Detectors that survive the min-severity and exclusion filters, in
    /// registration order. Default config returns the whole catalogue.
    pub fn enabled(&self, min_severity: Severity, exclude: &[String]) -> Vec<&'static PhiDetector> {
        self.detectors
            .iter()
            .copied()
            .filter(|d| d.severity.as_value() >= min_severity.as_value())
            .filter(|d| !exclude.iter().any(|id| id == d.id))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.detectors.len()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_built_ins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_ins_registered() {
        let registry = DetectorRegistry::with_built_ins();
        assert_eq!(registry.count(), 15);
        assert!(registry.get("ssn").is_some());
        assert!(registry.get("credit-card").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_severity_buckets() {
        let registry = DetectorRegistry::with_built_ins();
        let critical = registry.get_by_severity(&Severity::Critical);
        assert_eq!(critical.len(), 6);
        let info = registry.get_by_severity(&Severity::Info);
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].id, "vital-sign");
    }

    #[test]
    fn test_category_lookup() {
        let registry = DetectorRegistry::with_built_ins();
        let clinical = registry.get_by_category(Category::Clinical);
        assert_eq!(clinical.len(), 5);
    }

    #[test]
    fn test_enabled_filters() {
        let registry = DetectorRegistry::with_built_ins();
        assert_eq!(registry.enabled(Severity::Info, &[]).len(), 15);
        assert_eq!(registry.enabled(Severity::Critical, &[]).len(), 6);
        let without_ssn = registry.enabled(Severity::Info, &["ssn".to_string()]);
        assert_eq!(without_ssn.len(), 14);
        assert!(without_ssn.iter().all(|d| d.id != "ssn"));
    }
}
