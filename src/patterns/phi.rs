use crate::models::Severity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// PHI category a detector belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Identifier,
    Contact,
    Demographic,
    Clinical,
    Financial,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Identifier => "identifier",
            Category::Contact => "contact",
            Category::Demographic => "demographic",
            Category::Clinical => "clinical",
            Category::Financial => "financial",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compiled PHI detection rule. The catalogue is fixed at build time; a
/// regex that fails to compile is a defect that must abort the process
/// before any scan runs.
pub struct PhiDetector {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub description: &'static str,
    pub suggestion: &'static str,
    pub regex: &'static LazyLock<Regex>,
}

impl fmt::Display for PhiDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\nCategory: {}\nSeverity: {}\nDescription: {}\nSuggestion: {}",
            self.name, self.category, self.severity, self.description, self.suggestion
        )
    }
}

macro_rules! phi_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($regex_str).expect("built-in PHI pattern must compile"));
    };
}

phi_pattern!(RE_SSN, r"\b\d{3}[-.\s]?\d{2}[-.\s]?\d{4}\b");

phi_pattern!(
    RE_MRN,
    r"(?i)\b(?:MRN|medical.?record.?number)[:\s#]*[A-Z0-9]{6,15}\b"
);

phi_pattern!(RE_NPI, r"(?i)\bNPI[:\s#]*\d{10}\b");

phi_pattern!(RE_DEA, r"\b[A-Z]{2}\d{7}\b");

phi_pattern!(
    RE_PHONE,
    r"\b(?:\+1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b"
);

phi_pattern!(RE_EMAIL, r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b");

phi_pattern!(
    RE_DOB,
    r"(?i)\b(?:DOB|date.?of.?birth|birth.?date)[:\s]*(?:\d{1,2}[-/]\d{1,2}[-/]\d{2,4}|\d{4}[-/]\d{1,2}[-/]\d{1,2})\b"
);

phi_pattern!(
    RE_ADDRESS,
    r"(?i)\b\d+\s+[A-Za-z]+\s+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Court|Ct)[\s,]+[A-Za-z]+[\s,]+[A-Z]{2}\s+\d{5}(?:-\d{4})?\b"
);

phi_pattern!(
    RE_ICD10,
    r"(?i)\b(?:ICD[-\s]?10|diagnosis|dx)[:\s]*[A-Z]\d{2}(?:\.\d{1,4})?\b"
);

phi_pattern!(RE_CPT, r"(?i)\b(?:CPT|procedure)[:\s]*\d{5}\b");

phi_pattern!(
    RE_MEDICATION,
    r"(?i)\b(?:RX|prescription|medication|drug)[:\s]*[A-Za-z]+\s+\d+\s*(?:mg|ml|mcg)\b"
);

phi_pattern!(
    RE_LAB_VALUE,
    r"(?i)\b(?:glucose|hemoglobin|a1c|cholesterol|creatinine|potassium|sodium)[:\s]*\d+(?:\.\d+)?\s*(?:mg/dL|mmol/L|mEq/L|g/dL|%)\b"
);

phi_pattern!(
    RE_VITAL_SIGN,
    r"(?i)\b(?:BP|blood.?pressure|heart.?rate|pulse|temp|temperature|respiration)[:\s]*\d+(?:/\d+)?(?:\s*(?:mmHg|bpm|°F|°C))?\b"
);

phi_pattern!(
    RE_INSURANCE_ID,
    r"(?i)\b(?:insurance|member|subscriber|policy)[:\s#]*[A-Z0-9]{8,15}\b"
);

phi_pattern!(
    RE_CREDIT_CARD,
    r"\b(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|3[47][0-9]{13}|6(?:011|5[0-9]{2})[0-9]{12})\b"
);

/// The full fixed detector catalogue, in scan order.
pub fn all_detectors() -> Vec<&'static PhiDetector> {
    ALL_DETECTORS.iter().collect()
}

static ALL_DETECTORS: [PhiDetector; 15] = [
    PhiDetector {
        id: "ssn",
        name: "Social Security Number",
        category: Category::Identifier,
        severity: Severity::Critical,
        description: "Potential SSN detected",
        suggestion: "Remove or encrypt SSN data. Use tokenization for storage.",
        regex: &RE_SSN,
    },
    PhiDetector {
        id: "mrn",
        name: "Medical Record Number",
        category: Category::Identifier,
        severity: Severity::Critical,
        description: "Medical Record Number pattern detected",
        suggestion: "MRN should be encrypted at rest and in transit. Implement access logging.",
        regex: &RE_MRN,
    },
    PhiDetector {
        id: "npi",
        name: "National Provider Identifier",
        category: Category::Identifier,
        severity: Severity::Warning,
        description: "NPI number detected",
        suggestion: "NPI is quasi-public but should still be handled carefully in patient contexts.",
        regex: &RE_NPI,
    },
    PhiDetector {
        id: "dea",
        name: "DEA Number",
        category: Category::Identifier,
        severity: Severity::Critical,
        description: "Potential DEA number detected",
        suggestion: "DEA numbers should never be hardcoded. Use secure credential management.",
        regex: &RE_DEA,
    },
    PhiDetector {
        id: "phone-number",
        name: "Phone Number",
        category: Category::Contact,
        severity: Severity::Warning,
        description: "Phone number detected - potential PHI if associated with patient",
        suggestion: "Ensure phone numbers are encrypted when stored with patient data.",
        regex: &RE_PHONE,
    },
    PhiDetector {
        id: "email",
        name: "Email Address",
        category: Category::Contact,
        severity: Severity::Warning,
        description: "Email address detected - potential PHI in healthcare context",
        suggestion: "Email addresses should be encrypted when associated with patient records.",
        regex: &RE_EMAIL,
    },
    PhiDetector {
        id: "date-of-birth",
        name: "Date of Birth",
        category: Category::Demographic,
        severity: Severity::Critical,
        description: "Date of birth pattern detected",
        suggestion: "DOB is a HIPAA identifier. Must be encrypted and access-logged.",
        regex: &RE_DOB,
    },
    PhiDetector {
        id: "address",
        name: "Physical Address",
        category: Category::Demographic,
        severity: Severity::Warning,
        description: "Physical address pattern detected",
        suggestion: "Address data should be encrypted when associated with patient records.",
        regex: &RE_ADDRESS,
    },
    PhiDetector {
        id: "diagnosis",
        name: "ICD-10 Diagnosis Code",
        category: Category::Clinical,
        severity: Severity::Critical,
        description: "ICD-10 diagnosis code detected",
        suggestion: "Diagnosis codes are highly sensitive PHI. Implement strict access controls.",
        regex: &RE_ICD10,
    },
    PhiDetector {
        id: "cpt-code",
        name: "CPT Procedure Code",
        category: Category::Clinical,
        severity: Severity::Warning,
        description: "CPT procedure code detected",
        suggestion: "Procedure codes may indicate sensitive conditions. Handle appropriately.",
        regex: &RE_CPT,
    },
    PhiDetector {
        id: "medication",
        name: "Medication Information",
        category: Category::Clinical,
        severity: Severity::Warning,
        description: "Medication prescription pattern detected",
        suggestion: "Medication data is PHI. Ensure proper encryption and access controls.",
        regex: &RE_MEDICATION,
    },
    PhiDetector {
        id: "lab-value",
        name: "Lab Value",
        category: Category::Clinical,
        severity: Severity::Warning,
        description: "Lab value pattern detected",
        suggestion: "Lab results are clinical PHI. Implement appropriate safeguards.",
        regex: &RE_LAB_VALUE,
    },
    PhiDetector {
        id: "vital-sign",
        name: "Vital Sign",
        category: Category::Clinical,
        severity: Severity::Info,
        description: "Vital sign measurement detected",
        suggestion: "Vital signs are clinical data. Ensure proper handling in patient context.",
        regex: &RE_VITAL_SIGN,
    },
    PhiDetector {
        id: "insurance-id",
        name: "Insurance ID",
        category: Category::Financial,
        severity: Severity::Warning,
        description: "Insurance/member ID pattern detected",
        suggestion: "Insurance IDs should be encrypted and access-controlled.",
        regex: &RE_INSURANCE_ID,
    },
    PhiDetector {
        id: "credit-card",
        name: "Credit Card Number",
        category: Category::Financial,
        severity: Severity::Critical,
        description: "Credit card number pattern detected",
        suggestion: "Never store raw credit card numbers. Use PCI-compliant tokenization.",
        regex: &RE_CREDIT_CARD,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_complete_and_unique() {
        let detectors = all_detectors();
        assert_eq!(detectors.len(), 15);

        let mut ids: Vec<&str> = detectors.iter().map(|d| d.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 15, "detector ids must be unique");
    }

    #[test]
    fn test_all_patterns_compile() {
        for detector in all_detectors() {
            // Forces LazyLock initialization; a bad pattern panics here.
            assert!(detector.regex.as_str().len() > 0);
        }
    }

    #[test]
    fn test_ssn_pattern() {
        assert!(RE_SSN.is_match("123-45-6789"));
        assert!(RE_SSN.is_match("ssn 123 45 6789"));
        assert!(RE_SSN.is_match("123456789"));
        assert!(!RE_SSN.is_match("12-345-6789"));
    }

    #[test]
    fn test_mrn_pattern() {
        assert!(RE_MRN.is_match(r#"const x = "MRN: AB123456";"#));
        assert!(RE_MRN.is_match("medical record number 000123456"));
        assert!(!RE_MRN.is_match("MRN: AB1"));
    }

    #[test]
    fn test_dea_is_case_sensitive() {
        assert!(RE_DEA.is_match("AB1234567"));
        assert!(!RE_DEA.is_match("ab1234567"));
    }

    #[test]
    fn test_dob_pattern() {
        assert!(RE_DOB.is_match("DOB: 01/02/1990"));
        assert!(RE_DOB.is_match("date of birth: 1990-01-02"));
        assert!(!RE_DOB.is_match("01/02/1990"));
    }

    #[test]
    fn test_icd10_pattern() {
        assert!(RE_ICD10.is_match("diagnosis: E11.9"));
        assert!(RE_ICD10.is_match("ICD-10 J45"));
        assert!(!RE_ICD10.is_match("diagnosis: pending"));
    }

    #[test]
    fn test_credit_card_pattern() {
        assert!(RE_CREDIT_CARD.is_match("4111111111111111"));
        assert!(RE_CREDIT_CARD.is_match("5500005555555559"));
        assert!(RE_CREDIT_CARD.is_match("378282246310005"));
        assert!(!RE_CREDIT_CARD.is_match("1234567890123456"));
    }

    #[test]
    fn test_lab_value_pattern() {
        assert!(RE_LAB_VALUE.is_match("glucose: 120 mg/dL"));
        assert!(RE_LAB_VALUE.is_match("potassium 4.1 mEq/L"));
        assert!(!RE_LAB_VALUE.is_match("glucose levels look fine"));
    }
}
