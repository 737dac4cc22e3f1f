pub mod egress;
pub mod finding;
pub mod report;
pub mod safety;
pub mod severity;
pub mod source;
pub mod tally;

pub use egress::{EgressRisk, RiskLevel};
pub use finding::Finding;
pub use report::{ScanReport, ScanResult, Summary};
pub use safety::{CheckOutcome, ModelSafetyGrade, ModelSafetyReport, SafetyCheckResult};
pub use severity::Severity;
pub use source::SourceFile;
pub use tally::PatternTally;
