pub mod egress;
pub mod phi;

pub use egress::{all_egress_detectors, data_type_probes, guess_method, EgressDetector};
pub use phi::{all_detectors, Category, PhiDetector};
