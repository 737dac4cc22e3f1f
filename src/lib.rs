//! PHI static analysis: a fixed catalogue of regex detectors for Protected
//! Health Information, an egress audit against a trusted-domain allow-list,
//! and a heuristic AI-integration safety checklist.
//!
//! The core contract is [`core::engine::ScanEngine::scan`], a pure function
//! over in-memory files. The [`core::assembler`] entry points wrap it into
//! finished reports; everything else is CLI plumbing.

pub mod config;
pub mod core;
pub mod models;
pub mod output;
pub mod patterns;
pub mod utils;

pub use crate::core::assembler::{egress_analysis, model_safety, static_analysis};
pub use crate::core::engine::{RiskThresholds, ScanEngine};
pub use crate::models::{ScanReport, ScanResult, SourceFile};
