//! Risk assessment and compliance gap scoring for medical device quality
//! management systems.
//!
//! - [`risk`]: ISO 14971 hazard and control registries, the acceptability
//!   matrix and the risk register with its derived reports.
//! - [`gap`]: weighted ISO 13485 gap scoring against a supplied checklist.
//! - [`enrichment`]: optional, injected hazard suggestions with a timeout
//!   and a deterministic template fallback.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod enrichment;
pub mod formatting;
pub mod gap;
pub mod io;
pub mod risk;

pub use crate::core::{
    ControlType, Detectability, EntityKind, Error, ErrorCode, HazardCategory,
    ImplementationStatus, Probability, Result, ResultExt, RiskLevel, Severity,
};

pub use crate::risk::{
    build_matrix, classify, risk_score, AcceptabilityPolicy, ControlMeasure, ControlRegistry,
    Hazard, HazardRegistry, NewControl, NewHazard, RegisterStatus, RiskAssessment, RiskMatrix,
    RiskRegister, RiskRegisterRow,
};

pub use crate::gap::{
    ChecklistCatalog, ChecklistItem, ComplianceBand, ComplianceStatus, GapScore, GapScorer,
    GapStatuses,
};

pub use crate::enrichment::{EnrichmentHook, HazardProposal, HazardSuggester, ProductContext};

pub use crate::io::output::{create_writer, OutputFormat, ReportWriter};
