//! ISO 14971 risk estimation, control tracking and the risk register.

pub mod assessment;
pub mod control;
pub mod hazard;
pub mod matrix;
pub mod register;

pub use assessment::RiskAssessment;
pub use control::{select_residual, ControlMeasure, ControlRegistry, NewControl, ResidualRisk};
pub use hazard::{Hazard, HazardDirectory, HazardRegistry, NewHazard};
pub use matrix::{
    build_matrix, classify, risk_score, AcceptabilityPolicy, RiskHeatmap, RiskMatrix,
    DEFAULT_UNACCEPTABLE_AT, DEFAULT_UNDESIRABLE_AT, MAX_RISK_SCORE,
};
pub use register::{
    CategorySummary, ControlPlan, ControlSummaryRow, RegisterStatus, RiskManagementFile,
    RiskRegister, RiskRegisterRow, VerificationState, DEFAULT_HIGH_PRIORITY_THRESHOLD,
};
