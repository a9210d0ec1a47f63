//! ISO 13485 compliance gap analysis.

pub mod catalog;
pub mod scorer;

pub use catalog::{ChecklistCatalog, ChecklistItem};
pub use scorer::{
    parse_statuses, weighted_percent, CategoryScore, ComplianceBand, ComplianceStatus, GapItem,
    GapScore, GapScorer, GapStatuses,
};
