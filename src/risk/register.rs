//! Risk register rows and the reports derived from them.
//!
//! A register is always generated from the current registry contents;
//! nothing here caches rows between calls.

use super::control::{select_residual, ControlMeasure};
use super::hazard::Hazard;
use super::matrix::{AcceptabilityPolicy, RiskMatrix};
use crate::core::{HazardCategory, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default threshold for the high priority report
pub const DEFAULT_HIGH_PRIORITY_THRESHOLD: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterStatus {
    Controlled,
    #[serde(rename = "Requires Action")]
    RequiresAction,
}

impl RegisterStatus {
    fn for_level(level: RiskLevel) -> Self {
        if level == RiskLevel::Acceptable {
            Self::Controlled
        } else {
            Self::RequiresAction
        }
    }
}

impl std::fmt::Display for RegisterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Controlled => write!(f, "Controlled"),
            Self::RequiresAction => write!(f, "Requires Action"),
        }
    }
}

/// One register line per hazard, joining initial and residual risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRegisterRow {
    pub hazard_id: String,
    pub category: HazardCategory,
    pub hazard_description: String,
    pub harm: String,
    pub severity: String,
    pub severity_score: u8,
    pub probability: String,
    pub probability_score: u8,
    pub initial_risk_score: u8,
    pub initial_risk_level: RiskLevel,
    pub control_measures: usize,
    pub implemented_controls: usize,
    pub residual_risk_score: u8,
    pub residual_risk_level: RiskLevel,
    pub rpn: Option<u16>,
    pub status: RegisterStatus,
}

impl RiskRegisterRow {
    /// Build the row for `hazard` from the controls that reference it.
    pub fn build(
        hazard: &Hazard,
        controls: &[&ControlMeasure],
        policy: &AcceptabilityPolicy,
    ) -> Self {
        let initial_score = hazard.risk_score();
        let initial_level = policy.classify_score(initial_score);
        let (residual_score, residual_level) =
            match select_residual(controls.iter().copied()).and_then(|c| c.residual) {
                Some(residual) => (
                    residual.score(),
                    policy.classify(residual.severity, residual.probability),
                ),
                None => (initial_score, initial_level),
            };

        Self {
            hazard_id: hazard.id.clone(),
            category: hazard.category,
            hazard_description: hazard.description.clone(),
            harm: hazard.harm.clone(),
            severity: hazard.severity.name().to_string(),
            severity_score: hazard.severity.rank(),
            probability: hazard.probability.name().to_string(),
            probability_score: hazard.probability.rank(),
            initial_risk_score: initial_score,
            initial_risk_level: initial_level,
            control_measures: controls.len(),
            implemented_controls: controls.iter().filter(|c| c.is_implemented()).count(),
            residual_risk_score: residual_score,
            residual_risk_level: residual_level,
            rpn: hazard.rpn(),
            status: RegisterStatus::for_level(residual_level),
        }
    }
}

/// Per-category aggregate of initial and residual scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: HazardCategory,
    pub count: usize,
    pub mean_initial_score: f64,
    pub max_initial_score: u8,
    pub mean_residual_score: f64,
    pub max_residual_score: u8,
}

#[derive(Default)]
struct CategoryAccumulator {
    count: usize,
    initial_sum: u32,
    initial_max: u8,
    residual_sum: u32,
    residual_max: u8,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A freshly generated register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRegister {
    rows: Vec<RiskRegisterRow>,
}

impl RiskRegister {
    pub fn new(rows: Vec<RiskRegisterRow>) -> Self {
        Self { rows }
    }

    /// Join every hazard with its controls, in hazard order.
    pub fn generate<'a, H, C>(hazards: H, controls: C, policy: &AcceptabilityPolicy) -> Self
    where
        H: IntoIterator<Item = &'a Hazard>,
        C: IntoIterator<Item = &'a ControlMeasure>,
    {
        let mut by_hazard: BTreeMap<&str, Vec<&ControlMeasure>> = BTreeMap::new();
        for control in controls {
            by_hazard
                .entry(control.hazard_id.as_str())
                .or_default()
                .push(control);
        }

        let rows = hazards
            .into_iter()
            .map(|hazard| {
                let linked = by_hazard
                    .get(hazard.id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                RiskRegisterRow::build(hazard, linked, policy)
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[RiskRegisterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, hazard_id: &str) -> Option<&RiskRegisterRow> {
        self.rows.iter().find(|r| r.hazard_id == hazard_id)
    }

    /// Rows whose initial or residual score reaches `threshold`, highest
    /// initial score first; equal scores keep hazard order.
    pub fn high_priority(&self, threshold: u8) -> Vec<RiskRegisterRow> {
        let mut rows: Vec<RiskRegisterRow> = self
            .rows
            .iter()
            .filter(|r| r.initial_risk_score >= threshold || r.residual_risk_score >= threshold)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.initial_risk_score.cmp(&a.initial_risk_score));
        rows
    }

    /// Count, mean and max of initial and residual scores per category.
    pub fn category_summary(&self) -> Vec<CategorySummary> {
        let mut groups: BTreeMap<HazardCategory, CategoryAccumulator> = BTreeMap::new();
        for row in &self.rows {
            let acc = groups.entry(row.category).or_default();
            acc.count += 1;
            acc.initial_sum += u32::from(row.initial_risk_score);
            acc.initial_max = acc.initial_max.max(row.initial_risk_score);
            acc.residual_sum += u32::from(row.residual_risk_score);
            acc.residual_max = acc.residual_max.max(row.residual_risk_score);
        }

        groups
            .into_iter()
            .map(|(category, acc)| {
                let count = acc.count as f64;
                CategorySummary {
                    category,
                    count: acc.count,
                    mean_initial_score: round2(f64::from(acc.initial_sum) / count),
                    max_initial_score: acc.initial_max,
                    mean_residual_score: round2(f64::from(acc.residual_sum) / count),
                    max_residual_score: acc.residual_max,
                }
            })
            .collect()
    }

    pub fn requiring_action(&self) -> impl Iterator<Item = &RiskRegisterRow> {
        self.rows
            .iter()
            .filter(|r| r.status == RegisterStatus::RequiresAction)
    }
}

/// Control line of a risk management file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSummaryRow {
    pub control_id: String,
    pub hazard_id: String,
    pub description: String,
    pub control_type: String,
    pub status: String,
    pub verification_method: String,
    pub responsible_person: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub verification_date: Option<NaiveDate>,
}

impl From<&ControlMeasure> for ControlSummaryRow {
    fn from(control: &ControlMeasure) -> Self {
        Self {
            control_id: control.id.clone(),
            hazard_id: control.hazard_id.clone(),
            description: control.description.clone(),
            control_type: control.control_type.to_string(),
            status: control.implementation_status.to_string(),
            verification_method: control.verification_method.clone(),
            responsible_person: control.responsible_person.clone(),
            due_date: control.due_date,
            verification_date: control.verification_date,
        }
    }
}

/// Everything an export layer needs to render the risk management file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskManagementFile {
    pub risk_register: Vec<RiskRegisterRow>,
    pub control_measures: Vec<ControlSummaryRow>,
    pub category_summary: Vec<CategorySummary>,
    pub high_priority_risks: Vec<RiskRegisterRow>,
    pub risk_matrix: RiskMatrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardDetails {
    pub id: String,
    pub description: String,
    pub category: HazardCategory,
    pub harm: String,
    pub initial_risk_score: u8,
    pub initial_risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedControl {
    pub id: String,
    pub description: String,
    pub control_type: String,
    pub status: String,
    pub responsible: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationState {
    Planned,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStep {
    pub control_id: String,
    pub method: String,
    pub status: VerificationState,
}

/// Control plan for a single hazard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPlan {
    pub hazard: HazardDetails,
    pub control_measures: Vec<PlannedControl>,
    pub verification_plan: Vec<VerificationStep>,
}

impl ControlPlan {
    pub fn build(hazard: &Hazard, controls: &[ControlMeasure], policy: &AcceptabilityPolicy) -> Self {
        let control_measures = controls
            .iter()
            .map(|c| PlannedControl {
                id: c.id.clone(),
                description: c.description.clone(),
                control_type: c.control_type.to_string(),
                status: c.implementation_status.to_string(),
                responsible: c.responsible_person.clone(),
                due_date: c.due_date,
            })
            .collect();
        let verification_plan = controls
            .iter()
            .map(|c| VerificationStep {
                control_id: c.id.clone(),
                method: c.verification_method.clone(),
                status: if c.verification_date.is_some() {
                    VerificationState::Complete
                } else {
                    VerificationState::Planned
                },
            })
            .collect();

        Self {
            hazard: HazardDetails {
                id: hazard.id.clone(),
                description: hazard.description.clone(),
                category: hazard.category,
                harm: hazard.harm.clone(),
                initial_risk_score: hazard.risk_score(),
                initial_risk_level: hazard.risk_level_with(policy),
            },
            control_measures,
            verification_plan,
        }
    }
}
