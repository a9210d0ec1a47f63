//! Risk assessment: hazard and control registries plus derived reports.

use super::control::{ControlMeasure, ControlRegistry, NewControl};
use super::hazard::{Hazard, HazardRegistry, NewHazard};
use super::matrix::{AcceptabilityPolicy, RiskHeatmap, RiskMatrix};
use super::register::{
    CategorySummary, ControlPlan, ControlSummaryRow, RiskManagementFile, RiskRegister,
    RiskRegisterRow, DEFAULT_HIGH_PRIORITY_THRESHOLD,
};
use crate::core::{ImplementationStatus, Probability, Result, Severity};
use crate::enrichment::{EnrichmentHook, HazardProposal, ProductContext};
use chrono::NaiveDate;
use im::Vector;
use tracing::{debug, debug_span};

#[derive(Debug)]
pub struct RiskAssessment {
    hazards: HazardRegistry,
    controls: ControlRegistry,
    enrichment: EnrichmentHook,
    high_priority_threshold: u8,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskAssessment {
    pub fn new() -> Self {
        Self::with_policy(AcceptabilityPolicy::default())
    }

    pub fn with_policy(policy: AcceptabilityPolicy) -> Self {
        Self {
            hazards: HazardRegistry::with_policy(policy),
            controls: ControlRegistry::new(),
            enrichment: EnrichmentHook::absent(),
            high_priority_threshold: DEFAULT_HIGH_PRIORITY_THRESHOLD,
        }
    }

    pub fn with_enrichment(mut self, hook: EnrichmentHook) -> Self {
        self.enrichment = hook;
        self
    }

    /// Threshold used by the risk management file's high priority section.
    pub fn with_high_priority_threshold(mut self, threshold: u8) -> Self {
        self.high_priority_threshold = threshold;
        self
    }

    pub fn policy(&self) -> &AcceptabilityPolicy {
        self.hazards.policy()
    }

    pub fn hazards(&self) -> &HazardRegistry {
        &self.hazards
    }

    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    pub fn add_hazard(&self, hazard: NewHazard) -> Result<Hazard> {
        self.hazards.add_hazard(hazard)
    }

    pub fn add_control(&self, control: NewControl) -> Result<ControlMeasure> {
        self.controls.add_control(&self.hazards, control)
    }

    pub fn hazard(&self, id: &str) -> Result<Hazard> {
        self.hazards.get(id)
    }

    pub fn control(&self, id: &str) -> Result<ControlMeasure> {
        self.controls.get(id)
    }

    pub fn list_hazards(&self) -> Vector<Hazard> {
        self.hazards.list()
    }

    pub fn list_for_hazard(&self, hazard_id: &str) -> Vec<ControlMeasure> {
        self.controls.list_for_hazard(hazard_id)
    }

    pub fn record_residual_risk(
        &self,
        control_id: &str,
        severity: Severity,
        probability: Probability,
    ) -> Result<ControlMeasure> {
        self.controls
            .record_residual_risk(control_id, severity, probability)
    }

    pub fn advance_status(
        &self,
        control_id: &str,
        status: ImplementationStatus,
    ) -> Result<ControlMeasure> {
        self.controls.advance_status(control_id, status)
    }

    pub fn record_verification(
        &self,
        control_id: &str,
        date: NaiveDate,
        effectiveness: Option<String>,
    ) -> Result<ControlMeasure> {
        self.controls
            .record_verification(control_id, date, effectiveness)
    }

    /// Build the register from the registries as they are right now.
    pub fn generate_register(&self) -> RiskRegister {
        let _span = debug_span!("generate_register").entered();
        let hazards = self.hazards.list();
        let controls = self.controls.list();
        let register = RiskRegister::generate(&hazards, &controls, self.policy());
        debug!(
            rows = register.len(),
            requiring_action = register.requiring_action().count(),
            "risk register generated"
        );
        register
    }

    pub fn high_priority(&self, threshold: u8) -> Vec<RiskRegisterRow> {
        self.generate_register().high_priority(threshold)
    }

    pub fn category_summary(&self) -> Vec<CategorySummary> {
        self.generate_register().category_summary()
    }

    pub fn risk_matrix(&self) -> RiskMatrix {
        self.policy().build_matrix()
    }

    pub fn heatmap(&self) -> RiskHeatmap {
        RiskHeatmap::from_pairs(self.hazards.list().iter().map(|h| (h.severity, h.probability)))
    }

    pub fn control_plan(&self, hazard_id: &str) -> Result<ControlPlan> {
        let hazard = self.hazards.get(hazard_id)?;
        let controls = self.controls.list_for_hazard(hazard_id);
        Ok(ControlPlan::build(&hazard, &controls, self.policy()))
    }

    pub fn risk_management_file(&self) -> RiskManagementFile {
        let register = self.generate_register();
        RiskManagementFile {
            control_measures: self
                .controls
                .list()
                .iter()
                .map(ControlSummaryRow::from)
                .collect(),
            category_summary: register.category_summary(),
            high_priority_risks: register.high_priority(self.high_priority_threshold),
            risk_matrix: self.risk_matrix(),
            risk_register: register.rows().to_vec(),
        }
    }

    /// Candidate hazards for the caller to review and insert.
    pub fn suggest_hazards(&self, context: &ProductContext) -> Vec<HazardProposal> {
        self.enrichment.suggest(context)
    }
}
