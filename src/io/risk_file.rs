//! Risk files: hazards and controls described in TOML or JSON.
//!
//! Loading goes through the public assessment operations, so a risk file
//! is validated exactly like programmatic input. Ranks are read as plain
//! integers and checked when applied, so an out-of-range rank is a
//! validation error rather than a parse error.

use crate::core::{
    ControlType, Detectability, Error, ImplementationStatus, Probability, Result, Severity,
};
use crate::risk::{NewControl, NewHazard, RiskAssessment};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFile {
    #[serde(default)]
    pub hazards: Vec<HazardEntry>,
    #[serde(default)]
    pub controls: Vec<ControlEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardEntry {
    pub id: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub sequence_of_events: Vec<String>,
    #[serde(default)]
    pub harm: String,
    pub severity: u8,
    pub probability: u8,
    #[serde(default)]
    pub detectability: Option<u8>,
}

impl HazardEntry {
    fn to_new_hazard(&self) -> Result<NewHazard> {
        let mut hazard = NewHazard::new(
            self.id.clone(),
            self.description.clone(),
            self.category.clone(),
            Severity::from_rank(self.severity)?,
            Probability::from_rank(self.probability)?,
        )
        .with_sequence(self.sequence_of_events.iter().cloned())
        .with_harm(self.harm.clone());
        if let Some(rating) = self.detectability {
            hazard = hazard.with_detectability(Detectability::new(rating)?);
        }
        Ok(hazard)
    }
}

/// A control with its recorded lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub id: String,
    pub hazard_id: String,
    pub description: String,
    pub control_type: ControlType,
    pub verification_method: String,
    #[serde(default)]
    pub responsible_person: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub residual_severity: Option<u8>,
    #[serde(default)]
    pub residual_probability: Option<u8>,
    #[serde(default)]
    pub verification_date: Option<NaiveDate>,
    #[serde(default)]
    pub effectiveness: Option<String>,
}

impl ControlEntry {
    fn residual(&self) -> Result<Option<(Severity, Probability)>> {
        match (self.residual_severity, self.residual_probability) {
            (Some(severity), Some(probability)) => Ok(Some((
                Severity::from_rank(severity)?,
                Probability::from_rank(probability)?,
            ))),
            (None, None) => Ok(None),
            _ => Err(Error::invalid_value(
                "residual",
                format!(
                    "control '{}' needs both residual_severity and residual_probability",
                    self.id
                ),
            )),
        }
    }

    fn status(&self) -> Result<Option<ImplementationStatus>> {
        self.status
            .as_deref()
            .map(str::parse::<ImplementationStatus>)
            .transpose()
    }

    fn to_new_control(&self) -> NewControl {
        NewControl {
            id: self.id.clone(),
            hazard_id: self.hazard_id.clone(),
            description: self.description.clone(),
            control_type: self.control_type,
            verification_method: self.verification_method.clone(),
            responsible_person: self.responsible_person.clone(),
            due_date: self.due_date,
        }
    }
}

impl RiskFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a risk file, JSON when the extension says so, TOML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let content = super::read_file(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Insert every hazard, then every control with its recorded state.
    pub fn apply_to(&self, assessment: &RiskAssessment) -> Result<()> {
        for entry in &self.hazards {
            assessment.add_hazard(entry.to_new_hazard()?)?;
        }
        for entry in &self.controls {
            let residual = entry.residual()?;
            let status = entry.status()?;
            assessment.add_control(entry.to_new_control())?;
            if let Some((severity, probability)) = residual {
                assessment.record_residual_risk(&entry.id, severity, probability)?;
            }
            if let Some(status) = status {
                assessment.advance_status(&entry.id, status)?;
            }
            if let Some(date) = entry.verification_date {
                assessment.record_verification(&entry.id, date, entry.effectiveness.clone())?;
            }
        }
        info!(
            hazards = self.hazards.len(),
            controls = self.controls.len(),
            "risk file loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RegisterStatus;
    use indoc::indoc;

    const RISK_FILE: &str = indoc! {r#"
        [[hazards]]
        id = "H-1"
        description = "Electrical leakage current"
        category = "Electrical"
        harm = "Electric shock"
        sequence_of_events = ["Insulation failure", "Patient contact"]
        severity = 3
        probability = 4

        [[controls]]
        id = "C-1"
        hazard_id = "H-1"
        description = "Double insulation"
        control_type = "Prevention"
        verification_method = "Dielectric strength test"
        status = "implemented"
        residual_severity = 2
        residual_probability = 2

        [[controls]]
        id = "C-2"
        hazard_id = "H-1"
        description = "Leakage current monitor"
        control_type = "protection"
        verification_method = "Leakage measurement"
        status = "Implemented"
        residual_severity = 1
        residual_probability = 3
        verification_date = "2026-02-01"
    "#};

    #[test]
    fn test_risk_file_builds_register() {
        let assessment = RiskAssessment::new();
        RiskFile::from_toml_str(RISK_FILE)
            .unwrap()
            .apply_to(&assessment)
            .unwrap();
        let register = assessment.generate_register();
        let row = register.row("H-1").unwrap();
        assert_eq!(row.initial_risk_score, 12);
        assert_eq!(row.residual_risk_score, 3);
        assert_eq!(row.status, RegisterStatus::Controlled);
        assert!(assessment.control("C-2").unwrap().verification_date.is_some());
    }

    #[test]
    fn test_half_residual_rejected() {
        let file = RiskFile::from_toml_str(&RISK_FILE.replace("residual_probability = 2\n", ""))
            .unwrap();
        let assessment = RiskAssessment::new();
        let err = file.apply_to(&assessment).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { field: "residual", .. }));
        assert!(assessment.controls().is_empty());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let file =
            RiskFile::from_toml_str(&RISK_FILE.replace("\"implemented\"", "\"done\"")).unwrap();
        assert!(matches!(
            file.apply_to(&RiskAssessment::new()),
            Err(Error::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_out_of_range_ranks_are_validation_errors() {
        let file = RiskFile::from_toml_str(&RISK_FILE.replace("\nseverity = 3", "\nseverity = 7"))
            .unwrap();
        let assessment = RiskAssessment::new();
        assert!(matches!(
            file.apply_to(&assessment),
            Err(Error::InvalidValue { field: "severity", .. })
        ));
        assert!(assessment.hazards().is_empty());

        let file = RiskFile::from_toml_str(
            &RISK_FILE.replace("residual_probability = 3", "residual_probability = 0"),
        )
        .unwrap();
        let err = file.apply_to(&RiskAssessment::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { field: "probability", .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_json_risk_file() {
        let file = RiskFile::from_json_str(
            r#"{"hazards":[{"id":"H-1","description":"Hot surface","category":"Thermal","severity":2,"probability":3}]}"#,
        )
        .unwrap();
        assert_eq!(file.hazards.len(), 1);
        assert!(file.controls.is_empty());
    }
}
