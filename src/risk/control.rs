//! Risk control measures linked to hazards by id.

use super::hazard::HazardDirectory;
use super::matrix::risk_score;
use crate::core::{
    ControlType, EntityKind, Error, ImplementationStatus, Probability, Result, Severity,
};
use chrono::NaiveDate;
use im::Vector;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Residual severity and probability, recorded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualRisk {
    pub severity: Severity,
    pub probability: Probability,
}

impl ResidualRisk {
    pub fn score(&self) -> u8 {
        risk_score(self.severity, self.probability)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMeasure {
    pub id: String,
    /// Lookup key into the hazard registry, validated at insert time
    pub hazard_id: String,
    pub description: String,
    pub control_type: ControlType,
    pub implementation_status: ImplementationStatus,
    pub verification_method: String,
    pub verification_date: Option<NaiveDate>,
    pub effectiveness: Option<String>,
    pub residual: Option<ResidualRisk>,
    pub responsible_person: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl ControlMeasure {
    /// Residual score, or 0 while the residual risk is not yet assessed.
    pub fn residual_risk_score(&self) -> u8 {
        self.residual.map_or(0, |r| r.score())
    }

    pub fn residual_risk_severity(&self) -> Option<Severity> {
        self.residual.map(|r| r.severity)
    }

    pub fn residual_risk_probability(&self) -> Option<Probability> {
        self.residual.map(|r| r.probability)
    }

    pub fn is_implemented(&self) -> bool {
        self.implementation_status == ImplementationStatus::Implemented
    }
}

/// Input for [`ControlRegistry::add_control`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewControl {
    pub id: String,
    pub hazard_id: String,
    pub description: String,
    pub control_type: ControlType,
    pub verification_method: String,
    #[serde(default)]
    pub responsible_person: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl NewControl {
    pub fn new(
        id: impl Into<String>,
        hazard_id: impl Into<String>,
        description: impl Into<String>,
        control_type: ControlType,
        verification_method: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            hazard_id: hazard_id.into(),
            description: description.into(),
            control_type,
            verification_method: verification_method.into(),
            responsible_person: None,
            due_date: None,
        }
    }

    pub fn with_responsible(mut self, person: impl Into<String>) -> Self {
        self.responsible_person = Some(person.into());
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }
}

/// Pick the residual risk that stands for a hazard: the implemented control
/// with an assessed residual and the lowest residual score. Ties keep the
/// earliest control.
///
/// Only `Implemented` counts. A control moved on to `Verified` no longer
/// contributes a residual, so the register falls back to the next candidate
/// or to the initial risk.
pub fn select_residual<'a, I>(controls: I) -> Option<&'a ControlMeasure>
where
    I: IntoIterator<Item = &'a ControlMeasure>,
{
    controls
        .into_iter()
        .filter(|c| c.is_implemented() && c.residual.is_some())
        .min_by_key(|c| c.residual_risk_score())
}

#[derive(Debug, Clone, Default)]
struct ControlStore {
    order: Vector<ControlMeasure>,
    index: HashMap<String, usize>,
}

/// In-memory control measure registry, one lock per instance.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    state: RwLock<ControlStore>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a control for an existing hazard. Status starts at Planned.
    pub fn add_control(
        &self,
        hazards: &dyn HazardDirectory,
        new: NewControl,
    ) -> Result<ControlMeasure> {
        if !hazards.hazard_exists(&new.hazard_id) {
            return Err(Error::not_found(EntityKind::Hazard, new.hazard_id));
        }
        let control = ControlMeasure {
            id: new.id,
            hazard_id: new.hazard_id,
            description: new.description,
            control_type: new.control_type,
            implementation_status: ImplementationStatus::Planned,
            verification_method: new.verification_method,
            verification_date: None,
            effectiveness: None,
            residual: None,
            responsible_person: new.responsible_person,
            due_date: new.due_date,
        };

        let mut state = self.state.write();
        if state.index.contains_key(&control.id) {
            return Err(Error::duplicate(EntityKind::ControlMeasure, &control.id));
        }
        let position = state.order.len();
        state.index.insert(control.id.clone(), position);
        state.order.push_back(control.clone());
        debug!(control_id = %control.id, hazard_id = %control.hazard_id, "control registered");
        Ok(control)
    }

    pub fn get(&self, id: &str) -> Result<ControlMeasure> {
        let state = self.state.read();
        state
            .index
            .get(id)
            .and_then(|&position| state.order.get(position))
            .cloned()
            .ok_or_else(|| Error::not_found(EntityKind::ControlMeasure, id))
    }

    /// Snapshot of all controls in insertion order.
    pub fn list(&self) -> Vector<ControlMeasure> {
        self.state.read().order.clone()
    }

    pub fn list_for_hazard(&self, hazard_id: &str) -> Vec<ControlMeasure> {
        self.state
            .read()
            .order
            .iter()
            .filter(|c| c.hazard_id == hazard_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set residual severity and probability together.
    pub fn record_residual_risk(
        &self,
        control_id: &str,
        severity: Severity,
        probability: Probability,
    ) -> Result<ControlMeasure> {
        self.update(control_id, |control| {
            control.residual = Some(ResidualRisk {
                severity,
                probability,
            });
            Ok(())
        })
    }

    /// Move a control forward in its lifecycle. Setting the current status
    /// again is a no-op; moving backwards fails.
    pub fn advance_status(
        &self,
        control_id: &str,
        status: ImplementationStatus,
    ) -> Result<ControlMeasure> {
        self.update(control_id, |control| {
            if status < control.implementation_status {
                return Err(Error::StatusRegression {
                    id: control.id.clone(),
                    from: control.implementation_status,
                    to: status,
                });
            }
            control.implementation_status = status;
            Ok(())
        })
    }

    pub fn record_verification(
        &self,
        control_id: &str,
        date: NaiveDate,
        effectiveness: Option<String>,
    ) -> Result<ControlMeasure> {
        self.update(control_id, |control| {
            control.verification_date = Some(date);
            control.effectiveness = effectiveness;
            Ok(())
        })
    }

    pub fn residual_risk_score(&self, control: &ControlMeasure) -> u8 {
        control.residual_risk_score()
    }

    // Mutates a copy and commits it only when `apply` succeeds.
    fn update<F>(&self, control_id: &str, apply: F) -> Result<ControlMeasure>
    where
        F: FnOnce(&mut ControlMeasure) -> Result<()>,
    {
        let mut state = self.state.write();
        let position = *state
            .index
            .get(control_id)
            .ok_or_else(|| Error::not_found(EntityKind::ControlMeasure, control_id))?;
        let mut updated = state.order[position].clone();
        apply(&mut updated)?;
        state.order.set(position, updated.clone());
        Ok(updated)
    }
}
