//! Hazardous states and the registry that owns them.

use super::matrix::{risk_score, AcceptabilityPolicy};
use crate::core::{
    Detectability, EntityKind, Error, HazardCategory, Probability, Result, RiskLevel, Severity,
};
use im::Vector;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A hazardous state under analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: String,
    pub description: String,
    pub category: HazardCategory,
    /// Causal chain from hazard to harm, in narrative order
    pub sequence_of_events: Vec<String>,
    pub harm: String,
    pub severity: Severity,
    pub probability: Probability,
    pub detectability: Option<Detectability>,
}

impl Hazard {
    pub fn risk_score(&self) -> u8 {
        risk_score(self.severity, self.probability)
    }

    /// Hazards carry no policy; ask the owning registry for the level.
    pub fn risk_level_with(&self, policy: &AcceptabilityPolicy) -> RiskLevel {
        policy.classify(self.severity, self.probability)
    }

    /// FMECA risk priority number, only when detectability was rated.
    pub fn rpn(&self) -> Option<u16> {
        self.detectability
            .map(|d| u16::from(self.risk_score()) * u16::from(d.value()))
    }
}

/// Unvalidated input for [`HazardRegistry::add_hazard`].
///
/// `category` is kept as text so that risk files and AI proposals go
/// through the same closed-set check at insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHazard {
    pub id: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub sequence_of_events: Vec<String>,
    #[serde(default)]
    pub harm: String,
    pub severity: Severity,
    pub probability: Probability,
    #[serde(default)]
    pub detectability: Option<Detectability>,
}

impl NewHazard {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        probability: Probability,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            category: category.into(),
            sequence_of_events: Vec::new(),
            harm: String::new(),
            severity,
            probability,
            detectability: None,
        }
    }

    pub fn with_sequence<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequence_of_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_harm(mut self, harm: impl Into<String>) -> Self {
        self.harm = harm.into();
        self
    }

    pub fn with_detectability(mut self, detectability: Detectability) -> Self {
        self.detectability = Some(detectability);
        self
    }

    fn validate(self) -> Result<Hazard> {
        let category = self.category.parse::<HazardCategory>()?;
        Ok(Hazard {
            id: self.id,
            description: self.description,
            category,
            sequence_of_events: self.sequence_of_events,
            harm: self.harm,
            severity: self.severity,
            probability: self.probability,
            detectability: self.detectability,
        })
    }
}

impl From<&Hazard> for NewHazard {
    fn from(hazard: &Hazard) -> Self {
        Self {
            id: hazard.id.clone(),
            description: hazard.description.clone(),
            category: hazard.category.into(),
            sequence_of_events: hazard.sequence_of_events.clone(),
            harm: hazard.harm.clone(),
            severity: hazard.severity,
            probability: hazard.probability,
            detectability: hazard.detectability,
        }
    }
}

/// Existence check used to validate foreign references to hazards.
pub trait HazardDirectory: Send + Sync {
    fn hazard_exists(&self, id: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
struct HazardStore {
    order: Vector<Hazard>,
    index: HashMap<String, usize>,
}

/// In-memory hazard registry, insertion ordered, one lock per instance.
#[derive(Debug, Default)]
pub struct HazardRegistry {
    state: RwLock<HazardStore>,
    policy: AcceptabilityPolicy,
}

impl HazardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AcceptabilityPolicy) -> Self {
        Self {
            state: RwLock::default(),
            policy,
        }
    }

    pub fn policy(&self) -> &AcceptabilityPolicy {
        &self.policy
    }

    /// Validate and insert a hazard; the registry is untouched on error.
    pub fn add_hazard(&self, new: NewHazard) -> Result<Hazard> {
        let hazard = new.validate()?;
        let mut state = self.state.write();
        if state.index.contains_key(&hazard.id) {
            return Err(Error::duplicate(EntityKind::Hazard, &hazard.id));
        }
        let position = state.order.len();
        state.index.insert(hazard.id.clone(), position);
        state.order.push_back(hazard.clone());
        debug!(
            hazard_id = %hazard.id,
            score = hazard.risk_score(),
            "hazard registered"
        );
        Ok(hazard)
    }

    pub fn get(&self, id: &str) -> Result<Hazard> {
        let state = self.state.read();
        state
            .index
            .get(id)
            .and_then(|&position| state.order.get(position))
            .cloned()
            .ok_or_else(|| Error::not_found(EntityKind::Hazard, id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().index.contains_key(id)
    }

    /// Snapshot of all hazards in insertion order.
    pub fn list(&self) -> Vector<Hazard> {
        self.state.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn risk_score(&self, hazard: &Hazard) -> u8 {
        hazard.risk_score()
    }

    pub fn risk_level(&self, hazard: &Hazard) -> RiskLevel {
        hazard.risk_level_with(&self.policy)
    }

    pub fn rpn(&self, hazard: &Hazard) -> Option<u16> {
        hazard.rpn()
    }
}

impl HazardDirectory for HazardRegistry {
    fn hazard_exists(&self, id: &str) -> bool {
        self.contains(id)
    }
}
