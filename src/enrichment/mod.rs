//! Optional hazard suggestion capability.
//!
//! A [`HazardSuggester`] is injected into the assessment through an
//! [`EnrichmentHook`]. The hook runs it under a timeout and turns every
//! failure into the built-in template list, so suggestions never become a
//! source of errors for callers. Proposals are never written to a registry
//! here; callers validate them with [`HazardProposal::validate`] and insert
//! through `add_hazard`.

pub mod completion;

pub use completion::{CompletionHazardSuggester, CompletionService};

use crate::config::EnrichmentConfig;
use crate::core::{Error, HazardCategory, Probability, Result, Severity};
use crate::risk::hazard::NewHazard;
use crossbeam::channel::{self, RecvTimeoutError};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default budget for a suggestion call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What the device is and how it is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContext {
    pub product_description: String,
    pub intended_use: String,
    #[serde(default)]
    pub user_groups: Vec<String>,
    #[serde(default)]
    pub use_environment: String,
}

impl ProductContext {
    pub fn new(product_description: impl Into<String>, intended_use: impl Into<String>) -> Self {
        Self {
            product_description: product_description.into(),
            intended_use: intended_use.into(),
            ..Self::default()
        }
    }

    pub fn with_user_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.use_environment = environment.into();
        self
    }
}

/// Unvalidated hazard candidate, shaped like the input to `add_hazard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardProposal {
    pub category: String,
    pub hazard_description: String,
    #[serde(default)]
    pub hazardous_state: String,
    #[serde(default)]
    pub sequence_of_events: Vec<String>,
    #[serde(default)]
    pub harm: String,
    pub severity: u8,
    pub probability: u8,
}

impl HazardProposal {
    /// Check category and ranks and produce registry input under `id`.
    pub fn validate(&self, id: impl Into<String>) -> Result<NewHazard> {
        let category = self.category.parse::<HazardCategory>()?;
        let severity = Severity::from_rank(self.severity)?;
        let probability = Probability::from_rank(self.probability)?;
        Ok(NewHazard::new(
            id,
            self.hazard_description.clone(),
            category,
            severity,
            probability,
        )
        .with_sequence(self.sequence_of_events.iter().cloned())
        .with_harm(self.harm.clone()))
    }
}

/// Source of hazard proposals for a product.
pub trait HazardSuggester: Send + Sync {
    fn suggest_hazards(&self, context: &ProductContext) -> Result<Vec<HazardProposal>>;
}

/// Generic hazards returned whenever no suggester is available.
pub fn template_hazards() -> Vec<HazardProposal> {
    vec![
        HazardProposal {
            category: "Mechanical".into(),
            hazard_description: "Sharp edges or points".into(),
            hazardous_state: "User contact with sharp components".into(),
            sequence_of_events: vec![
                "Product handling".into(),
                "Contact with sharp edge".into(),
                "Skin puncture".into(),
            ],
            harm: "Minor laceration or puncture wound".into(),
            severity: 2,
            probability: 3,
        },
        HazardProposal {
            category: "Functional".into(),
            hazard_description: "Device malfunction".into(),
            hazardous_state: "Device fails to perform intended function".into(),
            sequence_of_events: vec![
                "Device operation".into(),
                "Component failure".into(),
                "Loss of function".into(),
            ],
            harm: "Delayed or inadequate treatment".into(),
            severity: 3,
            probability: 2,
        },
        HazardProposal {
            category: "Human Factors".into(),
            hazard_description: "Use error".into(),
            hazardous_state: "Incorrect device operation by user".into(),
            sequence_of_events: vec![
                "User training inadequate".into(),
                "Incorrect operation".into(),
                "Unintended result".into(),
            ],
            harm: "Patient injury from misuse".into(),
            severity: 3,
            probability: 3,
        },
    ]
}

/// Injected suggestion capability with its call budget.
#[derive(Clone)]
pub struct EnrichmentHook {
    suggester: Option<Arc<dyn HazardSuggester>>,
    timeout: Duration,
}

impl Default for EnrichmentHook {
    fn default() -> Self {
        Self::absent()
    }
}

impl std::fmt::Debug for EnrichmentHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentHook")
            .field("present", &self.is_present())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl EnrichmentHook {
    pub fn absent() -> Self {
        Self {
            suggester: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new(suggester: Arc<dyn HazardSuggester>, timeout: Duration) -> Self {
        Self {
            suggester: Some(suggester),
            timeout,
        }
    }

    /// Hook using the `[enrichment]` call budget.
    pub fn from_config(
        suggester: Option<Arc<dyn HazardSuggester>>,
        config: &EnrichmentConfig,
    ) -> Self {
        Self {
            suggester,
            timeout: config.timeout(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.suggester.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Proposals from the suggester, or the template list when it is
    /// absent, fails, panics or runs past the timeout.
    pub fn suggest(&self, context: &ProductContext) -> Vec<HazardProposal> {
        let Some(suggester) = &self.suggester else {
            debug!("no hazard suggester configured, using templates");
            return template_hazards();
        };

        match self.call(Arc::clone(suggester), context) {
            Ok(proposals) => {
                debug!(count = proposals.len(), "hazard suggestions received");
                proposals
            }
            Err(err) => {
                warn!(error = %err, "hazard suggestion failed, using templates");
                template_hazards()
            }
        }
    }

    // A late answer after a timeout is dropped with the channel.
    fn call(
        &self,
        suggester: Arc<dyn HazardSuggester>,
        context: &ProductContext,
    ) -> Result<Vec<HazardProposal>> {
        let (tx, rx) = channel::bounded(1);
        let context = context.clone();
        thread::Builder::new()
            .name("hazard-suggester".into())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    suggester.suggest_hazards(&context)
                }))
                .unwrap_or_else(|_| Err(Error::Enrichment("suggester panicked".into())));
                let _ = tx.send(outcome);
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(Error::Enrichment(format!(
                "no response within {} ms",
                self.timeout.as_millis()
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Enrichment(
                "suggester exited without a response".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<HazardProposal>);

    impl HazardSuggester for Fixed {
        fn suggest_hazards(&self, _: &ProductContext) -> Result<Vec<HazardProposal>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl HazardSuggester for Failing {
        fn suggest_hazards(&self, _: &ProductContext) -> Result<Vec<HazardProposal>> {
            Err(Error::Enrichment("provider unavailable".into()))
        }
    }

    struct Slow;

    impl HazardSuggester for Slow {
        fn suggest_hazards(&self, _: &ProductContext) -> Result<Vec<HazardProposal>> {
            thread::sleep(Duration::from_millis(500));
            Ok(vec![])
        }
    }

    struct Panicking;

    impl HazardSuggester for Panicking {
        fn suggest_hazards(&self, _: &ProductContext) -> Result<Vec<HazardProposal>> {
            panic!("provider client bug")
        }
    }

    fn context() -> ProductContext {
        ProductContext::new("Infusion pump", "Controlled delivery of IV fluids")
            .with_user_groups(["Nurses", "Physicians"])
            .with_environment("Hospital ward")
    }

    #[test]
    fn test_absent_hook_returns_templates() {
        let proposals = EnrichmentHook::absent().suggest(&context());
        assert_eq!(proposals, template_hazards());
        assert_eq!(proposals.len(), 3);
    }

    #[test]
    fn test_suggester_output_is_passed_through() {
        let custom = vec![HazardProposal {
            category: "Electrical".into(),
            hazard_description: "Leakage current".into(),
            hazardous_state: String::new(),
            sequence_of_events: vec![],
            harm: "Shock".into(),
            severity: 4,
            probability: 2,
        }];
        let hook = EnrichmentHook::new(Arc::new(Fixed(custom.clone())), DEFAULT_TIMEOUT);
        assert_eq!(hook.suggest(&context()), custom);
    }

    #[test]
    fn test_failure_falls_back_to_templates() {
        let hook = EnrichmentHook::new(Arc::new(Failing), DEFAULT_TIMEOUT);
        assert_eq!(hook.suggest(&context()), template_hazards());
    }

    #[test]
    fn test_timeout_falls_back_to_templates() {
        let hook = EnrichmentHook::new(Arc::new(Slow), Duration::from_millis(20));
        assert_eq!(hook.suggest(&context()), template_hazards());
    }

    #[test]
    fn test_panic_falls_back_to_templates() {
        let hook = EnrichmentHook::new(Arc::new(Panicking), DEFAULT_TIMEOUT);
        assert_eq!(hook.suggest(&context()), template_hazards());
    }

    #[test]
    fn test_configured_timeout_is_used() {
        let config = EnrichmentConfig { timeout_ms: 20 };
        let hook = EnrichmentHook::from_config(Some(Arc::new(Slow)), &config);
        assert_eq!(hook.timeout(), Duration::from_millis(20));
        assert_eq!(hook.suggest(&context()), template_hazards());

        let absent = EnrichmentHook::from_config(None, &EnrichmentConfig::default());
        assert!(!absent.is_present());
        assert_eq!(absent.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_templates_validate() {
        for (i, proposal) in template_hazards().iter().enumerate() {
            let hazard = proposal.validate(format!("T-{i}")).unwrap();
            assert_eq!(hazard.id, format!("T-{i}"));
            assert!(!hazard.sequence_of_events.is_empty());
        }
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut proposal = template_hazards().remove(0);
        proposal.category = "Radiation".into();
        assert!(matches!(
            proposal.validate("X"),
            Err(Error::InvalidCategory(_))
        ));

        let mut proposal = template_hazards().remove(0);
        proposal.severity = 9;
        assert!(matches!(
            proposal.validate("X"),
            Err(Error::InvalidValue { field: "severity", .. })
        ));
    }
}
