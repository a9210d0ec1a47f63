use crate::core::Result;
use crate::risk::{
    AcceptabilityPolicy, DEFAULT_HIGH_PRIORITY_THRESHOLD, DEFAULT_UNACCEPTABLE_AT,
    DEFAULT_UNDESIRABLE_AT,
};
use serde::{Deserialize, Serialize};

/// Risk acceptability thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Score at or above which a risk is unacceptable
    #[serde(default = "default_unacceptable")]
    pub unacceptable: u8,

    /// Score at or above which a risk is undesirable
    #[serde(default = "default_undesirable")]
    pub undesirable: u8,

    /// Initial or residual score that puts a hazard on the high priority list
    #[serde(default = "default_high_priority")]
    pub high_priority: u8,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            unacceptable: default_unacceptable(),
            undesirable: default_undesirable(),
            high_priority: default_high_priority(),
        }
    }
}

impl ThresholdsConfig {
    pub fn to_policy(&self) -> Result<AcceptabilityPolicy> {
        AcceptabilityPolicy::new(self.undesirable, self.unacceptable)
    }
}

fn default_unacceptable() -> u8 {
    DEFAULT_UNACCEPTABLE_AT
}
fn default_undesirable() -> u8 {
    DEFAULT_UNDESIRABLE_AT
}
fn default_high_priority() -> u8 {
    DEFAULT_HIGH_PRIORITY_THRESHOLD
}
