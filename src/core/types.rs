//! Closed enumerations shared by the risk registries and reports.

use super::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hazard categories per ISO 14971 Annex C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HazardCategory {
    Biological,
    Environmental,
    HumanFactors,
    Functional,
    Mechanical,
    Thermal,
    Electrical,
    Software,
    Manufacturing,
}

impl HazardCategory {
    pub const ALL: [HazardCategory; 9] = [
        HazardCategory::Biological,
        HazardCategory::Environmental,
        HazardCategory::HumanFactors,
        HazardCategory::Functional,
        HazardCategory::Mechanical,
        HazardCategory::Thermal,
        HazardCategory::Electrical,
        HazardCategory::Software,
        HazardCategory::Manufacturing,
    ];

    /// Label used in registers and reports
    pub fn label(self) -> &'static str {
        match self {
            Self::Biological => "Biological and Chemical",
            Self::Environmental => "Environmental",
            Self::HumanFactors => "Human Factors/Usability",
            Self::Functional => "Functional",
            Self::Mechanical => "Mechanical",
            Self::Thermal => "Thermal",
            Self::Electrical => "Electrical",
            Self::Software => "Software",
            Self::Manufacturing => "Manufacturing/Quality",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Self::Biological => "Biological",
            Self::HumanFactors => "Human Factors",
            Self::Manufacturing => "Manufacturing",
            other => other.label(),
        }
    }
}

impl FromStr for HazardCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| {
                c.label().eq_ignore_ascii_case(wanted) || c.short_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

impl TryFrom<String> for HazardCategory {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HazardCategory> for String {
    fn from(category: HazardCategory) -> String {
        category.label().to_string()
    }
}

impl std::fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Acceptability tier of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Acceptable,
    Undesirable,
    Unacceptable,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Acceptable => "ACCEPTABLE",
            Self::Undesirable => "UNDESIRABLE",
            Self::Unacceptable => "UNACCEPTABLE",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Risk control option, in ISO 14971 priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlType {
    /// Inherent safety by design
    #[serde(alias = "prevention")]
    Prevention,
    /// Protective measures in the device or manufacturing process
    #[serde(alias = "protection")]
    Protection,
    /// Information for safety and training
    #[serde(alias = "information")]
    Information,
}

impl FromStr for ControlType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "prevention" => Ok(Self::Prevention),
            "protection" => Ok(Self::Protection),
            "information" => Ok(Self::Information),
            _ => Err(Error::invalid_value("control_type", s)),
        }
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prevention => write!(f, "Prevention"),
            Self::Protection => write!(f, "Protection"),
            Self::Information => write!(f, "Information"),
        }
    }
}

/// Implementation lifecycle of a control measure; only moves forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ImplementationStatus {
    #[default]
    #[serde(alias = "planned")]
    Planned,
    #[serde(alias = "implemented")]
    Implemented,
    #[serde(alias = "verified")]
    Verified,
}

impl FromStr for ImplementationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "implemented" => Ok(Self::Implemented),
            "verified" => Ok(Self::Verified),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planned => write!(f, "Planned"),
            Self::Implemented => write!(f, "Implemented"),
            Self::Verified => write!(f, "Verified"),
        }
    }
}
