//! Ordinal scales used for ISO 14971 risk estimation.
//!
//! Severity and probability are closed five-level scales. Each level carries
//! its rank (1-5) and descriptive text in a single definition; ordering
//! follows rank. Detectability is an optional 1-5 rating used only for the
//! FMECA risk priority number.

use super::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Severity of the resulting harm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Negligible = 1,
    Minor = 2,
    Serious = 3,
    Critical = 4,
    Catastrophic = 5,
}

impl Severity {
    /// All levels in ascending rank order.
    pub const ALL: [Severity; 5] = [
        Severity::Negligible,
        Severity::Minor,
        Severity::Serious,
        Severity::Critical,
        Severity::Catastrophic,
    ];

    pub fn from_rank(rank: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.rank() == rank)
            .ok_or_else(|| Error::invalid_value("severity", rank))
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Negligible => "NEGLIGIBLE",
            Self::Minor => "MINOR",
            Self::Serious => "SERIOUS",
            Self::Critical => "CRITICAL",
            Self::Catastrophic => "CATASTROPHIC",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Negligible => "No injury or impairment to health",
            Self::Minor => "Temporary injury or impairment requiring minor medical intervention",
            Self::Serious => "Injury or impairment requiring professional medical intervention",
            Self::Critical => "Permanent impairment or life-threatening injury",
            Self::Catastrophic => "Patient death",
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(rank: u8) -> Result<Self> {
        Self::from_rank(rank)
    }
}

impl From<Severity> for u8 {
    fn from(level: Severity) -> u8 {
        level.rank()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Probability that the hazardous sequence occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Probability {
    Incredible = 1,
    Improbable = 2,
    Remote = 3,
    Occasional = 4,
    Frequent = 5,
}

impl Probability {
    /// All levels in ascending rank order.
    pub const ALL: [Probability; 5] = [
        Probability::Incredible,
        Probability::Improbable,
        Probability::Remote,
        Probability::Occasional,
        Probability::Frequent,
    ];

    pub fn from_rank(rank: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.rank() == rank)
            .ok_or_else(|| Error::invalid_value("probability", rank))
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Incredible => "INCREDIBLE",
            Self::Improbable => "IMPROBABLE",
            Self::Remote => "REMOTE",
            Self::Occasional => "OCCASIONAL",
            Self::Frequent => "FREQUENT",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Incredible => "So unlikely, it can be assumed occurrence may not be experienced",
            Self::Improbable => "Unlikely to occur but possible",
            Self::Remote => "Likely to occur sometime in the life of the product",
            Self::Occasional => "Likely to occur several times in the life of the product",
            Self::Frequent => "Likely to occur frequently",
        }
    }

    /// Qualitative frequency band for the level.
    pub fn frequency_range(self) -> &'static str {
        match self {
            Self::Incredible => "< 1 in 10,000,000",
            Self::Improbable => "1 in 1,000,000 to 1 in 10,000,000",
            Self::Remote => "1 in 100,000 to 1 in 1,000,000",
            Self::Occasional => "1 in 10,000 to 1 in 100,000",
            Self::Frequent => "> 1 in 10,000",
        }
    }
}

impl TryFrom<u8> for Probability {
    type Error = Error;

    fn try_from(rank: u8) -> Result<Self> {
        Self::from_rank(rank)
    }
}

impl From<Probability> for u8 {
    fn from(level: Probability) -> u8 {
        level.rank()
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// FMECA detectability rating, 1 (almost certain detection) to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Detectability(u8);

impl Detectability {
    pub fn new(rating: u8) -> Result<Self> {
        if (1..=5).contains(&rating) {
            Ok(Self(rating))
        } else {
            Err(Error::invalid_value("detectability", rating))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Detectability {
    type Error = Error;

    fn try_from(rating: u8) -> Result<Self> {
        Self::new(rating)
    }
}

impl From<Detectability> for u8 {
    fn from(rating: Detectability) -> u8 {
        rating.0
    }
}
