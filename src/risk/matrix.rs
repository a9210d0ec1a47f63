//! Risk acceptability policy and the 5x5 matrix derived from it.
//!
//! [`AcceptabilityPolicy::classify`] is the only place a risk score is
//! compared against thresholds. Hazard levels, residual levels and the
//! rendered matrix are all produced through it.

use crate::core::{Error, Probability, Result, RiskLevel, Severity};
use serde::{Deserialize, Serialize};

/// Score at or above which a risk is unacceptable (ISO 14971 default)
pub const DEFAULT_UNACCEPTABLE_AT: u8 = 15;
/// Score at or above which a risk is undesirable (ISO 14971 default)
pub const DEFAULT_UNDESIRABLE_AT: u8 = 8;

/// Highest possible severity x probability score
pub const MAX_RISK_SCORE: u8 = 25;

/// Severity rank x probability rank, 1..=25.
pub fn risk_score(severity: Severity, probability: Probability) -> u8 {
    severity.rank() * probability.rank()
}

/// Thresholds mapping a risk score to an acceptability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyThresholds")]
pub struct AcceptabilityPolicy {
    unacceptable_at: u8,
    undesirable_at: u8,
}

#[derive(Deserialize)]
struct PolicyThresholds {
    unacceptable_at: u8,
    undesirable_at: u8,
}

impl TryFrom<PolicyThresholds> for AcceptabilityPolicy {
    type Error = Error;

    fn try_from(raw: PolicyThresholds) -> Result<Self> {
        Self::new(raw.undesirable_at, raw.unacceptable_at)
    }
}

impl Default for AcceptabilityPolicy {
    fn default() -> Self {
        Self {
            unacceptable_at: DEFAULT_UNACCEPTABLE_AT,
            undesirable_at: DEFAULT_UNDESIRABLE_AT,
        }
    }
}

impl AcceptabilityPolicy {
    /// Build a policy; requires `1 <= undesirable_at < unacceptable_at <= 25`.
    pub fn new(undesirable_at: u8, unacceptable_at: u8) -> Result<Self> {
        if undesirable_at == 0 || undesirable_at >= unacceptable_at {
            return Err(Error::invalid_value(
                "thresholds.undesirable",
                format!("{undesirable_at} (must be >= 1 and below {unacceptable_at})"),
            ));
        }
        if unacceptable_at > MAX_RISK_SCORE {
            return Err(Error::invalid_value(
                "thresholds.unacceptable",
                format!("{unacceptable_at} (must be <= {MAX_RISK_SCORE})"),
            ));
        }
        Ok(Self {
            unacceptable_at,
            undesirable_at,
        })
    }

    pub fn unacceptable_at(&self) -> u8 {
        self.unacceptable_at
    }

    pub fn undesirable_at(&self) -> u8 {
        self.undesirable_at
    }

    /// Classify a raw risk score.
    pub fn classify_score(&self, score: u8) -> RiskLevel {
        if score >= self.unacceptable_at {
            RiskLevel::Unacceptable
        } else if score >= self.undesirable_at {
            RiskLevel::Undesirable
        } else {
            RiskLevel::Acceptable
        }
    }

    pub fn classify(&self, severity: Severity, probability: Probability) -> RiskLevel {
        self.classify_score(risk_score(severity, probability))
    }

    /// Materialize the policy over every severity/probability pair.
    pub fn build_matrix(&self) -> RiskMatrix {
        let mut cells = [[RiskLevel::Acceptable; 5]; 5];
        for severity in Severity::ALL {
            for probability in Probability::ALL {
                cells[index(severity.rank())][index(probability.rank())] =
                    self.classify(severity, probability);
            }
        }
        RiskMatrix { cells }
    }
}

/// Classify using the default ISO 14971 thresholds.
pub fn classify(severity: Severity, probability: Probability) -> RiskLevel {
    AcceptabilityPolicy::default().classify(severity, probability)
}

/// Matrix for the default ISO 14971 thresholds.
pub fn build_matrix() -> RiskMatrix {
    AcceptabilityPolicy::default().build_matrix()
}

fn index(rank: u8) -> usize {
    usize::from(rank) - 1
}

/// Acceptability tier for every cell, rows by severity, columns by probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMatrix {
    cells: [[RiskLevel; 5]; 5],
}

impl RiskMatrix {
    pub fn get(&self, severity: Severity, probability: Probability) -> RiskLevel {
        self.cells[index(severity.rank())][index(probability.rank())]
    }

    /// Rows in ascending severity order.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = (Severity, &[RiskLevel; 5])> {
        Severity::ALL.into_iter().zip(self.cells.iter())
    }

    pub fn cells(&self) -> &[[RiskLevel; 5]; 5] {
        &self.cells
    }
}

/// Count of hazards falling in each severity/probability cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskHeatmap {
    counts: [[usize; 5]; 5],
}

impl RiskHeatmap {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Severity, Probability)>) -> Self {
        let mut heatmap = Self::default();
        for (severity, probability) in pairs {
            heatmap.counts[index(severity.rank())][index(probability.rank())] += 1;
        }
        heatmap
    }

    pub fn count(&self, severity: Severity, probability: Probability) -> usize {
        self.counts[index(severity.rank())][index(probability.rank())]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn counts(&self) -> &[[usize; 5]; 5] {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exhaustive_table() {
        for severity in Severity::ALL {
            for probability in Probability::ALL {
                let score = severity.rank() * probability.rank();
                let expected = if score >= 15 {
                    RiskLevel::Unacceptable
                } else if score >= 8 {
                    RiskLevel::Undesirable
                } else {
                    RiskLevel::Acceptable
                };
                assert_eq!(
                    classify(severity, probability),
                    expected,
                    "severity {severity} x probability {probability}"
                );
            }
        }
    }

    #[test]
    fn test_matrix_matches_classify() {
        let matrix = build_matrix();
        for severity in Severity::ALL {
            for probability in Probability::ALL {
                assert_eq!(
                    matrix.get(severity, probability),
                    classify(severity, probability)
                );
            }
        }
    }

    #[test]
    fn test_deserialized_policy_is_validated() {
        let policy: AcceptabilityPolicy =
            serde_json::from_str(r#"{"unacceptable_at":12,"undesirable_at":6}"#).unwrap();
        assert_eq!(policy, AcceptabilityPolicy::new(6, 12).unwrap());

        for raw in [
            r#"{"unacceptable_at":6,"undesirable_at":10}"#,
            r#"{"unacceptable_at":30,"undesirable_at":8}"#,
            r#"{"unacceptable_at":15,"undesirable_at":0}"#,
        ] {
            assert!(serde_json::from_str::<AcceptabilityPolicy>(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_boundary_scores() {
        let policy = AcceptabilityPolicy::default();
        assert_eq!(policy.classify_score(7), RiskLevel::Acceptable);
        assert_eq!(policy.classify_score(8), RiskLevel::Undesirable);
        assert_eq!(policy.classify_score(14), RiskLevel::Undesirable);
        assert_eq!(policy.classify_score(15), RiskLevel::Unacceptable);
    }

    #[test]
    fn test_critical_occasional_is_unacceptable() {
        assert_eq!(risk_score(Severity::Critical, Probability::Occasional), 16);
        assert_eq!(
            classify(Severity::Critical, Probability::Occasional),
            RiskLevel::Unacceptable
        );
    }

    #[test]
    fn test_policy_validation() {
        assert!(AcceptabilityPolicy::new(10, 20).is_ok());
        assert!(AcceptabilityPolicy::new(0, 15).is_err());
        assert!(AcceptabilityPolicy::new(15, 15).is_err());
        assert!(AcceptabilityPolicy::new(8, 26).is_err());
    }

    #[test]
    fn test_custom_policy_matrix_follows_policy() {
        let policy = AcceptabilityPolicy::new(5, 10).unwrap();
        let matrix = policy.build_matrix();
        assert_eq!(
            matrix.get(Severity::Serious, Probability::Remote),
            RiskLevel::Undesirable
        );
        assert_eq!(
            matrix.get(Severity::Minor, Probability::Frequent),
            RiskLevel::Unacceptable
        );
    }

    #[test]
    fn test_rows_are_in_severity_order() {
        let matrix = build_matrix();
        let severities: Vec<Severity> = matrix.rows().map(|(s, _)| s).collect();
        assert_eq!(severities, Severity::ALL.to_vec());
        let (_, top_row) = matrix.rows().last().unwrap();
        assert_eq!(top_row[4], RiskLevel::Unacceptable);
    }

    #[test]
    fn test_heatmap_counts_cells() {
        let heatmap = RiskHeatmap::from_pairs(vec![
            (Severity::Minor, Probability::Remote),
            (Severity::Minor, Probability::Remote),
            (Severity::Catastrophic, Probability::Incredible),
        ]);
        assert_eq!(heatmap.count(Severity::Minor, Probability::Remote), 2);
        assert_eq!(
            heatmap.count(Severity::Catastrophic, Probability::Incredible),
            1
        );
        assert_eq!(heatmap.total(), 3);
    }
}
