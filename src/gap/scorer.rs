//! Weighted compliance scoring against a checklist catalog.
//!
//! Compliant items count fully, partial items count half. The percentage
//! is rounded half-up on the final value, in integer arithmetic.

use super::catalog::{ChecklistCatalog, ChecklistItem};
use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, debug_span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    Partial,
    #[serde(alias = "non_compliant")]
    NonCompliant,
    #[serde(alias = "not_assessed")]
    NotAssessed,
}

impl ComplianceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::Partial => "partial",
            Self::NonCompliant => "non-compliant",
            Self::NotAssessed => "not-assessed",
        }
    }
}

impl FromStr for ComplianceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compliant" => Ok(Self::Compliant),
            "partial" => Ok(Self::Partial),
            "non-compliant" | "non_compliant" => Ok(Self::NonCompliant),
            "not-assessed" | "not_assessed" => Ok(Self::NotAssessed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item id to status; ids missing from the map are not assessed.
pub type GapStatuses = HashMap<String, ComplianceStatus>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplianceBand {
    NonCompliant,
    PartiallyCompliant,
    SubstantiallyCompliant,
    FullyCompliant,
}

impl ComplianceBand {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            95.. => Self::FullyCompliant,
            85.. => Self::SubstantiallyCompliant,
            70.. => Self::PartiallyCompliant,
            _ => Self::NonCompliant,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FullyCompliant => "Fully Compliant",
            Self::SubstantiallyCompliant => "Substantially Compliant",
            Self::PartiallyCompliant => "Partially Compliant",
            Self::NonCompliant => "Non-Compliant",
        }
    }
}

impl std::fmt::Display for ComplianceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `round(((compliant + 0.5 * partial) / total) * 100)`, half-up; 0 when
/// `total` is 0.
pub fn weighted_percent(compliant: usize, partial: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let half_units = 2 * compliant + partial;
    let percent = (half_units * 100 + total) / (2 * total);
    percent.min(100) as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapScore {
    pub total: usize,
    pub compliant_count: usize,
    pub partial_count: usize,
    pub non_compliant_count: usize,
    pub not_assessed_count: usize,
    pub score_percent: u8,
    pub band: ComplianceBand,
}

impl GapScore {
    fn tally(statuses: impl IntoIterator<Item = ComplianceStatus>) -> Self {
        let mut score = Self {
            total: 0,
            compliant_count: 0,
            partial_count: 0,
            non_compliant_count: 0,
            not_assessed_count: 0,
            score_percent: 0,
            band: ComplianceBand::NonCompliant,
        };
        for status in statuses {
            score.total += 1;
            match status {
                ComplianceStatus::Compliant => score.compliant_count += 1,
                ComplianceStatus::Partial => score.partial_count += 1,
                ComplianceStatus::NonCompliant => score.non_compliant_count += 1,
                ComplianceStatus::NotAssessed => score.not_assessed_count += 1,
            }
        }
        score.score_percent =
            weighted_percent(score.compliant_count, score.partial_count, score.total);
        score.band = ComplianceBand::from_percent(score.score_percent);
        score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    #[serde(flatten)]
    pub score: GapScore,
}

/// A catalog item that is not yet compliant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapItem {
    #[serde(flatten)]
    pub item: ChecklistItem,
    pub status: ComplianceStatus,
}

#[derive(Debug, Clone, Default)]
pub struct GapScorer {
    catalog: ChecklistCatalog,
}

impl GapScorer {
    pub fn new(catalog: ChecklistCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ChecklistCatalog {
        &self.catalog
    }

    pub fn item(&self, id: &str) -> Result<&ChecklistItem> {
        self.catalog.get(id)
    }

    /// Status of a catalog item under `statuses`.
    pub fn status_of(&self, statuses: &GapStatuses, id: &str) -> ComplianceStatus {
        statuses
            .get(id)
            .copied()
            .unwrap_or(ComplianceStatus::NotAssessed)
    }

    /// Overall score; every catalog item is counted exactly once.
    pub fn score(&self, statuses: &GapStatuses) -> GapScore {
        let _span = debug_span!("gap_score", items = self.catalog.len()).entered();
        for id in statuses.keys().filter(|id| !self.catalog.contains(id)) {
            debug!(item_id = %id, "status for unknown checklist item ignored");
        }
        let score = GapScore::tally(
            self.catalog
                .items()
                .iter()
                .map(|item| self.status_of(statuses, &item.id)),
        );
        debug!(percent = score.score_percent, band = %score.band, "gap score computed");
        score
    }

    /// Critical items not yet compliant.
    pub fn critical_gaps(&self, statuses: &GapStatuses) -> Vec<&ChecklistItem> {
        self.critical_gaps_excluding(statuses, &[ComplianceStatus::Compliant])
    }

    /// Critical items whose status is not in `exclude`.
    pub fn critical_gaps_excluding(
        &self,
        statuses: &GapStatuses,
        exclude: &[ComplianceStatus],
    ) -> Vec<&ChecklistItem> {
        self.catalog
            .items()
            .iter()
            .filter(|item| item.critical)
            .filter(|item| !exclude.contains(&self.status_of(statuses, &item.id)))
            .collect()
    }

    /// Per-category scores in catalog order.
    pub fn category_breakdown(&self, statuses: &GapStatuses) -> Vec<CategoryScore> {
        self.catalog
            .categories()
            .into_iter()
            .map(|category| CategoryScore {
                category: category.to_string(),
                score: GapScore::tally(
                    self.catalog
                        .items()
                        .iter()
                        .filter(|item| item.category == category)
                        .map(|item| self.status_of(statuses, &item.id)),
                ),
            })
            .collect()
    }

    /// Every item that is not compliant, in catalog order.
    pub fn gap_list(&self, statuses: &GapStatuses) -> Vec<GapItem> {
        self.catalog
            .items()
            .iter()
            .filter_map(|item| {
                let status = self.status_of(statuses, &item.id);
                (status != ComplianceStatus::Compliant).then(|| GapItem {
                    item: item.clone(),
                    status,
                })
            })
            .collect()
    }
}

/// Parse a raw id to status map, rejecting unknown status text.
pub fn parse_statuses<I, K, V>(raw: I) -> Result<GapStatuses>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    raw.into_iter()
        .map(|(id, status)| -> Result<(String, ComplianceStatus)> {
            Ok((id.into(), status.as_ref().parse()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str, critical: bool) -> ChecklistItem {
        ChecklistItem {
            id: id.into(),
            category: category.into(),
            item: format!("requirement {id}"),
            clause: "4.1".into(),
            critical,
        }
    }

    fn four_items() -> GapScorer {
        GapScorer::new(
            ChecklistCatalog::new(vec![
                item("a", "QMS", true),
                item("b", "QMS", true),
                item("c", "Design", false),
                item("d", "Design", true),
            ])
            .unwrap(),
        )
    }

    fn statuses(pairs: &[(&str, &str)]) -> GapStatuses {
        parse_statuses(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_four_item_score() {
        let scorer = four_items();
        let score = scorer.score(&statuses(&[
            ("a", "compliant"),
            ("b", "partial"),
            ("c", "non-compliant"),
        ]));
        assert_eq!(score.total, 4);
        assert_eq!(score.compliant_count, 1);
        assert_eq!(score.partial_count, 1);
        assert_eq!(score.non_compliant_count, 1);
        assert_eq!(score.not_assessed_count, 1);
        assert_eq!(score.score_percent, 38);
        assert_eq!(score.band, ComplianceBand::NonCompliant);
    }

    #[test]
    fn test_empty_catalog_scores_zero() {
        let score = GapScorer::default().score(&GapStatuses::new());
        assert_eq!(score.total, 0);
        assert_eq!(score.score_percent, 0);
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(weighted_percent(0, 1, 4), 13);
        assert_eq!(weighted_percent(1, 1, 4), 38);
        assert_eq!(weighted_percent(0, 1, 8), 6);
        assert_eq!(weighted_percent(2, 0, 3), 67);
        assert_eq!(weighted_percent(3, 0, 3), 100);
    }

    #[test]
    fn test_unknown_status_ids_are_ignored() {
        let scorer = four_items();
        let score = scorer.score(&statuses(&[("a", "compliant"), ("zzz", "compliant")]));
        assert_eq!(score.total, 4);
        assert_eq!(score.compliant_count, 1);
        assert_eq!(score.not_assessed_count, 3);
    }

    #[test]
    fn test_critical_gaps() {
        let scorer = four_items();
        let current = statuses(&[("a", "compliant"), ("b", "partial"), ("c", "non-compliant")]);
        let ids: Vec<&str> = scorer
            .critical_gaps(&current)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d"]);

        let ids: Vec<&str> = scorer
            .critical_gaps_excluding(
                &current,
                &[ComplianceStatus::Compliant, ComplianceStatus::Partial],
            )
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["d"]);
    }

    #[test]
    fn test_category_breakdown_in_catalog_order() {
        let scorer = four_items();
        let breakdown =
            scorer.category_breakdown(&statuses(&[("a", "compliant"), ("b", "compliant")]));
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "QMS");
        assert_eq!(breakdown[0].score.score_percent, 100);
        assert_eq!(breakdown[0].score.band, ComplianceBand::FullyCompliant);
        assert_eq!(breakdown[1].category, "Design");
        assert_eq!(breakdown[1].score.not_assessed_count, 2);
    }

    #[test]
    fn test_gap_list_skips_compliant() {
        let scorer = four_items();
        let gaps = scorer.gap_list(&statuses(&[("a", "compliant"), ("c", "partial")]));
        let ids: Vec<(&str, ComplianceStatus)> = gaps
            .iter()
            .map(|g| (g.item.id.as_str(), g.status))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("b", ComplianceStatus::NotAssessed),
                ("c", ComplianceStatus::Partial),
                ("d", ComplianceStatus::NotAssessed),
            ]
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "non_compliant".parse::<ComplianceStatus>().unwrap(),
            ComplianceStatus::NonCompliant
        );
        assert_eq!(
            "Compliant".parse::<ComplianceStatus>().unwrap(),
            ComplianceStatus::Compliant
        );
        assert!(matches!(
            "mostly".parse::<ComplianceStatus>(),
            Err(Error::InvalidStatus(_))
        ));
        assert!(parse_statuses([("a", "maybe")]).is_err());
    }

    #[test]
    fn test_bands() {
        assert_eq!(ComplianceBand::from_percent(95), ComplianceBand::FullyCompliant);
        assert_eq!(
            ComplianceBand::from_percent(94),
            ComplianceBand::SubstantiallyCompliant
        );
        assert_eq!(ComplianceBand::from_percent(70), ComplianceBand::PartiallyCompliant);
        assert_eq!(ComplianceBand::from_percent(69), ComplianceBand::NonCompliant);
    }

    #[test]
    fn test_item_lookup() {
        let scorer = four_items();
        assert_eq!(scorer.item("c").unwrap().category, "Design");
        assert!(scorer.item("x").is_err());
    }
}
