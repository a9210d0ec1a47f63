//! Gap scoring through the public API and the bundled catalog.

use pretty_assertions::assert_eq;
use qmsrisk::gap::parse_statuses;
use qmsrisk::{ChecklistCatalog, ChecklistItem, ComplianceBand, GapScorer, GapStatuses};

const BUNDLED: &str = include_str!("../data/iso13485_gap_catalog.toml");

fn item(id: &str) -> ChecklistItem {
    ChecklistItem {
        id: id.into(),
        category: "QMS Foundation".into(),
        item: format!("requirement {id}"),
        clause: "4.2".into(),
        critical: true,
    }
}

#[test]
fn test_partial_counts_half() {
    let scorer = GapScorer::new(
        ChecklistCatalog::new(vec![item("a"), item("b"), item("c"), item("d")]).unwrap(),
    );
    let statuses =
        parse_statuses([("a", "compliant"), ("b", "partial"), ("c", "non-compliant")]).unwrap();
    let score = scorer.score(&statuses);
    assert_eq!(
        (
            score.compliant_count,
            score.partial_count,
            score.non_compliant_count,
            score.not_assessed_count
        ),
        (1, 1, 1, 1)
    );
    assert_eq!(score.score_percent, 38);
}

#[test]
fn test_empty_catalog() {
    let scorer = GapScorer::new(ChecklistCatalog::new(vec![]).unwrap());
    let score = scorer.score(&GapStatuses::new());
    assert_eq!(score.score_percent, 0);
    assert!(scorer.critical_gaps(&GapStatuses::new()).is_empty());
}

#[test]
fn test_bundled_catalog_fully_compliant() {
    let scorer = GapScorer::new(ChecklistCatalog::from_toml_str(BUNDLED).unwrap());
    let statuses: Vec<(String, &str)> = scorer
        .catalog()
        .items()
        .iter()
        .map(|item| (item.id.clone(), "compliant"))
        .collect();
    let statuses = parse_statuses(statuses).unwrap();

    let score = scorer.score(&statuses);
    assert_eq!(score.total, 43);
    assert_eq!(score.score_percent, 100);
    assert_eq!(score.band, ComplianceBand::FullyCompliant);
    assert!(scorer.critical_gaps(&statuses).is_empty());
    assert!(scorer.gap_list(&statuses).is_empty());
}

#[test]
fn test_bundled_catalog_unassessed() {
    let scorer = GapScorer::new(ChecklistCatalog::from_toml_str(BUNDLED).unwrap());
    let score = scorer.score(&GapStatuses::new());
    assert_eq!(score.not_assessed_count, 43);
    assert_eq!(score.band, ComplianceBand::NonCompliant);
    assert_eq!(scorer.critical_gaps(&GapStatuses::new()).len(), 36);
    assert_eq!(scorer.item("dc-10").unwrap().clause, "7.3.10");
}
