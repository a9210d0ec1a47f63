use super::open_output;
use crate::config::QmsRiskConfig;
use crate::gap::{parse_statuses, ChecklistCatalog, GapScorer, GapStatuses};
use crate::io::output::GapReport;
use crate::io::{create_writer, read_file, OutputFormat};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// ISO 13485:2016 checklist used when no catalog is configured
pub const BUNDLED_CATALOG: &str = include_str!("../../data/iso13485_gap_catalog.toml");

#[derive(Debug, Clone)]
pub struct GapCommand {
    pub statuses: PathBuf,
    pub catalog: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub fn run_gap(command: GapCommand, config: &QmsRiskConfig, color: bool) -> Result<()> {
    let catalog_path = command.catalog.as_ref().or(config.gap.catalog.as_ref());
    let catalog = match catalog_path {
        Some(path) => ChecklistCatalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => ChecklistCatalog::from_toml_str(BUNDLED_CATALOG)?,
    };
    let statuses = load_statuses(&command.statuses)?;

    let scorer = GapScorer::new(catalog);
    let report = GapReport {
        score: scorer.score(&statuses),
        categories: scorer.category_breakdown(&statuses),
        critical_gaps: scorer
            .critical_gaps(&statuses)
            .into_iter()
            .cloned()
            .collect(),
    };

    let (sink, color) = open_output(command.output.as_deref(), color)?;
    let mut writer = create_writer(command.format, sink, color);
    writer.write_gap(&report)?;
    writer.finish()?;
    Ok(())
}

/// Read an id to status table from TOML or JSON.
pub fn load_statuses(path: &Path) -> Result<GapStatuses> {
    let content = read_file(path)?;
    let raw: BTreeMap<String, String> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => toml::from_str(&content)?,
    };
    parse_statuses(raw).with_context(|| format!("invalid statuses in {}", path.display()))
}
