use crate::config::QmsRiskConfig;
use crate::enrichment::{EnrichmentHook, ProductContext};
use crate::risk::RiskAssessment;
use anyhow::Result;

/// No provider client ships with the binary, so this prints the template
/// hazards for review.
pub fn print_suggestions(context: &ProductContext, config: &QmsRiskConfig) -> Result<()> {
    let hook = EnrichmentHook::from_config(None, &config.enrichment);
    let proposals = RiskAssessment::new()
        .with_enrichment(hook)
        .suggest_hazards(context);
    println!("{}", serde_json::to_string_pretty(&proposals)?);
    Ok(())
}
