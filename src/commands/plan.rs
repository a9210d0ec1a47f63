use super::load_assessment;
use crate::config::QmsRiskConfig;
use anyhow::Result;
use std::path::Path;

pub fn print_plan(risk_file: &Path, hazard_id: &str, config: &QmsRiskConfig) -> Result<()> {
    let assessment = load_assessment(risk_file, config)?;
    let plan = assessment.control_plan(hazard_id)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
