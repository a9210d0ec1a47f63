use super::{load_assessment, open_output};
use crate::config::QmsRiskConfig;
use crate::io::output::RegisterReport;
use crate::io::{create_writer, OutputFormat};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub risk_file: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub threshold: Option<u8>,
}

pub fn run_register(command: RegisterCommand, config: &QmsRiskConfig, color: bool) -> Result<()> {
    let assessment = load_assessment(&command.risk_file, config)?;
    let threshold = command
        .threshold
        .unwrap_or(config.thresholds.high_priority);

    let register = assessment.generate_register();
    let report = RegisterReport {
        high_priority: register.high_priority(threshold),
        category_summary: register.category_summary(),
        high_priority_threshold: threshold,
        rows: register.rows().to_vec(),
    };

    let (sink, color) = open_output(command.output.as_deref(), color)?;
    let mut writer = create_writer(command.format, sink, color);
    writer.write_register(&report)?;
    writer.finish()?;
    Ok(())
}
