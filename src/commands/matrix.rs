use crate::config::QmsRiskConfig;
use crate::io::{create_writer, OutputFormat};
use anyhow::{Context, Result};
use std::io;

pub fn print_matrix(format: OutputFormat, config: &QmsRiskConfig, color: bool) -> Result<()> {
    let policy = config
        .thresholds
        .to_policy()
        .context("invalid [thresholds] in configuration")?;
    let mut writer = create_writer(format, Box::new(io::stdout().lock()), color);
    writer.write_matrix(&policy.build_matrix())?;
    writer.finish()?;
    Ok(())
}
