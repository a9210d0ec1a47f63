//! CLI command implementations.
//!
//! Each submodule loads its inputs, runs the library operation and renders
//! the result. Errors are reported through `anyhow` with file context.

pub mod gap;
pub mod init;
pub mod matrix;
pub mod plan;
pub mod register;
pub mod suggest;

pub use gap::{run_gap, GapCommand};
pub use init::init_config;
pub use matrix::print_matrix;
pub use plan::print_plan;
pub use register::{run_register, RegisterCommand};
pub use suggest::print_suggestions;

use crate::config::QmsRiskConfig;
use crate::io::RiskFile;
use crate::risk::RiskAssessment;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Build an assessment from a risk file under the configured policy.
pub fn load_assessment(risk_file: &Path, config: &QmsRiskConfig) -> Result<RiskAssessment> {
    let policy = config
        .thresholds
        .to_policy()
        .context("invalid [thresholds] in configuration")?;
    let assessment = RiskAssessment::with_policy(policy)
        .with_high_priority_threshold(config.thresholds.high_priority);
    let file = RiskFile::load(risk_file)
        .with_context(|| format!("failed to load risk file {}", risk_file.display()))?;
    file.apply_to(&assessment)
        .with_context(|| format!("invalid risk file {}", risk_file.display()))?;
    Ok(assessment)
}

/// Stdout or a file; color is only kept for stdout.
pub(crate) fn open_output(path: Option<&Path>, color: bool) -> Result<(Box<dyn Write>, bool)> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok((Box::new(BufWriter::new(file)), false))
        }
        None => Ok((Box::new(io::stdout().lock()), color)),
    }
}
