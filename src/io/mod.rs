pub mod output;
pub mod risk_file;

pub use output::{create_writer, OutputFormat, ReportWriter};
pub use risk_file::{ControlEntry, HazardEntry, RiskFile};

use crate::core::{Result, ResultExt};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).context(format!("reading {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).context(format!("writing {}", path.display()))
}
