pub mod loader;
pub mod thresholds;

pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use thresholds::ThresholdsConfig;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Contents of `.qmsrisk.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QmsRiskConfig {
    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    #[serde(default)]
    pub gap: GapConfig,
}

/// Hazard suggestion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

/// Gap analysis settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapConfig {
    /// Checklist catalog file; the bundled ISO 13485 catalog when unset
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

/// Default configuration file written by `qmsrisk init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# qmsrisk configuration

[thresholds]
# ISO 14971 acceptability: score >= unacceptable is UNACCEPTABLE,
# score >= undesirable is UNDESIRABLE
unacceptable = 15
undesirable = 8
high_priority = 8

[enrichment]
timeout_ms = 30000

[gap]
# catalog = "checklists/iso13485.toml"
"#;
