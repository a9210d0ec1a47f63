use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::QmsRiskConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".qmsrisk.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse config TOML and check that the thresholds form a valid policy
pub fn parse_and_validate_config(contents: &str) -> Result<QmsRiskConfig> {
    let config = toml::from_str::<QmsRiskConfig>(contents)
        .map_err(|e| Error::Configuration(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))?;

    config
        .thresholds
        .to_policy()
        .map_err(|e| Error::Configuration(format!("Invalid thresholds: {e}")))?;

    Ok(config)
}

/// Load a config file, logging and returning `None` when it is missing or unusable
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<QmsRiskConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Missing files are the common case
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its parents, nearest first, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.qmsrisk.toml` at or above `start`, or defaults
pub fn load_config_from(start: &Path) -> QmsRiskConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            QmsRiskConfig::default()
        })
}

pub fn load_config() -> QmsRiskConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            QmsRiskConfig::default()
        }
    }
}
