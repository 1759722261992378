//! CLI configuration loader

use std::fs;
use std::path::Path;

use artifact_core::NormalizerConfig;

use crate::CliError;

/// Load normalizer settings from a TOML file, or defaults when no path is given.
///
/// An explicitly named file that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<NormalizerConfig, CliError> {
    let Some(path) = path else {
        return Ok(NormalizerConfig::default());
    };

    if !path.exists() {
        return Err(CliError::Fatal(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::Fatal(format!("Failed to read config: {}", e)))?;

    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> Result<NormalizerConfig, CliError> {
    toml::from_str(raw).map_err(|e| {
        CliError::from(artifact_core::Error::Config(format!("Invalid config: {}", e)))
    })
}
