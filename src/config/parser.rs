use std::path::Path;
use crate::errors::SmugglerError;
use super::types::SmugglerConfig;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<SmugglerConfig, SmugglerError> {
    if !path.exists() {
        return Err(SmugglerError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(SmugglerError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<SmugglerConfig, SmugglerError> {
    // An empty YAML document deserializes to unit, not to an empty mapping.
    if content.trim().is_empty() {
        return Ok(SmugglerConfig::default());
    }

    let config: SmugglerConfig = serde_yaml::from_str(content)?;
    validate_values(&config)?;
    Ok(config)
}

/// Reject values that deserialize fine but can never work.
fn validate_values(config: &SmugglerConfig) -> Result<(), SmugglerError> {
    if let Some(scanner) = &config.scanner {
        if scanner.python_bin.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(SmugglerError::Config("scanner.python_bin must not be empty".into()));
        }
        if scanner.smuggler_path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(SmugglerError::Config("scanner.smuggler_path must not be empty".into()));
        }
        if scanner.max_duration_secs == Some(0) {
            warn!("scanner.max_duration_secs is 0, scans will run without a deadline");
        }
    }

    if let Some(server) = &config.server {
        if server.host.as_deref().is_some_and(str::is_empty) {
            return Err(SmugglerError::Config("server.host must not be empty".into()));
        }
    }

    Ok(())
}
