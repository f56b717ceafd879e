use thiserror::Error;

/// Errors raised by the hosting surface (config, arguments, transport).
///
/// Scanner failures are not errors at this level: a missing script, a launch
/// failure or a non-zero exit all come back as a `ScanResponse::Failure`.
#[derive(Debug, Error)]
pub enum SmugglerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SmugglerError {
    /// Process exit code used by the binary when a command fails.
    pub fn exit_code(&self) -> i32 {
        match self {
            SmugglerError::Config(_) | SmugglerError::Yaml(_) => 2,
            SmugglerError::InvalidTarget(_) => 5,
            _ => 1,
        }
    }
}
