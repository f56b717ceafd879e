pub mod parser;
pub mod types;

pub use types::*;
pub use parser::{parse_config, parse_config_str};

use std::path::Path;
use crate::errors::SmugglerError;

/// Load the optional config file, falling back to defaults when none is named.
pub async fn load_config(path: Option<&Path>) -> Result<SmugglerConfig, SmugglerError> {
    match path {
        Some(path) => parse_config(path).await,
        None => Ok(SmugglerConfig::default()),
    }
}
