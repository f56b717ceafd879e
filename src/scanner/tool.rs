use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::config::ScannerConfig;
use crate::errors::SmugglerError;
use crate::models::finding::FindingSet;
use crate::process::ProcessSupervisor;
use crate::utils::strip_ansi;
use super::assembler::{assemble, ScanResponse};
use super::extract::extract_findings;
use super::invocation::Invocation;

pub const TOOL_NAME: &str = "do-smuggler";
pub const TOOL_DESCRIPTION: &str = "Run Smuggler to detect HTTP Request Smuggling vulnerabilities";

/// Help text for the pass-through scanner options.
pub const SMUGGLER_ARGS_HELP: &str = "Additional smuggler arguments
        -m, --method METHOD  Specify the HTTP method to use (default: POST)
        -v, --vhost VHOST    Specify a virtual host to use
        -l, --len            Enable Content-Length header in all requests
        -c, --configfile FILE
                             Specify a configuration file to load payloads from
        -x                   Exit on the first finding
        -t, --timeout TIMEOUT
                             Socket timeout value (default: 5)
        -verify VERIFY       Verify findings with more requests; never, quick or thorough (default: quick)";

/// Arguments of a `do-smuggler` call.
#[derive(Debug, Clone, Deserialize)]
pub struct SmugglerRequest {
    pub url: String,
    #[serde(default)]
    pub smuggler_args: Option<Vec<String>>,
}

impl SmugglerRequest {
    pub fn new(url: impl Into<String>, smuggler_args: Vec<String>) -> Self {
        Self { url: url.into(), smuggler_args: Some(smuggler_args) }
    }

    /// The target must be an absolute URL. It is still passed to the scanner
    /// exactly as given.
    pub fn validate(&self) -> Result<(), SmugglerError> {
        Url::parse(&self.url)
            .map(|_| ())
            .map_err(|e| SmugglerError::InvalidTarget(format!("{}: {}", self.url, e)))
    }
}

/// The `do-smuggler` operation: pre-flight check, supervised run, then
/// sanitize, extract and assemble.
#[derive(Debug, Clone)]
pub struct SmugglerTool {
    config: Arc<ScannerConfig>,
    supervisor: ProcessSupervisor,
}

impl SmugglerTool {
    pub fn new(config: Arc<ScannerConfig>) -> Self {
        let supervisor = ProcessSupervisor::new(config.max_duration);
        Self { config, supervisor }
    }

    /// Run one scan. Only invalid arguments are errors; every scanner failure
    /// is reported inside the returned [`ScanResponse`].
    pub async fn call(&self, request: SmugglerRequest) -> Result<ScanResponse, SmugglerError> {
        request.validate()?;

        let script = &self.config.smuggler_path;
        if !tokio::fs::try_exists(script).await.unwrap_or(false) {
            warn!(path = %script.display(), "Smuggler script missing, not launching");
            return Ok(ScanResponse::script_missing(script));
        }

        let invocation = Invocation::new(
            &self.config,
            request.url,
            request.smuggler_args.unwrap_or_default(),
        );
        info!(target_url = %invocation.target_url, command = %invocation.command_line(), "Starting smuggler scan");

        let outcome = self.supervisor.run(&invocation.python_bin, &invocation.args()).await;

        let sanitized = strip_ansi(&outcome.captured);
        let findings = if outcome.succeeded() {
            let findings = extract_findings(&sanitized);
            info!(
                vulnerable = !findings.is_empty(),
                cl_te = findings.cl_te.len(),
                te_cl = findings.te_cl.len(),
                "Smuggler scan complete"
            );
            findings
        } else {
            FindingSet::default()
        };

        Ok(assemble(&outcome, sanitized, findings, &invocation))
    }
}
