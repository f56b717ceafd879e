use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::finding::FindingSet;
use crate::process::{ProcessOutcome, Termination};
use super::invocation::Invocation;

/// Metadata attached to a successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMetadata {
    pub findings: FindingSet,
    pub command: String,
}

/// What the `do-smuggler` operation returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResponse {
    Success { output: String, metadata: ScanMetadata },
    Failure { message: String },
}

impl ScanResponse {
    pub fn script_missing(path: &Path) -> Self {
        ScanResponse::Failure {
            message: format!(
                "Smuggler script not found at {}. Ensure it is cloned during build.",
                path.display()
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScanResponse::Success { .. })
    }

    /// The single text block of the response.
    pub fn text(&self) -> &str {
        match self {
            ScanResponse::Success { output, .. } => output,
            ScanResponse::Failure { message } => message,
        }
    }

    pub fn metadata(&self) -> Option<&ScanMetadata> {
        match self {
            ScanResponse::Success { metadata, .. } => Some(metadata),
            ScanResponse::Failure { .. } => None,
        }
    }

    /// Tool-call result body: one text content block, plus metadata on success.
    pub fn to_tool_result(&self) -> Value {
        let mut result = json!({
            "content": [{ "type": "text", "text": self.text() }],
        });
        if let Some(metadata) = self.metadata() {
            result["metadata"] = json!(metadata);
        }
        result
    }
}

/// Build the response for a finished run.
///
/// `sanitized` is the captured output with escape sequences removed and
/// `findings` the markers extracted from it; both are ignored on failure
/// except for surfacing the partial output.
pub fn assemble(
    outcome: &ProcessOutcome,
    sanitized: String,
    findings: FindingSet,
    invocation: &Invocation,
) -> ScanResponse {
    if outcome.succeeded() {
        return ScanResponse::Success {
            output: sanitized,
            metadata: ScanMetadata {
                findings,
                command: invocation.command_line(),
            },
        };
    }

    let (code, detail) = match &outcome.termination {
        Termination::Exited(code) => (code.to_string(), "See logs".to_string()),
        Termination::LaunchFailed(error) => ("spawn error".to_string(), error.clone()),
        Termination::TimedOut(limit) => (
            "timeout".to_string(),
            format!("Scan exceeded {}s and was killed", limit.as_secs()),
        ),
        Termination::Terminated(reason) => ("none".to_string(), reason.clone()),
    };

    let mut message = format!("Smuggler failed (code: {}). {}", code, detail);
    if !sanitized.is_empty() {
        message.push_str("\n\n");
        message.push_str(&sanitized);
    }

    ScanResponse::Failure { message }
}
