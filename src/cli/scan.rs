use std::sync::Arc;

use crate::cli::commands::ScanArgs;
use crate::config::load_config;
use crate::errors::SmugglerError;
use crate::scanner::{SmugglerRequest, SmugglerTool};

/// Run one `do-smuggler` call locally. The tool result goes to stdout as
/// JSON; logs stay on stderr.
pub async fn handle_scan(args: ScanArgs) -> Result<(), SmugglerError> {
    let file = load_config(args.scanner.config.as_deref()).await?;
    let scanner = Arc::new(file.scanner_config(&args.scanner.overrides()));

    let tool = SmugglerTool::new(scanner);
    let response = tool.call(SmugglerRequest::new(args.url, args.smuggler_args)).await?;

    println!("{}", serde_json::to_string_pretty(&response.to_tool_result())?);
    Ok(())
}
