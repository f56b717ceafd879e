pub mod assembler;
pub mod extract;
pub mod invocation;
pub mod tool;

pub use assembler::{assemble, ScanMetadata, ScanResponse};
pub use extract::extract_findings;
pub use invocation::Invocation;
pub use tool::{SmugglerRequest, SmugglerTool, TOOL_NAME};
